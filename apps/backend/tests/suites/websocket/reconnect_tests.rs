use std::time::Duration;

use blot_server::services::rooms::SeatSlot;
use serde_json::json;

use crate::support::room_helpers::wait_for_room;
use crate::support::test_state;
use crate::support::websocket::start_test_server;
use crate::support::websocket_client::WebSocketClient;

#[actix_web::test]
async fn token_resumes_seat_after_disconnect() -> Result<(), Box<dyn std::error::Error>> {
    let (server, addr) = start_test_server(test_state(Duration::from_secs(30)))?;
    let url = format!("ws://{addr}/api/ws");

    let mut first = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = first.hello(None).await?;
    let token = welcome["token"].as_str().unwrap().to_string();

    first
        .send_json(&json!({ "type": "create_room" }))
        .await?;
    let joined = first.recv_type("room_joined").await?;
    let code = joined["code"].as_str().unwrap().to_string();
    first.close().await?;

    let mut second = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = second.hello(Some(&token)).await?;
    assert_eq!(welcome["resume"], code.as_str());

    let joined = second.recv_type("room_joined").await?;
    assert_eq!(joined["code"], code.as_str());
    assert_eq!(joined["seat"], 0);
    assert_eq!(joined["resumed"], true);

    let state = second.recv_type("state").await?;
    assert_eq!(state["state"]["you"], 0);

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn leave_room_clears_resume() -> Result<(), Box<dyn std::error::Error>> {
    let (server, addr) = start_test_server(test_state(Duration::from_secs(30)))?;
    let url = format!("ws://{addr}/api/ws");

    let mut first = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = first.hello(None).await?;
    let token = welcome["token"].as_str().unwrap().to_string();

    first.send_json(&json!({ "type": "create_room" })).await?;
    let joined = first.recv_type("room_joined").await?;
    first.send_json(&json!({ "type": "leave_room" })).await?;
    let left = first.recv_type("room_left").await?;
    assert_eq!(left["code"], joined["code"]);
    first.close().await?;

    let mut second = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = second.hello(Some(&token)).await?;
    assert!(welcome["resume"].is_null());

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn hello_after_grace_expiry_starts_fresh() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state(Duration::from_millis(200));
    let (server, addr) = start_test_server(state.clone())?;
    let url = format!("ws://{addr}/api/ws");

    // the host keeps the room alive
    let mut host = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    host.hello(None).await?;
    host.send_json(&json!({ "type": "create_room" })).await?;
    let joined = host.recv_type("room_joined").await?;
    let code = joined["code"].as_str().unwrap().to_string();

    let mut guest = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = guest.hello(None).await?;
    let token = welcome["token"].as_str().unwrap().to_string();
    guest
        .send_json(&json!({ "type": "join_room", "code": code }))
        .await?;
    let joined = guest.recv_type("room_joined").await?;
    assert_eq!(joined["seat"], 1);
    guest.close().await?;

    let room = state.rooms.find(&code)?;
    wait_for_room(&room, "guest seat cleared", |r| r.seats[1].is_empty()).await;

    let mut back = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = back.hello(Some(&token)).await?;
    assert!(welcome["resume"].is_null());

    // no room_joined in between: the next frame answers list_rooms
    back.send_json(&json!({ "type": "list_rooms" })).await?;
    let next = back.recv_json().await?.ok_or("socket closed")?;
    assert_eq!(next["type"], "rooms");

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn closing_mid_join_still_starts_grace() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state(Duration::from_secs(30));
    let (server, addr) = start_test_server(state.clone())?;
    let url = format!("ws://{addr}/api/ws");

    let mut host = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    host.hello(None).await?;
    host.send_json(&json!({ "type": "create_room" })).await?;
    let joined = host.recv_type("room_joined").await?;
    let code = joined["code"].as_str().unwrap().to_string();

    let mut guest = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    guest.hello(None).await?;
    guest
        .send_json(&json!({ "type": "join_room", "code": code }))
        .await?;
    // gone before the join reply can arrive
    guest.close().await?;

    let room = state.rooms.find(&code)?;
    wait_for_room(&room, "guest seated and disconnected", |r| {
        matches!(&r.seats[1], SeatSlot::Human(h) if !h.connected)
    })
    .await;

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn second_join_while_joining_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let state = test_state(Duration::from_secs(30));
    let (server, addr) = start_test_server(state.clone())?;
    let url = format!("ws://{addr}/api/ws");

    let mut host = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    host.hello(None).await?;
    host.send_json(&json!({ "type": "create_room" })).await?;
    let joined = host.recv_type("room_joined").await?;
    let code = joined["code"].as_str().unwrap().to_string();

    let mut guest = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = guest.hello(None).await?;
    let join = json!({ "type": "join_room", "code": code });
    guest.send_json(&join).await?;
    guest.send_json(&join).await?;

    let err = guest.recv_type("error").await?;
    assert_eq!(err["code"], "INVALID_STATE");

    let room = state.rooms.find(&code)?;
    let player_id = welcome["player_id"].as_str().unwrap().to_string();
    let room = wait_for_room(&room, "guest seated", move |r| {
        r.seat_of(&player_id).is_some()
    })
    .await;
    assert_eq!(room.spectators.len(), 0);

    server.stop(true).await;
    Ok(())
}
