use std::time::Duration;

use serde_json::{json, Value};

use crate::support::test_state;
use crate::support::websocket::start_test_server;
use crate::support::websocket_client::WebSocketClient;

const MAX_FRAMES: usize = 2_000;

#[actix_web::test]
async fn play_a_hand_against_bots() -> Result<(), Box<dyn std::error::Error>> {
    let (server, addr) = start_test_server(test_state(Duration::from_secs(30)))?;
    let url = format!("ws://{addr}/api/ws");
    let mut client = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    client.hello(None).await?;

    client
        .send_json(&json!({ "type": "create_room", "settings": { "target_score": 151 } }))
        .await?;
    let joined = client.recv_type("room_joined").await?;
    assert_eq!(joined["seat"], 0);
    assert_eq!(joined["spectator"], false);

    client
        .send_json(&json!({ "type": "fill_bots", "level": "normal" }))
        .await?;
    client.send_json(&json!({ "type": "ready" })).await?;

    // pass every auction turn, play the first legal card otherwise
    let mut acted_on = -1i64;
    let mut summary: Option<Value> = None;
    for _ in 0..MAX_FRAMES {
        let Some(msg) = client.recv_json().await? else {
            break;
        };
        match msg["type"].as_str() {
            Some("hand_scored") => {
                summary = Some(msg["summary"].clone());
                break;
            }
            Some("error") => panic!("unexpected error frame: {msg}"),
            Some("state") => {
                let state = &msg["state"];
                let revision = state["revision"].as_i64().unwrap_or_default();
                if state["turn"] != 0 || revision <= acted_on {
                    continue;
                }
                acted_on = revision;
                match state["phase"].as_str() {
                    Some("BIDDING") => client.send_json(&json!({ "type": "pass" })).await?,
                    Some("TRICK") => {
                        let card = state["legal_plays"][0].clone();
                        assert!(!card.is_null(), "our turn must offer a legal card");
                        client
                            .send_json(&json!({ "type": "play", "card": card }))
                            .await?;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    let summary = summary.expect("a hand_scored frame");
    assert_eq!(summary["hand_no"], 1);
    let tricks: u64 = summary["tricks_won"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_u64)
        .sum();
    assert_eq!(tricks, 8);

    server.stop(true).await;
    Ok(())
}

#[actix_web::test]
async fn legal_query_and_chat() -> Result<(), Box<dyn std::error::Error>> {
    let (server, addr) = start_test_server(test_state(Duration::from_secs(30)))?;
    let url = format!("ws://{addr}/api/ws");
    let mut client = WebSocketClient::connect_retry(&url, Duration::from_secs(1)).await?;
    let welcome = client.hello(None).await?;

    client
        .send_json(&json!({ "type": "quick_match" }))
        .await?;
    client.recv_type("room_joined").await?;

    client.send_json(&json!({ "type": "legal" })).await?;
    let legal = client.recv_type("legal").await?;
    assert_eq!(legal["cards"], json!([]));

    client
        .send_json(&json!({ "type": "chat", "text": "hello table" }))
        .await?;
    let chat = client.recv_type("chat").await?;
    assert_eq!(chat["entry"]["text"], "hello table");
    assert_eq!(chat["entry"]["name"], welcome["name"]);

    server.stop(true).await;
    Ok(())
}
