use std::time::Duration;

use blot_server::domain::Phase;
use blot_server::services::rooms::RoomSettings;

use crate::common::eventually;
use crate::support::room_helpers::{identity, join};
use crate::support::test_state;

fn private_settings() -> RoomSettings {
    RoomSettings {
        is_private: true,
        password: Some("sekret".into()),
        ..RoomSettings::default()
    }
}

#[actix_web::test]
async fn listing_shows_public_rooms_only() {
    let state = test_state(Duration::from_secs(30));
    let (public, _) = state.rooms.create(RoomSettings::default()).unwrap();
    let (private, _) = state.rooms.create(private_settings()).unwrap();

    let listed: Vec<String> = state
        .rooms
        .list_public(50)
        .into_iter()
        .map(|s| s.code)
        .collect();
    assert_eq!(listed, vec![public]);

    // private rooms are still reachable by code, in any case
    assert!(state.rooms.find(&private.to_lowercase()).is_ok());
    assert_eq!(state.rooms.len(), 2);
}

#[actix_web::test]
async fn invalid_settings_are_rejected() {
    let state = test_state(Duration::from_secs(30));
    let settings = RoomSettings {
        turn_seconds: 1,
        ..RoomSettings::default()
    };
    assert!(state.rooms.create(settings).is_err());
    assert!(state.rooms.is_empty());
}

#[actix_web::test]
async fn quick_match_prefers_open_public_lobby() {
    let state = test_state(Duration::from_secs(30));
    assert!(state.rooms.quick_match_candidate().is_none());

    state.rooms.create(private_settings()).unwrap();
    assert!(state.rooms.quick_match_candidate().is_none());

    let (code, addr) = state.rooms.create(RoomSettings::default()).unwrap();
    let (found, _) = state.rooms.quick_match_candidate().unwrap();
    assert_eq!(found, code);

    let mut members = Vec::new();
    for n in 0..4 {
        members.push(join(&addr, identity(n), None).await);
    }

    // the summary refresh is pushed after each join
    let rooms = &state.rooms;
    let code = &code;
    eventually(Duration::from_secs(2), "full room summary", move || async move {
        let summary = rooms.summary(code)?;
        (summary.open_seats == 0).then_some(())
    })
    .await;
    assert!(state.rooms.quick_match_candidate().is_none());
    assert_eq!(state.rooms.summary(code).unwrap().phase, Phase::Lobby);
}
