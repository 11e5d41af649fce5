use std::time::Duration;

use blot_server::ai::BotLevel;
use blot_server::domain::Phase;
use blot_server::errors::domain::{DomainError, ValidationKind};
use blot_server::services::rooms::actor::{Act, Leave, PlayerAction, QueryLegal, RoomPush};
use blot_server::services::rooms::player_actions::GameIntent;
use blot_server::services::rooms::seats::JoinOutcome;
use blot_server::services::rooms::view::SeatOccupant;
use blot_server::services::rooms::RoomSettings;

use crate::common::eventually;
use crate::support::room_helpers::{identity, inspect, join, wait_for_room};
use crate::support::test_state;

#[actix_web::test]
async fn join_pushes_state_to_members() {
    let state = test_state(Duration::from_secs(30));
    let (_, addr) = state.rooms.create(RoomSettings::default()).unwrap();

    let (first, reply) = join(&addr, identity(1), None).await;
    assert_eq!(reply.outcome, JoinOutcome::Seated(0));
    assert_eq!(reply.view.you, Some(0));

    let (_second, reply) = join(&addr, identity(2), None).await;
    assert_eq!(reply.outcome, JoinOutcome::Seated(1));

    let first = &first;
    eventually(Duration::from_secs(2), "two-seat state push", move || async move {
        let seen = first.count(|p| match p {
            RoomPush::State(view) => {
                view.seats
                    .iter()
                    .filter(|s| s.occupant != SeatOccupant::Empty)
                    .count()
                    == 2
            }
            _ => false,
        });
        (seen > 0).then_some(())
    })
    .await;
}

#[actix_web::test]
async fn human_and_bots_finish_a_hand() {
    let state = test_state(Duration::from_secs(30));
    let (_, addr) = state.rooms.create(RoomSettings::default()).unwrap();
    let (member, _) = join(&addr, identity(1), None).await;
    let player_id = identity(1).player_id;

    let act = |action| Act {
        player_id: player_id.clone(),
        action,
    };
    addr.send(act(PlayerAction::FillBots(BotLevel::Normal)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(inspect(&addr).await.phase, Phase::Lobby);

    addr.send(act(PlayerAction::Ready(true))).await.unwrap().unwrap();

    // the human only ever passes and plays its first legal card
    for _ in 0..200 {
        let room = wait_for_room(&addr, "human turn or settlement", |r| {
            r.seat_to_act() == Some(0) || r.last_settlement.is_some()
        })
        .await;
        if room.last_settlement.is_some() {
            break;
        }
        let intent = if room.phase == Phase::Bidding {
            GameIntent::Pass
        } else {
            let legal = addr
                .send(QueryLegal {
                    player_id: player_id.clone(),
                })
                .await
                .unwrap()
                .unwrap();
            GameIntent::Play { card: legal[0] }
        };
        addr.send(act(PlayerAction::Game(intent)))
            .await
            .unwrap()
            .unwrap();
    }

    let room = inspect(&addr).await;
    let summary = room.last_settlement.expect("hand should be settled");
    assert_eq!(summary.tricks_won[0] + summary.tricks_won[1], 8);
    assert_eq!(room.totals, summary.totals);
    assert!(matches!(room.phase, Phase::Lobby | Phase::Finished));

    let member = &member;
    eventually(Duration::from_secs(2), "hand_scored push", move || async move {
        (member.count(|p| matches!(p, RoomPush::HandScored(_))) == 1).then_some(())
    })
    .await;
}

#[actix_web::test]
async fn acting_requires_a_seat() {
    let state = test_state(Duration::from_secs(30));
    let (_, addr) = state.rooms.create(RoomSettings::default()).unwrap();
    let _member = join(&addr, identity(1), None).await;

    let err = addr
        .send(Act {
            player_id: "stranger".into(),
            action: PlayerAction::Game(GameIntent::Pass),
        })
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotSeated, _)
    ));

    let err = addr
        .send(Act {
            player_id: "stranger".into(),
            action: PlayerAction::FillBots(BotLevel::Easy),
        })
        .await
        .unwrap()
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotSeated, _)
    ));
    assert_eq!(inspect(&addr).await.open_seats(), 3);

    let legal = addr
        .send(QueryLegal {
            player_id: "stranger".into(),
        })
        .await
        .unwrap();
    assert!(legal.is_err());
}

#[actix_web::test]
async fn chat_reaches_every_member() {
    let state = test_state(Duration::from_secs(30));
    let (_, addr) = state.rooms.create(RoomSettings::default()).unwrap();
    let (first, _) = join(&addr, identity(1), None).await;
    let (second, _) = join(&addr, identity(2), None).await;

    addr.send(Act {
        player_id: identity(2).player_id,
        action: PlayerAction::Chat("gl hf".into()),
    })
    .await
    .unwrap()
    .unwrap();

    let is_chat = |p: &RoomPush| matches!(p, RoomPush::Chat(entry) if entry.text == "gl hf");
    let (first, second) = (&first, &second);
    eventually(Duration::from_secs(2), "chat on both members", move || async move {
        (first.count(is_chat) == 1 && second.count(is_chat) == 1).then_some(())
    })
    .await;
    assert_eq!(inspect(&addr).await.chat.len(), 1);
}

#[actix_web::test]
async fn last_human_leaving_destroys_room() {
    let state = test_state(Duration::from_secs(30));
    let (code, addr) = state.rooms.create(RoomSettings::default()).unwrap();
    let (member, _) = join(&addr, identity(1), None).await;
    addr.send(Act {
        player_id: identity(1).player_id,
        action: PlayerAction::FillBots(BotLevel::Easy),
    })
    .await
    .unwrap()
    .unwrap();

    addr.send(Leave {
        player_id: identity(1).player_id,
    })
    .await
    .unwrap()
    .unwrap();

    assert!(state.rooms.find(&code).is_err(), "bots alone keep no room");
    let member = &member;
    eventually(Duration::from_secs(2), "closed push", move || async move {
        (member.count(|p| matches!(p, RoomPush::Closed { .. })) == 1).then_some(())
    })
    .await;
}
