use time::macros::datetime;
use time::OffsetDateTime;

use super::player_actions::GameIntent;
use super::{Room, RoomSettings};
use crate::ai::BotLevel;
use crate::domain::bidding::ContraLevel;
use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::hand::HandState;
use crate::domain::rules::TargetScore;
use crate::domain::{deal_ordered, full_deck, Bid, Card, Phase, Seat, Suit, Team, Trump};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::services::identity::PlayerIdentity;

const HEARTS: Trump = Trump::Suit(Suit::Hearts);
const SPADES: Trump = Trump::Suit(Suit::Spades);
const MAX_STEPS: usize = 5_000;

fn now() -> OffsetDateTime {
    datetime!(2026-03-01 18:00 UTC)
}

fn player(n: u8) -> PlayerIdentity {
    PlayerIdentity {
        player_id: format!("p{n}"),
        name: format!("Player {n}"),
        avatar: None,
        token: format!("{n:032}"),
        last_room: None,
    }
}

fn validation_kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(k, _) => k,
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Seat 1 holds the top spades (dealer 0, so seat 1 also opens).
fn rigged_deal() -> [Vec<Card>; 4] {
    let order = try_parse_cards([
        "7S", "7H", "8H", "9H", "7D", "8D", "9D", "7C", // seat 0
        "JS", "9S", "AS", "TS", "KS", "QS", "AH", "TH", // seat 1
        "8S", "JH", "JD", "QD", "8C", "9C", "JC", "QC", // seat 2
        "AD", "TD", "AC", "TC", "KH", "KD", "KC", "QH", // seat 3
    ])
    .unwrap();
    deal_ordered(&order).unwrap()
}

/// Four humans, hand started with the rigged cards.
fn human_table(settings: RoomSettings) -> Room {
    let mut room = Room::new("K7M2QX".to_string(), settings, 7, now()).unwrap();
    for n in 0..4 {
        room.join(&player(n), None).unwrap();
    }
    for n in 0..4 {
        room.set_ready(&format!("p{n}"), true, now()).unwrap();
    }
    room.hand = Some(HandState::new(room.dealer, rigged_deal()));
    room
}

fn bid(trump: Trump, points: u16) -> GameIntent {
    GameIntent::Bid {
        bid: Bid::points(trump, points),
    }
}

/// Seat 1 takes spades at `points`, the others pass.
fn auction_to_spades(room: &mut Room, points: u16) {
    room.apply_intent(1, bid(SPADES, points), now()).unwrap();
    for seat in [2, 3] {
        room.apply_intent(seat, GameIntent::Pass, now()).unwrap();
    }
    let outcome = room.apply_intent(0, GameIntent::Pass, now()).unwrap();
    assert!(outcome.auction_ended);
    assert_eq!(room.phase, Phase::Trick);
}

/// Each seat plays its first legal card until the hand is scored.
fn play_out(room: &mut Room) -> super::HandSummary {
    for _ in 0..32 {
        let seat = room.seat_to_act().expect("a seat should be on turn");
        let card = room.legal_plays(seat)[0];
        let outcome = room
            .apply_intent(seat, GameIntent::Play { card }, now())
            .unwrap();
        if let Some(summary) = outcome.hand_scored {
            return summary;
        }
    }
    panic!("hand did not finish in 32 plays");
}

/// Run bots until nobody is on turn.
fn drive_bots(room: &mut Room) {
    for _ in 0..MAX_STEPS {
        let Some(seat) = room.seat_to_act() else {
            return;
        };
        room.run_bot_turn(seat, now())
            .expect("bot should always find an action");
    }
    panic!("bots did not finish a hand in {MAX_STEPS} steps");
}

fn bot_table(level: BotLevel, seed: u64) -> Room {
    let mut room = Room::new("BOTS00".to_string(), RoomSettings::default(), seed, now()).unwrap();
    room.fill_with_bots(level).unwrap();
    assert!(room.maybe_start(now()));
    room
}

#[test]
fn test_intents_are_routed_by_phase() {
    let mut room = human_table(RoomSettings::default());

    let card = room.hand.as_ref().unwrap().hands[1][0];
    let err = room
        .apply_intent(1, GameIntent::Play { card }, now())
        .unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidState);

    auction_to_spades(&mut room, 80);
    let err = room.apply_intent(2, GameIntent::Pass, now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidState);
}

#[test]
fn test_lobby_rejects_game_intents() {
    let mut room = Room::new("K7M2QX".into(), RoomSettings::default(), 1, now()).unwrap();
    room.join(&player(0), None).unwrap();
    let err = room.apply_intent(0, GameIntent::Pass, now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidState);
}

#[test]
fn test_out_of_turn_bid_rejected() {
    let mut room = human_table(RoomSettings::default());
    let err = room.apply_intent(2, bid(HEARTS, 80), now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotYourTurn);

    room.apply_intent(1, bid(HEARTS, 90), now()).unwrap();
    let err = room.apply_intent(2, bid(HEARTS, 90), now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::BadBid);
}

#[test]
fn test_play_validation_errors() {
    let mut room = human_table(RoomSettings::default());
    auction_to_spades(&mut room, 80);
    assert_eq!(room.seat_to_act(), Some(1));
    assert!(room.legal_plays(2).is_empty());

    let held = room.hand.as_ref().unwrap().hands[1].clone();
    let foreign = full_deck()
        .into_iter()
        .find(|c| !held.contains(c))
        .unwrap();
    let err = room
        .apply_intent(1, GameIntent::Play { card: foreign }, now())
        .unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::CardNotHeld);

    let err = room
        .apply_intent(2, GameIntent::Play { card: held[0] }, now())
        .unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::NotYourTurn);

    // seat 1 leads the jack of trumps; seat 2 holds 8S and must follow
    let js: Card = "JS".parse().unwrap();
    room.apply_intent(1, GameIntent::Play { card: js }, now())
        .unwrap();
    let jh: Card = "JH".parse().unwrap();
    let err = room
        .apply_intent(2, GameIntent::Play { card: jh }, now())
        .unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::IllegalPlay);
    assert_eq!(room.legal_plays(2), vec!["8S".parse::<Card>().unwrap()]);
}

#[test]
fn test_full_hand_settles_into_totals() {
    let mut room = human_table(RoomSettings::default());
    auction_to_spades(&mut room, 80);

    let view = room.view_for(Some(1));
    assert!(view.auction.is_none());
    assert!(view.melds.is_some());
    assert_eq!(view.bid_log.len(), 4);

    let summary = play_out(&mut room);
    assert_eq!(summary.hand_no, 1);
    assert_eq!(summary.contract.declarer, 1);
    assert_eq!(summary.totals, room.totals);
    assert_eq!(summary.tricks_won[0] + summary.tricks_won[1], 8);
    assert!(!summary.match_over);

    assert_eq!(room.phase, Phase::Lobby);
    assert!(room.hand.is_none());
    assert_eq!(room.dealer, 1);
    assert_eq!(room.ready, [false; 4]);
    assert_eq!(room.last_settlement.as_ref(), Some(&summary));
    assert_eq!(room.seat_to_act(), None);
}

#[test]
fn test_contra_and_redouble() {
    let mut room = human_table(RoomSettings::default());
    room.apply_intent(1, bid(SPADES, 100), now()).unwrap();

    // partner may not double their own side
    let err = room.apply_intent(3, GameIntent::Contra, now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidState);

    let outcome = room.apply_intent(2, GameIntent::Contra, now()).unwrap();
    assert!(outcome.auction_ended);
    assert_eq!(room.phase, Phase::Trick);

    let err = room.apply_intent(0, GameIntent::Redouble, now()).unwrap_err();
    assert_eq!(validation_kind(err), ValidationKind::InvalidState);

    room.apply_intent(3, GameIntent::Redouble, now()).unwrap();
    let contract = room.hand.as_ref().unwrap().contract.unwrap();
    assert_eq!(contract.contra, ContraLevel::Redouble);

    let summary = play_out(&mut room);
    assert_eq!(summary.contract.contra, ContraLevel::Redouble);
}

#[test]
fn test_reaching_target_finishes_match_then_restarts() {
    let mut room = human_table(RoomSettings {
        target_score: TargetScore::S151,
        ..RoomSettings::default()
    });
    room.totals = [150, 150];
    auction_to_spades(&mut room, 80);

    let summary = play_out(&mut room);
    assert!(summary.match_over);
    assert_eq!(room.phase, Phase::Finished);
    let expected = match room.totals[0].cmp(&room.totals[1]) {
        std::cmp::Ordering::Greater => Some(Team::A),
        std::cmp::Ordering::Less => Some(Team::B),
        std::cmp::Ordering::Equal => None,
    };
    assert_eq!(room.winner, expected);
    assert_eq!(summary.winner, expected);

    for n in 0..4 {
        room.set_ready(&format!("p{n}"), true, now()).unwrap();
    }
    assert_eq!(room.phase, Phase::Bidding);
    assert_eq!(room.totals, [0, 0]);
    assert_eq!(room.hand_no, 1);
    assert_eq!(room.winner, None);
    assert!(room.last_settlement.is_none());
}

#[test]
fn test_auto_play_acts_only_for_seat_on_turn() {
    let mut room = human_table(RoomSettings::default());
    assert!(room.auto_play(2, now()).is_none());

    let before = room.revision;
    assert!(room.auto_play(1, now()).is_some());
    assert!(room.revision > before);
    assert_ne!(room.seat_to_act(), Some(1));
}

#[test]
fn test_run_bot_turn_ignores_humans() {
    let mut room = human_table(RoomSettings::default());
    assert!(room.run_bot_turn(1, now()).is_none());
}

#[test]
fn test_bots_play_a_full_hand() {
    let mut room = bot_table(BotLevel::Normal, 11);
    drive_bots(&mut room);

    assert!(matches!(room.phase, Phase::Lobby | Phase::Finished));
    let summary = room.last_settlement.clone().unwrap();
    assert_eq!(summary.hand_no, 1);
    assert_eq!(summary.tricks_won[0] + summary.tricks_won[1], 8);
    assert_eq!(summary.totals, room.totals);
}

#[test]
fn test_easy_bots_finish_a_hand() {
    let mut room = bot_table(BotLevel::Easy, 5);
    drive_bots(&mut room);
    assert!(room.last_settlement.is_some());
}

#[test]
fn test_bot_tables_are_deterministic_per_seed() {
    let mut a = bot_table(BotLevel::Normal, 99);
    let mut b = bot_table(BotLevel::Normal, 99);
    drive_bots(&mut a);
    drive_bots(&mut b);
    assert_eq!(a.last_settlement, b.last_settlement);
    assert_eq!(a.deal_no, b.deal_no);
}

#[test]
fn test_decide_for_only_offers_legal_cards() {
    let mut room = bot_table(BotLevel::Normal, 3);
    // run the auction to completion
    for _ in 0..MAX_STEPS {
        if room.phase == Phase::Trick {
            break;
        }
        let seat = room.seat_to_act().unwrap();
        room.run_bot_turn(seat, now()).unwrap();
    }
    assert_eq!(room.phase, Phase::Trick);

    let seat: Seat = room.seat_to_act().unwrap();
    let ai = crate::ai::create_ai(BotLevel::Normal, Some(1));
    match room.decide_for(seat, ai.as_ref()) {
        Some(GameIntent::Play { card }) => assert!(room.legal_plays(seat).contains(&card)),
        other => panic!("expected a play, got {other:?}"),
    }
}
