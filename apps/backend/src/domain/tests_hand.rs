use crate::domain::bidding::{AuctionOutcome, Bid, ContraLevel};
use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::hand::HandState;
use crate::domain::rules::RuleConfig;
use crate::domain::state::Team;
use crate::domain::{card_points, deal_ordered, Card, Suit, Trump};
use crate::errors::domain::{DomainError, ValidationKind};

const SPADES: Trump = Trump::Suit(Suit::Spades);

/// Seat 0 holds the six top spades, seat 2 the side aces and tens.
fn golden_deal() -> [Vec<Card>; 4] {
    let order = try_parse_cards([
        "JS", "9S", "AS", "TS", "KS", "QS", "AH", "TH", // seat 0
        "7S", "7H", "8H", "9H", "7D", "8D", "9D", "7C", // seat 1
        "AD", "TD", "AC", "TC", "KH", "KD", "KC", "QH", // seat 2
        "8S", "JH", "JD", "QD", "8C", "9C", "JC", "QC", // seat 3
    ])
    .unwrap();
    deal_ordered(&order).unwrap()
}

fn kind(err: DomainError) -> ValidationKind {
    match err {
        DomainError::Validation(k, _) => k,
        other => panic!("expected validation error, got {other:?}"),
    }
}

/// Dealer 3, seat 0 opens with `bid`, everyone else passes.
fn auctioned(bid: Bid, rules: &RuleConfig) -> HandState {
    let mut hand = HandState::new(3, golden_deal());
    hand.bid(0, bid, rules).unwrap();
    hand.pass(1, rules).unwrap();
    hand.pass(2, rules).unwrap();
    assert!(matches!(
        hand.pass(3, rules).unwrap(),
        AuctionOutcome::Ended(_)
    ));
    hand
}

/// Play every remaining card, each seat choosing its first legal card.
fn play_out(hand: &mut HandState) {
    while let Some(seat) = hand.turn() {
        let card = hand.legal_plays(seat)[0];
        hand.play(seat, card).unwrap();
    }
}

#[test]
fn golden_deal_top_trumps_worth_62() {
    let hands = golden_deal();
    let top: u16 = hands[0]
        .iter()
        .filter(|c| c.suit == Suit::Spades)
        .map(|&c| card_points(c, SPADES))
        .sum();
    assert_eq!(top, 20 + 14 + 11 + 10 + 4 + 3);
}

#[test]
fn golden_deal_spade_contract_is_made() {
    let rules = RuleConfig::default();
    let mut hand = auctioned(Bid::points(SPADES, 120), &rules);

    // seat 0's J-A spade run outranks seat 1's two runs of three
    assert_eq!(hand.melds.better_team, Some(Team::A));
    assert_eq!(hand.melds.points, [100, 0]);
    assert_eq!(hand.belote.holder, Some(0));
    assert_eq!(hand.turn(), Some(0));

    play_out(&mut hand);
    assert!(hand.is_complete());
    assert_eq!(hand.card_count(), 32);

    let s = hand.settlement().unwrap();
    assert_eq!(s.card_points[0] + s.card_points[1], 162);
    assert_eq!(s.belote_points, [20, 0]);
    let r = s.settle();
    assert!(r.made);
    assert_eq!(r.awarded, r.raw);
    assert!(r.awarded[0] >= 120);
}

#[test]
fn four_passes_leave_no_contract() {
    let rules = RuleConfig::default();
    let mut hand = HandState::new(3, golden_deal());
    for seat in [0, 1, 2] {
        hand.pass(seat, &rules).unwrap();
    }
    assert_eq!(hand.pass(3, &rules).unwrap(), AuctionOutcome::Redeal);
    assert!(hand.contract.is_none());
    assert_eq!(hand.bid_log.len(), 4);
}

#[test]
fn play_rejections_leave_hand_untouched() {
    let rules = RuleConfig::default();
    let mut hand = auctioned(Bid::points(SPADES, 80), &rules);

    let seven_s = "7S".parse::<Card>().unwrap();
    assert_eq!(kind(hand.play(1, seven_s).unwrap_err()), ValidationKind::NotYourTurn);
    assert_eq!(
        kind(hand.play(0, seven_s).unwrap_err()),
        ValidationKind::CardNotHeld
    );

    hand.play(0, "AH".parse().unwrap()).unwrap();
    // seat 1 holds hearts and must follow
    assert_eq!(
        kind(hand.play(1, seven_s).unwrap_err()),
        ValidationKind::IllegalPlay
    );
    assert_eq!(hand.hands[1].len(), 8);
    assert_eq!(hand.trick.plays.len(), 1);
}

#[test]
fn bidding_intents_rejected_once_play_starts() {
    let rules = RuleConfig::default();
    let mut hand = auctioned(Bid::points(SPADES, 80), &rules);
    assert_eq!(
        kind(hand.pass(0, &rules).unwrap_err()),
        ValidationKind::InvalidState
    );
    assert!(hand.legal_plays(1).is_empty());
    assert!(!hand.legal_plays(0).is_empty());
}

#[test]
fn redouble_only_before_first_card() {
    let rules = RuleConfig::default();
    let mut hand = HandState::new(3, golden_deal());
    hand.bid(0, Bid::points(SPADES, 100), &rules).unwrap();
    assert_eq!(
        kind(hand.redouble(2).unwrap_err()),
        ValidationKind::InvalidState
    );
    hand.contra(1, &rules).unwrap();
    assert_eq!(
        kind(hand.redouble(3).unwrap_err()),
        ValidationKind::InvalidState
    );
    hand.redouble(2).unwrap();
    assert_eq!(hand.contract.map(|c| c.contra), Some(ContraLevel::Redouble));
    assert_eq!(
        kind(hand.redouble(0).unwrap_err()),
        ValidationKind::InvalidState
    );
}

#[test]
fn redouble_too_late_after_a_card() {
    let rules = RuleConfig::default();
    let mut hand = HandState::new(3, golden_deal());
    hand.bid(0, Bid::points(SPADES, 100), &rules).unwrap();
    hand.contra(3, &rules).unwrap();
    let lead = hand.legal_plays(0)[0];
    hand.play(0, lead).unwrap();
    assert_eq!(
        kind(hand.redouble(0).unwrap_err()),
        ValidationKind::InvalidState
    );
}

#[test]
fn settlement_requires_complete_hand() {
    let rules = RuleConfig::default();
    let hand = auctioned(Bid::points(SPADES, 80), &rules);
    assert!(hand.settlement().is_err());
}

#[test]
fn no_trumps_hand_totals_130() {
    let rules = RuleConfig {
        allowed_modes: crate::domain::rules::AllowedModes {
            suits: true,
            all_trumps: true,
            no_trumps: true,
        },
        ..RuleConfig::default()
    };
    let mut hand = auctioned(Bid::points(Trump::NoTrumps, 80), &rules);
    assert_eq!(hand.belote.holder, None);
    play_out(&mut hand);
    let s = hand.settlement().unwrap();
    assert_eq!(s.card_points[0] + s.card_points[1], 130);
    assert_eq!(s.belote_points, [0, 0]);

    let mut hand = auctioned(Bid::points(Trump::AllTrumps, 80), &rules);
    play_out(&mut hand);
    let s = hand.settlement().unwrap();
    assert_eq!(s.card_points[0] + s.card_points[1], 258);
}
