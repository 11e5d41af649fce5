use crate::domain::bidding::{BidLevel, ContraLevel, Contract};
use crate::domain::scoring::HandSettlement;
use crate::domain::state::Team;
use crate::domain::{Suit, Trump};

fn settlement(level: BidLevel, declarer: u8, contra: ContraLevel) -> HandSettlement {
    HandSettlement {
        contract: Contract {
            trump: Trump::Suit(Suit::Spades),
            level,
            declarer,
            contra,
        },
        card_points: [100, 62],
        last_trick_team: Team::A,
        meld_points: [0, 0],
        belote_points: [0, 0],
        tricks_won: [5, 3],
    }
}

#[test]
fn made_points_contract_keeps_raw_points() {
    let s = settlement(BidLevel::Points(100), 0, ContraLevel::None);
    let r = s.settle();
    assert!(r.made);
    assert_eq!(r.raw, [100, 62]);
    assert_eq!(r.awarded, [100, 62]);
}

#[test]
fn failed_contract_gives_defenders_the_pool() {
    let s = settlement(BidLevel::Points(110), 0, ContraLevel::None);
    let r = s.settle();
    assert!(!r.made);
    assert_eq!(r.awarded, [0, 162]);
}

#[test]
fn contra_and_redouble_scale_awards() {
    let made = settlement(BidLevel::Points(90), 0, ContraLevel::Contra).settle();
    assert_eq!(made.awarded, [200, 124]);

    let failed = settlement(BidLevel::Points(80), 1, ContraLevel::Redouble).settle();
    assert!(!failed.made);
    assert_eq!(failed.awarded, [162 * 4, 0]);
}

#[test]
fn melds_and_belote_count_toward_the_bid() {
    let mut s = settlement(BidLevel::Points(90), 1, ContraLevel::None);
    assert!(!s.made());
    s.meld_points = [0, 20];
    assert!(!s.made());
    s.belote_points = [0, 20];
    assert_eq!(s.raw_points(), [100, 102]);
    assert!(s.made());
}

#[test]
fn capot_requires_all_eight_tricks() {
    let mut s = settlement(BidLevel::Capot, 0, ContraLevel::None);
    assert!(!s.made());
    assert_eq!(s.settle().awarded, [0, 162]);

    s.tricks_won = [8, 0];
    s.card_points = [162, 0];
    let r = s.settle();
    assert!(r.made);
    assert_eq!(r.awarded, [162, 0]);
}
