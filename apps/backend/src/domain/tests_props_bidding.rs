//! Property tests for the auction state machine.

use proptest::prelude::*;

use crate::domain::bidding::{AuctionOutcome, BiddingState};
use crate::domain::rules::RuleConfig;
use crate::domain::{test_gens, test_prelude};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Four passes with no bid always redeal, whoever deals.
    #[test]
    fn prop_four_passes_redeal(dealer in test_gens::seat()) {
        let mut b = BiddingState::new(dealer);
        for i in 0..4 {
            let seat = b.turn;
            let out = b.pass(seat).unwrap();
            if i < 3 {
                prop_assert_eq!(out, AuctionOutcome::Continue);
            } else {
                prop_assert_eq!(out, AuctionOutcome::Redeal);
            }
        }
    }

    /// A random sequence of valid bids, closed by three passes, ends with the
    /// last bidder as declarer.
    #[test]
    fn prop_last_bidder_declares(
        dealer in test_gens::seat(),
        bids in proptest::collection::vec(test_gens::bid(), 1..6),
        pass_before in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let rules = RuleConfig::default();
        let mut b = BiddingState::new(dealer);
        let mut last_bidder = None;
        for (i, bid) in bids.into_iter().enumerate() {
            if pass_before[i] && last_bidder.is_some() && b.consecutive_passes == 0 {
                let seat = b.turn;
                prop_assert_eq!(b.pass(seat).unwrap(), AuctionOutcome::Continue);
            }
            let seat = b.turn;
            if b.place_bid(seat, bid, &rules).is_ok() {
                last_bidder = Some(seat);
            } else {
                prop_assert_eq!(b.turn, seat);
            }
        }
        prop_assume!(last_bidder.is_some());

        let mut outcome = AuctionOutcome::Continue;
        for _ in 0..3 {
            let seat = b.turn;
            outcome = b.pass(seat).unwrap();
            if outcome != AuctionOutcome::Continue {
                break;
            }
        }
        match outcome {
            AuctionOutcome::Ended(c) => prop_assert_eq!(Some(c.declarer), last_bidder),
            other => prop_assert!(false, "expected end, got {:?}", other),
        }
    }
}
