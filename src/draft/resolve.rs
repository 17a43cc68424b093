// Round resolution policy: who wins the player, at what price, or how the
// player goes back on the queue.
//
// Pure logic over the collected `(captain, bid)` pairs; the coordinator
// applies the outcome to the ledger.

use crate::draft::CaptainId;
use crate::rng::DraftRng;

/// How one round of sealed bids resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// One captain takes the player at `price`. Either a unique highest
    /// bid, or a tie with no rebids left broken uniformly at random (in
    /// which case the price is clamped to zero for a rejection-only tie).
    Won { captain: CaptainId, price: i64 },
    /// A single distinct highest bidder who bid the rejection sentinel:
    /// nobody wants the player, back of the queue, no rebid consumed.
    Rejected,
    /// A nonnegative tie with rebids left: one rebid is consumed and the
    /// player goes to the front of the queue for an immediate rebid.
    RebidNow,
    /// A rejection tie with rebids left: one rebid is consumed and the
    /// player goes to the back of the queue instead.
    RebidDeferred,
}

/// Resolve a completed round.
///
/// `bids` is every eligible captain's validated bid (at least one entry;
/// each bid is `>= -1` and within that captain's ceiling).
/// `rebids_remaining` is the player's current rebid budget; the resolver
/// only reads it, the coordinator decrements it when the outcome says so.
pub fn resolve_round(
    bids: &[(CaptainId, i64)],
    rebids_remaining: u32,
    rng: &mut DraftRng,
) -> RoundOutcome {
    assert!(!bids.is_empty(), "resolve_round called with no bids");

    let highest = bids.iter().map(|(_, bid)| *bid).max().unwrap_or(i64::MIN);
    let tied: Vec<&CaptainId> = bids
        .iter()
        .filter(|(_, bid)| *bid == highest)
        .map(|(captain, _)| captain)
        .collect();

    if tied.len() == 1 {
        if highest >= 0 {
            RoundOutcome::Won {
                captain: tied[0].clone(),
                price: highest,
            }
        } else {
            RoundOutcome::Rejected
        }
    } else if rebids_remaining > 0 {
        if highest >= 0 {
            RoundOutcome::RebidNow
        } else {
            RoundOutcome::RebidDeferred
        }
    } else {
        let winner = tied[rng.choose_index(tied.len())].clone();
        RoundOutcome::Won {
            captain: winner,
            price: highest.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bids(pairs: &[(&str, i64)]) -> Vec<(CaptainId, i64)> {
        pairs
            .iter()
            .map(|(name, bid)| (CaptainId::new(*name), *bid))
            .collect()
    }

    fn rng() -> DraftRng {
        DraftRng::seeded(1)
    }

    #[test]
    fn unique_highest_bid_wins_at_that_price() {
        let outcome = resolve_round(&bids(&[("x", 50), ("y", 30)]), 0, &mut rng());
        assert_eq!(
            outcome,
            RoundOutcome::Won {
                captain: CaptainId::new("x"),
                price: 50,
            }
        );
    }

    #[test]
    fn zero_is_a_valid_winning_bid() {
        let outcome = resolve_round(&bids(&[("x", 0), ("y", -1)]), 0, &mut rng());
        assert_eq!(
            outcome,
            RoundOutcome::Won {
                captain: CaptainId::new("x"),
                price: 0,
            }
        );
    }

    #[test]
    fn lone_rejection_requeues_without_consuming_a_rebid() {
        // -1 is the bid floor, so a distinct highest bid of -1 means the
        // round had exactly one bidder.
        let outcome = resolve_round(&bids(&[("x", -1)]), 3, &mut rng());
        assert_eq!(outcome, RoundOutcome::Rejected);
    }

    #[test]
    fn nonnegative_tie_with_rebids_left_rebids_immediately() {
        let outcome = resolve_round(&bids(&[("x", 50), ("y", 50)]), 1, &mut rng());
        assert_eq!(outcome, RoundOutcome::RebidNow);
    }

    #[test]
    fn rejection_tie_with_rebids_left_is_deferred() {
        let outcome = resolve_round(&bids(&[("x", -1), ("y", -1)]), 2, &mut rng());
        assert_eq!(outcome, RoundOutcome::RebidDeferred);
    }

    #[test]
    fn exhausted_tie_picks_a_tied_captain_at_the_tied_price() {
        let all = bids(&[("x", 50), ("y", 50), ("z", 10)]);
        let mut rng = rng();
        for _ in 0..20 {
            match resolve_round(&all, 0, &mut rng) {
                RoundOutcome::Won { captain, price } => {
                    assert!(captain == CaptainId::new("x") || captain == CaptainId::new("y"));
                    assert_eq!(price, 50);
                }
                other => panic!("expected a winner, got {other:?}"),
            }
        }
    }

    #[test]
    fn exhausted_rejection_tie_resolves_at_price_zero() {
        match resolve_round(&bids(&[("x", -1), ("y", -1)]), 0, &mut rng()) {
            RoundOutcome::Won { price, .. } => assert_eq!(price, 0),
            other => panic!("expected a forced winner, got {other:?}"),
        }
    }

    #[test]
    fn seeded_tie_break_is_reproducible() {
        let all = bids(&[("x", 50), ("y", 50)]);
        let a = resolve_round(&all, 0, &mut DraftRng::seeded(99));
        let b = resolve_round(&all, 0, &mut DraftRng::seeded(99));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "no bids")]
    fn empty_bid_set_is_a_defect() {
        resolve_round(&[], 0, &mut rng());
    }
}
