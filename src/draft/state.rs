// The auction ledger: per-captain currency and rosters, the pending player
// queue, and per-player rebid counters.

use std::collections::{HashMap, VecDeque};

use serde::Serialize;

use crate::config::AuctionSettings;
use crate::draft::{CaptainId, PlayerName};

/// The mutable state of one draft run.
///
/// Created once per draft from the frozen captain set, player pool, and
/// settings snapshot; mutated only by the coordinator between rounds;
/// discarded when the draft terminates. Nothing survives draft-to-draft.
///
/// Invariants held at every observable point:
/// - every captain's currency is nonnegative;
/// - a player appears on at most one roster, and rosters never exceed
///   `n_picks`;
/// - rebid counters only ever decrement;
/// - the queue plus all rosters is exactly the original pool.
///
/// Violations are fatal internal defects: the mutation methods assert
/// rather than let a bad round silently corrupt the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct AuctionState {
    /// Players awaiting auction, front first. FIFO with re-insertion at
    /// either end (rebids go to the front, rejections to the back).
    pub queue: VecDeque<PlayerName>,
    /// Remaining currency per captain.
    pub currencies: HashMap<CaptainId, i64>,
    /// Acquired players per captain, in acquisition order until the final
    /// shuffle.
    pub teams: HashMap<CaptainId, Vec<PlayerName>>,
    /// Remaining tie-rebid budget per player.
    pub rebids_remaining: HashMap<PlayerName, u32>,
    n_picks: usize,
}

impl AuctionState {
    /// Build the ledger from frozen inputs. `queue` should already be the
    /// randomly permuted pool; the state does no shuffling of its own.
    pub fn new(
        captains: &[CaptainId],
        queue: VecDeque<PlayerName>,
        settings: &AuctionSettings,
    ) -> Self {
        let currencies = captains
            .iter()
            .map(|c| (c.clone(), settings.initial_currency))
            .collect();
        let teams = captains.iter().map(|c| (c.clone(), Vec::new())).collect();
        let rebids_remaining = queue
            .iter()
            .map(|p| (p.clone(), settings.n_rebids_on_tie))
            .collect();

        AuctionState {
            queue,
            currencies,
            teams,
            rebids_remaining,
            n_picks: settings.n_picks,
        }
    }

    /// Captains whose teams still have open slots, in sorted order so each
    /// round's fan-out and narration are deterministic.
    pub fn eligible_captains(&self) -> Vec<CaptainId> {
        let mut eligible: Vec<CaptainId> = self
            .teams
            .iter()
            .filter(|(_, team)| team.len() < self.n_picks)
            .map(|(captain, _)| captain.clone())
            .collect();
        eligible.sort();
        eligible
    }

    /// Whether any captain can still pick.
    pub fn any_open_slots(&self) -> bool {
        self.teams.values().any(|team| team.len() < self.n_picks)
    }

    /// Remaining currency for a captain. The captain must be part of the
    /// frozen set.
    pub fn currency(&self, captain: &CaptainId) -> i64 {
        match self.currencies.get(captain) {
            Some(&currency) => currency,
            None => panic!("unknown captain {captain} in currency lookup"),
        }
    }

    /// Remaining rebid budget for a player.
    pub fn rebids_remaining(&self, player: &PlayerName) -> u32 {
        self.rebids_remaining.get(player).copied().unwrap_or(0)
    }

    /// Spend one rebid on a tied player.
    pub fn consume_rebid(&mut self, player: &PlayerName) {
        let remaining = self
            .rebids_remaining
            .get_mut(player)
            .unwrap_or_else(|| panic!("unknown player {player} in rebid ledger"));
        assert!(*remaining > 0, "rebid consumed for {player} with none left");
        *remaining -= 1;
    }

    /// Assign `player` to `captain` at `price`: append to the roster and
    /// deduct the price, atomically with respect to the next round's read
    /// (the coordinator never reads mid-call).
    pub fn record_win(&mut self, captain: &CaptainId, player: PlayerName, price: i64) {
        assert!(price >= 0, "winning price for {player} is negative ({price})");
        assert!(
            !self.teams.values().any(|team| team.contains(&player)),
            "player {player} is already on a roster"
        );

        let team = self
            .teams
            .get_mut(captain)
            .unwrap_or_else(|| panic!("unknown captain {captain} won a round"));
        assert!(
            team.len() < self.n_picks,
            "captain {captain} won a round with a full team"
        );

        let currency = self
            .currencies
            .get_mut(captain)
            .unwrap_or_else(|| panic!("unknown captain {captain} in currency ledger"));
        assert!(
            *currency >= price,
            "captain {captain} cannot afford {price} (has {currency})"
        );

        team.push(player);
        *currency -= price;
    }

    /// Return an unsold player to the back of the queue.
    pub fn requeue_back(&mut self, player: PlayerName) {
        self.queue.push_back(player);
    }

    /// Return a tied player to the front of the queue for an immediate
    /// rebid.
    pub fn requeue_front(&mut self, player: PlayerName) {
        self.queue.push_front(player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> AuctionSettings {
        AuctionSettings {
            initial_currency: 100,
            n_picks: 2,
            n_captains: 2,
            n_rebids_on_tie: 1,
            bid_timeout_secs: None,
        }
    }

    fn captains() -> Vec<CaptainId> {
        vec![CaptainId::new("alice"), CaptainId::new("bob")]
    }

    fn pool(names: &[&str]) -> VecDeque<PlayerName> {
        names.iter().map(|n| PlayerName::new(*n)).collect()
    }

    fn state() -> AuctionState {
        AuctionState::new(&captains(), pool(&["A", "B", "C", "D"]), &settings())
    }

    #[test]
    fn new_state_freezes_inputs() {
        let state = state();
        assert_eq!(state.queue.len(), 4);
        assert_eq!(state.currency(&CaptainId::new("alice")), 100);
        assert_eq!(state.currency(&CaptainId::new("bob")), 100);
        assert!(state.teams.values().all(|t| t.is_empty()));
        assert_eq!(state.rebids_remaining(&PlayerName::new("A")), 1);
    }

    #[test]
    fn record_win_updates_roster_and_currency() {
        let mut state = state();
        let alice = CaptainId::new("alice");
        state.record_win(&alice, PlayerName::new("A"), 40);

        assert_eq!(state.currency(&alice), 60);
        assert_eq!(state.teams[&alice], vec![PlayerName::new("A")]);
        assert_eq!(state.teams[&CaptainId::new("bob")].len(), 0);
    }

    #[test]
    fn record_win_at_zero_price_is_free() {
        let mut state = state();
        let alice = CaptainId::new("alice");
        state.record_win(&alice, PlayerName::new("A"), 0);
        assert_eq!(state.currency(&alice), 100);
    }

    #[test]
    fn eligible_captains_shrinks_as_teams_fill() {
        let mut state = state();
        let alice = CaptainId::new("alice");
        assert_eq!(state.eligible_captains().len(), 2);

        state.record_win(&alice, PlayerName::new("A"), 10);
        assert_eq!(state.eligible_captains().len(), 2);

        state.record_win(&alice, PlayerName::new("B"), 10);
        assert_eq!(state.eligible_captains(), vec![CaptainId::new("bob")]);
        assert!(state.any_open_slots());

        state.record_win(&CaptainId::new("bob"), PlayerName::new("C"), 10);
        state.record_win(&CaptainId::new("bob"), PlayerName::new("D"), 10);
        assert!(state.eligible_captains().is_empty());
        assert!(!state.any_open_slots());
    }

    #[test]
    fn eligible_captains_are_sorted() {
        let captains = vec![
            CaptainId::new("zoe"),
            CaptainId::new("alice"),
            CaptainId::new("bob"),
        ];
        let mut s = settings();
        s.n_captains = 3;
        let state = AuctionState::new(&captains, pool(&["A"]), &s);
        assert_eq!(
            state.eligible_captains(),
            vec![
                CaptainId::new("alice"),
                CaptainId::new("bob"),
                CaptainId::new("zoe")
            ]
        );
    }

    #[test]
    fn consume_rebid_decrements() {
        let mut state = state();
        let a = PlayerName::new("A");
        state.consume_rebid(&a);
        assert_eq!(state.rebids_remaining(&a), 0);
    }

    #[test]
    #[should_panic(expected = "none left")]
    fn consume_rebid_with_none_left_panics() {
        let mut state = state();
        let a = PlayerName::new("A");
        state.consume_rebid(&a);
        state.consume_rebid(&a);
    }

    #[test]
    #[should_panic(expected = "cannot afford")]
    fn overspending_panics() {
        let mut state = state();
        state.record_win(&CaptainId::new("alice"), PlayerName::new("A"), 101);
    }

    #[test]
    #[should_panic(expected = "already on a roster")]
    fn double_assignment_panics() {
        let mut state = state();
        state.record_win(&CaptainId::new("alice"), PlayerName::new("A"), 10);
        state.record_win(&CaptainId::new("bob"), PlayerName::new("A"), 10);
    }

    #[test]
    #[should_panic(expected = "full team")]
    fn winning_with_a_full_team_panics() {
        let mut state = state();
        let alice = CaptainId::new("alice");
        state.record_win(&alice, PlayerName::new("A"), 10);
        state.record_win(&alice, PlayerName::new("B"), 10);
        state.record_win(&alice, PlayerName::new("C"), 10);
    }

    #[test]
    #[should_panic(expected = "negative")]
    fn negative_price_panics() {
        let mut state = state();
        state.record_win(&CaptainId::new("alice"), PlayerName::new("A"), -1);
    }

    #[test]
    fn requeue_preserves_pool() {
        let mut state = state();
        let front = state.queue.pop_front().unwrap();
        state.requeue_back(front.clone());
        assert_eq!(state.queue.back(), Some(&front));
        assert_eq!(state.queue.len(), 4);

        let next = state.queue.pop_front().unwrap();
        state.requeue_front(next.clone());
        assert_eq!(state.queue.front(), Some(&next));
        assert_eq!(state.queue.len(), 4);
    }

    #[test]
    fn state_serializes_for_snapshot_logging() {
        let json = serde_json::to_string(&state()).unwrap();
        assert!(json.contains("\"queue\""));
        assert!(json.contains("\"currencies\""));
    }
}
