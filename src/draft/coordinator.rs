// The round loop: pull the next player, fan out bid collection to every
// eligible captain, join, resolve, apply, repeat.
//
// The coordinator exclusively owns the `AuctionState`; collectors only ever
// see the ceiling currency passed to them, so rounds never race on shared
// state. Cancellation is a draft-scoped watch signal checked before each
// round and observed by every collector at the join barrier.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::join_all;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::comms::{InputSource, Messenger};
use crate::config::AuctionSettings;
use crate::draft::collect::{collect_bid, BidOutcome};
use crate::draft::resolve::{resolve_round, RoundOutcome};
use crate::draft::state::AuctionState;
use crate::draft::{CaptainId, PlayerName};
use crate::notices;
use crate::rng::DraftRng;

#[derive(Debug, Error)]
pub enum DraftError {
    /// The draft-wide cancellation signal fired. Not a failure of the
    /// engine: a first-class terminal outcome that yields no teams.
    #[error("the draft was cancelled")]
    Cancelled,

    /// The lobby can never produce a complete draft (wrong captain count,
    /// too few players). Caught before any round runs.
    #[error("invalid draft lobby: {0}")]
    InvalidLobby(String),
}

/// Final rosters by captain, in shuffled (not acquisition) order.
pub type FinalTeams = HashMap<CaptainId, Vec<PlayerName>>;

/// Run one complete auction draft.
///
/// `captains` and `players` are frozen for the duration; `settings` must
/// already be validated by the provider. All randomness (queue permutation,
/// tie-breaks, final roster shuffles) draws from `rng`, so a seeded source
/// makes the whole run reproducible.
///
/// Returns the final teams, or [`DraftError::Cancelled`] once `cancel`
/// observes `true` — in that case no partial result is exposed and the
/// in-flight round leaves no trace on any captain's currency or roster.
pub async fn run_draft(
    captains: Vec<CaptainId>,
    players: Vec<PlayerName>,
    settings: &AuctionSettings,
    messenger: &dyn Messenger,
    input: &dyn InputSource,
    cancel: watch::Receiver<bool>,
    mut rng: DraftRng,
) -> Result<FinalTeams, DraftError> {
    let mut captains = captains;
    captains.sort();
    captains.dedup();
    check_lobby(&captains, &players, settings)?;

    // Setup: freeze the pool as a uniformly random permutation.
    let mut pool = players;
    rng.shuffle(&mut pool);
    let mut state = AuctionState::new(&captains, pool.into_iter().collect(), settings);
    let timeout = settings.bid_timeout_secs.map(Duration::from_secs);

    info!(
        captains = captains.len(),
        players = state.queue.len(),
        initial_currency = settings.initial_currency,
        n_picks = settings.n_picks,
        "draft starting"
    );

    let intro = format!(
        "You are a captain! Here are the players and captains:\n{}",
        notices::pool_announcement(&captains, state.queue.make_contiguous())
    );
    messenger.broadcast(&captains, &intro).await;
    messenger.broadcast(&captains, &notices::auction_rules()).await;

    let mut round = 0u32;
    while !state.queue.is_empty() && state.any_open_slots() {
        round += 1;
        if *cancel.borrow() {
            return Err(announce_cancelled(messenger, &captains).await);
        }

        // Everyone sees the same state before any bid is solicited.
        messenger
            .broadcast(&captains, &notices::state_snapshot(&state, &captains))
            .await;
        match serde_json::to_string(&state) {
            Ok(json) => debug!(round, state = %json, "round starting"),
            Err(e) => warn!(round, "failed to serialize state snapshot: {e}"),
        }

        let Some(player) = state.queue.pop_front() else {
            break;
        };
        messenger
            .broadcast(&captains, &notices::now_bidding(&player))
            .await;

        let eligible = state.eligible_captains();
        for captain in &captains {
            if !eligible.contains(captain) {
                messenger.direct_message(captain, &notices::team_full()).await;
            }
        }

        // True concurrent fan-out: one collector future per eligible
        // captain, joined as a set. A round never resolves on a subset.
        let collectors = eligible.iter().map(|captain| {
            collect_bid(
                captain,
                state.currency(captain),
                messenger,
                input,
                cancel.clone(),
                timeout,
            )
        });
        let results = join_all(collectors).await;

        let mut bids = Vec::with_capacity(results.len());
        for (captain, outcome) in results {
            match outcome {
                BidOutcome::Bid(bid) => bids.push((captain, bid)),
                BidOutcome::Cancelled => {
                    return Err(announce_cancelled(messenger, &captains).await);
                }
            }
        }

        let rebids_remaining = state.rebids_remaining(&player);
        match resolve_round(&bids, rebids_remaining, &mut rng) {
            RoundOutcome::Won { captain, price } => {
                info!(round, %player, winner = %captain, price, "player secured");
                state.record_win(&captain, player.clone(), price);
                messenger
                    .broadcast(&captains, &notices::secured(&player, &captain, price))
                    .await;
            }
            RoundOutcome::Rejected => {
                info!(round, %player, "no bids; player re-enqueued");
                state.requeue_back(player.clone());
                messenger
                    .broadcast(&captains, &notices::requeued(&player))
                    .await;
            }
            RoundOutcome::RebidNow => {
                info!(round, %player, rebids_left = rebids_remaining - 1, "tie; immediate rebid");
                state.consume_rebid(&player);
                state.requeue_front(player.clone());
                messenger
                    .broadcast(&captains, &notices::rebid_now(&player))
                    .await;
            }
            RoundOutcome::RebidDeferred => {
                info!(round, %player, rebids_left = rebids_remaining - 1, "rejection tie; deferred rebid");
                state.consume_rebid(&player);
                state.requeue_back(player.clone());
                messenger
                    .broadcast(&captains, &notices::rebid_deferred(&player))
                    .await;
            }
        }
    }

    // Acquisition order is not meaningful in the result; shuffle each
    // roster before reporting it.
    for captain in &captains {
        if let Some(team) = state.teams.get_mut(captain) {
            rng.shuffle(team);
            messenger
                .direct_message(captain, &notices::final_team(team))
                .await;
        }
    }

    info!(
        rounds = round,
        undrafted = state.queue.len(),
        "draft complete"
    );
    Ok(state.teams)
}

/// Reject lobbies that could never complete: duplicate captains collapse in
/// the dedup above, leaving too few; a pool smaller than
/// `n_captains * n_picks` can't fill every team.
fn check_lobby(
    captains: &[CaptainId],
    players: &[PlayerName],
    settings: &AuctionSettings,
) -> Result<(), DraftError> {
    if captains.len() != settings.n_captains {
        return Err(DraftError::InvalidLobby(format!(
            "{} captains claimed, {} required",
            captains.len(),
            settings.n_captains
        )));
    }
    let required = settings.n_captains * settings.n_picks;
    if players.len() < required {
        return Err(DraftError::InvalidLobby(format!(
            "insufficient players to draft ({required} required, {} listed)",
            players.len()
        )));
    }
    let mut unique = players.to_vec();
    unique.sort();
    unique.dedup();
    if unique.len() != players.len() {
        return Err(DraftError::InvalidLobby(
            "player pool contains duplicates".into(),
        ));
    }
    Ok(())
}

async fn announce_cancelled(messenger: &dyn Messenger, captains: &[CaptainId]) -> DraftError {
    info!("draft cancelled");
    messenger
        .broadcast(captains, &notices::draft_cancelled())
        .await;
    DraftError::Cancelled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(n_captains: usize, n_picks: usize) -> AuctionSettings {
        AuctionSettings {
            initial_currency: 100,
            n_picks,
            n_captains,
            n_rebids_on_tie: 0,
            bid_timeout_secs: None,
        }
    }

    fn captains(names: &[&str]) -> Vec<CaptainId> {
        names.iter().map(|n| CaptainId::new(*n)).collect()
    }

    fn players(names: &[&str]) -> Vec<PlayerName> {
        names.iter().map(|n| PlayerName::new(*n)).collect()
    }

    #[test]
    fn lobby_with_wrong_captain_count_is_rejected() {
        let err = check_lobby(
            &captains(&["alice"]),
            &players(&["A", "B"]),
            &settings(2, 1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("captains claimed"));
    }

    #[test]
    fn lobby_with_too_few_players_is_rejected() {
        let err = check_lobby(
            &captains(&["alice", "bob"]),
            &players(&["A"]),
            &settings(2, 1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("insufficient players"));
    }

    #[test]
    fn lobby_with_duplicate_players_is_rejected() {
        let err = check_lobby(
            &captains(&["alice", "bob"]),
            &players(&["A", "A"]),
            &settings(2, 1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicates"));
    }

    #[test]
    fn exact_minimum_pool_is_accepted() {
        check_lobby(
            &captains(&["alice", "bob"]),
            &players(&["A", "B"]),
            &settings(2, 1),
        )
        .unwrap();
    }
}
