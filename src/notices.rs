// Captain-facing narration: rules text, state snapshots, round outcomes.
//
// Every round transition is narrated to all captains so the auction is
// auditable in real time even though resolution is centralized. These are
// plain string builders; delivery is the `Messenger`'s job.

use crate::draft::state::AuctionState;
use crate::draft::{CaptainId, PlayerName};

/// The auction rules, sent to every captain at draft start.
pub fn auction_rules() -> String {
    [
        "RULES:",
        "This is a first-price sealed-bid auction.",
        "Players are queued up for consideration in a random order.",
        "When a player is up for bidding, I will ask for your bid privately.",
        "You may not bid higher than your current currency.",
        "Bid -1 to pass on a player.",
        "The captain with the highest nonnegative bid secures the player at that price.",
        "Tied winning bids trigger a limited number of rebids; once exhausted, ties are broken randomly.",
        "If every captain passes, the player is placed at the back of the queue.",
    ]
    .join("\n")
}

/// The frozen captain set and player pool, announced at draft start.
pub fn pool_announcement(captains: &[CaptainId], players: &[PlayerName]) -> String {
    format!(
        "Captains ({}): {}\nPlayers ({}): {}",
        captains.len(),
        join(captains),
        players.len(),
        join(players),
    )
}

/// Per-round state snapshot: currencies, rosters, and the bidding queue.
/// `captains` fixes the narration order.
pub fn state_snapshot(state: &AuctionState, captains: &[CaptainId]) -> String {
    let mut lines = vec!["CURRENT STATE:".to_string()];
    for captain in captains {
        let currency = state.currency(captain);
        let team = state.teams.get(captain).map(Vec::as_slice).unwrap_or(&[]);
        lines.push(format!("{captain} (${currency}): {}", join(team)));
    }
    let queue: Vec<String> = state.queue.iter().map(|p| p.to_string()).collect();
    lines.push(format!("Bidding Queue: {}", queue.join(" -> ")));
    lines.join("\n")
}

pub fn now_bidding(player: &PlayerName) -> String {
    format!("Currently bidding on: \"{player}\"")
}

pub fn team_full() -> String {
    "You can't bid this round because your team is full.".to_string()
}

pub fn secured(player: &PlayerName, captain: &CaptainId, price: i64) -> String {
    format!("\"{player}\" is secured by {captain} for ${price}")
}

pub fn requeued(player: &PlayerName) -> String {
    format!("\"{player}\" was not drafted and was re-enqueued at the back of the queue.")
}

pub fn rebid_now(player: &PlayerName) -> String {
    format!("Tied bids on \"{player}\"! Rebidding now; currency ceilings are unchanged.")
}

pub fn rebid_deferred(player: &PlayerName) -> String {
    format!("Everyone passed on \"{player}\" in a tie; it returns to the back of the queue.")
}

pub fn draft_cancelled() -> String {
    "The draft was cancelled. No teams were formed.".to_string()
}

pub fn final_team(team: &[PlayerName]) -> String {
    format!("Drafting has finished. Your team: {}", join(team))
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
