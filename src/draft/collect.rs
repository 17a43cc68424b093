// Per-captain bid collection: solicit one validated integer bid, retrying
// on malformed or out-of-range input until a valid bid arrives or the draft
// is cancelled.

use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::comms::{InputSource, Messenger};
use crate::draft::{CaptainId, REJECTION_BID};

/// Result of one bid-collection operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BidOutcome {
    /// A validated bid in `-1..=currency`.
    Bid(i64),
    /// The draft-wide cancellation signal fired while waiting; no bid
    /// value is meaningful.
    Cancelled,
}

/// Collect one bid from `captain` with ceiling `currency`.
///
/// Invalid submissions are answered with an explanatory notice and retried
/// without bound. With `timeout` set, a silent captain is re-prompted each
/// time the window lapses; silence is never converted into a rejection.
/// A closed input stream parks here until cancellation for the same reason.
pub async fn collect_bid(
    captain: &CaptainId,
    currency: i64,
    messenger: &dyn Messenger,
    input: &dyn InputSource,
    mut cancel: watch::Receiver<bool>,
    timeout: Option<Duration>,
) -> (CaptainId, BidOutcome) {
    loop {
        if *cancel.borrow() {
            return (captain.clone(), BidOutcome::Cancelled);
        }

        let submission = tokio::select! {
            _ = cancelled(&mut cancel) => {
                return (captain.clone(), BidOutcome::Cancelled);
            }
            raw = next_submission(captain, messenger, input, timeout) => raw,
        };

        let Some(raw) = submission else {
            // Input stream closed. Absence of a response is never a
            // rejection, so all that's left to wait for is cancellation.
            debug!(%captain, "input stream closed mid-round; waiting for cancellation");
            cancelled(&mut cancel).await;
            return (captain.clone(), BidOutcome::Cancelled);
        };

        match raw.trim().parse::<i64>() {
            Err(_) => {
                messenger
                    .direct_message(
                        captain,
                        "That doesn't look like an integer bid. Try again.",
                    )
                    .await;
            }
            Ok(bid) if bid < REJECTION_BID => {
                messenger
                    .direct_message(
                        captain,
                        "Bids below -1 aren't allowed; bid -1 to pass. Try again.",
                    )
                    .await;
            }
            Ok(bid) if bid > currency => {
                messenger
                    .direct_message(captain, "You don't have that much currency. Try again.")
                    .await;
            }
            Ok(bid) => {
                debug!(%captain, bid, "bid accepted");
                messenger
                    .direct_message(
                        captain,
                        &format!(
                            "Your bid of {bid} is acknowledged. Waiting for the other captains..."
                        ),
                    )
                    .await;
                return (captain.clone(), BidOutcome::Bid(bid));
            }
        }
    }
}

/// Resolve when the draft-wide cancellation signal fires. A dropped sender
/// counts as cancellation: the coordinator that owned it is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|cancelled| *cancelled).await;
}

/// Next raw submission, re-prompting on every lapse of the optional
/// per-attempt timeout. `None` means the stream closed.
async fn next_submission(
    captain: &CaptainId,
    messenger: &dyn Messenger,
    input: &dyn InputSource,
    timeout: Option<Duration>,
) -> Option<String> {
    let Some(window) = timeout else {
        return input.next_submission(captain).await;
    };
    loop {
        match tokio::time::timeout(window, input.next_submission(captain)).await {
            Ok(raw) => return raw,
            Err(_) => {
                messenger
                    .direct_message(captain, "You timed out. Try again.")
                    .await;
            }
        }
    }
}
