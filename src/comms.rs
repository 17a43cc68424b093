// Transport seams: outbound notices and inbound raw bid submissions.
//
// The engine never talks to a chat platform directly. It narrates every
// round through a `Messenger` and reads captain input through an
// `InputSource`; the channel-backed implementations below are what the
// hotseat binary and the tests wire in.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tracing::warn;

use crate::draft::CaptainId;

/// Outbound notice delivery.
///
/// Completion of the returned future is the acknowledgement; delivery
/// failures are the implementation's problem (log, retry, drop) and must
/// never block the coordinator indefinitely.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver a private text notice to one captain.
    async fn direct_message(&self, captain: &CaptainId, text: &str);

    /// Deliver the same notice to every listed captain.
    async fn broadcast(&self, captains: &[CaptainId], text: &str) {
        for captain in captains {
            self.direct_message(captain, text).await;
        }
    }
}

/// Inbound raw text submissions, one lazy sequence per captain.
#[async_trait]
pub trait InputSource: Send + Sync {
    /// The next raw submission from the given captain.
    ///
    /// `None` means the underlying transport has closed and no further
    /// input will ever arrive for this captain. The engine treats that as
    /// "wait for cancellation", never as a bid.
    async fn next_submission(&self, captain: &CaptainId) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Channel-backed implementations
// ---------------------------------------------------------------------------

/// A [`Messenger`] that forwards every notice into an mpsc channel as a
/// `(captain, text)` pair. The binary drains the channel to the terminal;
/// tests drain it into a transcript.
pub struct ChannelMessenger {
    tx: mpsc::UnboundedSender<(CaptainId, String)>,
}

impl ChannelMessenger {
    pub fn unbounded() -> (Self, mpsc::UnboundedReceiver<(CaptainId, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelMessenger { tx }, rx)
    }
}

#[async_trait]
impl Messenger for ChannelMessenger {
    async fn direct_message(&self, captain: &CaptainId, text: &str) {
        if self.tx.send((captain.clone(), text.to_string())).is_err() {
            warn!(%captain, "dropping notice: outbox receiver is gone");
        }
    }
}

/// An [`InputSource`] backed by one mpsc channel per captain.
///
/// Each receiver sits behind its own `Mutex`, so concurrent collectors for
/// different captains never contend; two collectors for the *same* captain
/// would serialize, but the coordinator spawns at most one per round.
pub struct ChannelInput {
    inboxes: HashMap<CaptainId, Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl ChannelInput {
    /// Build an input source bound to the given captains, returning the
    /// per-captain senders for the transport side.
    pub fn bind(
        captains: &[CaptainId],
    ) -> (Self, HashMap<CaptainId, mpsc::UnboundedSender<String>>) {
        let mut inboxes = HashMap::new();
        let mut senders = HashMap::new();
        for captain in captains {
            let (tx, rx) = mpsc::unbounded_channel();
            inboxes.insert(captain.clone(), Mutex::new(rx));
            senders.insert(captain.clone(), tx);
        }
        (ChannelInput { inboxes }, senders)
    }
}

#[async_trait]
impl InputSource for ChannelInput {
    async fn next_submission(&self, captain: &CaptainId) -> Option<String> {
        match self.inboxes.get(captain) {
            Some(inbox) => inbox.lock().await.recv().await,
            None => {
                warn!(%captain, "no input channel bound for captain");
                None
            }
        }
    }
}
