// Core draft types shared by the state, resolver, collector, and coordinator
// modules.

pub mod collect;
pub mod coordinator;
pub mod resolve;
pub mod state;

use std::fmt;

use serde::{Deserialize, Serialize};

/// The sentinel bid meaning "I decline to bid on this player."
pub const REJECTION_BID: i64 = -1;

/// A drafting participant who bids for players and accumulates a roster.
///
/// Opaque to the engine: the transport layer decides what the string is
/// (a chat handle, a display name, a numeric id rendered as text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptainId(String);

impl CaptainId {
    pub fn new(name: impl Into<String>) -> Self {
        CaptainId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaptainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An item in the draftable pool, assigned to at most one captain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl Into<String>) -> Self {
        PlayerName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
