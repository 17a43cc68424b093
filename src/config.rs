// Auction settings: typed record, validation, and draft.toml loading.
//
// The engine consumes a frozen, already-validated `AuctionSettings`
// snapshot; validation of setting values (positivity, caps) happens here,
// before a draft ever starts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid setting `{setting}`: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },

    #[error("invalid lobby: {reason}")]
    InvalidLobby { reason: String },
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Hard cap on team size, matching the upstream bot's settings validation.
pub const MAX_PICKS: usize = 80;

/// Hard cap on the number of captain slots.
pub const MAX_CAPTAINS: usize = 80;

/// The frozen rules of one auction draft.
#[derive(Debug, Clone, Deserialize)]
pub struct AuctionSettings {
    /// Currency each captain starts with. Positive.
    pub initial_currency: i64,
    /// Team size target per captain. Positive, capped at [`MAX_PICKS`].
    pub n_picks: usize,
    /// Number of captain slots. Positive, capped at [`MAX_CAPTAINS`].
    pub n_captains: usize,
    /// Per-player rebid budget consumed by tied rounds.
    #[serde(default = "default_rebids")]
    pub n_rebids_on_tie: u32,
    /// Optional per-attempt bid timeout. A timed-out captain is re-prompted,
    /// never auto-rejected; `None` means wait indefinitely.
    #[serde(default)]
    pub bid_timeout_secs: Option<u64>,
}

fn default_rebids() -> u32 {
    2
}

impl Default for AuctionSettings {
    fn default() -> Self {
        AuctionSettings {
            initial_currency: 1000,
            n_picks: 4,
            n_captains: 2,
            n_rebids_on_tie: 2,
            bid_timeout_secs: None,
        }
    }
}

impl AuctionSettings {
    /// Check every field against its allowed range.
    ///
    /// Pure: reports the first violation with a captain-readable reason and
    /// never mutates anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_currency <= 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "initial_currency",
                reason: "must be a positive integer".into(),
            });
        }
        if self.n_picks == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "n_picks",
                reason: "must be a positive integer".into(),
            });
        }
        if self.n_picks > MAX_PICKS {
            return Err(ConfigError::InvalidSetting {
                setting: "n_picks",
                reason: format!("is capped at {MAX_PICKS}"),
            });
        }
        if self.n_captains == 0 {
            return Err(ConfigError::InvalidSetting {
                setting: "n_captains",
                reason: "must be a positive integer".into(),
            });
        }
        if self.n_captains > MAX_CAPTAINS {
            return Err(ConfigError::InvalidSetting {
                setting: "n_captains",
                reason: format!("is capped at {MAX_CAPTAINS}"),
            });
        }
        if self.bid_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidSetting {
                setting: "bid_timeout_secs",
                reason: "must be a positive number of seconds (omit to wait forever)".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// The `[lobby]` table: who is drafting and over which pool.
#[derive(Debug, Clone, Deserialize)]
pub struct LobbyConfig {
    pub captains: Vec<String>,
    pub players: Vec<String>,
    /// Optional RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    auction: AuctionSettings,
    lobby: LobbyConfig,
}

/// The assembled, validated configuration for one draft run.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub auction: AuctionSettings,
    pub lobby: LobbyConfig,
}

/// Load and validate a draft.toml file.
pub fn load_config(path: &Path) -> Result<DraftConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    parse_config(&raw, path)
}

/// Parse and validate draft.toml content. Split out from [`load_config`] so
/// tests can feed inline TOML without touching the filesystem.
pub fn parse_config(raw: &str, path: &Path) -> Result<DraftConfig, ConfigError> {
    let file: DraftFile = toml::from_str(raw).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })?;

    file.auction.validate()?;
    validate_lobby(&file.lobby)?;

    Ok(DraftConfig {
        auction: file.auction,
        lobby: file.lobby,
    })
}

/// Reject lobbies the engine could never draft: duplicate names, empty pool.
///
/// Count checks against `n_captains`/`n_picks` are left to the engine entry
/// point, which sees the frozen captain set.
fn validate_lobby(lobby: &LobbyConfig) -> Result<(), ConfigError> {
    if lobby.captains.is_empty() {
        return Err(ConfigError::InvalidLobby {
            reason: "no captains listed".into(),
        });
    }
    if lobby.players.is_empty() {
        return Err(ConfigError::InvalidLobby {
            reason: "no players listed".into(),
        });
    }

    let mut seen = HashSet::new();
    for captain in &lobby.captains {
        if !seen.insert(captain.as_str()) {
            return Err(ConfigError::InvalidLobby {
                reason: format!("captain \"{captain}\" is listed twice"),
            });
        }
    }
    let mut seen = HashSet::new();
    for player in &lobby.players {
        if !seen.insert(player.as_str()) {
            return Err(ConfigError::InvalidLobby {
                reason: format!("player \"{player}\" has already been added"),
            });
        }
    }
    Ok(())
}
