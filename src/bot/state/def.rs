use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings the dispatch core reads at startup. Loaded from a JSON file, every
/// field except the owner has a default.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct BotConfig {
    pub owner_id: String,
    #[serde(default)]
    pub co_owner_ids: Vec<String>,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub alt_prefix: Option<String>,
    #[serde(default = "default_help_word")]
    pub help_word: String,
    #[serde(default = "default_true")]
    pub use_help: bool,
    #[serde(default)]
    pub server_invite: Option<String>,
    #[serde(default)]
    pub emojis: Emojis,
    /// Number of trigger messages remembered for linked deletion; 0 or less disables it.
    #[serde(default)]
    pub linked_cache_size: i64,
    /// Text shown as "Playing ...". `default` advertises the help command, `null` shows nothing.
    #[serde(default = "default_activity")]
    pub activity: Option<String>,
    #[serde(default)]
    pub status: PresenceStatus,
}

/// Value of [`BotConfig::activity`] that is replaced by a help hint.
pub const DEFAULT_ACTIVITY: &str = "default";

#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    #[default]
    Online,
    Idle,
    Dnd,
    Invisible,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Emojis {
    pub success: String,
    pub warning: String,
    pub error: String,
}

impl Default for Emojis {
    fn default() -> Self {
        Emojis {
            success: "🎶".to_string(),
            warning: "💡".to_string(),
            error: "🚫".to_string(),
        }
    }
}

fn default_prefix() -> String {
    "!".into()
}

fn default_help_word() -> String {
    "help".into()
}

fn default_activity() -> Option<String> {
    Some(DEFAULT_ACTIVITY.to_string())
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Command added has a name or alias that has already been indexed: \"{0}\"")]
    DuplicateName(String),
    #[error("Index specified is invalid: [{index}/{len}]")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("JSON deserialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
    #[error("Only bot accounts can run commands, {0} is a user account")]
    NotABot(String),
    #[error("{0}")]
    Custom(String),
}
