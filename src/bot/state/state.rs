use std::{fs, path::Path};

use tracing::info;

use crate::bot::{commands::commands::BotResult, dispatcher::prefix::DEFAULT_PREFIX, state::def::{BotConfig, Emojis, PresenceStatus, DEFAULT_ACTIVITY}};

impl BotConfig {
    pub fn new(owner_id: impl Into<String>) -> Self {
        BotConfig {
            owner_id: owner_id.into(),
            co_owner_ids: Vec::new(),
            prefix: "!".to_string(),
            alt_prefix: None,
            help_word: "help".to_string(),
            use_help: true,
            server_invite: None,
            emojis: Emojis::default(),
            linked_cache_size: 0,
            activity: Some(DEFAULT_ACTIVITY.to_string()),
            status: PresenceStatus::Online,
        }
    }

    /// Reads the config file, writing a fresh one when it does not exist yet.
    pub fn load_or_create(path: impl AsRef<Path>, owner_id: &str) -> BotResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            return Ok(serde_json::from_str(&content)?);
        }

        let config = BotConfig::new(owner_id);
        config.save(path)?;
        info!("Wrote default config to {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> BotResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Empty prefixes fall back to the mention sentinel, an empty alternate prefix means none.
    pub fn normalized(mut self) -> Self {
        if self.prefix.is_empty() {
            self.prefix = DEFAULT_PREFIX.to_string();
        }
        if self.alt_prefix.as_deref().is_some_and(str::is_empty) {
            self.alt_prefix = None;
        }
        if self.help_word.is_empty() {
            self.help_word = "help".to_string();
        }
        self
    }

    pub fn uses_linked_deletion(&self) -> bool {
        self.linked_cache_size > 0
    }
}
