use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tokio::sync::RwLock;
use tracing::info;

use crate::bot::{
    commands::{commands::{BotResult, Command}, CommandRegistry},
    dispatcher::{dispatcher::Dispatcher, event::CommandEvent, listener::{CommandListener, GuildSettingsProvider, HelpHandler}},
    help::help::default_help,
    permissions::permissions::warn_unsafe_owner_ids,
    runtime::{cooldowns::{Clock, CooldownTracker, SystemClock}, linked_cache::LinkedResponseCache},
    state::def::{BotConfig, BotError},
};

/// Collects everything a [`Dispatcher`] needs before the platform connects.
pub struct DispatcherBuilder {
    config: BotConfig,
    commands: Vec<Arc<dyn Command>>,
    listener: Option<Arc<dyn CommandListener>>,
    help_handler: Option<HelpHandler>,
    settings: Option<Arc<dyn GuildSettingsProvider>>,
    clock: Arc<dyn Clock>,
}

impl DispatcherBuilder {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            commands: Vec::new(),
            listener: None,
            help_handler: None,
            settings: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn add_command(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn add_commands(mut self, commands: impl IntoIterator<Item = Arc<dyn Command>>) -> Self {
        self.commands.extend(commands);
        self
    }

    pub fn set_listener(mut self, listener: Arc<dyn CommandListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn set_help_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CommandEvent, &[Arc<dyn Command>]) + Send + Sync + 'static,
    {
        self.help_handler = Some(Arc::new(handler));
        self
    }

    pub fn set_settings_provider(mut self, settings: Arc<dyn GuildSettingsProvider>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn set_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fails on a missing owner or when two commands share a name or alias.
    pub fn build(self) -> BotResult<Arc<Dispatcher>> {
        if self.config.owner_id.trim().is_empty() {
            return Err(BotError::Config("Owner ID was set null or not set! Please provide an User ID to register as the owner!".into()));
        }

        warn_unsafe_owner_ids(&self.config);
        let config = self.config.normalized();

        let mut registry = CommandRegistry::new();
        for command in self.commands {
            registry.register(command)?;
        }

        let links = config.uses_linked_deletion().then(|| LinkedResponseCache::new(config.linked_cache_size as usize));

        let help_handler: HelpHandler = match self.help_handler {
            Some(handler) => handler,
            None => Arc::new(default_help),
        };

        info!(
            "Dispatcher ready with {} commands, prefix {:?}, linked deletion {}",
            registry.len(),
            config.prefix,
            if links.is_some() { "on" } else { "off" }
        );

        Ok(Arc::new(Dispatcher {
            config,
            registry: RwLock::new(registry),
            cooldowns: CooldownTracker::new(self.clock),
            links,
            uses: DashMap::new(),
            listener: self.listener,
            help_handler,
            settings: self.settings,
            self_user: OnceCell::new(),
        }))
    }
}
