use std::sync::Arc;

use crate::bot::{chat_event::chat_event::{ChatEvent, GuildId}, commands::commands::Command, dispatcher::event::CommandEvent};

/// Observer of dispatch outcomes. `command` is `None` for the help keyword.
pub trait CommandListener: Send + Sync {
    fn on_command(&self, _event: &CommandEvent, _command: Option<&Arc<dyn Command>>) {}

    fn on_completed_command(&self, _event: &CommandEvent, _command: Option<&Arc<dyn Command>>) {}

    /// A check inside the command stopped it, or the command returned an error.
    fn on_terminated_command(&self, _event: &CommandEvent, _command: Option<&Arc<dyn Command>>) {}

    fn on_non_command_message(&self, _message: &ChatEvent) {}
}

/// Per-guild settings owned outside the core.
pub trait GuildSettingsProvider: Send + Sync {
    fn prefixes(&self, guild: GuildId) -> Option<Vec<String>>;
}

/// Replacement for the built-in help listing.
pub type HelpHandler = Arc<dyn Fn(&CommandEvent, &[Arc<dyn Command>]) + Send + Sync>;
