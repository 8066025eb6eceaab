use std::sync::Arc;

use crate::bot::commands::commands::Command;

pub mod commands;

pub use commands::GENERAL_COMMANDS;

pub fn general_commands() -> Vec<Arc<dyn Command>> {
    GENERAL_COMMANDS.clone()
}
