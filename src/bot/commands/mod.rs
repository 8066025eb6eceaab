use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::bot::{commands::commands::{BotResult, Command}, state::def::BotError};

pub mod commands;
pub mod general;

/// Registered commands in display order, with a lowercase name/alias index
/// pointing at each command's position.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Arc<dyn Command>) -> BotResult<()> {
        let at = self.commands.len();
        self.insert(command, at)
    }

    /// Inserts at `at`, moving every command at or after that position down one.
    /// Nothing changes when the name or an alias is already taken.
    pub fn insert(&mut self, command: Arc<dyn Command>, at: usize) -> BotResult<()> {
        if at > self.commands.len() {
            return Err(BotError::IndexOutOfBounds { index: at, len: self.commands.len() });
        }

        let mut keys: Vec<String> = Vec::with_capacity(command.aliases().len() + 1);
        for key in std::iter::once(command.name()).chain(command.aliases().iter().map(String::as_str)) {
            let key = key.to_lowercase();
            if self.index.contains_key(&key) || keys.contains(&key) {
                return Err(BotError::DuplicateName(key));
            }
            keys.push(key);
        }

        if at < self.commands.len() {
            for position in self.index.values_mut() {
                if *position >= at {
                    *position += 1;
                }
            }
        }

        for key in keys {
            self.index.insert(key, at);
        }
        debug!("Registered command {} at position {}", command.name(), at);
        self.commands.insert(at, command);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.index
            .get(&name.to_lowercase())
            .and_then(|&position| self.commands.get(position))
            .cloned()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_lowercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Command>> {
        self.commands.iter()
    }

    pub fn snapshot(&self) -> Vec<Arc<dyn Command>> {
        self.commands.clone()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
