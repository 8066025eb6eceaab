use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info};

use crate::bot::{
    chat_event::chat_event::{ChannelId, ChatEvent, GuildId, MessageId, Origin, SelfUser, UserId},
    commands::{commands::{BotResult, Command, RunOutcome}, CommandRegistry},
    dispatcher::{event::CommandEvent, listener::{CommandListener, GuildSettingsProvider, HelpHandler}, prefix::{resolve, Invocation, PrefixSet, DEFAULT_PREFIX}},
    handler::handler::ChatClient,
    runtime::{cooldowns::CooldownTracker, linked_cache::LinkedResponseCache},
    state::def::{BotConfig, DEFAULT_ACTIVITY},
};

/// Turns inbound messages into command invocations. Built once through
/// [`DispatcherBuilder`](crate::bot::dispatcher::builder::DispatcherBuilder) and
/// shared behind an `Arc` by every event task.
pub struct Dispatcher {
    pub(crate) config: BotConfig,
    pub(crate) registry: RwLock<CommandRegistry>,
    pub(crate) cooldowns: CooldownTracker,
    pub(crate) links: Option<LinkedResponseCache<MessageId, MessageId>>,
    pub(crate) uses: DashMap<String, u64>,
    pub(crate) listener: Option<Arc<dyn CommandListener>>,
    pub(crate) help_handler: HelpHandler,
    pub(crate) settings: Option<Arc<dyn GuildSettingsProvider>>,
    pub(crate) self_user: OnceCell<SelfUser>,
}

impl Dispatcher {
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    pub fn alt_prefix(&self) -> Option<&str> {
        self.config.alt_prefix.as_deref()
    }

    /// Prefix as users should type it; the bot's mention when the mention prefix is in use.
    pub fn textual_prefix(&self) -> String {
        if self.config.prefix != DEFAULT_PREFIX {
            return self.config.prefix.clone();
        }
        format!("@{} ", self.bot_name())
    }

    /// Display name of the bot, `Bot` until the platform reports ready.
    pub fn bot_name(&self) -> &str {
        self.self_user.get().map_or("Bot", |user| user.name.as_str())
    }

    /// "Playing" text for the bot's presence, if any.
    pub fn activity(&self) -> Option<String> {
        match self.config.activity.as_deref() {
            None | Some("") => None,
            Some(DEFAULT_ACTIVITY) => Some(format!("Type {}{}", self.textual_prefix(), self.config.help_word)),
            Some(text) => Some(text.to_string()),
        }
    }

    pub fn help_word(&self) -> &str {
        &self.config.help_word
    }

    pub fn owner_id(&self) -> &str {
        &self.config.owner_id
    }

    pub fn co_owner_ids(&self) -> &[String] {
        &self.config.co_owner_ids
    }

    pub fn self_user(&self) -> Option<&SelfUser> {
        self.self_user.get()
    }

    /// Records who the bot is. Only the first call has an effect.
    pub fn set_self_user(&self, user: SelfUser) {
        info!("Dispatching commands as {} ({})", user.name, user.id);
        if self.self_user.set(user).is_err() {
            debug!("Self user already known, keeping the first one");
        }
    }

    pub fn listener(&self) -> Option<&Arc<dyn CommandListener>> {
        self.listener.as_ref()
    }

    pub fn remaining_cooldown(&self, key: &str) -> u64 {
        self.cooldowns.remaining_seconds(key)
    }

    pub fn apply_cooldown(&self, key: impl Into<String>, seconds: u64) {
        self.cooldowns.apply(key, seconds);
    }

    /// Starts the cooldown for `key` unless it is running; returns the seconds left if it was.
    pub fn try_cooldown(&self, key: impl Into<String>, seconds: u64) -> u64 {
        self.cooldowns.try_apply(key, seconds)
    }

    pub fn uses(&self, name: &str) -> u64 {
        self.uses.get(name).map_or(0, |count| *count)
    }

    /// Usage counters sorted by name.
    pub fn usage_snapshot(&self) -> Vec<(String, u64)> {
        let mut usage: Vec<(String, u64)> = self.uses.iter().map(|entry| (entry.key().clone(), *entry.value())).collect();
        usage.sort();
        usage
    }

    pub fn uses_linked_deletion(&self) -> bool {
        self.links.is_some()
    }

    pub fn links(&self) -> Option<&LinkedResponseCache<MessageId, MessageId>> {
        self.links.as_ref()
    }

    pub(crate) fn link_ids(&self, trigger: MessageId, response: MessageId) {
        if let Some(links) = &self.links {
            links.add_value(trigger, response);
        }
    }

    pub async fn commands(&self) -> Vec<Arc<dyn Command>> {
        self.registry.read().await.snapshot()
    }

    pub async fn command(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.registry.read().await.get(name)
    }

    /// Adds a command after startup, appending when `at` is `None`.
    pub async fn add_command(&self, command: Arc<dyn Command>, at: Option<usize>) -> BotResult<()> {
        let mut registry = self.registry.write().await;
        match at {
            Some(at) => registry.insert(command, at),
            None => registry.register(command),
        }
    }

    fn guild_prefixes(&self, message: &ChatEvent) -> Vec<String> {
        match (message.origin, &self.settings) {
            (Origin::Guild(guild), Some(settings)) => settings.prefixes(guild).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn parse(&self, message: &ChatEvent) -> Option<Invocation> {
        let prefixes = PrefixSet { primary: &self.config.prefix, alternate: self.config.alt_prefix.as_deref() };
        let self_id = self.self_user.get().map(|user| user.id);
        resolve(&message.content, self_id, &prefixes, &self.guild_prefixes(message))
    }

    fn can_post(message: &ChatEvent, chat: &dyn ChatClient) -> bool {
        match message.origin {
            Origin::Direct => true,
            Origin::Guild(guild) => chat.can_send(guild, message.channel_id),
        }
    }

    /// Handles one inbound message. Returns once the matched command's `run`
    /// returns; replies it spawned may still be in flight. Errors from the
    /// command are handed back to the caller.
    pub async fn on_message(self: &Arc<Self>, message: ChatEvent, chat: Arc<dyn ChatClient>) -> BotResult<()> {
        if message.author.bot {
            return Ok(());
        }

        let message = Arc::new(message);

        if let Some(Invocation { name, args }) = self.parse(&message) {
            if self.config.use_help && name.to_lowercase() == self.config.help_word.to_lowercase() {
                let event = CommandEvent::new(message.clone(), args, self.clone(), chat);
                self.notify(|l| l.on_command(&event, None));
                let commands = self.commands().await;
                (self.help_handler)(&event, &commands);
                self.notify(|l| l.on_completed_command(&event, None));
                return Ok(());
            }

            if let Some(command) = self.command(&name).await {
                if !Self::can_post(&message, chat.as_ref()) {
                    debug!("Dropping {} in channel {}: cannot post there", command.name(), message.channel_id);
                    return Ok(());
                }

                let event = CommandEvent::new(message.clone(), args, self.clone(), chat);
                debug!("Running {} for {} ({})", command.name(), message.author.name, message.author.id);
                self.notify(|l| l.on_command(&event, Some(&command)));
                *self.uses.entry(command.name().to_string()).or_insert(0) += 1;

                return match command.run(event.clone()) {
                    Ok(RunOutcome::Completed) => {
                        self.notify(|l| l.on_completed_command(&event, Some(&command)));
                        Ok(())
                    }
                    Ok(RunOutcome::Terminated) => {
                        self.notify(|l| l.on_terminated_command(&event, Some(&command)));
                        Ok(())
                    }
                    Err(e) => {
                        self.notify(|l| l.on_terminated_command(&event, Some(&command)));
                        Err(e)
                    }
                };
            }
        }

        self.notify(|l| l.on_non_command_message(&message));
        Ok(())
    }

    /// Deletes the bot's responses to a withdrawn guild message. Does nothing
    /// when linked deletion is off or nothing is linked. Delete failures are
    /// logged and dropped.
    pub fn on_message_withdrawn(&self, channel: ChannelId, message: MessageId, guild: Option<GuildId>, chat: Arc<dyn ChatClient>) -> Option<JoinHandle<()>> {
        let links = self.links.as_ref()?;
        let guild = guild?;

        if !links.contains(&message) {
            return None;
        }

        let mut responses: Vec<MessageId> = links.get(&message).into_iter().collect();
        if responses.is_empty() {
            return None;
        }
        responses.sort();

        let bulk = responses.len() > 1 && chat.can_bulk_delete(guild, channel);
        Some(tokio::spawn(async move {
            if bulk {
                if let Err(e) = chat.delete_messages(channel, responses).await {
                    debug!("Bulk delete in {channel} failed: {e}");
                }
                return;
            }

            for response in responses {
                if let Err(e) = chat.delete_message(channel, response).await {
                    debug!("Deleting {response} in {channel} failed: {e}");
                }
            }
        }))
    }

    fn notify<F>(&self, f: F)
    where
        F: FnOnce(&dyn CommandListener),
    {
        if let Some(listener) = &self.listener {
            f(listener.as_ref());
        }
    }

    pub fn is_owner(&self, user: UserId) -> bool {
        crate::bot::permissions::permissions::is_owner(user, &self.config)
    }
}
