#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use cmdbot::bot::{
    chat_event::chat_event::{ChannelId, ChatEvent, ChatUser, GuildId, MessageId, Origin, UserId},
    commands::commands::{BotResult, Command},
    dispatcher::{event::CommandEvent, listener::CommandListener},
    handler::handler::ChatClient,
    state::def::{BotConfig, BotError},
    utils::finder::{Member, NamedChannel, Role},
};
use futures::future::BoxFuture;
use parking_lot::Mutex;

pub const OWNER: UserId = UserId(1);
pub const USER: UserId = UserId(42);
pub const GUILD: GuildId = GuildId(7);
pub const CHANNEL: ChannelId = ChannelId(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Channel(ChannelId, MessageId, String),
    Direct(UserId, MessageId, String),
    Reaction(ChannelId, MessageId, String),
    Deleted(ChannelId, MessageId),
    BulkDeleted(ChannelId, Vec<MessageId>),
}

/// In-memory platform that records every call.
pub struct RecordingChat {
    pub sent: Mutex<Vec<Sent>>,
    next_id: AtomicU64,
    pub dm_fails: bool,
    pub can_send: bool,
    pub can_bulk_delete: bool,
}

impl Default for RecordingChat {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(10_000),
            dm_fails: false,
            can_send: true,
            can_bulk_delete: false,
        }
    }
}

impl RecordingChat {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with(can_send: bool, can_bulk_delete: bool, dm_fails: bool) -> Arc<Self> {
        Arc::new(Self { can_send, can_bulk_delete, dm_fails, ..Self::default() })
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn channel_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Channel(_, _, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn direct_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Direct(_, _, text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn next(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl ChatClient for RecordingChat {
    fn send_message(&self, channel: ChannelId, text: String) -> BoxFuture<'_, BotResult<MessageId>> {
        Box::pin(async move {
            let id = self.next();
            self.sent.lock().push(Sent::Channel(channel, id, text));
            Ok(id)
        })
    }

    fn send_direct_message(&self, user: UserId, text: String) -> BoxFuture<'_, BotResult<MessageId>> {
        Box::pin(async move {
            if self.dm_fails {
                return Err(BotError::Custom("Cannot send messages to this user".into()));
            }
            let id = self.next();
            self.sent.lock().push(Sent::Direct(user, id, text));
            Ok(id)
        })
    }

    fn add_reaction(&self, channel: ChannelId, message: MessageId, emoji: String) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            self.sent.lock().push(Sent::Reaction(channel, message, emoji));
            Ok(())
        })
    }

    fn delete_message(&self, channel: ChannelId, message: MessageId) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            self.sent.lock().push(Sent::Deleted(channel, message));
            Ok(())
        })
    }

    fn delete_messages(&self, channel: ChannelId, messages: Vec<MessageId>) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            self.sent.lock().push(Sent::BulkDeleted(channel, messages));
            Ok(())
        })
    }

    fn can_send(&self, _guild: GuildId, _channel: ChannelId) -> bool {
        self.can_send
    }

    fn can_bulk_delete(&self, _guild: GuildId, _channel: ChannelId) -> bool {
        self.can_bulk_delete
    }

    fn user_name(&self, user: UserId) -> Option<String> {
        (user == OWNER).then(|| "jag#0001".to_string())
    }

    fn members(&self, guild: GuildId) -> Vec<Member> {
        if guild != GUILD {
            return Vec::new();
        }
        vec![
            Member { id: OWNER, name: "jag".into(), discriminator: "0001".into(), nickname: Some("DJ Jag".into()) },
            Member { id: USER, name: "mira".into(), discriminator: "4242".into(), nickname: None },
            Member { id: UserId(43), name: "miranda".into(), discriminator: "0043".into(), nickname: None },
        ]
    }

    fn text_channels(&self, _guild: GuildId) -> Vec<NamedChannel> {
        vec![NamedChannel { id: CHANNEL, name: "music-requests".into() }]
    }

    fn roles(&self, _guild: GuildId) -> Vec<Role> {
        vec![Role { id: 500, name: "Listeners".into() }, Role { id: 501, name: "Listener Mods".into() }]
    }
}

/// Listener that writes down each callback as `kind:command`.
#[derive(Default)]
pub struct RecordingListener {
    pub calls: Mutex<Vec<String>>,
}

impl RecordingListener {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, kind: &str, command: Option<&Arc<dyn Command>>) {
        let name = command.map_or("help", |c| c.name());
        self.calls.lock().push(format!("{kind}:{name}"));
    }
}

impl CommandListener for RecordingListener {
    fn on_command(&self, _event: &CommandEvent, command: Option<&Arc<dyn Command>>) {
        self.record("command", command);
    }

    fn on_completed_command(&self, _event: &CommandEvent, command: Option<&Arc<dyn Command>>) {
        self.record("completed", command);
    }

    fn on_terminated_command(&self, _event: &CommandEvent, command: Option<&Arc<dyn Command>>) {
        self.record("terminated", command);
    }

    fn on_non_command_message(&self, message: &ChatEvent) {
        self.calls.lock().push(format!("non-command:{}", message.content));
    }
}

pub fn config() -> BotConfig {
    let mut config = BotConfig::new(OWNER.to_string());
    config.prefix = "!".into();
    config
}

pub fn message(id: u64, author: UserId, origin: Origin, content: &str) -> ChatEvent {
    ChatEvent {
        message_id: MessageId(id),
        channel_id: CHANNEL,
        origin,
        author: ChatUser { id: author, name: format!("user{author}"), bot: false },
        content: content.to_string(),
    }
}

pub fn guild_message(id: u64, content: &str) -> ChatEvent {
    message(id, USER, Origin::Guild(GUILD), content)
}

pub fn direct_message(id: u64, content: &str) -> ChatEvent {
    message(id, USER, Origin::Direct, content)
}

/// Yields to spawned tasks until `done` holds, panicking after a second.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..200 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
