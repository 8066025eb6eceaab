use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::bot::{chat_event::chat_event::{ChannelId, ChatEvent, ChatUser, GuildId, MessageId, UserId}, commands::commands::BotResult, dispatcher::dispatcher::Dispatcher, handler::handler::ChatClient, permissions::permissions::is_owner, state::def::BotError, utils::text::{normalize_reaction, split_message}};

/// Pending delivery of a reply. Resolves to the ids of the messages sent.
pub type Delivery = JoinHandle<BotResult<Vec<MessageId>>>;

#[derive(Clone, Copy)]
enum Target {
    Channel(ChannelId),
    Direct(UserId),
}

/// One command invocation: the parsed arguments, the triggering message, and
/// handles back to the dispatcher and the chat platform.
#[derive(Clone)]
pub struct CommandEvent {
    message: Arc<ChatEvent>,
    args: String,
    client: Arc<Dispatcher>,
    chat: Arc<dyn ChatClient>,
}

impl CommandEvent {
    /// Replies longer than one message are cut to this many messages.
    pub const MAX_MESSAGES: usize = 2;

    pub fn new(message: Arc<ChatEvent>, args: impl Into<String>, client: Arc<Dispatcher>, chat: Arc<dyn ChatClient>) -> Self {
        Self { message, args: args.into(), client, chat }
    }

    pub fn args(&self) -> &str {
        &self.args
    }

    /// Same invocation with different arguments, used when handing off to a child command.
    pub fn with_args(&self, args: impl Into<String>) -> CommandEvent {
        CommandEvent { args: args.into(), ..self.clone() }
    }

    pub fn client(&self) -> &Arc<Dispatcher> {
        &self.client
    }

    pub fn chat(&self) -> &Arc<dyn ChatClient> {
        &self.chat
    }

    pub fn message(&self) -> &ChatEvent {
        &self.message
    }

    pub fn author(&self) -> &ChatUser {
        &self.message.author
    }

    pub fn channel_id(&self) -> ChannelId {
        self.message.channel_id
    }

    pub fn guild_id(&self) -> Option<GuildId> {
        self.message.guild_id()
    }

    pub fn is_from_guild(&self) -> bool {
        !self.message.is_direct()
    }

    pub fn is_owner(&self) -> bool {
        is_owner(self.author().id, self.client.config())
    }

    /// Ties a bot message to the trigger so deleting the trigger deletes it too.
    pub fn link_id(&self, response: MessageId) {
        self.client.link_ids(self.message.message_id, response);
    }

    pub fn reply(&self, text: impl Into<String>) -> Delivery {
        self.send(Target::Channel(self.channel_id()), text.into())
    }

    pub fn reply_success(&self, text: impl AsRef<str>) -> Delivery {
        self.reply(format!("{} {}", self.client.config().emojis.success, text.as_ref()))
    }

    pub fn reply_warning(&self, text: impl AsRef<str>) -> Delivery {
        self.reply(format!("{} {}", self.client.config().emojis.warning, text.as_ref()))
    }

    pub fn reply_error(&self, text: impl AsRef<str>) -> Delivery {
        self.reply(format!("{} {}", self.client.config().emojis.error, text.as_ref()))
    }

    /// Sends privately to the author. In a direct conversation this is a plain reply.
    pub fn reply_in_dm(&self, text: impl Into<String>) -> Delivery {
        if self.message.is_direct() {
            self.reply(text)
        } else {
            self.send(Target::Direct(self.author().id), text.into())
        }
    }

    pub fn react_success(&self) -> Option<JoinHandle<()>> {
        self.react(&self.client.config().emojis.success)
    }

    pub fn react_warning(&self) -> Option<JoinHandle<()>> {
        self.react(&self.client.config().emojis.warning)
    }

    pub fn react_error(&self) -> Option<JoinHandle<()>> {
        self.react(&self.client.config().emojis.error)
    }

    fn react(&self, emoji: &str) -> Option<JoinHandle<()>> {
        if emoji.is_empty() {
            return None;
        }

        let chat = self.chat.clone();
        let channel = self.channel_id();
        let message = self.message.message_id;
        let emoji = normalize_reaction(emoji);
        Some(tokio::spawn(async move {
            if let Err(e) = chat.add_reaction(channel, message, emoji).await {
                debug!("Failed to add reaction to {message}: {e}");
            }
        }))
    }

    fn send(&self, target: Target, text: String) -> Delivery {
        let chunks: Vec<String> = split_message(&text).into_iter().take(Self::MAX_MESSAGES).collect();
        let chat = self.chat.clone();
        let client = self.client.clone();
        let trigger = self.message.message_id;
        let link = self.is_from_guild() && matches!(target, Target::Channel(_));

        tokio::spawn(async move {
            let mut sent = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                let id = match target {
                    Target::Channel(channel) => chat.send_message(channel, chunk).await?,
                    Target::Direct(user) => chat.send_direct_message(user, chunk).await?,
                };
                if link {
                    client.link_ids(trigger, id);
                }
                sent.push(id);
            }
            Ok::<_, BotError>(sent)
        })
    }
}
