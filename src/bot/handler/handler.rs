use std::sync::Arc;

use futures::future::BoxFuture;

use crate::bot::{chat_event::chat_event::{ChannelId, GuildId, InboundEvent, MessageId, UserId}, commands::commands::BotResult, dispatcher::dispatcher::Dispatcher, utils::finder::{Member, NamedChannel, Role}};

/// Everything the dispatch core needs from the chat platform. Sends are
/// asynchronous; the capability checks read the platform's local cache and
/// must not block.
pub trait ChatClient: Send + Sync {
    fn send_message(&self, channel: ChannelId, text: String) -> BoxFuture<'_, BotResult<MessageId>>;

    fn send_direct_message(&self, user: UserId, text: String) -> BoxFuture<'_, BotResult<MessageId>>;

    fn add_reaction(&self, channel: ChannelId, message: MessageId, emoji: String) -> BoxFuture<'_, BotResult<()>>;

    fn delete_message(&self, channel: ChannelId, message: MessageId) -> BoxFuture<'_, BotResult<()>>;

    fn delete_messages(&self, channel: ChannelId, messages: Vec<MessageId>) -> BoxFuture<'_, BotResult<()>>;

    /// Whether the bot may post in a guild channel.
    fn can_send(&self, guild: GuildId, channel: ChannelId) -> bool;

    /// Whether the bot may bulk delete messages in a guild channel.
    fn can_bulk_delete(&self, guild: GuildId, channel: ChannelId) -> bool;

    /// Display tag of a user, if the platform knows it.
    fn user_name(&self, user: UserId) -> Option<String>;

    /// Cached guild entities for name lookups. Empty when the platform has none.
    fn members(&self, _guild: GuildId) -> Vec<Member> {
        Vec::new()
    }

    fn text_channels(&self, _guild: GuildId) -> Vec<NamedChannel> {
        Vec::new()
    }

    fn voice_channels(&self, _guild: GuildId) -> Vec<NamedChannel> {
        Vec::new()
    }

    fn roles(&self, _guild: GuildId) -> Vec<Role> {
        Vec::new()
    }
}

pub async fn handle_event(event: InboundEvent, dispatcher: &Arc<Dispatcher>, chat: Arc<dyn ChatClient>) -> BotResult<()> {
    match event {
        InboundEvent::Message(message) => dispatcher.on_message(message, chat).await,
        InboundEvent::MessageWithdrawn { channel_id, message_id, guild_id } => {
            dispatcher.on_message_withdrawn(channel_id, message_id, guild_id, chat);
            Ok(())
        }
    }
}
