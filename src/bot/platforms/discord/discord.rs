use std::sync::Arc;

use futures::future::BoxFuture;
use serenity::all::{
    Cache, ChannelId as DiscordChannelId, ChannelType, EmojiId, GuildChannel, GuildId as DiscordGuildId, Http, Member as DiscordMember, Message,
    MessageId as DiscordMessageId, OnlineStatus, Permissions, ReactionType, Role as DiscordRole, UserId as DiscordUserId,
};

use crate::bot::{
    chat_event::chat_event::{ChannelId, ChatEvent, ChatUser, GuildId, MessageId, Origin, UserId},
    commands::commands::BotResult,
    handler::handler::ChatClient,
    state::def::PresenceStatus,
    utils::finder::{Member, NamedChannel, Role},
};

pub fn map_message(msg: &Message) -> ChatEvent {
    ChatEvent {
        message_id: MessageId(msg.id.get()),
        channel_id: ChannelId(msg.channel_id.get()),
        origin: match msg.guild_id {
            Some(guild) => Origin::Guild(GuildId(guild.get())),
            None => Origin::Direct,
        },
        author: ChatUser {
            id: UserId(msg.author.id.get()),
            name: msg.author.name.clone(),
            bot: msg.author.bot,
        },
        content: msg.content.clone(),
    }
}

impl From<&DiscordMember> for Member {
    fn from(member: &DiscordMember) -> Self {
        Member {
            id: UserId(member.user.id.get()),
            name: member.user.name.clone(),
            discriminator: member.user.discriminator.map_or_else(|| "0000".to_string(), |d| format!("{:04}", d.get())),
            nickname: member.nick.clone(),
        }
    }
}

impl From<&GuildChannel> for NamedChannel {
    fn from(channel: &GuildChannel) -> Self {
        NamedChannel { id: ChannelId(channel.id.get()), name: channel.name.clone() }
    }
}

impl From<&DiscordRole> for Role {
    fn from(role: &DiscordRole) -> Self {
        Role { id: role.id.get(), name: role.name.clone() }
    }
}

pub fn online_status(status: PresenceStatus) -> OnlineStatus {
    match status {
        PresenceStatus::Online => OnlineStatus::Online,
        PresenceStatus::Idle => OnlineStatus::Idle,
        PresenceStatus::Dnd => OnlineStatus::DoNotDisturb,
        PresenceStatus::Invisible => OnlineStatus::Invisible,
    }
}

/// `name:id` becomes a custom emoji, anything else is sent as unicode.
pub fn reaction_type(emoji: &str) -> ReactionType {
    if let Some((name, id)) = emoji.rsplit_once(':') {
        if let Ok(id) = id.parse::<u64>() {
            if id != 0 && !name.is_empty() {
                return ReactionType::Custom { animated: false, id: EmojiId::new(id), name: Some(name.to_string()) };
            }
        }
    }
    ReactionType::Unicode(emoji.to_string())
}

/// [`ChatClient`] backed by serenity's HTTP client and gateway cache.
#[derive(Clone)]
pub struct SerenityChatClient {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityChatClient {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    /// Permissions of the bot in a guild channel, if everything needed is cached.
    fn own_permissions(&self, guild: GuildId, channel: ChannelId) -> Option<Permissions> {
        let me = self.cache.current_user().id;
        let guild = self.cache.guild(DiscordGuildId::new(guild.get()))?;
        let channel = guild.channels.get(&DiscordChannelId::new(channel.get()))?;
        let member = guild.members.get(&me)?;
        Some(guild.user_permissions_in(channel, member))
    }
}

impl SerenityChatClient {
    fn channels_of_kind(&self, guild: GuildId, kind: ChannelType) -> Vec<NamedChannel> {
        let Some(guild) = self.cache.guild(DiscordGuildId::new(guild.get())) else {
            return Vec::new();
        };
        let mut channels: Vec<&GuildChannel> = guild.channels.values().filter(|c| c.kind == kind).collect();
        channels.sort_by_key(|c| c.position);
        channels.into_iter().map(NamedChannel::from).collect()
    }
}

impl ChatClient for SerenityChatClient {
    fn send_message(&self, channel: ChannelId, text: String) -> BoxFuture<'_, BotResult<MessageId>> {
        Box::pin(async move {
            let sent = DiscordChannelId::new(channel.get()).say(&self.http, text).await?;
            Ok(MessageId(sent.id.get()))
        })
    }

    fn send_direct_message(&self, user: UserId, text: String) -> BoxFuture<'_, BotResult<MessageId>> {
        Box::pin(async move {
            let dm = DiscordUserId::new(user.get()).create_dm_channel(&self.http).await?;
            let sent = dm.id.say(&self.http, text).await?;
            Ok(MessageId(sent.id.get()))
        })
    }

    fn add_reaction(&self, channel: ChannelId, message: MessageId, emoji: String) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            DiscordChannelId::new(channel.get())
                .create_reaction(&self.http, DiscordMessageId::new(message.get()), reaction_type(&emoji))
                .await?;
            Ok(())
        })
    }

    fn delete_message(&self, channel: ChannelId, message: MessageId) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            DiscordChannelId::new(channel.get()).delete_message(&self.http, DiscordMessageId::new(message.get())).await?;
            Ok(())
        })
    }

    fn delete_messages(&self, channel: ChannelId, messages: Vec<MessageId>) -> BoxFuture<'_, BotResult<()>> {
        Box::pin(async move {
            let ids: Vec<String> = messages.iter().map(MessageId::to_string).collect();
            let body = serde_json::json!({ "messages": ids });
            self.http.delete_messages(DiscordChannelId::new(channel.get()), &body, None).await?;
            Ok(())
        })
    }

    fn can_send(&self, guild: GuildId, channel: ChannelId) -> bool {
        self.own_permissions(guild, channel)
            .map_or(true, |perms| perms.send_messages() && perms.view_channel())
    }

    fn can_bulk_delete(&self, guild: GuildId, channel: ChannelId) -> bool {
        self.own_permissions(guild, channel).is_some_and(|perms| perms.manage_messages())
    }

    fn user_name(&self, user: UserId) -> Option<String> {
        self.cache.user(DiscordUserId::new(user.get())).map(|user| user.tag())
    }

    fn members(&self, guild: GuildId) -> Vec<Member> {
        self.cache
            .guild(DiscordGuildId::new(guild.get()))
            .map(|guild| guild.members.values().map(Member::from).collect())
            .unwrap_or_default()
    }

    fn text_channels(&self, guild: GuildId) -> Vec<NamedChannel> {
        self.channels_of_kind(guild, ChannelType::Text)
    }

    fn voice_channels(&self, guild: GuildId) -> Vec<NamedChannel> {
        self.channels_of_kind(guild, ChannelType::Voice)
    }

    fn roles(&self, guild: GuildId) -> Vec<Role> {
        self.cache
            .guild(DiscordGuildId::new(guild.get()))
            .map(|guild| guild.roles.values().map(Role::from).collect())
            .unwrap_or_default()
    }
}
