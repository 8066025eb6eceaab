use std::sync::Arc;

use serenity::{all::{ActivityData, ChannelId as DiscordChannelId, Context, EventHandler, GatewayIntents, GuildId as DiscordGuildId, Message, MessageId as DiscordMessageId, Ready}, async_trait, Client};
use tokio::sync::{mpsc::{self, UnboundedReceiver, UnboundedSender}, Mutex};
use tracing::{error, info, warn};

use crate::bot::{
    chat_event::chat_event::{ChannelId, GuildId, InboundEvent, MessageId, SelfUser, UserId},
    commands::commands::BotResult,
    dispatcher::dispatcher::Dispatcher,
    platforms::discord::discord::{map_message, online_status, SerenityChatClient},
    state::def::BotError,
    run_event_loop,
};

struct Handler {
    dispatcher: Arc<Dispatcher>,
    tx: UnboundedSender<InboundEvent>,
    rx: Mutex<Option<UnboundedReceiver<InboundEvent>>>,
}

impl Handler {
    fn forward(&self, event: InboundEvent) {
        if self.tx.send(event).is_err() {
            warn!("Event loop is gone, dropping Discord event");
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        if !ready.user.bot {
            error!("{}", BotError::NotABot(ready.user.name.clone()));
            ctx.shard.shutdown_clean();
            return;
        }

        info!("{} is connected!", ready.user.name);
        self.dispatcher.set_self_user(SelfUser { id: UserId(ready.user.id.get()), name: ready.user.name.clone() });

        let activity = self.dispatcher.activity().map(ActivityData::playing);
        ctx.set_presence(activity, online_status(self.dispatcher.config().status));

        // Reconnects fire ready again; the loop only starts once.
        if let Some(rx) = self.rx.lock().await.take() {
            let chat = Arc::new(SerenityChatClient::new(ctx.http.clone(), ctx.cache.clone()));
            tokio::spawn(run_event_loop(self.dispatcher.clone(), chat, rx));
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        self.forward(InboundEvent::Message(map_message(&msg)));
    }

    async fn message_delete(&self, _ctx: Context, channel_id: DiscordChannelId, deleted_message_id: DiscordMessageId, guild_id: Option<DiscordGuildId>) {
        self.forward(InboundEvent::MessageWithdrawn {
            channel_id: ChannelId(channel_id.get()),
            message_id: MessageId(deleted_message_id.get()),
            guild_id: guild_id.map(|guild| GuildId(guild.get())),
        });
    }
}

pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connects to Discord and feeds every message and deletion to the dispatcher
/// until the gateway connection ends.
pub async fn run_discord_bot(token: &str, dispatcher: Arc<Dispatcher>) -> BotResult<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler = Handler { dispatcher, tx, rx: Mutex::new(Some(rx)) };

    let mut client = Client::builder(token, intents()).event_handler(handler).await?;
    client.start().await?;

    Ok(())
}
