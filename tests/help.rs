mod common;

use std::sync::Arc;

use cmdbot::bot::{
    chat_event::chat_event::{MessageId, Origin},
    commands::commands::{Category, Command, FnCommand},
    dispatcher::builder::DispatcherBuilder,
};
use common::*;
use parking_lot::Mutex;

fn music_commands() -> Vec<Arc<dyn Command>> {
    let music = Category::new("Music");
    vec![
        Arc::new(FnCommand::new("play", "plays a song", |_| Ok(())).with_aliases(["p"]).with_category(music.clone()).with_arguments("<title|URL>")),
        Arc::new(FnCommand::new("pause", "pauses the song", |_| Ok(())).with_category(music)),
        Arc::new(FnCommand::new("debug", "dumps internal state", |_| Ok(())).with_owner_only()),
    ]
}

#[tokio::test]
async fn help_is_sent_privately_without_owner_commands() {
    let listener = Arc::new(RecordingListener::default());
    let dispatcher = DispatcherBuilder::new(config())
        .add_commands(music_commands())
        .set_listener(listener.clone())
        .build()
        .unwrap();
    let chat = RecordingChat::new();

    dispatcher.on_message(guild_message(5, "!HELP"), chat.clone()).await.unwrap();
    assert_eq!(listener.calls(), vec!["command:help", "completed:help"]);

    wait_until(|| chat.sent().iter().any(|s| matches!(s, Sent::Reaction(..)))).await;
    let dms = chat.direct_texts();
    assert_eq!(dms.len(), 1);
    assert!(dms[0].starts_with("**Bot** commands:"));
    assert!(dms[0].contains("`!play <title|URL>` - plays a song"));
    assert!(dms[0].contains("__Music__"));
    assert!(!dms[0].contains("debug"));
    assert!(dms[0].ends_with("For additional help, contact **jag#0001**"));
    assert!(chat.sent().contains(&Sent::Reaction(CHANNEL, MessageId(5), "🎶".into())));
}

#[tokio::test]
async fn owners_see_owner_only_commands_in_help() {
    let dispatcher = DispatcherBuilder::new(config()).add_commands(music_commands()).build().unwrap();
    let chat = RecordingChat::new();

    dispatcher.on_message(message(5, OWNER, Origin::Guild(GUILD), "!help"), chat.clone()).await.unwrap();

    wait_until(|| !chat.direct_texts().is_empty()).await;
    assert!(chat.direct_texts()[0].contains("`!debug` - dumps internal state"));
}

#[tokio::test]
async fn blocked_direct_messages_get_a_warning_in_the_channel() {
    let dispatcher = DispatcherBuilder::new(config()).add_commands(music_commands()).build().unwrap();
    let chat = RecordingChat::with(true, false, true);

    dispatcher.on_message(guild_message(5, "!help"), chat.clone()).await.unwrap();

    wait_until(|| !chat.channel_texts().is_empty()).await;
    assert_eq!(chat.channel_texts(), vec!["💡 Help cannot be sent because you are blocking Direct Messages."]);
    assert!(!chat.sent().iter().any(|s| matches!(s, Sent::Reaction(..))));
}

#[tokio::test]
async fn help_in_direct_messages_is_a_plain_reply_without_reaction() {
    let dispatcher = DispatcherBuilder::new(config()).add_commands(music_commands()).build().unwrap();
    let chat = RecordingChat::new();

    dispatcher.on_message(direct_message(5, "!help"), chat.clone()).await.unwrap();

    wait_until(|| !chat.channel_texts().is_empty()).await;
    tokio::task::yield_now().await;
    assert!(chat.channel_texts()[0].contains("__Music__"));
    assert!(!chat.sent().iter().any(|s| matches!(s, Sent::Reaction(..))));
}

#[tokio::test]
async fn custom_help_handler_replaces_the_listing() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler_seen = seen.clone();
    let mut config = config();
    config.help_word = "commands".into();

    let dispatcher = DispatcherBuilder::new(config)
        .add_commands(music_commands())
        .set_help_handler(move |event, commands| {
            handler_seen.lock().push(format!("{}:{}", event.args(), commands.len()));
        })
        .build()
        .unwrap();
    let chat = RecordingChat::new();

    dispatcher.on_message(guild_message(5, "!commands music"), chat.clone()).await.unwrap();
    dispatcher.on_message(guild_message(6, "!help"), chat.clone()).await.unwrap();

    assert_eq!(*seen.lock(), vec!["music:3"]);
    assert!(chat.sent().is_empty());
}

#[tokio::test]
async fn disabled_help_word_is_an_ordinary_message() {
    let listener = Arc::new(RecordingListener::default());
    let mut config = config();
    config.use_help = false;
    let dispatcher = DispatcherBuilder::new(config).set_listener(listener.clone()).build().unwrap();

    dispatcher.on_message(guild_message(5, "!help"), RecordingChat::new()).await.unwrap();

    assert_eq!(listener.calls(), vec!["non-command:!help"]);
}
