use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::bot::{chat_event::chat_event::InboundEvent, dispatcher::dispatcher::Dispatcher, handler::handler::{handle_event, ChatClient}};

pub mod chat_event;
pub mod commands;
pub mod dispatcher;
pub mod handler;
pub mod help;
pub mod permissions;
pub mod platforms;
pub mod replies;
pub mod runtime;
pub mod state;
pub mod utils;

/// Drains platform events, one task per event so a slow command never holds up the next message.
pub async fn run_event_loop(dispatcher: Arc<Dispatcher>, chat: Arc<dyn ChatClient>, mut rx: UnboundedReceiver<InboundEvent>) {
    while let Some(event) = rx.recv().await {
        let dispatcher = dispatcher.clone();
        let chat = chat.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_event(event, &dispatcher, chat).await {
                tracing::error!("Event error: {e:?}");
            }
        });
    }
}
