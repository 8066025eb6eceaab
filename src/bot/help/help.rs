use std::sync::Arc;

use tracing::debug;

use crate::bot::{chat_event::chat_event::UserId, commands::commands::{Category, Command}, dispatcher::event::CommandEvent, replies::Replies};

/// What the help listing needs to know about the invocation.
#[derive(Debug, Clone)]
pub struct HelpContext {
    pub bot_name: String,
    pub textual_prefix: String,
    pub invoker_is_owner: bool,
    pub owner_name: Option<String>,
    pub server_invite: Option<String>,
}

impl HelpContext {
    pub fn from_event(event: &CommandEvent) -> Self {
        let client = event.client();
        let owner_name = client
            .owner_id()
            .parse::<UserId>()
            .ok()
            .and_then(|owner| event.chat().user_name(owner));

        HelpContext {
            bot_name: client.bot_name().to_string(),
            textual_prefix: client.textual_prefix(),
            invoker_is_owner: event.is_owner(),
            owner_name,
            server_invite: client.config().server_invite.clone(),
        }
    }
}

/// Lists visible commands in registry order, starting a new category heading
/// whenever the category changes.
pub fn build_help_text(ctx: &HelpContext, commands: &[Arc<dyn Command>]) -> String {
    let mut text = Replies::help_header(&ctx.bot_name);
    let mut current: Option<Option<&Category>> = None;

    for command in commands {
        if command.hidden() || (command.owner_only() && !ctx.invoker_is_owner) {
            continue;
        }

        let category = command.category();
        if current != Some(category) {
            text.push_str(&Replies::help_category(category.map(Category::name)));
            current = Some(category);
        }

        text.push_str(&format!("\n`{}{}", ctx.textual_prefix, command.name()));
        match command.arguments() {
            Some(arguments) => text.push_str(&format!(" {arguments}`")),
            None => text.push('`'),
        }
        text.push_str(&format!(" - {}", command.help()));
    }

    if let Some(owner) = &ctx.owner_name {
        text.push_str(&Replies::help_contact(owner, ctx.server_invite.as_deref()));
    }

    text
}

/// Sends the listing privately. A guild trigger gets a success reaction once
/// the DM is through; a blocked DM gets a warning in the channel instead.
pub fn default_help(event: &CommandEvent, commands: &[Arc<dyn Command>]) {
    let text = build_help_text(&HelpContext::from_event(event), commands);
    let event = event.clone();

    tokio::spawn(async move {
        match event.reply_in_dm(text).await {
            Ok(Ok(_)) => {
                if event.is_from_guild() {
                    event.react_success();
                }
            }
            Ok(Err(e)) => {
                debug!("Help DM to {} failed: {e}", event.author().id);
                event.reply_warning(Replies::help_dm_blocked());
            }
            Err(e) => debug!("Help delivery task failed: {e}"),
        }
    });
}
