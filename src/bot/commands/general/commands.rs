use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bot::{
    chat_event::chat_event::UserId,
    commands::commands::{BotResult, Category, Command, CooldownScope, FnCommand},
    dispatcher::event::CommandEvent,
    replies::Replies,
    utils::finder::{find_members, find_roles, find_text_channels, find_voice_channels},
};

/// Most matches listed when a lookup is ambiguous.
const MAX_LISTED: usize = 10;

pub static GENERAL_COMMANDS: Lazy<Vec<Arc<dyn Command>>> = Lazy::new(|| {
    vec![
        ping_command(),
        Arc::new(AboutCommand::new("a small command bot", &["Prefix, mention and per-server prefixes", "Cooldowns and owner-only commands", "Replies removed with their trigger"])),
        stats_command(),
        find_command(),
    ]
});

pub fn ping_command() -> Arc<dyn Command> {
    Arc::new(
        FnCommand::new("ping", "checks the bot's latency", |event: CommandEvent| {
            event.reply(Replies::pong());
            Ok(())
        })
        .with_aliases(["pong"])
        .with_guild_only(false)
        .with_cooldown(5, CooldownScope::Channel),
    )
}

pub fn stats_command() -> Arc<dyn Command> {
    Arc::new(
        FnCommand::new("stats", "shows how often each command ran", |event: CommandEvent| {
            let usage = event.client().usage_snapshot();
            if usage.is_empty() {
                event.reply_warning("No commands have been used yet.");
                return Ok(());
            }

            let lines: Vec<String> = usage.iter().map(|(name, uses)| format!("`{name}` - {uses}")).collect();
            event.reply(format!("**Command usage:**\n{}", lines.join("\n")));
            Ok(())
        })
        .with_category(Category::new("Owner"))
        .with_owner_only()
        .with_guild_only(false),
    )
}

/// Describes the bot: who runs it, how to call it and what it does.
pub struct AboutCommand {
    description: String,
    features: Vec<String>,
    aliases: Vec<String>,
}

impl AboutCommand {
    pub fn new(description: impl Into<String>, features: &[&str]) -> Self {
        AboutCommand {
            description: description.into(),
            features: features.iter().map(|f| f.to_string()).collect(),
            aliases: vec!["info".to_string()],
        }
    }

    fn render(&self, event: &CommandEvent) -> String {
        let client = event.client();
        let bot = client.self_user().map_or("This bot", |user| user.name.as_str());
        let owner = client
            .owner_id()
            .parse::<UserId>()
            .ok()
            .and_then(|owner| event.chat().user_name(owner))
            .unwrap_or_else(|| format!("<@{}>", client.owner_id()));

        let mut text = format!(
            "Hello! I am **{bot}**, {}.\nI am owned by **{owner}**. Type `{}{}` to see my commands!",
            self.description,
            client.textual_prefix(),
            client.help_word()
        );
        if let Some(invite) = &client.config().server_invite {
            text.push_str(&format!(" Join my server {invite}"));
        }

        if !self.features.is_empty() {
            text.push_str("\n\n**Features:**");
            for feature in &self.features {
                text.push_str(&format!("\n{} {feature}", client.config().emojis.success));
            }
        }
        text
    }
}

impl Command for AboutCommand {
    fn name(&self) -> &str {
        "about"
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn help(&self) -> &str {
        "shows info about the bot"
    }

    fn guild_only(&self) -> bool {
        false
    }

    fn execute(&self, event: CommandEvent) -> BotResult<()> {
        event.reply(self.render(&event));
        Ok(())
    }
}

/// `find <member|channel|voice|role> <query>`, answered from the guild's cached entities.
pub fn find_command() -> Arc<dyn Command> {
    let children: Vec<Arc<dyn Command>> = vec![
        lookup_command("member", "member", &["user"], |event, query| {
            let Some(guild) = event.guild_id() else { return Vec::new() };
            let members = event.chat().members(guild);
            find_members(query, &members).iter().map(|m| format!("**{}** ({})", m.effective_name(), m.id)).collect()
        }),
        lookup_command("channel", "channel", &["text"], |event, query| {
            let Some(guild) = event.guild_id() else { return Vec::new() };
            let channels = event.chat().text_channels(guild);
            find_text_channels(query, &channels).iter().map(|c| format!("<#{}>", c.id)).collect()
        }),
        lookup_command("voice", "voice channel", &[], |event, query| {
            let Some(guild) = event.guild_id() else { return Vec::new() };
            let channels = event.chat().voice_channels(guild);
            find_voice_channels(query, &channels).iter().map(|c| format!("**{}** ({})", c.name, c.id)).collect()
        }),
        lookup_command("role", "role", &[], |event, query| {
            let Some(guild) = event.guild_id() else { return Vec::new() };
            let roles = event.chat().roles(guild);
            find_roles(query, &roles).iter().map(|r| format!("**{}** ({})", r.name, r.id)).collect()
        }),
    ];

    Arc::new(
        FnCommand::new("find", "looks up a member, channel or role by name", |event: CommandEvent| {
            event.reply_warning(Replies::find_usage());
            Ok(())
        })
        .with_arguments("<member|channel|voice|role> <query>")
        .with_children(children),
    )
}

fn lookup_command<L>(name: &str, kind: &'static str, aliases: &[&str], lookup: L) -> Arc<dyn Command>
where
    L: Fn(&CommandEvent, &str) -> Vec<String> + Send + Sync + 'static,
{
    Arc::new(
        FnCommand::new(name, format!("finds a {kind}"), move |event: CommandEvent| {
            let query = event.args().trim();
            if query.is_empty() {
                event.reply_error(Replies::missing_query(kind));
                return Ok(());
            }

            let mut found = lookup(&event, query);
            if found.is_empty() {
                event.reply_warning(Replies::no_matches(kind, query));
                return Ok(());
            }

            found.truncate(MAX_LISTED);
            event.reply_success(Replies::matches(kind, query, &found));
            Ok(())
        })
        .with_aliases(aliases.iter().copied())
        .with_arguments(format!("<{kind}>")),
    )
}
