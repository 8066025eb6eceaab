use std::{fmt, sync::Arc};

use crate::bot::{dispatcher::event::CommandEvent, replies::Replies, state::def::BotError};

pub type BotResult<T> = Result<T, BotError>;

pub type CategoryPredicate = Arc<dyn Fn(&CommandEvent) -> bool + Send + Sync>;

/// A named help group. A category may also gate every command in it.
#[derive(Clone)]
pub struct Category {
    name: String,
    predicate: Option<CategoryPredicate>,
    failure_response: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), predicate: None, failure_response: None }
    }

    pub fn with_predicate<P>(name: impl Into<String>, failure_response: Option<String>, predicate: P) -> Self
    where
        P: Fn(&CommandEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Some(Arc::new(predicate)),
            failure_response,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_response(&self) -> Option<&str> {
        self.failure_response.as_deref()
    }

    pub fn test(&self, event: &CommandEvent) -> bool {
        self.predicate.as_ref().map_or(true, |predicate| predicate(event))
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category").field("name", &self.name).finish()
    }
}

/// Who shares a cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownScope {
    #[default]
    User,
    Channel,
    UserChannel,
    /// Falls back to the channel in direct messages.
    Guild,
    /// Falls back to user and channel in direct messages.
    UserGuild,
    Global,
}

impl CooldownScope {
    pub fn key(&self, name: &str, event: &CommandEvent) -> String {
        let user = event.author().id;
        let channel = event.channel_id();
        match (self, event.guild_id()) {
            (CooldownScope::User, _) => format!("{name}|U:{user}"),
            (CooldownScope::Channel, _) | (CooldownScope::Guild, None) => format!("{name}|C:{channel}"),
            (CooldownScope::UserChannel, _) | (CooldownScope::UserGuild, None) => format!("{name}|U:{user}|C:{channel}"),
            (CooldownScope::Guild, Some(guild)) => format!("{name}|G:{guild}"),
            (CooldownScope::UserGuild, Some(guild)) => format!("{name}|U:{user}|G:{guild}"),
            (CooldownScope::Global, _) => format!("{name}|global"),
        }
    }

    pub fn error_specification(&self, event: &CommandEvent) -> &'static str {
        match (self, event.is_from_guild()) {
            (CooldownScope::User, _) => "",
            (CooldownScope::Channel | CooldownScope::UserChannel, _) => " in this channel",
            (CooldownScope::Guild | CooldownScope::UserGuild, true) => " in this server",
            (CooldownScope::Guild | CooldownScope::UserGuild, false) => " in this channel",
            (CooldownScope::Global, _) => " globally",
        }
    }
}

/// How a command invocation ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Terminated,
}

pub trait Command: Send + Sync {
    fn name(&self) -> &str;
    fn aliases(&self) -> &[String] { &[] }
    fn help(&self) -> &str { "no help available" }
    fn arguments(&self) -> Option<&str> { None }
    fn category(&self) -> Option<&Category> { None }
    fn hidden(&self) -> bool { false }
    fn owner_only(&self) -> bool { false }
    fn guild_only(&self) -> bool { true }
    fn cooldown(&self) -> u64 { 0 }
    fn cooldown_scope(&self) -> CooldownScope { CooldownScope::User }
    fn children(&self) -> &[Arc<dyn Command>] { &[] }

    fn execute(&self, event: CommandEvent) -> BotResult<()>;

    /// Entry point used by the dispatcher. Delegates to a matching child, then
    /// applies the category gate, owner-only and guild-only checks and the
    /// cooldown before calling [`Command::execute`]. Owners skip cooldowns.
    fn run(&self, event: CommandEvent) -> BotResult<RunOutcome> {
        if let Some((child, rest)) = self.find_child(event.args()) {
            return child.run(event.with_args(rest));
        }

        if let Some(category) = self.category() {
            if !category.test(&event) {
                if let Some(response) = category.failure_response() {
                    event.reply_error(response);
                }
                return Ok(RunOutcome::Terminated);
            }
        }

        if self.owner_only() && !event.is_owner() {
            return Ok(RunOutcome::Terminated);
        }

        if self.guild_only() && !event.is_from_guild() {
            event.reply_error(Replies::guild_only());
            return Ok(RunOutcome::Terminated);
        }

        if self.cooldown() > 0 && !event.is_owner() {
            let scope = self.cooldown_scope();
            let key = scope.key(self.name(), &event);
            let remaining = event.client().try_cooldown(key, self.cooldown());
            if remaining > 0 {
                event.reply_error(Replies::cooldown(remaining, scope.error_specification(&event)));
                return Ok(RunOutcome::Terminated);
            }
        }

        self.execute(event)?;
        Ok(RunOutcome::Completed)
    }

    fn is_command_for(&self, input: &str) -> bool {
        let input = input.to_lowercase();
        self.name().to_lowercase() == input || self.aliases().iter().any(|alias| alias.to_lowercase() == input)
    }

    /// Picks the child named by the first word of `args`, returning it with the
    /// remaining arguments.
    fn find_child(&self, args: &str) -> Option<(Arc<dyn Command>, String)> {
        let children = self.children();
        if children.is_empty() {
            return None;
        }

        let mut parts = args.trim().splitn(2, char::is_whitespace);
        let name = parts.next().filter(|name| !name.is_empty())?;
        let rest = parts.next().unwrap_or("").trim_start().to_string();

        children.iter().find(|child| child.is_command_for(name)).map(|child| (Arc::clone(child), rest))
    }
}

/// A command backed by a closure, configured through builder methods.
pub struct FnCommand<F> {
    func: F,
    name: String,
    help: String,
    arguments: Option<String>,
    aliases: Vec<String>,
    category: Option<Category>,
    hidden: bool,
    owner_only: bool,
    guild_only: bool,
    cooldown: u64,
    cooldown_scope: CooldownScope,
    children: Vec<Arc<dyn Command>>,
}

impl<F> FnCommand<F>
where
    F: Fn(CommandEvent) -> BotResult<()> + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, help: impl Into<String>, func: F) -> Self {
        Self {
            func,
            name: name.into(),
            help: help.into(),
            arguments: None,
            aliases: Vec::new(),
            category: None,
            hidden: false,
            owner_only: false,
            guild_only: true,
            cooldown: 0,
            cooldown_scope: CooldownScope::User,
            children: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }

    pub fn with_guild_only(mut self, guild_only: bool) -> Self {
        self.guild_only = guild_only;
        self
    }

    pub fn with_cooldown(mut self, seconds: u64, scope: CooldownScope) -> Self {
        self.cooldown = seconds;
        self.cooldown_scope = scope;
        self
    }

    pub fn with_children(mut self, children: Vec<Arc<dyn Command>>) -> Self {
        self.children = children;
        self
    }
}

impl<F> Command for FnCommand<F>
where
    F: Fn(CommandEvent) -> BotResult<()> + Send + Sync + 'static,
{
    fn name(&self) -> &str { &self.name }
    fn aliases(&self) -> &[String] { &self.aliases }
    fn help(&self) -> &str { &self.help }
    fn arguments(&self) -> Option<&str> { self.arguments.as_deref() }
    fn category(&self) -> Option<&Category> { self.category.as_ref() }
    fn hidden(&self) -> bool { self.hidden }
    fn owner_only(&self) -> bool { self.owner_only }
    fn guild_only(&self) -> bool { self.guild_only }
    fn cooldown(&self) -> u64 { self.cooldown }
    fn cooldown_scope(&self) -> CooldownScope { self.cooldown_scope }
    fn children(&self) -> &[Arc<dyn Command>] { &self.children }

    fn execute(&self, event: CommandEvent) -> BotResult<()> {
        (self.func)(event)
    }
}
