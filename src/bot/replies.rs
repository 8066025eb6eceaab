pub struct Replies;

impl Replies {
    pub fn guild_only() -> String {
        "This command cannot be used in direct messages".to_string()
    }

    pub fn cooldown(remaining: u64, scope: &str) -> String {
        format!("That command is on cooldown for {remaining} more seconds{scope}!")
    }

    pub fn help_dm_blocked() -> String {
        "Help cannot be sent because you are blocking Direct Messages.".to_string()
    }

    pub fn help_header(bot_name: &str) -> String {
        format!("**{bot_name}** commands:\n")
    }

    pub fn help_category(name: Option<&str>) -> String {
        format!("\n\n  __{}__:\n", name.unwrap_or("No Category"))
    }

    pub fn help_contact(owner: &str, invite: Option<&str>) -> String {
        match invite {
            Some(invite) => format!("\n\nFor additional help, contact **{owner}** or join {invite}"),
            None => format!("\n\nFor additional help, contact **{owner}**"),
        }
    }

    pub fn find_usage() -> String {
        "Usage: find <member|channel|voice|role> <query>".to_string()
    }

    pub fn missing_query(kind: &str) -> String {
        format!("Please include a {kind} name or mention")
    }

    pub fn no_matches(kind: &str, query: &str) -> String {
        format!("No {kind}s found matching \"{query}\"")
    }

    pub fn matches(kind: &str, query: &str, found: &[String]) -> String {
        match found {
            [single] => format!("Found {kind} {single}"),
            _ => format!("Multiple {kind}s found matching \"{query}\":\n{}", found.join("\n")),
        }
    }

    pub fn pong() -> String {
        "Pong!".to_string()
    }
}
