use crate::bot::chat_event::chat_event::UserId;

/// Prefix value meaning "mention the bot".
pub const DEFAULT_PREFIX: &str = "@mention";

#[derive(Debug, Clone, Copy)]
pub struct PrefixSet<'a> {
    pub primary: &'a str,
    pub alternate: Option<&'a str>,
}

impl PrefixSet<'_> {
    pub fn accepts_mention(&self) -> bool {
        self.primary == DEFAULT_PREFIX || self.alternate == Some(DEFAULT_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: String,
}

/// Resolves message text into an invocation. Checked in order, first match
/// wins: a mention of the bot (only with the mention prefix configured), the
/// primary prefix, the alternate prefix, then each guild prefix.
pub fn resolve(content: &str, self_id: Option<UserId>, prefixes: &PrefixSet<'_>, guild_prefixes: &[String]) -> Option<Invocation> {
    if prefixes.accepts_mention() {
        if let Some(rest) = self_id.and_then(|id| strip_mention(content, id)) {
            return Some(split_invocation(rest));
        }
    }

    if let Some(rest) = strip_prefix_ignore_case(content, prefixes.primary) {
        return Some(split_invocation(rest));
    }

    if let Some(rest) = prefixes.alternate.and_then(|alt| strip_prefix_ignore_case(content, alt)) {
        return Some(split_invocation(rest));
    }

    guild_prefixes
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(content, prefix))
        .map(split_invocation)
}

fn strip_mention(content: &str, self_id: UserId) -> Option<&str> {
    content
        .strip_prefix(&format!("<@{self_id}>"))
        .or_else(|| content.strip_prefix(&format!("<@!{self_id}>")))
}

fn strip_prefix_ignore_case<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }

    let mut chars = content.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }

    let end = chars.next().map_or(content.len(), |(i, _)| i);
    Some(&content[end..])
}

fn split_invocation(rest: &str) -> Invocation {
    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_string();
    let args = parts.next().unwrap_or("").trim_start().to_string();
    Invocation { name, args }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: UserId = UserId(123456789012345678);

    fn invocation(name: &str, args: &str) -> Option<Invocation> {
        Some(Invocation { name: name.to_string(), args: args.to_string() })
    }

    fn bang() -> PrefixSet<'static> {
        PrefixSet { primary: "!", alternate: None }
    }

    #[test]
    fn primary_prefix_splits_name_and_args() {
        assert_eq!(resolve("!p skyfall", Some(BOT), &bang(), &[]), invocation("p", "skyfall"));
        assert_eq!(resolve("!play   a  b ", Some(BOT), &bang(), &[]), invocation("play", "a  b"));
        assert_eq!(resolve("!skip", Some(BOT), &bang(), &[]), invocation("skip", ""));
        assert_eq!(resolve("!", Some(BOT), &bang(), &[]), invocation("", ""));
        assert_eq!(resolve("hello", Some(BOT), &bang(), &[]), None);
    }

    #[test]
    fn prefixes_match_ignoring_case() {
        let prefixes = PrefixSet { primary: "jm!", alternate: Some("Music ") };
        assert_eq!(resolve("JM!queue", Some(BOT), &prefixes, &[]), invocation("queue", ""));
        assert_eq!(resolve("music play x", Some(BOT), &prefixes, &[]), invocation("play", "x"));
    }

    #[test]
    fn mention_needs_the_mention_sentinel() {
        let text = format!("<@{BOT}> play song");
        assert_eq!(resolve(&text, Some(BOT), &bang(), &[]), None);

        let mention = PrefixSet { primary: DEFAULT_PREFIX, alternate: None };
        assert_eq!(resolve(&text, Some(BOT), &mention, &[]), invocation("play", "song"));
        let nick = format!("<@!{BOT}>skip");
        assert_eq!(resolve(&nick, Some(BOT), &mention, &[]), invocation("skip", ""));

        let alternate = PrefixSet { primary: "!", alternate: Some(DEFAULT_PREFIX) };
        assert_eq!(resolve(&text, Some(BOT), &alternate, &[]), invocation("play", "song"));
    }

    #[test]
    fn mention_of_someone_else_is_not_a_command() {
        let mention = PrefixSet { primary: DEFAULT_PREFIX, alternate: None };
        assert_eq!(resolve("<@1> play", Some(BOT), &mention, &[]), None);
        assert_eq!(resolve(&format!("<@{BOT}> play"), None, &mention, &[]), None);
    }

    #[test]
    fn mention_wins_over_a_prefix_that_also_matches() {
        let text = format!("<@{BOT}> play");
        let prefixes = PrefixSet { primary: DEFAULT_PREFIX, alternate: Some("<@") };
        assert_eq!(resolve(&text, Some(BOT), &prefixes, &[]), invocation("play", ""));

        let literal = PrefixSet { primary: "<@", alternate: None };
        assert_eq!(resolve(&text, Some(BOT), &literal, &[]), invocation(&format!("{BOT}>"), "play"));
    }

    #[test]
    fn primary_wins_over_guild_prefixes() {
        let guild = vec!["!!".to_string(), "?".to_string()];
        assert_eq!(resolve("!!stop", Some(BOT), &bang(), &guild), invocation("!stop", ""));
        assert_eq!(resolve("?stop", Some(BOT), &bang(), &guild), invocation("stop", ""));
    }

    #[test]
    fn guild_prefixes_are_tried_in_order() {
        let guild = vec!["dj".to_string(), "d".to_string()];
        let prefixes = PrefixSet { primary: "!", alternate: None };
        assert_eq!(resolve("djplay", Some(BOT), &prefixes, &guild), invocation("play", ""));
        assert_eq!(resolve("DPLAY", Some(BOT), &prefixes, &guild), invocation("PLAY", ""));
    }

    #[test]
    fn non_ascii_prefix_is_stripped_on_char_boundaries() {
        let prefixes = PrefixSet { primary: "é", alternate: None };
        assert_eq!(resolve("Éplay", Some(BOT), &prefixes, &[]), invocation("play", ""));
    }
}
