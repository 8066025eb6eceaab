use once_cell::sync::Lazy;
use regex::Regex;

/// Longest message the platform accepts, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

static CUSTOM_EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"<a?:(.+):(\d+)>").expect("valid emoji pattern"));

/// Breaks `@everyone` and `@here` with a zero-width space so they never ping.
pub fn neutralize_mentions(text: &str) -> String {
    text.replace("@everyone", "@\u{200B}everyone")
        .replace("@here", "@\u{200B}here")
}

/// Splits text into chunks of at most [`MESSAGE_LIMIT`] characters, preferring
/// to break on a newline, then on a space. Mentions are neutralized first and
/// empty chunks are dropped.
pub fn split_message(text: &str) -> Vec<String> {
    let mut messages = Vec::new();
    let mut rest: Vec<char> = neutralize_mentions(text).trim().chars().collect();

    while rest.len() > MESSAGE_LIMIT {
        let leeway = MESSAGE_LIMIT - (rest.len() % MESSAGE_LIMIT);
        let window = &rest[..=MESSAGE_LIMIT];

        let mut index = last_index_of(window, '\n');
        if index.map_or(true, |i| i < leeway) {
            index = last_index_of(window, ' ');
        }
        let index = match index {
            Some(i) if i >= leeway => i,
            _ => MESSAGE_LIMIT,
        };

        let head: String = rest[..index].iter().collect();
        let head = head.trim();
        if !head.is_empty() {
            messages.push(head.to_string());
        }

        let tail: String = rest[index..].iter().collect();
        rest = tail.trim().chars().collect();
    }

    if !rest.is_empty() {
        messages.push(rest.into_iter().collect());
    }

    messages
}

fn last_index_of(chars: &[char], needle: char) -> Option<usize> {
    chars.iter().rposition(|c| *c == needle)
}

/// Custom emoji markup (`<:name:id>`, `<a:name:id>`) becomes the `name:id`
/// form reactions are added with. Anything else passes through unchanged.
pub fn normalize_reaction(emoji: &str) -> String {
    CUSTOM_EMOJI.replace_all(emoji, "$1:$2").into_owned()
}
