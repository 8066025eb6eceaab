use tracing::warn;

use crate::bot::{chat_event::chat_event::UserId, state::def::BotConfig};

/// True when the id is a non-negative 64-bit integer literal.
pub fn check_id(id: &str) -> bool {
    id.trim().parse::<i64>().is_ok_and(|id| id >= 0)
}

/// Logs every configured owner id that does not look like a snowflake. The
/// values are kept as they are and still compared as text.
pub fn warn_unsafe_owner_ids(config: &BotConfig) {
    if !check_id(&config.owner_id) {
        warn!(
            "The provided Owner ID ({}) was found unsafe! Make sure ID is a non-negative long!",
            config.owner_id
        );
    }

    for co_owner in &config.co_owner_ids {
        if !check_id(co_owner) {
            warn!(
                "The provided CoOwner ID ({}) was found unsafe! Make sure ID is a non-negative long!",
                co_owner
            );
        }
    }
}

pub fn is_owner(user: UserId, config: &BotConfig) -> bool {
    let id = user.to_string();
    config.owner_id == id || config.co_owner_ids.iter().any(|co_owner| *co_owner == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_non_negative_integers() {
        assert!(check_id("113156185389092864"));
        assert!(check_id(" 0 "));
        assert!(!check_id("-1"));
        assert!(!check_id("owner"));
        assert!(!check_id("18446744073709551615"));
        assert!(!check_id(""));
    }

    #[test]
    fn owner_and_co_owners_match() {
        let mut config = BotConfig::new("100");
        config.co_owner_ids = vec!["200".into(), "not-a-number".into()];
        assert!(is_owner(UserId(100), &config));
        assert!(is_owner(UserId(200), &config));
        assert!(!is_owner(UserId(300), &config));
    }
}
