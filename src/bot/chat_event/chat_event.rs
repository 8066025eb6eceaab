use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
            pub struct $name(pub u64);

            impl $name {
                pub fn get(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl FromStr for $name {
                type Err = std::num::ParseIntError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    s.trim().parse().map($name)
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    $name(id)
                }
            }
        )+
    };
}

snowflake!(UserId, ChannelId, GuildId, MessageId);

/// Where a message was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Guild(GuildId),
    Direct,
}

#[derive(Debug, Clone)]
pub struct ChatUser {
    pub id: UserId,
    pub name: String,
    pub bot: bool,
}

/// A message as delivered by the platform, before any parsing.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    pub origin: Origin,
    pub author: ChatUser,
    pub content: String,
}

impl ChatEvent {
    pub fn guild_id(&self) -> Option<GuildId> {
        match self.origin {
            Origin::Guild(id) => Some(id),
            Origin::Direct => None,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.origin == Origin::Direct
    }
}

/// The account the bot is logged in as, known once the platform reports ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfUser {
    pub id: UserId,
    pub name: String,
}

#[derive(Debug, Clone)]
pub enum InboundEvent {
    Message(ChatEvent),
    MessageWithdrawn {
        channel_id: ChannelId,
        message_id: MessageId,
        guild_id: Option<GuildId>,
    },
}
