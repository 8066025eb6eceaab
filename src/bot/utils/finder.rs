//! Fuzzy lookup of guild entities from free-form command arguments.
//!
//! A query is first tried as an explicit reference (a mention, a raw id, or
//! for members a `name#1234` tag). Otherwise names are matched in four tiers:
//! exact, case-insensitive, prefix, substring. Only the best non-empty tier is
//! returned.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bot::chat_event::chat_event::{ChannelId, UserId};

static DISCORD_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{17,20}$").expect("valid id pattern"));
static FULL_USER_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S.{0,30}\S)\s*#(\d{4})$").expect("valid tag pattern"));
static USER_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@!?(\d{17,20})>$").expect("valid mention pattern"));
static CHANNEL_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<#(\d{17,20})>$").expect("valid channel pattern"));
static ROLE_MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@&(\d{17,20})>$").expect("valid role pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: UserId,
    pub name: String,
    pub discriminator: String,
    pub nickname: Option<String>,
}

impl Member {
    pub fn effective_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedChannel {
    pub id: ChannelId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: u64,
    pub name: String,
}

fn captured_id(pattern: &Regex, query: &str) -> Option<u64> {
    pattern.captures(query)?.get(1)?.as_str().parse().ok()
}

fn raw_id(query: &str) -> Option<u64> {
    if DISCORD_ID.is_match(query) {
        query.parse().ok()
    } else {
        None
    }
}

pub fn find_members<'a>(query: &str, members: &'a [Member]) -> Vec<&'a Member> {
    if let Some(id) = captured_id(&USER_MENTION, query) {
        if let Some(member) = members.iter().find(|m| m.id.get() == id) {
            return vec![member];
        }
    } else if let Some(caps) = FULL_USER_REF.captures(query) {
        let name = caps[1].to_lowercase();
        let discriminator = &caps[2];
        let tagged: Vec<&Member> = members
            .iter()
            .filter(|m| m.name.to_lowercase() == name && m.discriminator == discriminator)
            .collect();
        if !tagged.is_empty() {
            return tagged;
        }
    } else if let Some(id) = raw_id(query) {
        if let Some(member) = members.iter().find(|m| m.id.get() == id) {
            return vec![member];
        }
    }

    tiered_search(query, members, |m| vec![m.name.as_str(), m.effective_name()])
}

pub fn find_text_channels<'a>(query: &str, channels: &'a [NamedChannel]) -> Vec<&'a NamedChannel> {
    if let Some(id) = captured_id(&CHANNEL_MENTION, query).or_else(|| raw_id(query)) {
        if let Some(channel) = channels.iter().find(|c| c.id.get() == id) {
            return vec![channel];
        }
    }
    tiered_search(query, channels, |c| vec![c.name.as_str()])
}

pub fn find_voice_channels<'a>(query: &str, channels: &'a [NamedChannel]) -> Vec<&'a NamedChannel> {
    if let Some(id) = raw_id(query) {
        if let Some(channel) = channels.iter().find(|c| c.id.get() == id) {
            return vec![channel];
        }
    }
    tiered_search(query, channels, |c| vec![c.name.as_str()])
}

pub fn find_roles<'a>(query: &str, roles: &'a [Role]) -> Vec<&'a Role> {
    if let Some(id) = captured_id(&ROLE_MENTION, query).or_else(|| raw_id(query)) {
        if let Some(role) = roles.iter().find(|r| r.id == id) {
            return vec![role];
        }
    }
    tiered_search(query, roles, |r| vec![r.name.as_str()])
}

fn tiered_search<'a, T, F>(query: &str, items: &'a [T], names: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Vec<&str>,
{
    let lower_query = query.to_lowercase();
    let mut exact = Vec::new();
    let mut wrong_case = Vec::new();
    let mut starts_with = Vec::new();
    let mut contains = Vec::new();

    for item in items {
        let names = names(item);
        let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

        if names.iter().any(|n| *n == query) {
            exact.push(item);
        } else if exact.is_empty() && lowered.iter().any(|n| *n == lower_query) {
            wrong_case.push(item);
        } else if wrong_case.is_empty() && lowered.iter().any(|n| n.starts_with(&lower_query)) {
            starts_with.push(item);
        } else if starts_with.is_empty() && lowered.iter().any(|n| n.contains(&lower_query)) {
            contains.push(item);
        }
    }

    [exact, wrong_case, starts_with, contains]
        .into_iter()
        .find(|tier| !tier.is_empty())
        .unwrap_or_default()
}
