pub mod cooldowns;
pub mod linked_cache;
