//! Common types for the router module
//!
//! Centralizes type definitions to avoid duplication across modules.

use serde::{Deserialize, Serialize};

/// Shard identifier (numeric, 0-indexed)
pub use linkshard_types::ShardId;

/// Default number of shards when no configuration is supplied
pub const DEFAULT_SHARD_COUNT: u32 = 3;

/// Size of the alphabet the range strategy buckets over (0-9 + a-z)
pub const RANGE_ALPHABET_SIZE: u32 = 36;

/// Which algorithm maps a short code to a shard
///
/// Tags are lowercase strings on the wire. Unrecognized tags are kept as
/// `Other` so they can be logged; they route like `Hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ShardingStrategy {
    #[default]
    Hash,
    Range,
    Directory,
    Other(String),
}

impl From<String> for ShardingStrategy {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "hash" => Self::Hash,
            "range" => Self::Range,
            "directory" => Self::Directory,
            _ => Self::Other(tag),
        }
    }
}

impl From<ShardingStrategy> for String {
    fn from(strategy: ShardingStrategy) -> Self {
        strategy.to_string()
    }
}

impl std::fmt::Display for ShardingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShardingStrategy::Hash => write!(f, "hash"),
            ShardingStrategy::Range => write!(f, "range"),
            ShardingStrategy::Directory => write!(f, "directory"),
            ShardingStrategy::Other(tag) => write!(f, "{}", tag),
        }
    }
}
