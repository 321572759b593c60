//! Shard definitions and the sharding configuration
//!
//! A `ShardingConfig` is loaded once per process and never mutated. Changing
//! `total_shards` or the strategy without migrating data re-homes every
//! existing code and breaks lookups.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RouterError;
use crate::types::{ShardId, ShardingStrategy, DEFAULT_SHARD_COUNT};

/// A single shard definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardConfig {
    /// Shard identifier
    pub id: ShardId,

    /// Human-readable name
    #[serde(default)]
    pub name: String,

    /// Opaque locator handed to the connector
    #[serde(rename = "databaseUrl", alias = "connectionTarget", default)]
    pub connection_target: String,

    /// Reserved for load-aware routing, not used by any strategy
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ShardConfig {
    /// Create a shard definition with weight 1
    pub fn new(id: ShardId, connection_target: impl Into<String>) -> Self {
        Self {
            id,
            name: format!("shard-{}", id),
            connection_target: connection_target.into(),
            weight: default_weight(),
        }
    }

    /// Set shard weight
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

/// Sharding configuration: shard set plus routing strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardingConfig {
    /// Total number of shards
    pub total_shards: u32,

    /// Shard definitions, ids `0..total_shards`
    pub shards: Vec<ShardConfig>,

    /// Active strategy
    #[serde(rename = "shardingStrategy", alias = "strategy", default)]
    pub strategy: ShardingStrategy,

    /// Prefix -> shard table for the directory strategy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<BTreeMap<String, ShardId>>,
}

impl ShardingConfig {
    /// Build `count` shards with targets from `target_for(id)`
    pub fn with_shards<F>(count: u32, strategy: ShardingStrategy, mut target_for: F) -> Self
    where
        F: FnMut(ShardId) -> String,
    {
        Self {
            total_shards: count,
            shards: (0..count).map(|id| ShardConfig::new(id, target_for(id))).collect(),
            strategy,
            directory: None,
        }
    }

    /// In-memory shard targets (`memory://shard-{id}`)
    pub fn in_memory(count: u32, strategy: ShardingStrategy) -> Self {
        Self::with_shards(count, strategy, |id| format!("memory://shard-{}", id))
    }

    /// Attach a directory table
    pub fn with_directory(mut self, directory: BTreeMap<String, ShardId>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Look up a shard definition by id
    pub fn shard(&self, shard_id: ShardId) -> Result<&ShardConfig, RouterError> {
        self.shards
            .iter()
            .find(|shard| shard.id == shard_id)
            .ok_or(RouterError::ShardNotFound(shard_id))
    }

    /// Whether an id is inside `[0, total_shards)`
    pub fn is_valid_shard_id(&self, shard_id: ShardId) -> bool {
        shard_id < self.total_shards
    }

    /// Shard ids in ascending order
    pub fn shard_ids(&self) -> impl Iterator<Item = ShardId> + '_ {
        self.shards.iter().map(|shard| shard.id)
    }

    /// Check the id invariant and the directory targets
    pub fn validate(&self) -> Result<(), RouterError> {
        if self.total_shards == 0 {
            return Err(RouterError::InvalidConfig(
                "total_shards must be at least 1".to_string(),
            ));
        }

        if self.shards.len() != self.total_shards as usize {
            return Err(RouterError::InvalidConfig(format!(
                "expected {} shard definitions, found {}",
                self.total_shards,
                self.shards.len()
            )));
        }

        let mut ids: Vec<ShardId> = self.shard_ids().collect();
        ids.sort_unstable();
        for (expected, id) in (0..self.total_shards).zip(ids) {
            if expected != id {
                return Err(RouterError::InvalidConfig(format!(
                    "shard ids must be exactly 0..{} without gaps or duplicates",
                    self.total_shards
                )));
            }
        }

        if let Some(directory) = &self.directory {
            for (prefix, shard_id) in directory {
                if !self.is_valid_shard_id(*shard_id) {
                    return Err(RouterError::InvalidConfig(format!(
                        "directory entry '{}' points at unknown shard {}",
                        prefix, shard_id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, RouterError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RouterError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self::in_memory(DEFAULT_SHARD_COUNT, ShardingStrategy::Hash)
    }
}
