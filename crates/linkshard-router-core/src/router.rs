//! Shard Router
//!
//! Dispatches a short code to a shard according to the configured
//! `ShardingStrategy` tag, one handler per variant.
//!
//! # Routing Decision Tree
//!
//! ```text
//! Short code arrives
//!        │
//!        ▼
//! strategy tag ──hash──────────► HashStrategy
//!        │
//!        ├──range─────────────► RangeStrategy
//!        │
//!        ├──directory─────────► DirectoryStrategy ──(no entry)──► HashStrategy
//!        │
//!        └──unrecognized──────► HashStrategy
//! ```

use tracing::{trace, warn};

use crate::shard::ShardingConfig;
use crate::strategy::{DirectoryStrategy, HashStrategy, RangeStrategy, ShardStrategy};
use crate::types::{ShardId, ShardingStrategy};

/// Route a short code under `config`
///
/// Pure and deterministic: no state, no I/O. The result is always in
/// `[0, config.total_shards)`.
pub fn route(code: &str, config: &ShardingConfig) -> ShardId {
    let total = config.total_shards;
    match &config.strategy {
        ShardingStrategy::Hash => HashStrategy.route(code, total),
        ShardingStrategy::Range => RangeStrategy.route(code, total),
        ShardingStrategy::Directory => match &config.directory {
            Some(table) => DirectoryStrategy::with_table(table.clone()).route(code, total),
            None => HashStrategy.route(code, total),
        },
        ShardingStrategy::Other(_) => HashStrategy.route(code, total),
    }
}

/// Router bound to one configuration
///
/// Resolves the strategy tag once so the directory table is not rebuilt on
/// every call.
pub struct ShardRouter {
    total_shards: u32,
    strategy: Box<dyn ShardStrategy>,
}

impl ShardRouter {
    /// Build a router for `config`
    pub fn from_config(config: &ShardingConfig) -> Self {
        let strategy: Box<dyn ShardStrategy> = match &config.strategy {
            ShardingStrategy::Hash => Box::new(HashStrategy::new()),
            ShardingStrategy::Range => Box::new(RangeStrategy::new()),
            ShardingStrategy::Directory => match &config.directory {
                Some(table) => Box::new(DirectoryStrategy::with_table(table.clone())),
                None => Box::new(DirectoryStrategy::new()),
            },
            ShardingStrategy::Other(tag) => {
                warn!(strategy = %tag, "Unknown sharding strategy, falling back to hash");
                Box::new(HashStrategy::new())
            }
        };

        Self {
            total_shards: config.total_shards,
            strategy,
        }
    }

    /// Route a short code to its home shard
    pub fn route(&self, code: &str) -> ShardId {
        let shard_id = self.strategy.route(code, self.total_shards);
        trace!(
            code = %code,
            shard_id = shard_id,
            strategy = self.strategy.name(),
            "Routed short code"
        );
        shard_id
    }

    /// Name of the active strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn total_shards(&self) -> u32 {
        self.total_shards
    }
}

impl Default for ShardRouter {
    fn default() -> Self {
        Self::from_config(&ShardingConfig::default())
    }
}
