//! Error types for the router module

use thiserror::Error;

use crate::types::ShardId;

/// Router error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// Sharding configuration violates its invariants
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Shard id is not part of the configuration
    #[error("Shard {0} not found in configuration")]
    ShardNotFound(ShardId),
}
