//! Error types for shard access and caching

use linkshard_router_core::{RouterError, ShardId};
use thiserror::Error;

/// Failure of a single shard store operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Short code already present in this shard
    #[error("Duplicate short code: {0}")]
    DuplicateCode(String),

    /// Store is closed or unreachable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Failure of a cache operation; never escapes `CacheLayer`
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

/// Errors surfaced by the registry and the cross-shard executor
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested shard is not configured; a deployment defect, never retried
    #[error("Configuration error: {0}")]
    Configuration(#[from] RouterError),

    /// A shard operation failed
    #[error("Shard {shard_id} failed: {source}")]
    Store {
        shard_id: ShardId,
        #[source]
        source: StoreError,
    },

    /// A shard did not answer within the configured fan-out timeout
    #[error("Shard {shard_id} timed out")]
    Timeout { shard_id: ShardId },
}

impl CoreError {
    /// Shard the failure is attributed to, if any
    pub fn shard_id(&self) -> Option<ShardId> {
        match self {
            CoreError::Configuration(RouterError::ShardNotFound(id)) => Some(*id),
            CoreError::Configuration(_) => None,
            CoreError::Store { shard_id, .. } | CoreError::Timeout { shard_id } => Some(*shard_id),
        }
    }
}
