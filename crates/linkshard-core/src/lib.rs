//! linkshard Core - shard access shared by the service and its tools
//!
//! This crate provides the shard store interface, the connection registry,
//! the cross-shard executor, the cache layer, short-code utilities and the
//! service configuration.

pub mod cache;
pub mod config;
pub mod error;
pub mod executor;
pub mod registry;
pub mod shortcode;
pub mod store;

pub use cache::{
    CacheLayer, CacheStats, CacheStatsSnapshot, CacheStore, MemoryCache, NoopCache, RedisCache,
    CACHE_TTL,
};
pub use config::ServiceConfig;
pub use error::{CacheError, CoreError, StoreError};
pub use executor::{ExecutorConfig, ShardExecutor};
pub use registry::{MemoryConnector, ShardConnector, ShardRegistry, MEMORY_SCHEME};
pub use store::{MemoryShardStore, ShardHandle, ShardStore};
