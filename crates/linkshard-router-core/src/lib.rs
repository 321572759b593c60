//! linkshard Router - Shard Selection Module
//!
//! Maps short codes to shards.
//!
//! # Architecture
//!
//! ```text
//! Short code
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │      ShardRouter        │  Decides: which strategy?
//! │  (ShardingConfig tag)   │
//! └───────────┬─────────────┘
//!             │
//!             ▼
//! ┌─────────────────────────┐
//! │     ShardStrategy       │  Decides: which shard?
//! │  (hash/range/directory) │
//! └─────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use linkshard_router_core::{route, ShardingConfig, ShardingStrategy};
//!
//! let config = ShardingConfig::in_memory(3, ShardingStrategy::Hash);
//! let shard = route("abc", &config);
//! assert!(shard < 3);
//! ```

// Core modules
mod error;
mod types;
mod shard;

// Strategy module (contains all routing strategies)
mod strategy;

// Router
mod router;

// Re-exports: Error types
pub use error::RouterError;

// Re-exports: Core types
pub use types::{ShardId, ShardingStrategy, DEFAULT_SHARD_COUNT, RANGE_ALPHABET_SIZE};

// Re-exports: Shard configuration
pub use shard::{ShardConfig, ShardingConfig};

// Re-exports: Strategy trait and implementations
pub use strategy::{hash_code, DirectoryStrategy, HashStrategy, RangeStrategy, ShardStrategy};

// Re-exports: Router
pub use router::{route, ShardRouter};
