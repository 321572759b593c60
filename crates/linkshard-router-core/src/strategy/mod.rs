//! Routing Strategies
//!
//! This module contains the shard selection strategies:
//!
//! - `HashStrategy`: 32-bit polynomial hash of the code, modulo shard count
//! - `RangeStrategy`: buckets by the code's first character
//! - `DirectoryStrategy`: explicit prefix table, hash fallback
//!
//! # Strategy Hierarchy
//!
//! ```text
//! Short code
//!     │
//!     ▼
//! ┌─────────────────────────┐
//! │      ShardRouter        │  (dispatch on ShardingStrategy tag)
//! └───────────┬─────────────┘
//!             │
//!     ┌───────┼────────┐
//!     ▼       ▼        ▼
//!   Hash    Range   Directory ──(no entry)──► Hash
//! ```

mod directory;
mod hash;
mod range;

pub use directory::DirectoryStrategy;
pub use hash::{hash_code, HashStrategy};
pub use range::RangeStrategy;

use crate::types::ShardId;

/// Trait for shard selection strategies
///
/// Implementations are pure: same code and shard count, same shard.
pub trait ShardStrategy: Send + Sync {
    /// Route a short code to a shard in `[0, total_shards)`
    fn route(&self, code: &str, total_shards: u32) -> ShardId;

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}
