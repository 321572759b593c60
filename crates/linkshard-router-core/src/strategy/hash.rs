//! Hash Strategy for Shard Selection
//!
//! `hash = hash * 31 + unit` over the code's UTF-16 code units, wrapped to a
//! signed 32-bit integer, then `|hash| % total_shards`. Other implementations
//! sharing the same shards must reproduce this bit for bit, including the
//! `i32::MIN` case whose absolute value is `2^31`.

use super::ShardStrategy;
use crate::types::ShardId;

/// Polynomial hash routing strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct HashStrategy;

/// Signed 32-bit polynomial hash of a short code
pub fn hash_code(code: &str) -> i32 {
    code.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

impl HashStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ShardStrategy for HashStrategy {
    fn route(&self, code: &str, total_shards: u32) -> ShardId {
        let total = total_shards.max(1);
        (hash_code(code).unsigned_abs() % total) as ShardId
    }

    fn name(&self) -> &'static str {
        "Hash"
    }
}
