//! Range Strategy for Shard Selection
//!
//! Buckets codes by their first character over the 36-character space
//! `0-9a-z`, in contiguous runs of `ceil(36 / total_shards)` characters.
//!
//! Coverage gap: anything outside `[0-9a-z]`, uppercase letters included,
//! lands on shard 0. Codes are drawn from a 62-character alphabet, so
//! shard 0 receives every uppercase-led code.

use super::ShardStrategy;
use crate::types::{ShardId, RANGE_ALPHABET_SIZE};

/// First-character range routing strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeStrategy;

impl RangeStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Position of `c` in `0-9a-z`, if it is in that space
    fn alphabet_index(c: char) -> Option<u32> {
        match c {
            '0'..='9' => Some(c as u32 - '0' as u32),
            'a'..='z' => Some(c as u32 - 'a' as u32 + 10),
            _ => None,
        }
    }
}

impl ShardStrategy for RangeStrategy {
    fn route(&self, code: &str, total_shards: u32) -> ShardId {
        let total = total_shards.max(1);
        let per_shard = RANGE_ALPHABET_SIZE.div_ceil(total);

        match code.chars().next().and_then(Self::alphabet_index) {
            Some(index) => index / per_shard,
            None => 0,
        }
    }

    fn name(&self) -> &'static str {
        "Range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_buckets_three_shards() {
        let strategy = RangeStrategy::new();

        // 12 characters per shard: 0-9ab | c-n | o-z
        assert_eq!(strategy.route("0abc", 3), 0);
        assert_eq!(strategy.route("9", 3), 0);
        assert_eq!(strategy.route("b", 3), 0);
        assert_eq!(strategy.route("c", 3), 1);
        assert_eq!(strategy.route("n", 3), 1);
        assert_eq!(strategy.route("o", 3), 2);
        assert_eq!(strategy.route("z", 3), 2);
    }

    #[test]
    fn test_uppercase_always_routes_to_shard_zero() {
        let strategy = RangeStrategy::new();

        for c in 'A'..='Z' {
            let code = format!("{}x1", c);
            for total in 1..=8 {
                assert_eq!(strategy.route(&code, total), 0, "code {}", code);
            }
        }
    }

    #[test]
    fn test_out_of_alphabet_and_empty_route_to_zero() {
        let strategy = RangeStrategy::new();
        assert_eq!(strategy.route("", 3), 0);
        assert_eq!(strategy.route("-abc", 3), 0);
        assert_eq!(strategy.route("élan", 3), 0);
    }

    #[test]
    fn test_range_stays_in_bounds() {
        let strategy = RangeStrategy::new();
        let alphabet = "0123456789abcdefghijklmnopqrstuvwxyz";

        for total in 1..=40 {
            for c in alphabet.chars() {
                let shard = strategy.route(&c.to_string(), total);
                assert!(shard < total, "shard {} out of range for {}", shard, total);
            }
        }
    }
}
