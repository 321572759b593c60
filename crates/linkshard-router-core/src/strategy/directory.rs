//! Directory Strategy for Shard Selection
//!
//! Routes by an explicit prefix -> shard table. The longest matching prefix
//! wins. Codes with no matching entry, and every code when no table is
//! configured, fall back to `HashStrategy`.

use std::collections::BTreeMap;
use tracing::trace;

use super::{HashStrategy, ShardStrategy};
use crate::types::ShardId;

/// Lookup-table routing strategy
#[derive(Debug, Clone, Default)]
pub struct DirectoryStrategy {
    table: BTreeMap<String, ShardId>,
    fallback: HashStrategy,
}

impl DirectoryStrategy {
    /// Strategy with no table (pure hash fallback)
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy backed by a prefix table
    pub fn with_table(table: BTreeMap<String, ShardId>) -> Self {
        Self {
            table,
            fallback: HashStrategy::new(),
        }
    }

    /// Longest prefix entry matching `code`
    fn lookup(&self, code: &str) -> Option<ShardId> {
        self.table
            .iter()
            .filter(|(prefix, _)| code.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, shard_id)| *shard_id)
    }
}

impl ShardStrategy for DirectoryStrategy {
    fn route(&self, code: &str, total_shards: u32) -> ShardId {
        match self.lookup(code) {
            Some(shard_id) if shard_id < total_shards => shard_id,
            _ => {
                trace!(code = %code, "No directory entry, using hash fallback");
                self.fallback.route(code, total_shards)
            }
        }
    }

    fn name(&self) -> &'static str {
        "Directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_table_matches_hash() {
        let directory = DirectoryStrategy::new();
        let hash = HashStrategy::new();

        for code in ["a", "abc", "hello", "xK9mP2", "Zz9"] {
            assert_eq!(directory.route(code, 3), hash.route(code, 3));
        }
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut table = BTreeMap::new();
        table.insert("a".to_string(), 1);
        table.insert("ab".to_string(), 2);
        let strategy = DirectoryStrategy::with_table(table);

        assert_eq!(strategy.route("a9", 3), 1);
        assert_eq!(strategy.route("abc", 3), 2);
    }

    #[test]
    fn test_unmatched_code_falls_back_to_hash() {
        let mut table = BTreeMap::new();
        table.insert("q".to_string(), 2);
        let strategy = DirectoryStrategy::with_table(table);

        assert_eq!(strategy.route("abc", 3), HashStrategy::new().route("abc", 3));
    }

    #[test]
    fn test_out_of_range_entry_falls_back_to_hash() {
        let mut table = BTreeMap::new();
        table.insert("a".to_string(), 7);
        let strategy = DirectoryStrategy::with_table(table);

        assert_eq!(strategy.route("abc", 3), 0);
    }
}
