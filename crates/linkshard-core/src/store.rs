//! Shard store interface
//!
//! The operations the routing core needs from one shard. Each shard is an
//! independent store; the short code is unique inside a shard only.

use async_trait::async_trait;
use linkshard_types::UrlRecord;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;

/// Connection handle to one shard, shared by every caller
pub type ShardHandle = Arc<dyn ShardStore>;

/// Operations a shard store must provide
#[async_trait]
pub trait ShardStore: Send + Sync {
    /// Insert a new record; fails with `DuplicateCode` if the code exists
    async fn insert(&self, record: UrlRecord) -> Result<UrlRecord, StoreError>;

    /// Find a record by its short code
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Find the first record with this original URL
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError>;

    /// Number of records in this shard
    async fn count(&self) -> Result<u64, StoreError>;

    /// Every record in this shard
    async fn list_summaries(&self) -> Result<Vec<UrlRecord>, StoreError>;

    /// Release the underlying connection
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryTable {
    /// Records in insertion order
    rows: Vec<UrlRecord>,
    /// Short code -> row position
    by_code: HashMap<String, usize>,
}

/// In-process shard store
#[derive(Debug)]
pub struct MemoryShardStore {
    target: String,
    table: RwLock<MemoryTable>,
    closed: AtomicBool,
}

impl MemoryShardStore {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            table: RwLock::new(MemoryTable::default()),
            closed: AtomicBool::new(false),
        }
    }

    /// Connection target this store was opened with
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Unavailable(format!("{} is closed", self.target)));
        }
        Ok(())
    }
}

#[async_trait]
impl ShardStore for MemoryShardStore {
    async fn insert(&self, record: UrlRecord) -> Result<UrlRecord, StoreError> {
        self.ensure_open()?;
        let mut table = self.table.write();

        if table.by_code.contains_key(&record.short_code) {
            return Err(StoreError::DuplicateCode(record.short_code));
        }

        let position = table.rows.len();
        table.by_code.insert(record.short_code.clone(), position);
        table.rows.push(record.clone());

        debug!(
            target_store = %self.target,
            short_code = %record.short_code,
            rows = table.rows.len(),
            "Record inserted"
        );

        Ok(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.ensure_open()?;
        let table = self.table.read();
        Ok(table.by_code.get(code).map(|&pos| table.rows[pos].clone()))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError> {
        self.ensure_open()?;
        let table = self.table.read();
        Ok(table
            .rows
            .iter()
            .find(|row| row.original_url == original_url)
            .cloned())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_open()?;
        Ok(self.table.read().rows.len() as u64)
    }

    async fn list_summaries(&self) -> Result<Vec<UrlRecord>, StoreError> {
        self.ensure_open()?;
        Ok(self.table.read().rows.clone())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        debug!(target_store = %self.target, "Store closed");
        Ok(())
    }
}
