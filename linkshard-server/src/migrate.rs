//! Shard migration
//!
//! Re-homes records from a single store into the shard their code routes
//! to. Records are inserted unchanged (id, timestamps and expiry kept).
//! A code already present in its home shard is skipped, so running a
//! migration twice is harmless.

use linkshard_core::{ShardRegistry, StoreError};
use linkshard_router_core::route;
use linkshard_types::UrlRecord;
use tracing::{info, warn};

/// Progress is logged every this many records
const PROGRESS_INTERVAL: usize = 100;

/// Outcome of a migration run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: u64,
    pub skipped: u64,
    pub errors: u64,
}

impl MigrationReport {
    pub fn total(&self) -> u64 {
        self.migrated + self.skipped + self.errors
    }
}

/// Insert `records` into their home shards, oldest first
///
/// Per-record failures are counted and logged; they never abort the run.
pub async fn migrate_records(
    mut records: Vec<UrlRecord>,
    registry: &ShardRegistry,
) -> MigrationReport {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let total = records.len();
    let mut report = MigrationReport::default();
    info!(records = total, "Starting shard migration");

    for (index, record) in records.into_iter().enumerate() {
        let shard_id = route(&record.short_code, registry.config());
        let code = record.short_code.clone();

        let outcome = match registry.get_connection(shard_id) {
            Ok(handle) => match handle.find_by_code(&code).await {
                Ok(Some(_)) => Ok(false),
                Ok(None) => handle.insert(record).await.map(|_| true),
                Err(e) => Err(e),
            },
            Err(e) => Err(StoreError::Unavailable(e.to_string())),
        };

        match outcome {
            Ok(true) => report.migrated += 1,
            Ok(false) => report.skipped += 1,
            Err(StoreError::DuplicateCode(_)) => report.skipped += 1,
            Err(e) => {
                report.errors += 1;
                warn!(
                    short_code = %code,
                    shard_id = shard_id,
                    error = %e,
                    "Failed to migrate record"
                );
            }
        }

        if (index + 1) % PROGRESS_INTERVAL == 0 {
            info!(processed = index + 1, total, "Migration progress");
        }
    }

    info!(
        migrated = report.migrated,
        skipped = report.skipped,
        errors = report.errors,
        "Shard migration finished"
    );

    report
}
