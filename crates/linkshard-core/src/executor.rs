//! Cross-shard executor
//!
//! Runs one operation against every configured shard concurrently and
//! collects the results keyed by shard id. All-or-nothing: if any shard
//! fails, the whole call fails and no partial result is returned. Callers
//! that want partial results must absorb failures inside the operation.

use futures::future::try_join_all;
use linkshard_router_core::ShardId;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{CoreError, StoreError};
use crate::registry::ShardRegistry;
use crate::store::ShardHandle;

/// Fan-out settings
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutorConfig {
    /// Per-shard deadline; `None` waits indefinitely
    pub shard_timeout: Option<Duration>,
}

impl ExecutorConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            shard_timeout: Some(timeout),
        }
    }
}

/// Executes operations across all shards of a registry
pub struct ShardExecutor {
    registry: Arc<ShardRegistry>,
    config: ExecutorConfig,
}

impl ShardExecutor {
    pub fn new(registry: Arc<ShardRegistry>, config: ExecutorConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<ShardRegistry> {
        &self.registry
    }

    /// Run `operation` on every shard and wait for all of them
    ///
    /// Shards complete in no particular order; the map is assembled once
    /// every shard has answered.
    pub async fn run_on_all<T, F, Fut>(
        &self,
        operation: F,
    ) -> Result<BTreeMap<ShardId, T>, CoreError>
    where
        F: Fn(ShardHandle, ShardId) -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let handles = self.registry.get_all()?;
        let shard_count = handles.len();
        let timeout = self.config.shard_timeout;

        let tasks = handles
            .into_iter()
            .map(|(shard_id, handle)| run_one(shard_id, operation(handle, shard_id), timeout));

        let results = try_join_all(tasks).await?;
        debug!(shards = shard_count, "Fan-out completed");

        Ok(results.into_iter().collect())
    }
}

/// Await one shard, applying the optional deadline
async fn run_one<T, Fut>(
    shard_id: ShardId,
    pending: Fut,
    timeout: Option<Duration>,
) -> Result<(ShardId, T), CoreError>
where
    Fut: Future<Output = Result<T, StoreError>>,
{
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, pending).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let timeout_ms = limit.as_millis() as u64;
                warn!(shard_id = shard_id, timeout_ms, "Shard timed out");
                return Err(CoreError::Timeout { shard_id });
            }
        },
        None => pending.await,
    };

    outcome.map(|value| (shard_id, value)).map_err(|source| {
        warn!(shard_id = shard_id, error = %source, "Shard operation failed");
        CoreError::Store { shard_id, source }
    })
}
