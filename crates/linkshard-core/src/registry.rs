//! Shard registry - owns one lazily created connection handle per shard

use linkshard_router_core::{ShardConfig, ShardId, ShardingConfig};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{CoreError, StoreError};
use crate::store::{MemoryShardStore, ShardHandle};

/// Factory turning a shard definition into a connection handle
pub trait ShardConnector: Send + Sync {
    fn connect(&self, shard: &ShardConfig) -> Result<ShardHandle, StoreError>;
}

/// Target scheme served by `MemoryConnector`
pub const MEMORY_SCHEME: &str = "memory://";

/// Connector opening an in-process `MemoryShardStore` per shard
///
/// Only `memory://` targets are accepted; any other target is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryConnector;

impl ShardConnector for MemoryConnector {
    fn connect(&self, shard: &ShardConfig) -> Result<ShardHandle, StoreError> {
        if !shard.connection_target.starts_with(MEMORY_SCHEME) {
            return Err(StoreError::Unavailable(format!(
                "shard {} target '{}' is not a {} store",
                shard.id, shard.connection_target, MEMORY_SCHEME
            )));
        }
        Ok(Arc::new(MemoryShardStore::new(shard.connection_target.clone())))
    }
}

/// Registry of shard connection handles
///
/// First access to a shard creates its handle, later accesses reuse it.
/// Creation happens under the write lock with a re-check, so concurrent
/// first accesses establish exactly one handle per shard.
pub struct ShardRegistry {
    config: Arc<ShardingConfig>,
    connector: Arc<dyn ShardConnector>,
    handles: RwLock<HashMap<ShardId, ShardHandle>>,
}

impl ShardRegistry {
    /// Create a registry; no connection is opened until first use
    pub fn new(config: Arc<ShardingConfig>, connector: Arc<dyn ShardConnector>) -> Self {
        Self {
            config,
            connector,
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// Registry over in-process stores
    pub fn in_memory(config: ShardingConfig) -> Self {
        Self::new(Arc::new(config), Arc::new(MemoryConnector))
    }

    pub fn config(&self) -> &Arc<ShardingConfig> {
        &self.config
    }

    /// Get (or lazily create) the handle for a shard
    pub fn get_connection(&self, shard_id: ShardId) -> Result<ShardHandle, CoreError> {
        let shard = self.config.shard(shard_id)?;

        if let Some(handle) = self.handles.read().get(&shard_id) {
            return Ok(handle.clone());
        }

        let mut handles = self.handles.write();
        if let Some(handle) = handles.get(&shard_id) {
            return Ok(handle.clone());
        }

        let handle = self
            .connector
            .connect(shard)
            .map_err(|source| CoreError::Store { shard_id, source })?;

        info!(
            shard_id = shard_id,
            name = %shard.name,
            "Opened shard connection"
        );

        handles.insert(shard_id, handle.clone());
        Ok(handle)
    }

    /// Handles for every configured shard, keyed by id
    pub fn get_all(&self) -> Result<BTreeMap<ShardId, ShardHandle>, CoreError> {
        self.config
            .shard_ids()
            .map(|shard_id| self.get_connection(shard_id).map(|handle| (shard_id, handle)))
            .collect()
    }

    /// Open every shard up front so a bad target fails at startup
    pub fn connect_all(&self) -> Result<(), CoreError> {
        self.get_all().map(|handles| {
            info!(shards = handles.len(), "All shard connections opened");
        })
    }

    /// Close every cached handle and clear the cache
    pub async fn close_all(&self) {
        let drained: Vec<(ShardId, ShardHandle)> = self.handles.write().drain().collect();

        for (shard_id, handle) in drained {
            match handle.close().await {
                Ok(()) => debug!(shard_id = shard_id, "Shard connection closed"),
                Err(e) => {
                    warn!(shard_id = shard_id, error = %e, "Failed to close shard connection")
                }
            }
        }

        info!("All shard connections closed");
    }

    /// Number of handles currently cached
    pub fn connected_count(&self) -> usize {
        self.handles.read().len()
    }
}
