//! Configuration module for the linkshard service

use linkshard_router_core::{RouterError, ShardingConfig, ShardingStrategy, DEFAULT_SHARD_COUNT};
use std::time::Duration;
use tracing::warn;

use crate::executor::ExecutorConfig;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Listen address
    pub listen_addr: String,

    /// Listen port
    pub port: u16,

    /// Public prefix of every short URL
    pub base_url: String,

    /// Cache endpoint; `None` runs without cache
    pub redis_url: Option<String>,

    /// Shard set and routing strategy
    pub sharding: ShardingConfig,

    /// Per-shard fan-out deadline
    pub shard_timeout: Option<Duration>,

    /// Answer cross-origin requests from any origin
    pub enable_cors: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let port = 3000;
        Self {
            listen_addr: "0.0.0.0".to_string(),
            port,
            base_url: format!("http://localhost:{}", port),
            redis_url: None,
            sharding: ShardingConfig::default(),
            shard_timeout: None,
            enable_cors: true,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, RouterError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RouterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServiceConfig::default();

        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => config.port = port,
                Err(_) => warn!(value = %port, "Ignoring unparsable PORT"),
            }
        }

        config.base_url = lookup("BASE_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", config.port));

        config.redis_url = lookup("REDIS_URL").filter(|url| !url.is_empty());

        // Explicit JSON wins over per-shard targets
        config.sharding = match lookup("SHARDING_CONFIG") {
            Some(json) => ShardingConfig::from_json(&json)?,
            None => ShardingConfig::with_shards(DEFAULT_SHARD_COUNT, ShardingStrategy::Hash, |id| {
                lookup(&format!("DATABASE_URL_SHARD_{}", id))
                    .unwrap_or_else(|| format!("memory://shard-{}", id))
            }),
        };

        if let Some(ms) = lookup("SHARD_TIMEOUT_MS") {
            match ms.parse::<u64>() {
                Ok(ms) if ms > 0 => config.shard_timeout = Some(Duration::from_millis(ms)),
                _ => warn!(value = %ms, "Ignoring invalid SHARD_TIMEOUT_MS"),
            }
        }

        if let Some(flag) = lookup("ENABLE_CORS") {
            match flag.trim().parse() {
                Ok(enabled) => config.enable_cors = enabled,
                Err(_) => warn!(value = %flag, "Ignoring invalid ENABLE_CORS"),
            }
        }

        Ok(config)
    }

    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            shard_timeout: self.shard_timeout,
        }
    }
}
