//! Cache layer
//!
//! A best-effort cache in front of the shards:
//!
//! - `url:{code}` -> original URL
//! - `urls:page:{page}:limit:{limit}` -> JSON listing snapshot
//!
//! Every entry expires after `CACHE_TTL`. The store stays the source of
//! truth. `CacheLayer` swallows every backend failure, so an unreachable or
//! absent cache behaves like a permanent miss.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use linkshard_types::UrlPage;
use parking_lot::RwLock;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::CacheError;

/// Lifetime of every cache entry
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Glob matching every listing snapshot
pub const PAGE_KEY_PATTERN: &str = "urls:page:*";

pub fn url_key(code: &str) -> String {
    format!("url:{}", code)
}

pub fn page_key(page: u32, limit: u32) -> String {
    format!("urls:page:{}:limit:{}", page, limit)
}

/// Capability interface of a key-value cache backend
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete keys matching a glob; returns how many were removed
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Cache that stores nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_pattern(&self, _pattern: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "Noop"
    }
}

/// In-process cache; expired entries are evicted on read and swept on write
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, DateTime<Utc>)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Glob match supporting a single trailing `*`
    fn matches(pattern: &str, key: &str) -> bool {
        match pattern.strip_suffix('*') {
            Some(prefix) => key.starts_with(prefix),
            None => key == pattern,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();
        match self.entries.read().get(key) {
            None => return Ok(None),
            Some((value, expires_at)) if *expires_at > now => return Ok(Some(value.clone())),
            Some(_) => {}
        }

        // Expired: evict unless rewritten in between
        let mut entries = self.entries.write();
        if entries.get(key).is_some_and(|(_, expires_at)| *expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let ttl =
            chrono::Duration::from_std(ttl).map_err(|e| CacheError::Backend(e.to_string()))?;
        let now = Utc::now();

        let mut entries = self.entries.write();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !Self::matches(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    fn name(&self) -> &'static str {
        "Memory"
    }
}

/// Redis-backed cache over a multiplexed connection
#[derive(Clone)]
pub struct RedisCache {
    conn: redis::aio::MultiplexedConnection,
}

impl RedisCache {
    /// Open a connection to `url` (e.g. `redis://127.0.0.1:6379`)
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let removed: u64 = conn.del(keys).await?;
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "Redis"
    }
}

/// Hit/miss counters
#[derive(Debug, Default)]
pub struct CacheStats {
    url_hits: AtomicU64,
    url_misses: AtomicU64,
    page_hits: AtomicU64,
    page_misses: AtomicU64,
}

/// Point-in-time copy of `CacheStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub url_hits: u64,
    pub url_misses: u64,
    pub page_hits: u64,
    pub page_misses: u64,
}

impl CacheStats {
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            url_hits: self.url_hits.load(Ordering::Relaxed),
            url_misses: self.url_misses.load(Ordering::Relaxed),
            page_hits: self.page_hits.load(Ordering::Relaxed),
            page_misses: self.page_misses.load(Ordering::Relaxed),
        }
    }

    fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Best-effort cache operations used by the mapping service
pub struct CacheLayer {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    stats: CacheStats,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            ttl: CACHE_TTL,
            stats: CacheStats::default(),
        }
    }

    /// Layer that never caches
    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCache))
    }

    /// Layer over an in-process cache
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    /// Redis when `redis_url` is set and reachable, otherwise disabled
    pub async fn connect(redis_url: Option<&str>) -> Self {
        let Some(url) = redis_url else {
            info!("Redis URL not provided, running without cache");
            return Self::disabled();
        };

        match RedisCache::connect(url).await {
            Ok(cache) => {
                info!("Connected to Redis");
                Self::new(Arc::new(cache))
            }
            Err(e) => {
                warn!(error = %e, "Redis connection failed, continuing without cache");
                Self::disabled()
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn get_url(&self, code: &str) -> Option<String> {
        match self.store.get(&url_key(code)).await {
            Ok(Some(url)) => {
                CacheStats::record(&self.stats.url_hits);
                debug!(short_code = %code, "URL cache hit");
                Some(url)
            }
            Ok(None) => {
                CacheStats::record(&self.stats.url_misses);
                None
            }
            Err(e) => {
                CacheStats::record(&self.stats.url_misses);
                warn!(short_code = %code, error = %e, "URL cache read failed");
                None
            }
        }
    }

    pub async fn set_url(&self, code: &str, original_url: &str) {
        if let Err(e) = self.store.set_ex(&url_key(code), original_url, self.ttl).await {
            warn!(short_code = %code, error = %e, "URL cache write failed");
        }
    }

    pub async fn get_page(&self, page: u32, limit: u32) -> Option<UrlPage> {
        let cached = match self.store.get(&page_key(page, limit)).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(page, limit, error = %e, "Page cache read failed");
                None
            }
        };

        let snapshot = cached.and_then(|json| match serde_json::from_str::<UrlPage>(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(page, limit, error = %e, "Discarding undecodable page snapshot");
                None
            }
        });

        match snapshot {
            Some(snapshot) => {
                CacheStats::record(&self.stats.page_hits);
                debug!(page, limit, "Page cache hit");
                Some(snapshot)
            }
            None => {
                CacheStats::record(&self.stats.page_misses);
                None
            }
        }
    }

    pub async fn set_page(&self, page: u32, limit: u32, snapshot: &UrlPage) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(page, limit, error = %e, "Failed to serialize page snapshot");
                return;
            }
        };

        if let Err(e) = self.store.set_ex(&page_key(page, limit), &json, self.ttl).await {
            warn!(page, limit, error = %e, "Page cache write failed");
        }
    }

    /// Drop every listing snapshot, whatever its page and limit
    pub async fn invalidate_all_pages(&self) {
        match self.store.delete_pattern(PAGE_KEY_PATTERN).await {
            Ok(removed) => debug!(removed, "Invalidated page cache"),
            Err(e) => warn!(error = %e, "Page cache invalidation failed"),
        }
    }
}

impl Default for CacheLayer {
    fn default() -> Self {
        Self::disabled()
    }
}
