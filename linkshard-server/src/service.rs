//! URL mapping service
//!
//! Creates short codes, resolves them and lists every mapping across all
//! shards. Each code lives in exactly one home shard chosen by the router;
//! lookups by code touch only that shard, everything else fans out.

use linkshard_core::shortcode::{extract_short_code, generate_short_code, is_valid_url, short_url};
use linkshard_core::{
    CacheLayer, CoreError, ExecutorConfig, ServiceConfig, ShardConnector, ShardExecutor,
    ShardRegistry, StoreError,
};
use linkshard_router_core::{ShardRouter, ShardingConfig};
use linkshard_types::{ListedUrl, Pagination, ShardStats, UrlPage, UrlRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::migrate::{migrate_records, MigrationReport};

/// Attempts at finding a code that is free in its home shard
pub const MAX_CODE_ATTEMPTS: u32 = 3;

/// Result of a create call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedUrl {
    pub short_code: String,
    pub short_url: String,
}

/// Sharded URL mapping service
pub struct UrlMappingService {
    base_url: String,
    router: ShardRouter,
    registry: Arc<ShardRegistry>,
    executor: ShardExecutor,
    cache: CacheLayer,
}

impl UrlMappingService {
    /// Create a service over an existing registry
    pub fn new(
        base_url: impl Into<String>,
        registry: Arc<ShardRegistry>,
        executor_config: ExecutorConfig,
        cache: CacheLayer,
    ) -> ServiceResult<Self> {
        let sharding = registry.config().clone();
        sharding.validate().map_err(CoreError::from)?;

        let router = ShardRouter::from_config(&sharding);
        let base_url = base_url.into();

        info!(
            base_url = %base_url,
            shards = sharding.total_shards,
            strategy = router.strategy_name(),
            cache = cache.backend_name(),
            "Creating URL mapping service"
        );

        Ok(Self {
            base_url,
            router,
            executor: ShardExecutor::new(registry.clone(), executor_config),
            registry,
            cache,
        })
    }

    /// Create a service from loaded configuration
    pub fn from_config(
        config: &ServiceConfig,
        connector: Arc<dyn ShardConnector>,
        cache: CacheLayer,
    ) -> ServiceResult<Self> {
        let registry = ShardRegistry::new(Arc::new(config.sharding.clone()), connector);
        Self::new(
            config.base_url.clone(),
            Arc::new(registry),
            config.executor_config(),
            cache,
        )
    }

    /// In-process shards and an in-process cache
    pub fn in_memory(base_url: impl Into<String>, sharding: ShardingConfig) -> ServiceResult<Self> {
        Self::new(
            base_url,
            Arc::new(ShardRegistry::in_memory(sharding)),
            ExecutorConfig::default(),
            CacheLayer::in_memory(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn router(&self) -> &ShardRouter {
        &self.router
    }

    pub fn registry(&self) -> &Arc<ShardRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    /// Shorten `original_url`, reusing an existing code for the same URL
    ///
    /// The existence check and the insert are separate steps, so two
    /// concurrent calls for one URL can both insert.
    pub async fn create(&self, original_url: &str) -> ServiceResult<CreatedUrl> {
        if !is_valid_url(original_url) {
            return Err(ServiceError::Validation("Invalid URL provided".to_string()));
        }

        if let Some(existing) = self.find_existing(original_url).await? {
            debug!(short_code = %existing.short_code, "URL already shortened");
            self.cache.set_url(&existing.short_code, original_url).await;
            return Ok(self.created(existing.short_code));
        }

        let mut attempt = 0;
        let record = loop {
            attempt += 1;
            let id = Uuid::new_v4();
            let code = generate_short_code(&id);
            let shard_id = self.router.route(&code);
            let handle = self.registry.get_connection(shard_id)?;

            match handle
                .insert(UrlRecord::new(id.to_string(), original_url.to_string(), code))
                .await
            {
                Ok(record) => {
                    info!(
                        short_code = %record.short_code,
                        shard_id = shard_id,
                        "Short URL created"
                    );
                    break record;
                }
                Err(StoreError::DuplicateCode(code)) if attempt < MAX_CODE_ATTEMPTS => {
                    warn!(
                        short_code = %code,
                        shard_id = shard_id,
                        attempt,
                        "Short code taken, regenerating"
                    );
                }
                Err(source) => return Err(CoreError::Store { shard_id, source }.into()),
            }
        };

        self.cache.set_url(&record.short_code, original_url).await;
        self.cache.invalidate_all_pages().await;

        Ok(self.created(record.short_code))
    }

    /// Original URL for a bare code or a full short URL
    pub async fn resolve(&self, short_or_code: &str) -> ServiceResult<Option<String>> {
        let code = extract_short_code(short_or_code);

        if let Some(url) = self.cache.get_url(code).await {
            return Ok(Some(url));
        }

        let shard_id = self.router.route(code);
        let handle = self.registry.get_connection(shard_id)?;
        let found = handle
            .find_by_code(code)
            .await
            .map_err(|source| CoreError::Store { shard_id, source })?;

        match found {
            Some(record) => {
                self.cache.set_url(code, &record.original_url).await;
                Ok(Some(record.original_url))
            }
            None => {
                debug!(short_code = %code, shard_id = shard_id, "Short code not found");
                Ok(None)
            }
        }
    }

    /// One page of every mapping, newest first
    pub async fn list(&self, page: u32, limit: u32) -> ServiceResult<UrlPage> {
        if page == 0 || limit == 0 {
            return Err(ServiceError::Validation(
                "page and limit must be at least 1".to_string(),
            ));
        }

        if let Some(cached) = self.cache.get_page(page, limit).await {
            return Ok(cached);
        }

        let per_shard = self
            .executor
            .run_on_all(|handle, _| async move { handle.list_summaries().await })
            .await?;

        let mut records: Vec<UrlRecord> = per_shard.into_values().flatten().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = records.len() as u64;
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let urls = records
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .map(|record| {
                let short_url = short_url(&self.base_url, &record.short_code);
                ListedUrl { record, short_url }
            })
            .collect();

        let snapshot = UrlPage {
            urls,
            pagination: Pagination::new(page, limit, total),
        };
        self.cache.set_page(page, limit, &snapshot).await;

        Ok(snapshot)
    }

    /// Record count of every shard, ordered by shard id
    pub async fn shard_statistics(&self) -> ServiceResult<Vec<ShardStats>> {
        let counts = self
            .executor
            .run_on_all(|handle, _| async move { handle.count().await })
            .await?;

        Ok(counts
            .into_iter()
            .map(|(shard_id, count)| ShardStats { shard_id, count })
            .collect())
    }

    /// Re-home existing records into their shards
    pub async fn migrate(&self, records: Vec<UrlRecord>) -> MigrationReport {
        let report = migrate_records(records, &self.registry).await;
        if report.migrated > 0 {
            self.cache.invalidate_all_pages().await;
        }
        report
    }

    /// Close every shard connection
    pub async fn close(&self) {
        self.registry.close_all().await;
    }

    async fn find_existing(&self, original_url: &str) -> Result<Option<UrlRecord>, CoreError> {
        let per_shard = self
            .executor
            .run_on_all(|handle, _| async move { handle.find_by_original_url(original_url).await })
            .await?;

        Ok(per_shard.into_values().flatten().next())
    }

    fn created(&self, short_code: String) -> CreatedUrl {
        CreatedUrl {
            short_url: short_url(&self.base_url, &short_code),
            short_code,
        }
    }
}
