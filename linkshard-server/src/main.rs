//! linkshard Server - Main entry point

use linkshard_core::{CacheLayer, MemoryConnector, ServiceConfig};
use linkshard_server::{cors_layer, router, UrlMappingService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;

    info!(
        listen = %config.bind_addr(),
        base_url = %config.base_url,
        shards = config.sharding.total_shards,
        strategy = %config.sharding.strategy,
        cors = config.enable_cors,
        "linkshard server starting"
    );

    let cache = CacheLayer::connect(config.redis_url.as_deref()).await;
    let service = Arc::new(UrlMappingService::from_config(
        &config,
        Arc::new(MemoryConnector),
        cache,
    )?);

    // Refuse to start on a shard target nothing can serve
    service.registry().connect_all()?;

    let mut app = router(service.clone());
    if config.enable_cors {
        app = app.layer(cors_layer());
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.close().await;
    info!("linkshard server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
