//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and search setup, pipeline
//! spawning, and the Axum server lifecycle including graceful shutdown.

use crate::application::services::{DomainResolver, LinkService, RedirectService};
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    PgAccessLogRepository, PgDomainRepository, PgLinkRepository, PgSettingsRepository,
};
use crate::infrastructure::search::{HttpSearchIndex, NullSearchIndex, SearchIndexClient};
use crate::pipeline::{spawn_search_worker, spawn_stats_worker, SearchHandle, StatsHandle};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Time allowed for pipeline drains after the listener stops.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache (or NullCache fallback)
/// - Search index client (or NullSearchIndex fallback)
/// - Stats and search pipelines
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the database connection or server bind fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let search_client: Arc<dyn SearchIndexClient> = if let Some(search_url) = &config.search_url {
        match HttpSearchIndex::connect(search_url, config.search_api_key.as_deref()).await {
            Ok(client) => {
                tracing::info!("Search indexing enabled");
                Arc::new(client)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to connect to search backend: {}. Using NullSearchIndex.",
                    e
                );
                Arc::new(NullSearchIndex::new())
            }
        }
    } else {
        tracing::info!("Search indexing disabled (NullSearchIndex)");
        Arc::new(NullSearchIndex::new())
    };

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let domain_repository = Arc::new(PgDomainRepository::new(pool.clone()));
    let access_log_repository = Arc::new(PgAccessLogRepository::new(pool.clone()));
    let settings_repository = Arc::new(PgSettingsRepository::new(pool.clone()));

    let (stats_tx, stats_rx) = mpsc::channel(config.stats_queue_capacity);
    let stats_handle = StatsHandle::new(stats_tx);
    let stats_worker = spawn_stats_worker(
        link_repository.clone(),
        access_log_repository,
        stats_rx,
        config.stats_batch_size,
        Duration::from_millis(config.stats_flush_interval_ms),
    );
    tracing::info!("Stats pipeline started");

    let (search_tx, search_rx) = mpsc::channel(config.search_queue_capacity);
    let search_handle = SearchHandle::new(search_tx);
    let search_worker = spawn_search_worker(
        search_client,
        search_rx,
        config.search_max_retries,
        Duration::from_millis(config.search_retry_base_ms),
    );
    tracing::info!("Search pipeline started");

    let resolver = Arc::new(DomainResolver::new(
        domain_repository.clone(),
        &config.base_url,
    ));
    let link_service = Arc::new(LinkService::new(
        link_repository.clone(),
        settings_repository,
        resolver.clone(),
        cache.clone(),
        search_handle.clone(),
        config.min_code_length,
        config.max_code_length,
        config.cache_ttl_seconds,
    ));
    let redirect_service = Arc::new(RedirectService::new(
        link_repository,
        resolver,
        cache.clone(),
        stats_handle.clone(),
        config.cache_ttl_seconds,
        config.any_domain_fallback,
    ));

    let state = AppState::new(
        link_service,
        redirect_service,
        domain_repository,
        cache,
        stats_handle.clone(),
        search_handle.clone(),
    );

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The listener is closed; dropping the last producer handles closes
    // the pipeline channels so the workers drain and exit.
    drop(stats_handle);
    drop(search_handle);

    tracing::info!("Draining pipelines");
    for (name, worker) in [("stats", stats_worker), ("search", search_worker)] {
        match tokio::time::timeout(SHUTDOWN_GRACE, worker).await {
            Ok(Ok(())) => tracing::info!("{} pipeline drained", name),
            Ok(Err(e)) => tracing::error!("{} pipeline task failed: {}", name, e),
            Err(_) => tracing::warn!("{} pipeline did not drain within grace period", name),
        }
    }

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
