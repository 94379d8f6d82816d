mod cli;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use shortly_cache::{MokaBackend, RedisBackend};
use shortly_core::StorageBackend;
use prometheus::Registry;
use shortly_gateway::{telemetry, App, AppState, HttpMetrics};
use shortly_generator::UrlIdGenerator;
use shortly_shortener::{ServiceMetrics, Shortener, ShortenerService};
use shortly_storage::{InMemoryBackend, PostgresBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    telemetry::init(config.debug);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting shortly http server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(&config, InMemoryBackend::new()).await?;
        }
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("database url is required when storage backend is postgres")?;
            let backend = PostgresBackend::connect(database_url).await?;
            backend.create_schema().await?;
            info!("db connection successful");
            run_server(&config, backend).await?;
        }
    }

    Ok(())
}

async fn connect_cache(
    config: &CLI,
) -> Result<Option<Arc<dyn StorageBackend>>, Box<dyn std::error::Error>> {
    let ttl = Duration::from_secs(config.cache_ttl_secs);

    if let Some(redis_url) = &config.redis_url {
        let cache = RedisBackend::connect(redis_url).await?.with_ttl(ttl);
        info!("redis connection successful");
        return Ok(Some(Arc::new(cache)));
    }

    if config.moka_capacity > 0 {
        info!(capacity = config.moka_capacity, "using in-process cache");
        return Ok(Some(Arc::new(MokaBackend::with_ttl(config.moka_capacity, ttl))));
    }

    Ok(None)
}

async fn run_server<P: StorageBackend>(
    config: &CLI,
    primary: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    let service_metrics = ServiceMetrics::register(&registry)?;
    let http_metrics = HttpMetrics::register(&registry)?;

    let generator = UrlIdGenerator::new();
    let service = match connect_cache(config).await? {
        Some(cache) => ShortenerService::with_cache(primary, cache, generator),
        None => ShortenerService::new(primary, generator),
    };
    let shortener: Arc<dyn Shortener> = Arc::new(service.with_metrics(service_metrics));

    let state = match &config.public_base_url {
        Some(base_url) => AppState::with_base_url(shortener, base_url.clone()),
        None => AppState::new(shortener),
    }
    .with_metrics(http_metrics);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
