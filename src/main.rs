use place_finder::{
    config::{Config, StorageBackend},
    db::{self, CacheWriterHandle, InMemoryStore, PgDirectory},
    routes::create_router,
    state::AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("place_finder=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let place_map = config.place_map_settings();

    let (state, cache_writer) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Connected to Postgres and applied migrations");

            let (cache, cache_writer) = if config.cache_enabled {
                let client = db::create_redis_client(&config.redis_url)?;
                let (cache, handle) = db::Cache::new(client);
                (Some(cache), Some(handle))
            } else {
                (None, None)
            };

            (
                AppState::postgres(PgDirectory::new(pool), cache, place_map),
                cache_writer,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            (AppState::in_memory(InMemoryStore::new(), place_map), None)
        }
    };

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_cache(cache_writer).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn shutdown_cache(handle: Option<CacheWriterHandle>) {
    if let Some(handle) = handle {
        handle.shutdown().await;
    }
}
