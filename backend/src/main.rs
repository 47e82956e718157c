use nearby::db::{self, MemoryStore, PgStore, SharedStore};
use nearby::utils::{self, StoreBackend};
use nearby::{create_router, get_db_pool, Config};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();

    let config = Config::from_env()?;
    let store = connect_store(&config).await?;

    let port = config.port;
    let app = create_router(store, config);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server running on port {}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let db_config = db::DatabaseConfig::from_env_or_url(config.database_url.clone())?;
            let pool = get_db_pool(&db_config).await?;

            // Run migrations
            db::migrations::run_migrations(&pool).await?;

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
