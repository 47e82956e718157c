use anyhow::{Context, Result};
use sqlx::PgPool;

/// Applies the embedded schema migrations under `backend/migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
