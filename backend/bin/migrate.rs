use clap::Parser;
use nearby::db::{migrations, DatabaseConfig};
use nearby::{get_db_pool, utils};
use tracing::info;

/// Apply the schema migrations to the configured Postgres database.
#[derive(Parser, Debug)]
#[command(name = "migrate")]
struct Args {
    /// Connect here instead of DATABASE_URL (e.g. a public production URL)
    #[arg(long, env = "DATABASE_PUBLIC_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    utils::init_logging();
    let args = Args::parse();

    let mut db_config = DatabaseConfig::from_env_or_url(args.database_url)?;
    db_config.max_connections = 1;
    let pool = get_db_pool(&db_config).await?;

    info!("Running database migrations...");
    migrations::run_migrations(&pool).await?;
    info!("Migrations completed successfully!");

    Ok(())
}
