use anyhow::Result;
use std::env;
use std::str::FromStr;
use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub online_window_secs: i64,
    pub nearby_default_limit: usize,
    pub nearby_max_limit: usize,
    pub nearby_default_distance_km: f64,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = env::var("STORE_BACKEND")
            .map(|v| v.parse::<StoreBackend>())
            .unwrap_or(Ok(StoreBackend::Postgres))?;

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!("DATABASE_URL must be set"));
        }

        let nearby_max_limit = env_or("NEARBY_MAX_LIMIT", NEARBY_MAX_LIMIT).max(1);

        Ok(Self {
            port: env_or("PORT", DEFAULT_SERVER_PORT),
            store_backend,
            database_url,
            online_window_secs: env_or("ONLINE_WINDOW_SECS", ONLINE_WINDOW_SECS),
            nearby_default_limit: env_or("NEARBY_DEFAULT_LIMIT", NEARBY_DEFAULT_LIMIT)
                .clamp(1, nearby_max_limit),
            nearby_max_limit,
            nearby_default_distance_km: env_or("NEARBY_DEFAULT_DISTANCE_KM", NEARBY_DEFAULT_DISTANCE_KM),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            store_backend: StoreBackend::Memory,
            database_url: None,
            online_window_secs: ONLINE_WINDOW_SECS,
            nearby_default_limit: NEARBY_DEFAULT_LIMIT,
            nearby_max_limit: NEARBY_MAX_LIMIT,
            nearby_default_distance_km: NEARBY_DEFAULT_DISTANCE_KM,
            allowed_origins: Vec::new(),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
