use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context};
use stockfolio_storage_sqlite::db::get_db_path;

const DEFAULT_DATA_DIR: &str = "./db";

/// Server settings, read from `SF_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow_origins: Vec<String>,
    pub request_timeout: Duration,
    pub quote_timeout: Duration,
    /// HS256 key used to verify bearer tokens.
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();

        let listen_addr = env_or("SF_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("SF_LISTEN_ADDR is not a valid socket address")?;
        let db_path =
            std::env::var("SF_DB_PATH").unwrap_or_else(|_| get_db_path(DEFAULT_DATA_DIR));
        let cors_allow_origins = env_or("SF_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let request_timeout = duration_ms("SF_REQUEST_TIMEOUT_MS", 30_000)?;
        let quote_timeout = duration_ms("SF_QUOTE_TIMEOUT_MS", 10_000)?;

        let jwt_secret = std::env::var("SF_JWT_SECRET").unwrap_or_default();
        if jwt_secret.trim().is_empty() {
            bail!("SF_JWT_SECRET must be set");
        }

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow_origins,
            request_timeout,
            quote_timeout,
            jwt_secret,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn duration_ms(key: &str, default_ms: u64) -> anyhow::Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("{key} must be a number of milliseconds")),
        Err(_) => Ok(Duration::from_millis(default_ms)),
    }
}
