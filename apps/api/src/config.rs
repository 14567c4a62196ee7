use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres URL for the tracking store. Unset → in-memory store.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Threshold applied when a filter request does not carry one.
    pub default_threshold: f64,
    pub max_upload_bytes: usize,
    /// Cap on JSON request bodies (job corpora for filter and rank).
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            default_threshold: 0.3,
            max_upload_bytes: 10 * 1024 * 1024,
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            default_threshold: parse_env("DEFAULT_THRESHOLD", defaults.default_threshold)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            max_body_bytes: parse_env("MAX_BODY_BYTES", defaults.max_body_bytes)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
