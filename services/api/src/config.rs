//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// Ten years. Keeps `now + ttl` far inside chrono's date range.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_level: Level,
    pub session_ttl_hours: i64,
    pub cors_origin: String,
    /// Adds the `Secure` attribute to the session cookie.
    pub cookie_secure: bool,
}

fn parse_var<T>(name: &str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Server and Database Settings ---
        let bind_address = parse_var("BIND_ADDRESS", var_or("BIND_ADDRESS", "0.0.0.0:3000"))?;
        let database_url = var_or("DATABASE_URL", "sqlite://health_reports.db");
        if database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }
        let db_max_connections: u32 =
            parse_var("DB_MAX_CONNECTIONS", var_or("DB_MAX_CONNECTIONS", "5"))?;
        if db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DB_MAX_CONNECTIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session and Browser Settings ---
        let session_ttl_hours: i64 =
            parse_var("SESSION_TTL_HOURS", var_or("SESSION_TTL_HOURS", "720"))?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_HOURS".to_string(),
                format!("must be between 1 and {MAX_SESSION_TTL_HOURS}"),
            ));
        }
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:3000");
        let cookie_secure = parse_var("COOKIE_SECURE", var_or("COOKIE_SECURE", "true"))?;

        Ok(Self {
            bind_address,
            database_url,
            db_max_connections,
            log_level,
            session_ttl_hours,
            cors_origin,
            cookie_secure,
        })
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
