//! Registry API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};

use registry_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Registry API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub http_host: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file (or `:memory:`)
    pub database_path: String,

    /// Upper bound on pooled SQLite connections
    pub db_max_connections: u32,

    /// Insert the default regions into an empty regions table at startup
    pub seed_regions: bool,

    /// Allowed CORS origins; empty means any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            http_host: "0.0.0.0".to_string(),
            http_port: 8000,
            database_path: "./registry.db".to_string(),
            db_max_connections: 5,
            seed_regions: true,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            http_host: lookup("HTTP_HOST").unwrap_or(defaults.http_host),

            http_port: parse_or("HTTP_PORT", &lookup, defaults.http_port)?,

            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                &lookup,
                defaults.db_max_connections,
            )?,

            seed_regions: match lookup("SEED_REGIONS") {
                Some(raw) => parse_flag("SEED_REGIONS", &raw)?,
                None => defaults.seed_regions,
            },

            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .http_host
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))?;
        Ok(SocketAddr::new(ip, self.http_port))
    }

    /// Pool settings for [`registry_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
