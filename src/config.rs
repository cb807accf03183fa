//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::domain::{SelfTransferPolicy, WalletPolicy};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Idle connections kept open
    pub database_min_connections: u32,

    /// Maximum lifetime of a pooled connection
    pub database_max_lifetime: Option<Duration>,

    /// Apply embedded migrations at start-up
    pub database_auto_migrate: bool,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HMAC secret for bearer tokens
    pub secret_key: String,

    /// Token lifetime in hours
    pub jwt_expiration_hours: i64,

    pub self_transfer_policy: SelfTransferPolicy,

    /// Retries after a serialization conflict
    pub serialization_retries: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?;
        let database_min_connections = parse_or(&get, "DATABASE_MIN_CONNECTIONS", 0)?;

        let database_max_lifetime = match get("DATABASE_MAX_LIFETIME_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_LIFETIME_SECS"))?,
            )),
            None => None,
        };

        let database_auto_migrate = parse_or(&get, "DATABASE_AUTO_MIGRATE", false)?;

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&get, "PORT", 8080)?;
        let environment = get("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let secret_key = get("SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEnv("SECRET_KEY"))?;

        let jwt_expiration_hours: i64 = parse_or(&get, "JWT_EXPIRATION_HOURS", 12)?;
        if jwt_expiration_hours <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXPIRATION_HOURS"));
        }

        let self_transfer_policy =
            parse_or(&get, "SELF_TRANSFER_POLICY", SelfTransferPolicy::Reject)?;
        let serialization_retries = parse_or(&get, "SERIALIZATION_RETRIES", 0)?;

        Ok(Self {
            database_url,
            database_max_connections,
            database_min_connections,
            database_max_lifetime,
            database_auto_migrate,
            host,
            port,
            environment,
            secret_key,
            jwt_expiration_hours,
            self_transfer_policy,
            serialization_retries,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Token lifetime
    pub fn jwt_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt_expiration_hours)
    }

    /// Coordinator policy derived from this configuration
    pub fn wallet_policy(&self) -> WalletPolicy {
        WalletPolicy::default()
            .with_self_transfer(self.self_transfer_policy)
            .with_serialization_retries(self.serialization_retries)
    }
}

fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue(key)),
        None => Ok(default),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
