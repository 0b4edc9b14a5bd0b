//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Aggregator (Plaid) client id
    pub plaid_client_id: String,

    /// Aggregator (Plaid) secret
    pub plaid_secret: String,

    /// Aggregator base URL (sandbox by default)
    pub plaid_base_url: String,

    /// Timeout for aggregator requests, in seconds
    pub plaid_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let plaid_client_id = env::var("PLAID_CLIENT_ID")
            .map_err(|_| ConfigError::MissingEnv("PLAID_CLIENT_ID"))?;

        let plaid_secret = env::var("PLAID_SECRET")
            .map_err(|_| ConfigError::MissingEnv("PLAID_SECRET"))?;

        let plaid_base_url = env::var("PLAID_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.plaid.com".to_string());

        let plaid_timeout_secs = env::var("PLAID_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PLAID_TIMEOUT_SECS"))?;

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            plaid_client_id,
            plaid_secret,
            plaid_base_url,
            plaid_timeout_secs,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
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
