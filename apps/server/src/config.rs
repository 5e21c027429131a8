//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults that work for a local single-shop installation.

use serde::{Deserialize, Serialize};
use std::env;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,

    /// HTTP listen host
    pub host: String,

    /// SQLite database file path
    pub database_path: String,

    /// Default operator account name (seeded when the users table is empty)
    pub admin_name: String,

    /// Default operator account email
    pub admin_email: String,

    /// Default operator password; hashed with bcrypt before it ever reaches
    /// the database. Override in production.
    pub admin_password: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config {
            port: env::var("DUKAAN_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DUKAAN_PORT".to_string()))?,

            host: env::var("DUKAAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            database_path: env::var("DUKAAN_DB").unwrap_or_else(|_| "./dukaan.db".to_string()),

            admin_name: env::var("DUKAAN_ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string()),

            admin_email: env::var("DUKAAN_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@dukaan.local".to_string()),

            admin_password: env::var("DUKAAN_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
