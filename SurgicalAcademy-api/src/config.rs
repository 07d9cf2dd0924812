//! Server configuration assembled from each layer's environment settings

use std::env;

use thiserror::Error;

use surgical_academy_data::database::{DatabaseConfig, DatabaseError};
use surgical_academy_domain::auth::{SecurityError, TokenConfig};
use surgical_academy_domain::completion::{CompletionConfig, CompletionError};

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Tokens(#[from] SecurityError),

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

/// Everything the server binary needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Reported by `/health`
    pub environment: String,
    /// Seed sample data before serving
    pub seed_on_start: bool,
    pub database: DatabaseConfig,
    pub tokens: TokenConfig,
    pub completion: CompletionConfig,
}

impl AppConfig {
    /// Read `PORT`, `APP_ENV`, `SEED_DATABASE` and every layer's variables.
    ///
    /// Fails on malformed numbers or a missing `JWT_SECRET`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: value.clone(),
            })?,
            Err(_) => 3000,
        };

        let seed_on_start = match env::var("SEED_DATABASE") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue {
                key: "SEED_DATABASE",
                value,
            })?,
            Err(_) => false,
        };

        Ok(Self {
            port,
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            seed_on_start,
            database: DatabaseConfig::from_env()?,
            tokens: TokenConfig::from_env()?,
            completion: CompletionConfig::from_env()?,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
