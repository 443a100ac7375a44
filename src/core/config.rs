use std::env;
use std::str::FromStr;

use crate::core::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if exists, ignore if not found (optional for production)
        let _ = dotenvy::dotenv();

        let url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Configuration("DATABASE_URL must be set".to_string()))?;

        Ok(Self {
            url,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: env_or("DATABASE_MIN_CONNECTIONS", 1)?,
            acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 30)?,
            idle_timeout_secs: env_or("DATABASE_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime_secs: env_or("DATABASE_MAX_LIFETIME_SECS", 1800)?,
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::Configuration(format!("{} must be a valid number", key))),
        Err(_) => Ok(default),
    }
}
