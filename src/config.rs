//! Configuration management for the search index.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file in the working directory is read first if present.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for opening and querying a task store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the SQLite database (`:memory:` for a throwaway store)
    pub database_path: String,

    /// How long a write waits on a locked database, in milliseconds (default: 5000)
    pub busy_timeout_ms: u64,

    /// Maximum number of search hits printed by the command line tool (default: 50)
    pub max_results: usize,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `FTS_DATABASE_PATH`: SQLite database path (default: `tasks.db`)
    /// - `FTS_BUSY_TIMEOUT_MS`: Busy timeout in milliseconds (default: 5000)
    /// - `FTS_MAX_RESULTS`: Max hits shown (default: 50)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let database_path = env::var("FTS_DATABASE_PATH").unwrap_or_else(|_| "tasks.db".to_string());
        if database_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "FTS_DATABASE_PATH".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let busy_timeout_ms = Self::parse_env_u64("FTS_BUSY_TIMEOUT_MS", 5000)?;
        let max_results = Self::parse_env_usize("FTS_MAX_RESULTS", 50)?;
        if max_results == 0 {
            return Err(ConfigError::InvalidValue {
                var: "FTS_MAX_RESULTS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            database_path,
            busy_timeout_ms,
            max_results,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: "tasks.db".to_string(),
            busy_timeout_ms: 5000,
            max_results: 50,
            log_level: "error".to_string(),
        }
    }
}
