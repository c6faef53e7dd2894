//! Configuration management for the catalog worker
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use catalog_worker::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Queue capacity: {}", config.worker.queue_capacity);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `CATALOG_WORKER__<section>__<key>`
//!
//! Examples:
//! - `CATALOG_WORKER__WORKER__QUEUE_CAPACITY=256`
//! - `CATALOG_WORKER__PROGRESS__INTERVAL=25`
//! - `CATALOG_WORKER__GEOMETRY__DEFAULT_TOLERANCE=0.01`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/catalog-worker.toml`.
//! This can be overridden using the `CATALOG_WORKER_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{Config, GeometryConfig, LoggingConfig, ProgressConfig, WorkerConfig};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`CATALOG_WORKER__*`)
    /// 2. TOML file (default: `config/catalog-worker.toml`)
    /// 3. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Path `load()` reads from
    pub fn default_path() -> PathBuf {
        sources::default_path()
    }
}
