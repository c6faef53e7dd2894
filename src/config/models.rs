use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub worker: WorkerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Worker queue settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Bounded inbound queue size; submitters wait when it is full
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    64
}

/// When batch handlers report progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressConfig {
    /// Only batches strictly larger than this report progress
    #[serde(default = "default_progress_threshold")]
    pub threshold: usize,
    /// Report at every index divisible by this
    #[serde(default = "default_progress_interval")]
    pub interval: usize,
}

impl ProgressConfig {
    /// Progress percentage to report at `index` of a `total`-item batch, if any
    pub fn checkpoint(&self, index: usize, total: usize) -> Option<u8> {
        if total <= self.threshold || self.interval == 0 || index % self.interval != 0 {
            return None;
        }
        let percent = (index as f64 / total as f64 * 100.0).round();
        Some(percent.clamp(0.0, 100.0) as u8)
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            threshold: default_progress_threshold(),
            interval: default_progress_interval(),
        }
    }
}

fn default_progress_threshold() -> usize {
    100
}

fn default_progress_interval() -> usize {
    10
}

/// Geometry operation defaults
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GeometryConfig {
    /// Simplify tolerance used when a request does not supply one
    #[serde(default = "default_tolerance")]
    pub default_tolerance: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            default_tolerance: default_tolerance(),
        }
    }
}

fn default_tolerance() -> f64 {
    0.001
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
