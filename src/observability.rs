//! Observability: task counters and tracing setup

use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::EnvFilter;

/// Counters shared between the engine and whoever reports on it
#[derive(Debug, Default)]
pub struct Metrics {
    tasks_succeeded: AtomicU64,
    tasks_failed: AtomicU64,
    progress_emitted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn task_succeeded(&self) {
        self.tasks_succeeded.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "tasks_succeeded", "Metric incremented");
    }

    pub fn task_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "tasks_failed", "Metric incremented");
    }

    pub fn progress_emitted(&self) {
        self.progress_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            tasks_succeeded: self.tasks_succeeded.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            progress_emitted: self.progress_emitted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub tasks_succeeded: u64,
    pub tasks_failed: u64,
    pub progress_emitted: u64,
}

impl MetricsSnapshot {
    pub fn tasks_total(&self) -> u64 {
        self.tasks_succeeded + self.tasks_failed
    }
}

/// Install the global fmt subscriber writing to stderr.
///
/// `RUST_LOG` wins over `default_filter`. stdout is left alone because
/// it carries the outbound message stream.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let metrics = Metrics::new();
        metrics.task_succeeded();
        metrics.task_succeeded();
        metrics.task_failed();
        metrics.progress_emitted();

        let snapshot = metrics.snapshot();
        assert_eq!(
            snapshot,
            MetricsSnapshot {
                tasks_succeeded: 2,
                tasks_failed: 1,
                progress_emitted: 1,
            }
        );
        assert_eq!(snapshot.tasks_total(), 3);
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing("debug");
        init_tracing("not a [valid filter");
    }
}
