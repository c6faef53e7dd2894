use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("worker.queue_capacity must be positive")]
    ZeroQueueCapacity,

    #[error("progress.interval must be positive")]
    ZeroProgressInterval,

    #[error("geometry.default_tolerance must be a finite, non-negative number: {0}")]
    InvalidTolerance(f64),

    #[error("logging.filter must not be empty")]
    EmptyLogFilter,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_worker(config)?;
    validate_progress(config)?;
    validate_geometry(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_worker(config: &Config) -> Result<(), ValidationError> {
    if config.worker.queue_capacity == 0 {
        return Err(ValidationError::ZeroQueueCapacity);
    }
    Ok(())
}

fn validate_progress(config: &Config) -> Result<(), ValidationError> {
    if config.progress.interval == 0 {
        return Err(ValidationError::ZeroProgressInterval);
    }
    Ok(())
}

fn validate_geometry(config: &Config) -> Result<(), ValidationError> {
    let tolerance = config.geometry.default_tolerance;
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(ValidationError::InvalidTolerance(tolerance));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> Result<(), ValidationError> {
    if config.logging.filter.trim().is_empty() {
        return Err(ValidationError::EmptyLogFilter);
    }
    Ok(())
}
