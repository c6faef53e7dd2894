use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::{TaskType, UnknownTaskType};

/// Handler errors. The `Display` text is what the caller receives in the
/// `error` member of a failed result message.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    UnknownTaskType(#[from] UnknownTaskType),
    #[error("Invalid payload for {task}: {reason}")]
    InvalidPayload { task: TaskType, reason: String },
    #[error("JSON parsing failed: {0}")]
    JsonParse(String),
    #[error("Invalid STAC catalog structure")]
    InvalidCatalog,
    #[error("Unknown geometry operation: {0}")]
    UnknownGeometryOperation(String),
    #[error("Operation '{0}' requires options.target")]
    MissingTarget(&'static str),
    #[error("Invalid date range bound: {0}")]
    InvalidDateBound(String),
    #[error("Result serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Task handler panicked: {0}")]
    Panicked(String),
}

/// Receives percentage updates while a handler runs
pub trait ProgressReporter {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressReporter for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// One task kind's implementation.
///
/// Handlers run synchronously to completion and own no state between
/// calls; the `data` payload is decoded, processed, and the output
/// returned as JSON for the router to wrap in a result message.
pub trait TaskHandler: Send + Sync + std::fmt::Debug {
    fn task_type(&self) -> TaskType;

    fn handle(
        &self,
        data: Value,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError>;
}

/// Decode a task payload, tagging failures with the task they belong to
pub(crate) fn decode_payload<T: DeserializeOwned>(
    task: TaskType,
    data: Value,
) -> Result<T, HandlerError> {
    serde_json::from_value(data).map_err(|e| HandlerError::InvalidPayload {
        task,
        reason: e.to_string(),
    })
}
