use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{GeometryOptions, GeometryPayload};
use crate::catalog::Geometry;
use crate::config::GeometryConfig;
use crate::geometry;
use crate::protocol::TaskType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryOperation {
    Simplify,
    Bounds,
    Area,
    Intersects,
}

impl GeometryOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryOperation::Simplify => "simplify",
            GeometryOperation::Bounds => "bounds",
            GeometryOperation::Area => "area",
            GeometryOperation::Intersects => "intersects",
        }
    }
}

impl fmt::Display for GeometryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryOperation {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simplify" => Ok(GeometryOperation::Simplify),
            "bounds" => Ok(GeometryOperation::Bounds),
            "area" => Ok(GeometryOperation::Area),
            "intersects" => Ok(GeometryOperation::Intersects),
            other => Err(HandlerError::UnknownGeometryOperation(other.to_string())),
        }
    }
}

/// Runs one geometry operation per request
#[derive(Debug, Clone, Default)]
pub struct GeometryHandler {
    config: GeometryConfig,
}

impl GeometryHandler {
    pub fn new(config: GeometryConfig) -> Self {
        Self { config }
    }
}

impl TaskHandler for GeometryHandler {
    fn task_type(&self) -> TaskType {
        TaskType::ProcessGeometry
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: GeometryPayload = decode_payload(self.task_type(), data)?;
        let operation: GeometryOperation = payload.operation.parse()?;
        let options = payload.options.unwrap_or_default();
        process_geometry(operation, &payload.geometry, &options, &self.config)
    }
}

/// Output per operation: a geometry for `simplify`, `[minX, minY, maxX, maxY]`
/// (or null) for `bounds`, a number for `area`, a boolean for `intersects`
pub fn process_geometry(
    operation: GeometryOperation,
    shape: &Geometry,
    options: &GeometryOptions,
    config: &GeometryConfig,
) -> Result<Value, HandlerError> {
    let value = match operation {
        GeometryOperation::Simplify => {
            let tolerance = options.tolerance.unwrap_or(config.default_tolerance);
            serde_json::to_value(geometry::simplify(shape, tolerance))?
        }
        GeometryOperation::Bounds => serde_json::to_value(geometry::bounding_box(shape))?,
        GeometryOperation::Area => serde_json::to_value(geometry::area(shape))?,
        GeometryOperation::Intersects => {
            let target = options
                .target
                .as_ref()
                .ok_or(HandlerError::MissingTarget(GeometryOperation::Intersects.as_str()))?;
            Value::Bool(geometry::intersects(shape, target))
        }
    };
    Ok(value)
}
