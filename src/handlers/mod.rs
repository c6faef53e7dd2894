//! Task handlers
//!
//! One handler per [`TaskType`](crate::protocol::TaskType). Each decodes its
//! `data` payload, runs synchronously to completion and returns either the
//! JSON result or a [`HandlerError`] whose text becomes the `error` member
//! of the failed result message.
//!
//! ## Key Components
//!
//! - [`TaskHandler`] - Trait every handler implements
//! - [`HandlerRegistry`] - Exhaustive task type to handler mapping
//! - [`ProgressReporter`] - Sink for percentage updates from long batches
//!
//! The pure functions behind each handler (`filter_items`, `sort_items`,
//! `calculate_statistics`...) are exported too, for callers that already
//! hold typed values.
//!
//! ## Example
//!
//! ```rust
//! use catalog_worker::handlers::HandlerRegistry;
//! use catalog_worker::protocol::TaskType;
//! use serde_json::json;
//!
//! let registry = HandlerRegistry::default();
//! let output = registry
//!     .get(TaskType::CalculateStatistics)
//!     .handle(json!({"items": []}), &mut |_: u8| {})
//!     .unwrap();
//! assert_eq!(output["totalItems"], 0);
//! ```

mod collections;
mod filter;
mod geometry;
mod json;
mod registry;
mod search;
mod sort;
mod statistics;
mod traits;
pub mod types;

pub use collections::{CollectionsHandler, process_collection};
pub use filter::{FilterHandler, filter_items};
pub use geometry::{GeometryHandler, GeometryOperation, process_geometry};
pub use json::{ParseJsonHandler, STAC_CATALOG_KIND, is_stac_catalog, parse_large_json};
pub use registry::HandlerRegistry;
pub use search::{SearchResultsHandler, enrich, process_search_results, relevance};
pub use sort::{SortHandler, SortKey, SortOrder, sort_items};
pub use statistics::{StatisticsHandler, calculate_statistics};
pub use traits::{HandlerError, ProgressReporter, TaskHandler};
