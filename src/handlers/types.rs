use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::catalog::{CatalogCollection, CatalogItem, Geometry, deserialize_items};

/// `PROCESS_SEARCH_RESULTS` input. Items stay raw JSON so that malformed
/// entries can be dropped one by one instead of failing the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResultsPayload {
    pub items: Vec<Value>,
    #[serde(default)]
    pub options: Option<SearchOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub search_terms: Option<String>,
}

/// `FILTER_ITEMS` input. Entries that cannot be read as items are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterPayload {
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub filters: FilterSpec,
}

/// Filter clauses; an absent clause always passes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub date_range: Option<DateRange>,
    /// Maximum `eo:cloud_cover`
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    /// Allowed `collection` values
    #[serde(default)]
    pub collections: Option<Vec<String>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// Inclusive date range; a missing bound leaves that side open
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

/// `SORT_ITEMS` input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortPayload {
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
}

/// `PROCESS_COLLECTION_DATA` input
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionsPayload {
    pub collections: Vec<CatalogCollection>,
}

/// A collection plus the summary fields derived from its extent.
///
/// `keywords` replaces the collection's own list with the merged one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedCollection {
    #[serde(flatten)]
    pub collection: CatalogCollection,
    /// Number of bounding boxes in `extent.spatial.bbox`, not a count of items
    pub item_count: usize,
    pub temporal_extent: Option<Vec<Option<String>>>,
    pub spatial_extent: Option<Vec<f64>>,
    pub keywords: Vec<String>,
}

/// `CALCULATE_STATISTICS` input
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsPayload {
    #[serde(deserialize_with = "deserialize_items")]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_items: usize,
    /// Distinct collections, sorted
    pub collections: BTreeSet<String>,
    /// Distinct collections in first-seen order
    pub collections_array: Vec<String>,
    pub date_range: DateRangeStats,
    pub cloud_cover_stats: CloudCoverStats,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DateRangeStats {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// `min` starts at 100 and `max` at 0, so a batch without any cloud
/// cover reports `{min: 100, max: 0, avg: 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CloudCoverStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl Default for CloudCoverStats {
    fn default() -> Self {
        Self {
            min: 100.0,
            max: 0.0,
            avg: 0.0,
        }
    }
}

/// `PARSE_LARGE_JSON` input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseJsonPayload {
    pub json_string: String,
    #[serde(default)]
    pub options: Option<ParseOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseOptions {
    #[serde(default)]
    pub validate: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// `PROCESS_GEOMETRY` input
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryPayload {
    pub operation: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub options: Option<GeometryOptions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeometryOptions {
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub target: Option<Geometry>,
}
