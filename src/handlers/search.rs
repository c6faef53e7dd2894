use serde_json::Value;
use tracing::debug;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{SearchOptions, SearchResultsPayload};
use crate::catalog::{CatalogItem, ComputedFields};
use crate::config::ProgressConfig;
use crate::geometry;
use crate::protocol::TaskType;

const TITLE_WEIGHT: u8 = 2;
const DESCRIPTION_WEIGHT: u8 = 1;

/// Validates and enriches raw search results
#[derive(Debug, Clone, Default)]
pub struct SearchResultsHandler {
    progress: ProgressConfig,
}

impl SearchResultsHandler {
    pub fn new(progress: ProgressConfig) -> Self {
        Self { progress }
    }
}

impl TaskHandler for SearchResultsHandler {
    fn task_type(&self) -> TaskType {
        TaskType::ProcessSearchResults
    }

    fn handle(
        &self,
        data: Value,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: SearchResultsPayload = decode_payload(self.task_type(), data)?;
        let options = payload.options.unwrap_or_default();
        let items = process_search_results(payload.items, &options, &self.progress, progress);
        Ok(serde_json::to_value(items)?)
    }
}

/// Drop invalid items and attach computed fields to the rest.
///
/// Progress is reported at every `progress.interval`-th index once the
/// batch is larger than `progress.threshold`.
pub fn process_search_results(
    items: Vec<Value>,
    options: &SearchOptions,
    progress_config: &ProgressConfig,
    progress: &mut dyn ProgressReporter,
) -> Vec<CatalogItem> {
    let total = items.len();
    let search_terms = options
        .search_terms
        .as_deref()
        .filter(|terms| !terms.is_empty());

    let mut processed = Vec::with_capacity(total);
    for (index, value) in items.into_iter().enumerate() {
        if let Some(percent) = progress_config.checkpoint(index, total) {
            progress.report(percent);
        }

        if let Some(mut item) = CatalogItem::from_value(value) {
            enrich(&mut item, search_terms);
            processed.push(item);
        }
    }

    let dropped = total - processed.len();
    if dropped > 0 {
        debug!(total, dropped, "Dropped invalid catalog items");
    }

    processed
}

/// Attach area, centroid, preview links and, with search terms, relevance
pub fn enrich(item: &mut CatalogItem, search_terms: Option<&str>) {
    let (area, centroid) = item
        .shape()
        .map_or((0.0, [0.0, 0.0]), |shape| {
            (geometry::area(shape), geometry::centroid(shape))
        });

    item.computed = Some(ComputedFields {
        area,
        centroid,
        thumbnail_url: item.asset_href("thumbnail").map(str::to_string),
        preview_url: item.asset_href("preview").map(str::to_string),
        relevance: search_terms.map(|terms| relevance(item, terms)),
    });
}

/// +2 when the title contains the term, +1 when the description does
/// (case-insensitive, so at most 3)
pub fn relevance(item: &CatalogItem, search_terms: &str) -> u8 {
    let needle = search_terms.to_lowercase();
    let contains = |key: &str| {
        item.property_str(key)
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    };

    let mut score = 0;
    if contains("title") {
        score += TITLE_WEIGHT;
    }
    if contains("description") {
        score += DESCRIPTION_WEIGHT;
    }
    score
}
