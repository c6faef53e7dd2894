use serde_json::Value;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{CollectionsPayload, ProcessedCollection};
use crate::catalog::CatalogCollection;
use crate::protocol::TaskType;

#[derive(Debug, Clone, Default)]
pub struct CollectionsHandler;

impl TaskHandler for CollectionsHandler {
    fn task_type(&self) -> TaskType {
        TaskType::ProcessCollectionData
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: CollectionsPayload = decode_payload(self.task_type(), data)?;
        let processed: Vec<_> = payload
            .collections
            .into_iter()
            .map(process_collection)
            .collect();
        Ok(serde_json::to_value(processed)?)
    }
}

/// Summarise a collection's extent and merge its two keyword lists
pub fn process_collection(mut collection: CatalogCollection) -> ProcessedCollection {
    let item_count = collection.bboxes().len();
    let temporal_extent = collection.intervals().first().cloned();
    let spatial_extent = collection.bboxes().first().cloned();
    let keywords = merge_keywords(&collection.keywords, collection.property_keywords());

    collection.keywords.clear();

    ProcessedCollection {
        collection,
        item_count,
        temporal_extent,
        spatial_extent,
        keywords,
    }
}

/// Union of both lists, first occurrence wins
fn merge_keywords(primary: &[String], secondary: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(primary.len() + secondary.len());
    for keyword in primary.iter().chain(secondary) {
        if !merged.contains(keyword) {
            merged.push(keyword.clone());
        }
    }
    merged
}
