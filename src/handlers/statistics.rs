use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{CloudCoverStats, DateRangeStats, Statistics, StatisticsPayload};
use crate::catalog::{CatalogItem, format_timestamp};
use crate::protocol::TaskType;

#[derive(Debug, Clone, Default)]
pub struct StatisticsHandler;

impl TaskHandler for StatisticsHandler {
    fn task_type(&self) -> TaskType {
        TaskType::CalculateStatistics
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: StatisticsPayload = decode_payload(self.task_type(), data)?;
        Ok(serde_json::to_value(calculate_statistics(&payload.items))?)
    }
}

/// Single pass over the batch. Unparsable dates and non-numeric cloud
/// cover are skipped rather than reported.
pub fn calculate_statistics(items: &[CatalogItem]) -> Statistics {
    let mut collections = BTreeSet::new();
    let mut collections_array = Vec::new();
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut latest: Option<DateTime<Utc>> = None;
    let mut cloud = CloudCoverStats::default();
    let mut cloud_sum = 0.0;
    let mut cloud_count = 0usize;

    for item in items {
        if let Some(collection) = &item.collection {
            if collections.insert(collection.clone()) {
                collections_array.push(collection.clone());
            }
        }

        if let Some(date) = item.parsed_datetime() {
            earliest = Some(earliest.map_or(date, |current| current.min(date)));
            latest = Some(latest.map_or(date, |current| current.max(date)));
        }

        if let Some(cover) = item.cloud_cover() {
            cloud.min = cloud.min.min(cover);
            cloud.max = cloud.max.max(cover);
            cloud_sum += cover;
            cloud_count += 1;
        }
    }

    if cloud_count > 0 {
        cloud.avg = cloud_sum / cloud_count as f64;
    }

    Statistics {
        total_items: items.len(),
        collections,
        collections_array,
        date_range: DateRangeStats {
            min: earliest.as_ref().map(format_timestamp),
            max: latest.as_ref().map(format_timestamp),
        },
        cloud_cover_stats: cloud,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(collection: Option<&str>, datetime: &str, cloud: Value) -> CatalogItem {
        serde_json::from_value(json!({
            "id": "x",
            "type": "Feature",
            "collection": collection,
            "properties": {"datetime": datetime, "eo:cloud_cover": cloud}
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_batch_keeps_seeded_cloud_cover() {
        let stats = calculate_statistics(&[]);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({
                "totalItems": 0,
                "collections": [],
                "collectionsArray": [],
                "dateRange": {"min": null, "max": null},
                "cloudCoverStats": {"min": 100.0, "max": 0.0, "avg": 0.0}
            })
        );
    }

    #[test]
    fn test_items_without_cloud_cover_report_seed_values() {
        let items = vec![item(Some("a"), "2024-01-01", Value::Null)];
        let stats = calculate_statistics(&items);
        assert_eq!(stats.total_items, 1);
        assert_eq!(stats.cloud_cover_stats, CloudCoverStats { min: 100.0, max: 0.0, avg: 0.0 });
    }

    #[test]
    fn test_aggregates() {
        let items = vec![
            item(Some("sentinel-2"), "2024-03-05T12:00:00Z", json!(30)),
            item(Some("landsat"), "2023-12-31T23:59:59.500Z", json!(10)),
            item(None, "not-a-date", json!("cloudy")),
            item(Some("sentinel-2"), "2024-06-01", json!(20)),
        ];
        let stats = calculate_statistics(&items);

        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.collections_array, vec!["sentinel-2", "landsat"]);
        assert_eq!(
            stats.collections.iter().collect::<Vec<_>>(),
            vec!["landsat", "sentinel-2"]
        );
        assert_eq!(stats.date_range.min.as_deref(), Some("2023-12-31T23:59:59.500Z"));
        assert_eq!(stats.date_range.max.as_deref(), Some("2024-06-01T00:00:00.000Z"));
        assert_eq!(stats.cloud_cover_stats.min, 10.0);
        assert_eq!(stats.cloud_cover_stats.max, 30.0);
        assert_eq!(stats.cloud_cover_stats.avg, 20.0);
    }

    #[test]
    fn test_handler() {
        let output = StatisticsHandler
            .handle(json!({"items": [{"id": "a", "collection": "c"}]}), &mut |_: u8| {})
            .unwrap();
        assert_eq!(output["totalItems"], 1);
        assert_eq!(output["collectionsArray"], json!(["c"]));
    }

    #[test]
    fn test_handler_with_unsupported_geometry() {
        let output = StatisticsHandler
            .handle(
                json!({"items": [
                    {"id": "a", "collection": "c", "properties": {"eo:cloud_cover": 10},
                     "geometry": {"type": "GeometryCollection", "geometries": []}},
                    {"id": "b", "collection": "d", "properties": {"eo:cloud_cover": 30},
                     "geometry": {"type": "Point", "coordinates": [1.0]}},
                    null
                ]}),
                &mut |_: u8| {},
            )
            .unwrap();

        assert_eq!(output["totalItems"], 2);
        assert_eq!(output["collectionsArray"], json!(["c", "d"]));
        assert_eq!(output["cloudCoverStats"]["avg"], 20.0);
    }
}
