use chrono::{DateTime, Utc};
use serde_json::Value;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::{FilterPayload, FilterSpec};
use crate::catalog::{CatalogItem, Geometry, parse_datetime};
use crate::geometry;
use crate::protocol::TaskType;

#[derive(Debug, Clone, Default)]
pub struct FilterHandler;

impl TaskHandler for FilterHandler {
    fn task_type(&self) -> TaskType {
        TaskType::FilterItems
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: FilterPayload = decode_payload(self.task_type(), data)?;
        let items = filter_items(payload.items, &payload.filters)?;
        Ok(serde_json::to_value(items)?)
    }
}

/// Keep the items that pass every supplied clause, in input order
pub fn filter_items(
    items: Vec<CatalogItem>,
    filters: &FilterSpec,
) -> Result<Vec<CatalogItem>, HandlerError> {
    let filter = ItemFilter::compile(filters)?;
    Ok(items.into_iter().filter(|item| filter.matches(item)).collect())
}

/// Filter clauses with date bounds already parsed
#[derive(Debug)]
struct ItemFilter<'a> {
    date_range: Option<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)>,
    max_cloud_cover: Option<f64>,
    collections: Option<&'a [String]>,
    geometry: Option<&'a Geometry>,
}

impl<'a> ItemFilter<'a> {
    fn compile(clauses: &'a FilterSpec) -> Result<Self, HandlerError> {
        let date_range = clauses
            .date_range
            .as_ref()
            .map(|range| -> Result<_, HandlerError> {
                Ok((parse_bound(&range.start)?, parse_bound(&range.end)?))
            })
            .transpose()?;

        Ok(Self {
            date_range,
            max_cloud_cover: clauses.cloud_cover,
            // an empty allow-list is treated as no constraint
            collections: clauses
                .collections
                .as_deref()
                .filter(|allowed| !allowed.is_empty()),
            geometry: clauses.geometry.as_ref(),
        })
    }

    fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_date(item)
            && self.matches_cloud_cover(item)
            && self.matches_collection(item)
            && self.matches_geometry(item)
    }

    fn matches_date(&self, item: &CatalogItem) -> bool {
        let Some((start, end)) = &self.date_range else {
            return true;
        };
        let Some(date) = item.parsed_datetime() else {
            return false;
        };
        start.is_none_or(|start| date >= start) && end.is_none_or(|end| date <= end)
    }

    fn matches_cloud_cover(&self, item: &CatalogItem) -> bool {
        match self.max_cloud_cover {
            None => true,
            Some(max) => item.cloud_cover().is_some_and(|cover| cover <= max),
        }
    }

    fn matches_collection(&self, item: &CatalogItem) -> bool {
        match self.collections {
            None => true,
            Some(allowed) => item
                .collection
                .as_ref()
                .is_some_and(|collection| allowed.contains(collection)),
        }
    }

    fn matches_geometry(&self, item: &CatalogItem) -> bool {
        match self.geometry {
            None => true,
            // an unsupported item shape never satisfies a spatial clause
            Some(area) => item
                .shape()
                .is_some_and(|shape| geometry::intersects(shape, area)),
        }
    }
}

fn parse_bound(bound: &Option<String>) -> Result<Option<DateTime<Utc>>, HandlerError> {
    bound
        .as_deref()
        .map(|raw| {
            parse_datetime(raw).ok_or_else(|| HandlerError::InvalidDateBound(raw.to_string()))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::types::DateRange;
    use serde_json::json;

    fn item(id: &str, datetime: &str, cloud: Option<f64>, collection: &str, x: f64) -> CatalogItem {
        let mut properties = json!({"datetime": datetime});
        if let Some(cloud) = cloud {
            properties["eo:cloud_cover"] = json!(cloud);
        }
        serde_json::from_value(json!({
            "id": id,
            "type": "Feature",
            "collection": collection,
            "properties": properties,
            "geometry": {"type": "Point", "coordinates": [x, 0.0]}
        }))
        .unwrap()
    }

    fn sample() -> Vec<CatalogItem> {
        vec![
            item("a", "2024-01-10T00:00:00Z", Some(5.0), "sentinel-2", 0.0),
            item("b", "2024-02-10T00:00:00Z", Some(60.0), "landsat", 10.0),
            item("c", "2024-03-10T00:00:00Z", None, "sentinel-2", 20.0),
            item("d", "garbage", Some(1.0), "sentinel-2", 30.0),
        ]
    }

    fn ids(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().filter_map(|i| i.id.as_deref()).collect()
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let result = filter_items(sample(), &FilterSpec::default()).unwrap();
        assert_eq!(ids(&result), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_date_range_inclusive_and_unparsable_fails() {
        let filters = FilterSpec {
            date_range: Some(DateRange {
                start: Some("2024-01-10T00:00:00Z".into()),
                end: Some("2024-02-10".into()),
            }),
            ..Default::default()
        };
        let result = filter_items(sample(), &filters).unwrap();
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_open_ended_date_range() {
        let filters = FilterSpec {
            date_range: Some(DateRange {
                start: Some("2024-02-01".into()),
                end: None,
            }),
            ..Default::default()
        };
        let result = filter_items(sample(), &filters).unwrap();
        assert_eq!(ids(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_invalid_bound_is_error() {
        let filters = FilterSpec {
            date_range: Some(DateRange {
                start: Some("yesterday".into()),
                end: None,
            }),
            ..Default::default()
        };
        let err = filter_items(sample(), &filters).unwrap_err();
        assert_eq!(err.to_string(), "Invalid date range bound: yesterday");
    }

    #[test]
    fn test_cloud_cover_excludes_missing_values() {
        let filters = FilterSpec {
            cloud_cover: Some(10.0),
            ..Default::default()
        };
        let result = filter_items(sample(), &filters).unwrap();
        assert_eq!(ids(&result), vec!["a", "d"]);
    }

    #[test]
    fn test_collection_allow_list() {
        let filters = FilterSpec {
            collections: Some(vec!["landsat".into()]),
            ..Default::default()
        };
        assert_eq!(ids(&filter_items(sample(), &filters).unwrap()), vec!["b"]);

        let empty = FilterSpec {
            collections: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(filter_items(sample(), &empty).unwrap().len(), 4);
    }

    #[test]
    fn test_spatial_filter_uses_bbox() {
        let filters: FilterSpec = serde_json::from_value(json!({
            "geometry": {"type": "Polygon", "coordinates": [[[5, -1], [25, -1], [25, 1], [5, 1], [5, -1]]]}
        }))
        .unwrap();
        assert_eq!(ids(&filter_items(sample(), &filters).unwrap()), vec!["b", "c"]);
    }

    #[test]
    fn test_clauses_combine_with_and() {
        let filters = FilterSpec {
            cloud_cover: Some(50.0),
            collections: Some(vec!["sentinel-2".into()]),
            date_range: Some(DateRange {
                start: Some("2024-01-01".into()),
                end: Some("2024-12-31".into()),
            }),
            geometry: None,
        };
        assert_eq!(ids(&filter_items(sample(), &filters).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filters = FilterSpec {
            cloud_cover: Some(70.0),
            collections: Some(vec!["sentinel-2".into(), "landsat".into()]),
            ..Default::default()
        };
        let once = filter_items(sample(), &filters).unwrap();
        let twice = filter_items(once.clone(), &filters).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_handler_payload() {
        let output = FilterHandler
            .handle(
                json!({
                    "items": [{"id": "x", "type": "Feature", "properties": {"eo:cloud_cover": 3}}],
                    "filters": {"cloudCover": 2}
                }),
                &mut |_: u8| {},
            )
            .unwrap();
        assert_eq!(output, json!([]));
    }

    #[test]
    fn test_handler_keeps_items_with_unsupported_geometry() {
        let collection = json!({
            "type": "GeometryCollection",
            "geometries": [{"type": "Point", "coordinates": [1, 1]}]
        });
        let items = json!([
            {"id": "good", "type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1, 1]}},
            {"id": "gc", "type": "Feature", "properties": {}, "geometry": collection},
            {"id": "short", "type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0]}},
            "not an item"
        ]);

        let output = FilterHandler
            .handle(json!({"items": items, "filters": {}}), &mut |_: u8| {})
            .unwrap();
        let kept: Vec<&str> = output
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_str().unwrap())
            .collect();
        assert_eq!(kept, vec!["good", "gc", "short"]);
        assert_eq!(output[1]["geometry"], collection);

        // a spatial clause cannot be satisfied by a shape with no coordinates we understand
        let output = FilterHandler
            .handle(
                json!({
                    "items": items,
                    "filters": {"geometry": {"type": "Point", "coordinates": [1, 1]}}
                }),
                &mut |_: u8| {},
            )
            .unwrap();
        assert_eq!(output.as_array().unwrap().len(), 1);
        assert_eq!(output[0]["id"], "good");
    }
}
