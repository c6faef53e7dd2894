use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

use super::traits::{HandlerError, ProgressReporter, TaskHandler, decode_payload};
use super::types::SortPayload;
use crate::catalog::CatalogItem;
use crate::geometry;
use crate::protocol::TaskType;

/// Cloud cover assumed for items that do not report one
const MISSING_CLOUD_COVER: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Date,
    CloudCover,
    Collection,
    Area,
    #[default]
    Id,
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Unrecognised keys fall back to `Id`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "date" => SortKey::Date,
            "cloud_cover" => SortKey::CloudCover,
            "collection" => SortKey::Collection,
            "area" => SortKey::Area,
            _ => SortKey::Id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "desc" {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SortHandler;

impl TaskHandler for SortHandler {
    fn task_type(&self) -> TaskType {
        TaskType::SortItems
    }

    fn handle(
        &self,
        data: Value,
        _progress: &mut dyn ProgressReporter,
    ) -> Result<Value, HandlerError> {
        let payload: SortPayload = decode_payload(self.task_type(), data)?;
        let key = payload
            .sort_by
            .as_deref()
            .map_or(SortKey::default(), |s| s.parse().unwrap_or_default());
        let order = payload
            .sort_order
            .as_deref()
            .map_or(SortOrder::default(), |s| s.parse().unwrap_or_default());

        Ok(serde_json::to_value(sort_items(payload.items, key, order))?)
    }
}

/// Stable sort by a single key. Descending reverses the comparator, so
/// items with equal keys keep their input order either way.
pub fn sort_items(mut items: Vec<CatalogItem>, key: SortKey, order: SortOrder) -> Vec<CatalogItem> {
    items.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
    items
}

fn compare(a: &CatalogItem, b: &CatalogItem, key: SortKey) -> Ordering {
    match key {
        // items without a parseable date sort first
        SortKey::Date => a.parsed_datetime().cmp(&b.parsed_datetime()),
        SortKey::CloudCover => cloud_cover(a).total_cmp(&cloud_cover(b)),
        SortKey::Collection => text(&a.collection).cmp(text(&b.collection)),
        SortKey::Area => area(a).total_cmp(&area(b)),
        SortKey::Id => text(&a.id).cmp(text(&b.id)),
    }
}

fn cloud_cover(item: &CatalogItem) -> f64 {
    item.cloud_cover().unwrap_or(MISSING_CLOUD_COVER)
}

fn area(item: &CatalogItem) -> f64 {
    item.shape().map_or(0.0, geometry::area)
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}
