use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

use super::time::parse_datetime;

pub const CLOUD_COVER_PROPERTY: &str = "eo:cloud_cover";
const FEATURE_TYPE: &str = "Feature";

#[derive(Debug, Error, PartialEq)]
pub enum PositionError {
    #[error("position needs at least 2 coordinates, got {0}")]
    TooFewCoordinates(usize),
}

/// A GeoJSON position: `[x, y]` followed by any further ordinates
/// (altitude, measure...), which are carried through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub ordinates: Vec<f64>,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ordinates: Vec::new(),
        }
    }

    /// Third ordinate, when present
    pub fn z(&self) -> Option<f64> {
        self.ordinates.first().copied()
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = PositionError;

    fn try_from(coords: Vec<f64>) -> Result<Self, Self::Error> {
        match coords.as_slice() {
            [x, y, rest @ ..] => Ok(Self {
                x: *x,
                y: *y,
                ordinates: rest.to_vec(),
            }),
            _ => Err(PositionError::TooFewCoordinates(coords.len())),
        }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        let mut coords = Vec::with_capacity(2 + position.ordinates.len());
        coords.push(position.x);
        coords.push(position.y);
        coords.extend(position.ordinates);
        coords
    }
}

/// GeoJSON geometry with coordinates nested to the depth of its type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Every position in the geometry, flattened regardless of nesting depth
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point(point) => Box::new(std::iter::once(point)),
            Geometry::LineString(line) | Geometry::MultiPoint(line) => Box::new(line.iter()),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                Box::new(rings.iter().flatten())
            }
            Geometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten())
            }
        }
    }
}

/// Geometry member of an item as it arrived on the wire.
///
/// Shapes the geometry engine does not model (`GeometryCollection`,
/// positions with a single ordinate, foreign types) are kept verbatim so
/// the item still round-trips; they measure as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemGeometry {
    Known(Geometry),
    Unsupported(Value),
}

impl ItemGeometry {
    pub fn shape(&self) -> Option<&Geometry> {
        match self {
            ItemGeometry::Known(geometry) => Some(geometry),
            ItemGeometry::Unsupported(_) => None,
        }
    }
}

impl From<Geometry> for ItemGeometry {
    fn from(geometry: Geometry) -> Self {
        ItemGeometry::Known(geometry)
    }
}

/// Asset link attached to an item (`thumbnail`, `preview`, data files...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Values derived by the search-results pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedFields {
    pub area: f64,
    pub centroid: [f64; 2],
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<u8>,
}

/// A STAC item. Structural members are optional so that malformed
/// records can still be read and then rejected by [`CatalogItem::is_valid`].
/// `_computed` is the enrichment block attached by the search-results pass;
/// it is absent on items that have not been through it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<ItemGeometry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(rename = "_computed", default, skip_serializing_if = "Option::is_none")]
    pub computed: Option<ComputedFields>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogItem {
    /// Read an item out of an arbitrary JSON value, keeping it only when
    /// it is structurally a valid Feature.
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value::<Self>(value)
            .ok()
            .filter(Self::is_valid)
    }

    /// Non-empty `id`, `type == "Feature"`, and both `properties` and `geometry` present
    pub fn is_valid(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
            && self.kind.as_deref() == Some(FEATURE_TYPE)
            && self.properties.is_some()
            && self.geometry.is_some()
    }

    /// The item's geometry when it is one the geometry engine understands
    pub fn shape(&self) -> Option<&Geometry> {
        self.geometry.as_ref().and_then(ItemGeometry::shape)
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|props| props.get(key))
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Value::as_str)
    }

    /// Raw `properties.datetime`
    pub fn datetime(&self) -> Option<&str> {
        self.property_str("datetime")
    }

    /// `properties.datetime` parsed as UTC, `None` when missing or unparsable
    pub fn parsed_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.datetime().and_then(parse_datetime)
    }

    /// Numeric `eo:cloud_cover`; non-numeric values count as absent
    pub fn cloud_cover(&self) -> Option<f64> {
        self.property(CLOUD_COVER_PROPERTY).and_then(Value::as_f64)
    }

    pub fn asset_href(&self, key: &str) -> Option<&str> {
        self.assets.get(key).and_then(|asset| asset.href.as_deref())
    }
}

/// Decode a JSON array of items entry by entry, silently skipping the
/// entries that are not item-shaped at all (numbers, strings, an `id`
/// that is not a string...). Use with `#[serde(deserialize_with)]`.
pub fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<CatalogItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    let total = values.len();
    let items: Vec<CatalogItem> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    if items.len() < total {
        debug!(total, skipped = total - items.len(), "Skipped unreadable catalog items");
    }
    Ok(items)
}
