use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A STAC collection descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub summaries: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<CollectionProperties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialExtent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalExtent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `extent.spatial.bbox`: one or more `[west, south, east, north]` boxes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpatialExtent {
    #[serde(default)]
    pub bbox: Vec<Vec<f64>>,
}

/// `extent.temporal.interval`: `[start, end]` pairs, `null` end means open-ended
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalExtent {
    #[serde(default)]
    pub interval: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CollectionProperties {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogCollection {
    pub fn bboxes(&self) -> &[Vec<f64>] {
        self.extent
            .as_ref()
            .and_then(|extent| extent.spatial.as_ref())
            .map(|spatial| spatial.bbox.as_slice())
            .unwrap_or_default()
    }

    pub fn intervals(&self) -> &[Vec<Option<String>>] {
        self.extent
            .as_ref()
            .and_then(|extent| extent.temporal.as_ref())
            .map(|temporal| temporal.interval.as_slice())
            .unwrap_or_default()
    }

    /// Secondary keyword list under `properties.keywords`
    pub fn property_keywords(&self) -> &[String] {
        self.properties
            .as_ref()
            .map(|props| props.keywords.as_slice())
            .unwrap_or_default()
    }
}
