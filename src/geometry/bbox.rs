use serde::{Deserialize, Serialize};

use crate::catalog::{Geometry, Position};

/// Axis-aligned box, serialized as `[minX, minY, maxX, maxY]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn from_position(position: &Position) -> Self {
        Self::new(position.x, position.y, position.x, position.y)
    }

    fn expand(self, position: &Position) -> Self {
        Self::new(
            self.min_x.min(position.x),
            self.min_y.min(position.y),
            self.max_x.max(position.x),
            self.max_y.max(position.y),
        )
    }

    /// Smallest box covering both
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Overlap test; boxes that only touch along an edge still intersect
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        !(self.max_x < other.min_x
            || other.max_x < self.min_x
            || self.max_y < other.min_y
            || other.max_y < self.min_y)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([min_x, min_y, max_x, max_y]: [f64; 4]) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y]
    }
}

/// Bounding box over every position of the geometry; `None` when it has none
pub fn bounding_box(geometry: &Geometry) -> Option<BoundingBox> {
    let mut positions = geometry.positions();
    let first = BoundingBox::from_position(positions.next()?);
    Some(positions.fold(first, BoundingBox::expand))
}

/// Approximate spatial test: true when the two bounding boxes overlap.
///
/// Two triangles in opposite corners of the same square report `true`.
/// Geometries without positions never intersect anything.
pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    match (bounding_box(a), bounding_box(b)) {
        (Some(box_a), Some(box_b)) => box_a.intersects(&box_b),
        _ => false,
    }
}
