//! Geometry engine
//!
//! Pure functions over [`Geometry`](crate::catalog::Geometry) values. The
//! measurements are planar and deliberately simple:
//!
//! - [`bounding_box`] flattens any geometry type to `[minX, minY, maxX, maxY]`
//! - [`area`] is the shoelace area of a Polygon's outer ring, 0 for every other type
//! - [`centroid`] is the vertex average of a Polygon's outer ring, `[0, 0]` otherwise
//! - [`simplify`] runs Douglas-Peucker on each ring of a Polygon
//! - [`intersects`] compares bounding boxes only, so it can report
//!   overlaps that the exact shapes do not have

mod bbox;
mod measure;
mod simplify;

pub use bbox::{BoundingBox, bounding_box, intersects};
pub use measure::{area, centroid, ring_area, ring_centroid};
pub use simplify::{perpendicular_distance, simplify, simplify_ring};
