//! Catalog data model (STAC items and collections)
//!
//! These types mirror the JSON shapes the UI sends across the worker
//! boundary. Every struct keeps unknown members in a flattened `extra`
//! map so records survive a trip through the engine without losing
//! fields the engine does not interpret.
//!
//! - [`CatalogItem`] - a GeoJSON Feature with STAC properties and assets
//! - [`Geometry`] - tagged union over the six GeoJSON geometry types
//! - [`CatalogCollection`] - dataset descriptor with spatial/temporal extent

mod collection;
mod item;
mod time;

pub use collection::{
    CatalogCollection, CollectionProperties, Extent, SpatialExtent, TemporalExtent,
};
pub use item::{
    Asset, CatalogItem, ComputedFields, Geometry, ItemGeometry, Position, PositionError,
    deserialize_items,
};
pub use time::{format_timestamp, parse_datetime};
