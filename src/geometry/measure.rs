use crate::catalog::{Geometry, Position};

/// Planar area of a Polygon's outer ring. Holes are ignored and every
/// other geometry type measures 0.
pub fn area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(rings) => rings.first().map_or(0.0, |ring| ring_area(ring)),
        _ => 0.0,
    }
}

/// Shoelace formula over consecutive vertex pairs of a closed ring
pub fn ring_area(ring: &[Position]) -> f64 {
    let twice_area: f64 = ring
        .windows(2)
        .map(|pair| pair[0].x * pair[1].y - pair[1].x * pair[0].y)
        .sum();
    (twice_area / 2.0).abs()
}

/// Vertex average of a Polygon's outer ring; `[0, 0]` for other types.
///
/// This is not the area-weighted centroid.
pub fn centroid(geometry: &Geometry) -> [f64; 2] {
    match geometry {
        Geometry::Polygon(rings) => rings.first().map_or([0.0, 0.0], |ring| ring_centroid(ring)),
        _ => [0.0, 0.0],
    }
}

/// Mean of the distinct ring vertices. A closing vertex that repeats the
/// first one is not counted twice.
pub fn ring_centroid(ring: &[Position]) -> [f64; 2] {
    let vertices = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };

    if vertices.is_empty() {
        return [0.0, 0.0];
    }

    let count = vertices.len() as f64;
    let (sum_x, sum_y) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    [sum_x / count, sum_y / count]
}
