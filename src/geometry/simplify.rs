use crate::catalog::{Geometry, Position};

/// Douglas-Peucker simplification of every ring of a Polygon.
///
/// Other geometry types come back unchanged.
pub fn simplify(geometry: &Geometry, tolerance: f64) -> Geometry {
    match geometry {
        Geometry::Polygon(rings) => Geometry::Polygon(
            rings
                .iter()
                .map(|ring| simplify_ring(ring, tolerance))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Douglas-Peucker over a single ring.
///
/// Anchors on the first and last point and keeps the interior point
/// farthest from the anchor segment whenever that distance exceeds
/// `tolerance`, then repeats on both halves. Uses an explicit work stack,
/// so long jagged rings cannot overflow the call stack. The output is
/// always a subsequence of the input; rings of two points or fewer are
/// returned as-is.
pub fn simplify_ring(ring: &[Position], tolerance: f64) -> Vec<Position> {
    if ring.len() <= 2 {
        return ring.to_vec();
    }

    let last = ring.len() - 1;
    let mut keep = vec![false; ring.len()];
    keep[0] = true;
    keep[last] = true;

    let mut pending = vec![(0, last)];
    while let Some((start, end)) = pending.pop() {
        if end - start < 2 {
            continue;
        }

        let mut farthest = start;
        let mut max_distance = 0.0;
        for index in start + 1..end {
            let distance = perpendicular_distance(&ring[index], &ring[start], &ring[end]);
            if distance > max_distance {
                max_distance = distance;
                farthest = index;
            }
        }

        if farthest != start && max_distance > tolerance {
            keep[farthest] = true;
            pending.push((start, farthest));
            pending.push((farthest, end));
        }
    }

    ring.iter()
        .zip(keep)
        .filter_map(|(position, kept)| kept.then(|| position.clone()))
        .collect()
}

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// When the anchors coincide (a closed ring) the line is undefined and
/// the plain distance to the anchor is used instead.
pub fn perpendicular_distance(point: &Position, start: &Position, end: &Position) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy);

    if length == 0.0 {
        return (point.x - start.x).hypot(point.y - start.y);
    }

    (dy * point.x - dx * point.y + end.x * start.y - end.y * start.x).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Position> {
        points.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn test_collinear_interior_points_removed_at_zero_tolerance() {
        let line = ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let simplified = simplify_ring(&line, 0.0);
        assert_eq!(simplified, ring(&[(0.0, 0.0), (3.0, 3.0)]));
    }

    #[test]
    fn test_offset_point_retained_at_zero_tolerance() {
        let line = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.5), (3.0, 0.0), (4.0, 0.0)]);
        let simplified = simplify_ring(&line, 0.0);
        assert!(simplified.contains(&Position::new(2.0, 0.5)));
        assert_eq!(simplified.first(), line.first());
        assert_eq!(simplified.last(), line.last());
    }

    #[test]
    fn test_small_rings_unchanged() {
        let empty: Vec<Position> = vec![];
        assert!(simplify_ring(&empty, 1.0).is_empty());

        let pair = ring(&[(0.0, 0.0), (5.0, 5.0)]);
        assert_eq!(simplify_ring(&pair, 1.0), pair);
    }

    #[test]
    fn test_tolerance_controls_detail() {
        let jagged = ring(&[(0.0, 0.0), (1.0, 0.1), (2.0, -0.1), (3.0, 0.05), (4.0, 0.0)]);

        let coarse = simplify_ring(&jagged, 1.0);
        assert_eq!(coarse, ring(&[(0.0, 0.0), (4.0, 0.0)]));

        let fine = simplify_ring(&jagged, 0.01);
        assert_eq!(fine.len(), jagged.len());
    }

    #[test]
    fn test_never_adds_points() {
        let wave: Vec<Position> = (0..200)
            .map(|i| Position::new(i as f64, ((i as f64) * 0.3).sin()))
            .collect();

        for tolerance in [0.0, 0.05, 0.5, 2.0] {
            let simplified = simplify_ring(&wave, tolerance);
            assert!(simplified.len() <= wave.len());
            assert!(simplified.len() >= 2);
        }
    }

    #[test]
    fn test_long_zigzag_ring() {
        // every split lands next to an anchor, the worst case for depth
        let zigzag: Vec<Position> = (0..5_000)
            .map(|i| Position::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }))
            .collect();
        let simplified = simplify_ring(&zigzag, 0.1);
        assert!(simplified.len() <= zigzag.len());
        assert_eq!(simplified.first(), zigzag.first());
        assert_eq!(simplified.last(), zigzag.last());
    }

    #[test]
    fn test_closed_ring_keeps_shape() {
        let square = ring(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        let simplified = simplify_ring(&square, 0.1);
        assert_eq!(simplified, square);
    }

    #[test]
    fn test_simplify_polygon_per_ring() {
        let outer = ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        let hole = ring(&[(0.5, 0.5), (1.0, 0.5), (1.5, 0.5), (1.5, 1.5), (0.5, 0.5)]);

        let simplified = simplify(&Geometry::Polygon(vec![outer, hole]), 0.0);
        let Geometry::Polygon(rings) = simplified else {
            panic!("expected polygon");
        };
        assert_eq!(rings.len(), 2);
        assert!(!rings[0].contains(&Position::new(1.0, 0.0)));
        assert!(!rings[1].contains(&Position::new(1.0, 0.5)));
    }

    #[test]
    fn test_simplify_leaves_other_types_alone() {
        let line = Geometry::LineString(ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(simplify(&line, 10.0), line);
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = perpendicular_distance(
            &Position::new(1.0, 1.0),
            &Position::new(0.0, 0.0),
            &Position::new(2.0, 0.0),
        );
        assert_eq!(d, 1.0);

        let degenerate = perpendicular_distance(
            &Position::new(3.0, 4.0),
            &Position::new(0.0, 0.0),
            &Position::new(0.0, 0.0),
        );
        assert_eq!(degenerate, 5.0);
    }
}
