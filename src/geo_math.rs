//! The `geo_math` module holds the small set of coordinate-geometry primitives shared by the
//! matcher, builder and validator: haversine distance, parametric line intersection, signed ring
//! area/centroid, and Douglas-Peucker simplification. Everything here operates on bare `(lon, lat)`
//! pairs in WGS84 degrees; there is no projection step.
//!
//! Earth radius in meters, used by [`haversine_m`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Degrees-to-meters conversion used for radius queries (`radius_m / DEG_TO_M`), per the spec's
/// small-polygon approximation. Not valid outside a municipal bounding box.
pub const DEG_TO_M: f64 = 111_000.0;

/// Tolerance below which a line-intersection denominator is treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

/// A bare lon/lat position. Kept as a plain tuple alias (rather than a newtype) since every stage
/// passes these by value through ordinary `Vec` collections.
pub type Position = (f64, f64);

/// The `haversine_m` function returns the great-circle distance in meters between two WGS84
/// lon/lat positions.
pub fn haversine_m(a: Position, b: Position) -> f64 {
    let (lon1, lat1) = a;
    let (lon2, lat2) = b;
    let (lat1, lat2, dlat, dlon) = (
        lat1.to_radians(),
        lat2.to_radians(),
        (lat2 - lat1).to_radians(),
        (lon2 - lon1).to_radians(),
    );
    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// The `closest_point_on_segment` function projects `p` onto the segment `a`-`b` and returns the
/// closest point, clamped to the segment's endpoints. Distances are computed in a local equirectangular
/// approximation (degrees scaled by cos(mean latitude)) since the segment span is always small.
pub fn closest_point_on_segment(p: Position, a: Position, b: Position) -> Position {
    let mean_lat = ((a.1 + b.1 + p.1) / 3.0).to_radians();
    let scale = mean_lat.cos().max(1e-6);
    let (ax, ay) = (a.0 * scale, a.1);
    let (bx, by) = (b.0 * scale, b.1);
    let (px, py) = (p.0 * scale, p.1);
    let (dx, dy) = (bx - ax, by - ay);
    let len2 = dx * dx + dy * dy;
    let t = if len2 < 1e-18 {
        0.0
    } else {
        (((px - ax) * dx + (py - ay) * dy) / len2).clamp(0.0, 1.0)
    };
    (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1))
}

/// The `closest_point_on_polyline` function returns the point on the polyline `line` closest to
/// `p`, by scanning every consecutive vertex pair. Returns `None` for a polyline with fewer than
/// two vertices.
pub fn closest_point_on_polyline(p: Position, line: &[Position]) -> Option<Position> {
    line.windows(2)
        .map(|pair| closest_point_on_segment(p, pair[0], pair[1]))
        .min_by(|a, b| {
            haversine_m(p, *a)
                .partial_cmp(&haversine_m(p, *b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// The result of solving the parametric intersection of two 2-D segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    /// Parametric position along the first segment, `0..=1` when the intersection lies within it.
    pub t1: f64,
    /// Parametric position along the second segment, `0..=1` when the intersection lies within it.
    pub t2: f64,
    /// The intersection point of the two infinite lines carrying the segments.
    pub point: Position,
}

/// The `line_intersection` function solves for the parametric intersection of segment `p1`-`p2`
/// with segment `p3`-`p4`. Returns `None` if the segments are parallel (denominator within
/// [`PARALLEL_EPSILON`] of zero). Callers decide whether `t1`/`t2` lying in `0..=1` constitutes a
/// true crossing, or whether to fall back to endpoint/near-miss snapping.
pub fn line_intersection(
    p1: Position,
    p2: Position,
    p3: Position,
    p4: Position,
) -> Option<SegmentIntersection> {
    let (x1, y1) = p1;
    let (x2, y2) = p2;
    let (x3, y3) = p3;
    let (x4, y4) = p4;
    let denom = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t1 = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / denom;
    let t2 = ((x1 - x3) * (y1 - y2) - (y1 - y3) * (x1 - x2)) / denom;
    let point = (x1 + t1 * (x2 - x1), y1 + t1 * (y2 - y1));
    Some(SegmentIntersection { t1, t2, point })
}

/// The `midpoint` function returns the arithmetic midpoint of two positions. Used when snapping a
/// near-miss or endpoint join, since no true intersection point exists.
pub fn midpoint(a: Position, b: Position) -> Position {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// The `signed_ring_area` function computes the shoelace signed area of a ring in squared degrees.
/// Positive under standard lon/lat winding means counter-clockwise, matching the RFC 7946
/// exterior-ring convention.
pub fn signed_ring_area(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

/// The `mean_latitude` function averages the latitude of a ring's vertices, used to scale the
/// degree-to-meter conversion for area calculations.
pub fn mean_latitude(ring: &[Position]) -> f64 {
    if ring.is_empty() {
        return 0.0;
    }
    ring.iter().map(|p| p.1).sum::<f64>() / ring.len() as f64
}

/// The `ring_area_m2` function converts a ring's signed shoelace area (in squared degrees) to
/// square meters, scaling by the cosine of the ring's mean latitude per the spec's small-polygon
/// approximation. Not valid for continental-scale polygons.
pub fn ring_area_m2(ring: &[Position]) -> f64 {
    let area_deg2 = signed_ring_area(ring).abs();
    let lat_rad = mean_latitude(ring).to_radians();
    area_deg2 * DEG_TO_M * (DEG_TO_M * lat_rad.cos())
}

/// The `ring_centroid` function computes the shoelace centroid of a ring. Returns `(0.0, 0.0)` for
/// a degenerate ring (zero signed area or fewer than 3 points).
pub fn ring_centroid(ring: &[Position]) -> Position {
    if ring.len() < 3 {
        return (0.0, 0.0);
    }
    let area = signed_ring_area(ring);
    if area.abs() < 1e-18 {
        let n = ring.len() as f64;
        return (
            ring.iter().map(|p| p.0).sum::<f64>() / n,
            ring.iter().map(|p| p.1).sum::<f64>() / n,
        );
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let (x1, y1) = ring[i];
        let (x2, y2) = ring[(i + 1) % ring.len()];
        let cross = x1 * y2 - x2 * y1;
        cx += (x1 + x2) * cross;
        cy += (y1 + y2) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    (cx * factor, cy * factor)
}

/// The `close_ring` function appends the first vertex to the end of `ring` if it is not already
/// closed. Idempotent: calling it twice on an already-closed ring is a no-op.
pub fn close_ring(ring: &[Position]) -> Vec<Position> {
    let mut out = ring.to_vec();
    match (out.first().copied(), out.last().copied()) {
        (Some(first), Some(last)) if first != last => out.push(first),
        _ => {}
    }
    out
}

/// The `reverse_ring` function reverses vertex order, flipping the sign of [`signed_ring_area`].
pub fn reverse_ring(ring: &[Position]) -> Vec<Position> {
    let mut out = ring.to_vec();
    out.reverse();
    out
}

/// The `has_self_intersection` function checks every non-adjacent pair of ring edges for a true
/// crossing (`t1, t2` strictly inside `(epsilon, 1 - epsilon)`), per the spec's self-intersection
/// detector. Adjacent edges (sharing a vertex) are excluded, since they always "intersect" at the
/// shared vertex.
pub fn has_self_intersection(ring: &[Position]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    let eps = PARALLEL_EPSILON;
    for i in 0..n {
        let (a1, a2) = (ring[i], ring[(i + 1) % n]);
        for j in (i + 1)..n {
            // Skip edges adjacent to edge i (share a vertex), including the wraparound pair.
            if j == i || j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (b1, b2) = (ring[j], ring[(j + 1) % n]);
            if let Some(x) = line_intersection(a1, a2, b1, b2)
                && x.t1 > eps
                && x.t1 < 1.0 - eps
                && x.t2 > eps
                && x.t2 < 1.0 - eps
            {
                return true;
            }
        }
    }
    false
}

/// The `douglas_peucker` function simplifies a polyline to within `tolerance_deg`, measured in the
/// same unit as the input coordinates (typically pre-converted from meters via `tol_m / DEG_TO_M`).
pub fn douglas_peucker(points: &[Position], tolerance_deg: f64) -> Vec<Position> {
    if points.len() < 3 || tolerance_deg <= 0.0 {
        return points.to_vec();
    }
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    simplify_range(points, 0, points.len() - 1, tolerance_deg, &mut keep);
    points
        .iter()
        .zip(keep.iter())
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn simplify_range(points: &[Position], start: usize, end: usize, tolerance: f64, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }
    let (a, b) = (points[start], points[end]);
    let mut max_dist = 0.0;
    let mut max_idx = start;
    for i in (start + 1)..end {
        let proj = closest_point_on_segment(points[i], a, b);
        let dist = haversine_m(points[i], proj);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }
    let tolerance_m = tolerance * DEG_TO_M;
    if max_dist > tolerance_m {
        keep[max_idx] = true;
        simplify_range(points, start, max_idx, tolerance, keep);
        simplify_range(points, max_idx, end, tolerance, keep);
    }
}

/// The `bbox_of` function computes an axis-aligned `[min_lon, min_lat, max_lon, max_lat]` envelope
/// for a polyline.
pub fn bbox_of(points: &[Position]) -> [f64; 4] {
    let mut min_lon = f64::MAX;
    let mut min_lat = f64::MAX;
    let mut max_lon = f64::MIN;
    let mut max_lat = f64::MIN;
    for &(lon, lat) in points {
        min_lon = min_lon.min(lon);
        min_lat = min_lat.min(lat);
        max_lon = max_lon.max(lon);
        max_lat = max_lat.max(lat);
    }
    [min_lon, min_lat, max_lon, max_lat]
}

/// The `bbox_overlaps` function returns true if two `[min_lon, min_lat, max_lon, max_lat]`
/// envelopes overlap or touch.
pub fn bbox_overlaps(a: [f64; 4], b: [f64; 4]) -> bool {
    a[0] <= b[2] && b[0] <= a[2] && a[1] <= b[3] && b[1] <= a[3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_distance() {
        let p = (-123.33, 42.44);
        assert!(haversine_m(p, p) < 1e-9);
    }

    #[test]
    fn haversine_symmetric() {
        let a = (-123.0, 42.0);
        let b = (-123.01, 42.01);
        assert!((haversine_m(a, b) - haversine_m(b, a)).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_crossing_at_origin() {
        let x = line_intersection((-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)).unwrap();
        assert!((x.point.0 - 0.0).abs() < 1e-9);
        assert!((x.point.1 - 0.0).abs() < 1e-9);
        assert!((x.t1 - 0.5).abs() < 1e-9);
        assert!((x.t2 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parallel_lines_have_no_intersection() {
        let x = line_intersection((0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0));
        assert!(x.is_none());
    }

    #[test]
    fn ccw_square_has_positive_area() {
        let ring = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert!(signed_ring_area(&ring) > 0.0);
        let reversed = reverse_ring(&ring);
        assert!(signed_ring_area(&reversed) < 0.0);
    }

    #[test]
    fn close_ring_is_idempotent() {
        let ring = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let once = close_ring(&ring);
        let twice = close_ring(&once);
        assert_eq!(once, twice);
        assert_eq!(once.first(), once.last());
    }

    #[test]
    fn self_intersecting_bowtie_detected() {
        let ring = vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)];
        assert!(has_self_intersection(&ring));
    }

    #[test]
    fn simple_square_has_no_self_intersection() {
        let ring = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        assert!(!has_self_intersection(&ring));
    }
}
