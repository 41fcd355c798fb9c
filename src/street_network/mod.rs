//! The `street_network` module holds the queryable street-centerline graph the matcher resolves
//! boundary segments against (§4.3). Segments are indexed in an R-tree over their bounding boxes so
//! name, bounding-box, and radius queries stay fast on city-sized networks.
use crate::geo_math::{bbox_of, closest_point_on_polyline, haversine_m};
use crate::normalizer;
use rstar::{AABB, RTree, RTreeObject};
use std::collections::HashMap;

/// A single street centerline, as pulled from the source street-network data (TIGER/Line, OSM
/// extract, or a municipal GIS layer). Acquiring this data is out of scope for this crate: callers
/// construct [`StreetSegment`] values from whatever source they have.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetSegment {
    /// Stable identifier from the source dataset.
    pub id: String,
    /// Canonical street name as it appears in the source dataset, unnormalized.
    pub name: String,
    /// Alternate names the same physical street is known by.
    pub alt_names: Vec<String>,
    /// USPS street type, if the source dataset carries one separately from `name`.
    pub street_type: Option<String>,
    /// Highway classification from the source dataset (e.g. `"residential"`, `"primary"`).
    pub highway_class: Option<String>,
    /// Polyline geometry, `(lon, lat)` pairs in WGS84, at least two points.
    pub geometry: Vec<(f64, f64)>,
}

impl StreetSegment {
    /// The `bbox` function returns `[min_lon, min_lat, max_lon, max_lat]` enclosing `geometry`.
    pub fn bbox(&self) -> [f64; 4] {
        bbox_of(&self.geometry)
    }

    /// The `names` function returns `name` followed by every entry of `alt_names`, the full set of
    /// strings a name lookup should match against.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alt_names.iter().map(|s| s.as_str()))
    }

    /// The `start` function returns the first vertex of `geometry`.
    pub fn start(&self) -> (f64, f64) {
        self.geometry[0]
    }

    /// The `end` function returns the last vertex of `geometry`.
    pub fn end(&self) -> (f64, f64) {
        self.geometry[self.geometry.len() - 1]
    }

    /// The `bearing_deg` function returns the compass bearing (degrees, `0` = north, clockwise) from
    /// the segment's first vertex to its last.
    pub fn bearing_deg(&self) -> f64 {
        let (lon1, lat1) = self.start();
        let (lon2, lat2) = self.end();
        let dlon = (lon2 - lon1).to_radians();
        let lat1r = lat1.to_radians();
        let lat2r = lat2.to_radians();
        let y = dlon.sin() * lat2r.cos();
        let x = lat1r.cos() * lat2r.sin() - lat1r.sin() * lat2r.cos() * dlon.cos();
        let deg = y.atan2(x).to_degrees();
        (deg + 360.0) % 360.0
    }

    /// The `length_m` function returns the haversine length of the polyline, summed segment by
    /// segment.
    pub fn length_m(&self) -> f64 {
        self.geometry
            .windows(2)
            .map(|w| haversine_m(w[0], w[1]))
            .sum()
    }
}

#[derive(Clone)]
struct IndexedSegment {
    envelope: AABB<[f64; 2]>,
    position: usize,
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// The `StreetNetwork` struct owns a city's street centerlines plus the indexes the matcher queries
/// them through: an R-tree over bounding boxes for spatial lookups, and a name index normalized
/// through [`crate::normalizer`] for name-based lookups.
pub struct StreetNetwork {
    segments: Vec<StreetSegment>,
    tree: RTree<IndexedSegment>,
    by_normalized_name: HashMap<String, Vec<usize>>,
}

impl StreetNetwork {
    /// The `build` function constructs a [`StreetNetwork`] from a flat list of segments, bulk
    /// loading the spatial index and the name index in one pass.
    pub fn build(segments: Vec<StreetSegment>) -> Self {
        let mut by_normalized_name: HashMap<String, Vec<usize>> = HashMap::new();
        let indexed: Vec<IndexedSegment> = segments
            .iter()
            .enumerate()
            .map(|(position, seg)| {
                for name in seg.names() {
                    let normalized = normalizer::canonicalize(name).normalized;
                    let bucket = by_normalized_name.entry(normalized).or_default();
                    if !bucket.contains(&position) {
                        bucket.push(position);
                    }
                }
                let [min_x, min_y, max_x, max_y] = bbox_of(&seg.geometry);
                IndexedSegment {
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                    position,
                }
            })
            .collect();
        let tree = RTree::bulk_load(indexed);
        Self {
            segments,
            tree,
            by_normalized_name,
        }
    }

    /// The `len` function returns the number of segments in the network.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// The `is_empty` function returns true when the network has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The `segment` function returns the segment at `position`, the index used throughout match
    /// results to refer back into this network.
    pub fn segment(&self, position: usize) -> Option<&StreetSegment> {
        self.segments.get(position)
    }

    /// The `find_by_name` function returns the positions of every segment whose canonical name or
    /// any alt-name normalizes identically to `name`, per the §4.3 contract.
    pub fn find_by_name(&self, name: &str) -> Vec<usize> {
        let target = normalizer::canonicalize(name);
        self.by_normalized_name
            .get(&target.normalized)
            .cloned()
            .unwrap_or_default()
    }

    /// The `name_similarity` function returns the best similarity between `name` and any of
    /// `segment`'s names (canonical or alt), the `name_sim` term used by the matcher's candidate
    /// score.
    pub fn name_similarity(name: &str, segment: &StreetSegment) -> f64 {
        let target = normalizer::canonicalize(name);
        segment
            .names()
            .map(|n| normalizer::sim(&target, &normalizer::canonicalize(n)))
            .fold(0.0_f64, f64::max)
    }

    /// The `find_in_bbox` function returns the positions of every segment whose bounding box
    /// intersects `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn find_in_bbox(&self, bbox: [f64; 4]) -> Vec<usize> {
        let envelope = AABB::from_corners([bbox[0], bbox[1]], [bbox[2], bbox[3]]);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|seg| seg.position)
            .collect()
    }

    /// The `find_near_point` function returns the positions of segments whose true closest-point
    /// distance to `point` is within `radius_m`. The bounding box is widened by a coarse
    /// degrees-per-meter conversion so the envelope query never undershoots at the poles, then every
    /// bbox hit is re-checked against the haversine distance to its closest point on the polyline so
    /// a segment whose bbox merely overlaps the envelope without actually coming within `radius_m`
    /// is not returned.
    pub fn find_near_point(&self, point: (f64, f64), radius_m: f64) -> Vec<usize> {
        let lat_rad = point.1.to_radians();
        let deg_per_m_lat = 1.0 / 111_320.0;
        let deg_per_m_lon = 1.0 / (111_320.0 * lat_rad.cos().max(0.01));
        let dlat = radius_m * deg_per_m_lat;
        let dlon = radius_m * deg_per_m_lon;
        let bbox_hits = self.find_in_bbox([
            point.0 - dlon,
            point.1 - dlat,
            point.0 + dlon,
            point.1 + dlat,
        ]);
        bbox_hits
            .into_iter()
            .filter(|&position| {
                let segment = &self.segments[position];
                closest_point_on_polyline(point, &segment.geometry)
                    .is_some_and(|closest| haversine_m(point, closest) <= radius_m)
            })
            .collect()
    }
}
