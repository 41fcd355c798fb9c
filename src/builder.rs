//! The `builder` module turns matched coordinates into a valid, closed GeoJSON polygon (§4.5),
//! logging every repair it had to make along the way.
use crate::geo_math::{
    douglas_peucker, has_self_intersection, haversine_m, reverse_ring, ring_area_m2,
    signed_ring_area,
};
use crate::model::{SegmentMatchResult, WardLegalDescription};
use derive_new::new;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};
use tracing::instrument;

/// A single repair the builder had to apply while assembling a ring.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum PolygonRepair {
    /// A gap between consecutive segments was bridged without extra geometry.
    #[display("gap_filled: {_0:.1}m")]
    GapFilled(f64),
    /// The ring was not closed; the first vertex was appended to close it.
    #[display("ring_closed: {_0:.1}m gap")]
    RingClosed(f64),
    /// The ring's winding order was reversed to satisfy the RFC 7946 CCW convention.
    #[display("winding_reversed")]
    WindingReversed,
    /// Douglas-Peucker simplification dropped vertices.
    #[display("simplified: {_0} -> {_1} vertices")]
    Simplified(usize, usize),
}

/// Tunables for [`build_polygon_from_matches`]. Defaults mirror §4.5.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct PolygonBuilderConfig {
    /// Maximum haversine gap, in meters, the builder will bridge without failing.
    #[new(value = "200.0")]
    pub max_auto_fill_gap_m: f64,
    /// Minimum ring area, in square meters, below which the polygon is rejected.
    #[new(value = "1000.0")]
    pub min_ring_area_m2: f64,
    /// Douglas-Peucker tolerance in meters; `0.0` disables simplification.
    #[new(value = "0.0")]
    pub simplify_tolerance_m: f64,
    /// Whether to reverse a clockwise ring to the RFC 7946 CCW convention.
    #[new(value = "true")]
    pub enforce_winding_order: bool,
    /// Whether a detected self-intersection should fail the build (removal is out of scope).
    #[new(value = "true")]
    pub remove_self_intersections: bool,
}

impl Default for PolygonBuilderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural validation facts about an assembled ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonValidation {
    /// True when the first and last coordinates coincide.
    pub is_closed: bool,
    /// True when the ring winds counter-clockwise.
    pub is_counter_clockwise: bool,
    /// True when `area_m2 >= min_ring_area_m2`.
    pub has_valid_area: bool,
    /// Ring area in square meters.
    pub area_m2: f64,
    /// True when any non-adjacent edge pair crosses.
    pub has_self_intersections: bool,
    /// Number of vertices in the final ring, including the closing duplicate.
    pub vertex_count: usize,
}

/// Outcome of [`build_polygon_from_matches`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    /// True when a polygon was produced.
    pub success: bool,
    /// The assembled polygon, present only on success.
    pub feature: Option<Feature>,
    /// Structural validation facts, present only on success.
    pub validation: Option<PolygonValidation>,
    /// Ordered log of repairs applied.
    pub repairs: Vec<PolygonRepair>,
    /// Explanation, populated on failure.
    pub reason: Option<String>,
}

impl BuildResult {
    fn failure(reason: impl Into<String>, repairs: Vec<PolygonRepair>) -> Self {
        Self {
            success: false,
            feature: None,
            validation: None,
            repairs,
            reason: Some(reason.into()),
        }
    }
}

/// The `build_polygon_from_matches` function runs the §4.5 pipeline: concatenate matched
/// coordinates, close the ring, enforce winding, optionally simplify, validate area, and check for
/// self-intersections.
#[instrument(skip(matches, config), fields(segments = matches.len()))]
pub fn build_polygon_from_matches(
    matches: &[SegmentMatchResult],
    config: &PolygonBuilderConfig,
) -> BuildResult {
    let mut repairs = Vec::new();
    let mut coordinates: Vec<(f64, f64)> = Vec::new();

    for result in matches {
        if let (Some(&tail), Some(&head)) = (coordinates.last(), result.coordinates.first()) {
            let gap = haversine_m(tail, head);
            if gap > config.max_auto_fill_gap_m {
                return BuildResult::failure(
                    format!("gap of {gap:.1}m between matched segments exceeds tolerance"),
                    repairs,
                );
            }
            if gap > 1.0 {
                repairs.push(PolygonRepair::GapFilled(gap));
            }
        }
        coordinates.extend(result.coordinates.iter().copied());
    }

    if coordinates.len() < 3 {
        return BuildResult::failure("fewer than 3 coordinates to build a ring", repairs);
    }

    let closing_gap = haversine_m(coordinates[0], *coordinates.last().unwrap());
    if closing_gap > config.max_auto_fill_gap_m {
        return BuildResult::failure(
            format!("closing gap of {closing_gap:.1}m exceeds tolerance"),
            repairs,
        );
    }
    if closing_gap > 1.0 {
        repairs.push(PolygonRepair::RingClosed(closing_gap));
    }
    coordinates.push(coordinates[0]);

    let mut signed_area = signed_ring_area(&coordinates);
    if config.enforce_winding_order && signed_area < 0.0 {
        coordinates = reverse_ring(&coordinates);
        signed_area = -signed_area;
        repairs.push(PolygonRepair::WindingReversed);
    }

    if config.simplify_tolerance_m > 0.0 {
        let before = coordinates.len();
        let tolerance_deg = config.simplify_tolerance_m / 111_000.0;
        let mut simplified = douglas_peucker(&coordinates, tolerance_deg);
        if simplified.first() != simplified.last() {
            let first = simplified[0];
            simplified.push(first);
        }
        if simplified.len() != before {
            repairs.push(PolygonRepair::Simplified(before, simplified.len()));
        }
        coordinates = simplified;
        signed_area = signed_ring_area(&coordinates);
    }

    let area_m2 = ring_area_m2(&coordinates);
    let has_valid_area = area_m2 >= config.min_ring_area_m2;
    if !has_valid_area {
        return BuildResult::failure(
            format!("ring area {area_m2:.1}m2 is below the minimum {:.1}m2", config.min_ring_area_m2),
            repairs,
        );
    }

    let has_self_intersections = has_self_intersection(&coordinates);
    if has_self_intersections && config.remove_self_intersections {
        return BuildResult::failure("Polygon has self-intersections", repairs);
    }

    let ring: Vec<Vec<f64>> = coordinates.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    let geometry = Geometry::new(Value::Polygon(vec![ring]));
    let feature = Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: None,
        foreign_members: None,
    };

    BuildResult {
        success: true,
        feature: Some(feature),
        validation: Some(PolygonValidation {
            is_closed: true,
            is_counter_clockwise: signed_area > 0.0,
            has_valid_area,
            area_m2,
            has_self_intersections,
            vertex_count: coordinates.len(),
        }),
        repairs,
        reason: None,
    }
}

/// The `build_ward_polygon` function runs [`build_polygon_from_matches`] and tags the resulting
/// feature's properties with the ward's identity.
pub fn build_ward_polygon(
    ward: &WardLegalDescription,
    matches: &[SegmentMatchResult],
    config: &PolygonBuilderConfig,
) -> BuildResult {
    let mut result = build_polygon_from_matches(matches, config);
    if let Some(feature) = result.feature.as_mut() {
        let mut properties = Map::new();
        properties.insert("ward_id".to_string(), json!(ward.ward_id));
        properties.insert("ward_name".to_string(), json!(ward.ward_name));
        properties.insert("city_fips".to_string(), json!(ward.city_fips));
        feature.properties = Some(properties);
    }
    result
}

/// Summary of [`combine_ward_polygons`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedWards {
    /// Every successfully built polygon, as a FeatureCollection.
    pub collection: FeatureCollection,
    /// Number of wards whose build succeeded.
    pub success_count: usize,
    /// Number of wards whose build failed.
    pub failure_count: usize,
}

/// The `combine_ward_polygons` function aggregates successful builds into one FeatureCollection,
/// keeping success/failure counts across the whole city.
pub fn combine_ward_polygons(results: &[BuildResult]) -> CombinedWards {
    let mut collection = FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    };
    let mut success_count = 0;
    let mut failure_count = 0;
    for result in results {
        match &result.feature {
            Some(feature) => {
                collection.features.push(feature.clone());
                success_count += 1;
            }
            None => failure_count += 1,
        }
    }
    CombinedWards {
        collection,
        success_count,
        failure_count,
    }
}
