//! The `validator` module compares reconstructed ward polygons against a [`crate::golden`] golden
//! vector (§4.6): per-ward geometric metrics, a city-level rollup, and regression detection against
//! a prior run ([`regression`]).
pub mod regression;

use crate::geo_math::{bbox_of, haversine_m, ring_area_m2, ring_centroid};
use crate::golden::GoldenVector;
use derive_new::new;
use geo::{Contains, Coord, LineString, Point, Polygon};
use geojson::{Feature, Value};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::instrument;

fn to_geo_polygon(ring: &[(f64, f64)]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|&(x, y)| Coord { x, y }).collect();
    Polygon::new(LineString::new(coords), Vec::new())
}

/// Tunables for [`validate_ward_against_golden`]. Defaults mirror §4.6.
#[derive(Debug, Clone, Copy, PartialEq, new)]
pub struct GoldenVectorConfig {
    /// Maximum vertex-to-vertex Hausdorff distance, in meters, a ward may exhibit and still pass.
    #[new(value = "50.0")]
    pub max_hausdorff_distance_m: f64,
    /// Maximum `|actual - expected| / expected` area ratio a ward may exhibit and still pass.
    #[new(value = "0.05")]
    pub max_area_difference_ratio: f64,
    /// Maximum centroid distance, in meters, a ward may exhibit and still pass.
    #[new(value = "100.0")]
    pub max_centroid_distance_m: f64,
    /// Minimum grid-sampled IoU a ward must reach to pass.
    #[new(value = "0.90")]
    pub min_overlap_ratio: f64,
    /// Whether city-level validation should stop at the first ward failure.
    #[new(value = "false")]
    pub fail_fast: bool,
}

impl Default for GoldenVectorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Geometric comparison metrics for one ward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WardMetrics {
    /// Vertex-to-vertex Hausdorff distance, in meters.
    pub hausdorff_distance_m: f64,
    /// `|actual - expected| / expected`.
    pub area_difference_ratio: f64,
    /// Haversine distance between shoelace centroids, in meters.
    pub centroid_distance_m: f64,
    /// Grid-sampled intersection-over-union approximation.
    pub iou: f64,
}

/// Outcome of validating one ward against its golden counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct WardValidationResult {
    /// The ward this result belongs to.
    pub ward_id: String,
    /// True iff `failures` is empty.
    pub passed: bool,
    /// Computed metrics.
    pub metrics: WardMetrics,
    /// Reasons the ward failed, empty on success.
    pub failures: Vec<String>,
}

fn ring_of(feature: &Feature) -> Option<Vec<(f64, f64)>> {
    match feature.geometry.as_ref()?.value {
        Value::Polygon(ref rings) => {
            let outer = rings.first()?;
            Some(
                outer
                    .iter()
                    .map(|coord| (coord[0], coord[1]))
                    .collect(),
            )
        }
        _ => None,
    }
}

fn hausdorff_distance_m(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let one_way = |from: &[(f64, f64)], to: &[(f64, f64)]| -> f64 {
        from.iter()
            .map(|&p| {
                to.iter()
                    .map(|&q| haversine_m(p, q))
                    .fold(f64::INFINITY, f64::min)
            })
            .fold(0.0, f64::max)
    };
    one_way(a, b).max(one_way(b, a))
}

fn iou_approx(a: &[(f64, f64)], b: &[(f64, f64)]) -> f64 {
    let bbox_a = bbox_of(a);
    let bbox_b = bbox_of(b);
    let min_lon = bbox_a[0].min(bbox_b[0]);
    let min_lat = bbox_a[1].min(bbox_b[1]);
    let max_lon = bbox_a[2].max(bbox_b[2]);
    let max_lat = bbox_a[3].max(bbox_b[3]);

    const CELLS: usize = 50;
    let lon_step = (max_lon - min_lon) / CELLS as f64;
    let lat_step = (max_lat - min_lat) / CELLS as f64;
    if lon_step <= 0.0 || lat_step <= 0.0 {
        return 0.0;
    }

    let poly_a = to_geo_polygon(a);
    let poly_b = to_geo_polygon(b);
    let mut both = 0usize;
    let mut either = 0usize;
    for i in 0..CELLS {
        for j in 0..CELLS {
            let point = Point::new(
                min_lon + (i as f64 + 0.5) * lon_step,
                min_lat + (j as f64 + 0.5) * lat_step,
            );
            let in_a = poly_a.contains(&point);
            let in_b = poly_b.contains(&point);
            if in_a || in_b {
                either += 1;
            }
            if in_a && in_b {
                both += 1;
            }
        }
    }
    if either == 0 {
        0.0
    } else {
        both as f64 / either as f64
    }
}

/// The `validate_ward_against_golden` function runs the §4.6 geometric metrics on one ward's
/// actual-vs-expected polygon pair and classifies pass/fail.
pub fn validate_ward_against_golden(
    actual_polygon: &Feature,
    expected_polygon: &Feature,
    ward_id: &str,
    config: &GoldenVectorConfig,
) -> WardValidationResult {
    let (Some(actual_ring), Some(expected_ring)) =
        (ring_of(actual_polygon), ring_of(expected_polygon))
    else {
        return WardValidationResult {
            ward_id: ward_id.to_string(),
            passed: false,
            metrics: WardMetrics::default(),
            failures: vec!["polygon geometry missing or not a Polygon".to_string()],
        };
    };

    let hausdorff_distance_m = hausdorff_distance_m(&actual_ring, &expected_ring);
    let actual_area = ring_area_m2(&actual_ring);
    let expected_area = ring_area_m2(&expected_ring);
    let area_difference_ratio = if expected_area.abs() < f64::EPSILON {
        0.0
    } else {
        (actual_area - expected_area).abs() / expected_area
    };
    let centroid_distance_m = haversine_m(ring_centroid(&actual_ring), ring_centroid(&expected_ring));
    let iou = iou_approx(&actual_ring, &expected_ring);

    let metrics = WardMetrics {
        hausdorff_distance_m,
        area_difference_ratio,
        centroid_distance_m,
        iou,
    };

    let mut failures = Vec::new();
    if hausdorff_distance_m > config.max_hausdorff_distance_m {
        failures.push(format!(
            "Hausdorff distance {hausdorff_distance_m:.1}m exceeds {:.1}m",
            config.max_hausdorff_distance_m
        ));
    }
    if area_difference_ratio > config.max_area_difference_ratio {
        failures.push(format!(
            "area difference ratio {area_difference_ratio:.3} exceeds {:.3}",
            config.max_area_difference_ratio
        ));
    }
    if centroid_distance_m > config.max_centroid_distance_m {
        failures.push(format!(
            "centroid distance {centroid_distance_m:.1}m exceeds {:.1}m",
            config.max_centroid_distance_m
        ));
    }
    if iou < config.min_overlap_ratio {
        failures.push(format!(
            "IoU {iou:.3} is below {:.3}",
            config.min_overlap_ratio
        ));
    }

    WardValidationResult {
        ward_id: ward_id.to_string(),
        passed: failures.is_empty(),
        metrics,
        failures,
    }
}

/// City-level validation summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CityValidationResult {
    /// Per-ward results, keyed by `ward_id`.
    pub ward_results: HashMap<String, WardValidationResult>,
    /// Total wards expected.
    pub total: usize,
    /// Wards that passed.
    pub passed_count: usize,
    /// Mean IoU across all evaluated wards.
    pub average_iou: f64,
    /// Maximum Hausdorff distance across all evaluated wards.
    pub max_hausdorff_distance_m: f64,
    /// True iff `passed_count == total`.
    pub passed: bool,
}

/// The `validate_city_against_golden` function validates every expected ward polygon in `golden`
/// against the matching entry in `actual_polygons` (keyed by `ward_id`), per §4.6.
#[instrument(skip(actual_polygons, golden, config), fields(city_fips = %golden.city_fips))]
pub fn validate_city_against_golden(
    actual_polygons: &HashMap<String, Feature>,
    golden: &GoldenVector,
    config: &GoldenVectorConfig,
) -> CityValidationResult {
    let named: Vec<(String, &Feature)> = golden
        .expected_polygons
        .iter()
        .filter_map(|expected| Some((GoldenVector::ward_id_of(expected)?, expected)))
        .collect();

    let one_ward = |ward_id: &str, expected: &Feature| -> WardValidationResult {
        match actual_polygons.get(ward_id) {
            Some(actual) => validate_ward_against_golden(actual, expected, ward_id, config),
            None => WardValidationResult {
                ward_id: ward_id.to_string(),
                passed: false,
                metrics: WardMetrics::default(),
                failures: vec![format!("Ward {ward_id} not found")],
            },
        }
    };

    let mut ward_results = HashMap::new();
    let mut iou_sum = 0.0;
    let mut max_hausdorff = 0.0_f64;

    if config.fail_fast {
        for (ward_id, expected) in &named {
            let result = one_ward(ward_id, expected);
            iou_sum += result.metrics.iou;
            max_hausdorff = max_hausdorff.max(result.metrics.hausdorff_distance_m);
            let failed = !result.passed;
            ward_results.insert(ward_id.clone(), result);
            if failed {
                break;
            }
        }
    } else {
        let style = indicatif::ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {'Validating wards against golden vectors.'}",
        )
        .unwrap();
        let results: Vec<(String, WardValidationResult)> = named
            .par_iter()
            .progress_with_style(style)
            .map(|(ward_id, expected)| (ward_id.clone(), one_ward(ward_id, expected)))
            .collect();
        for (ward_id, result) in results {
            iou_sum += result.metrics.iou;
            max_hausdorff = max_hausdorff.max(result.metrics.hausdorff_distance_m);
            ward_results.insert(ward_id, result);
        }
    }

    let total = golden.expected_polygons.len();
    let passed_count = ward_results.values().filter(|r| r.passed).count();
    let average_iou = if ward_results.is_empty() {
        0.0
    } else {
        iou_sum / ward_results.len() as f64
    };

    CityValidationResult {
        ward_results,
        total,
        passed_count,
        average_iou,
        max_hausdorff_distance_m: max_hausdorff,
        passed: passed_count == total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Geometry;

    fn square_feature(offset: f64) -> Feature {
        let ring = vec![
            vec![0.0 + offset, 0.0],
            vec![1.0 + offset, 0.0],
            vec![1.0 + offset, 1.0],
            vec![0.0 + offset, 1.0],
            vec![0.0 + offset, 0.0],
        ];
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    #[test]
    fn identical_polygons_validate_as_self() {
        let square = square_feature(0.0);
        let config = GoldenVectorConfig::default();
        let result = validate_ward_against_golden(&square, &square, "1", &config);
        assert!(result.passed);
        assert!(result.metrics.hausdorff_distance_m < 1e-6);
        assert!((result.metrics.iou - 1.0).abs() < 1e-6);
    }

    #[test]
    fn shifted_polygon_fails_centroid_check() {
        let actual = square_feature(5.0);
        let expected = square_feature(0.0);
        let config = GoldenVectorConfig::default();
        let result = validate_ward_against_golden(&actual, &expected, "1", &config);
        assert!(!result.passed);
    }
}
