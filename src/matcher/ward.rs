//! §4.4.1 reference-type dispatch and §4.4.7 ward-level matching.
use crate::geo_math::haversine_m;
use crate::matcher::chain::match_street_chain;
use crate::matcher::config::MatcherConfig;
use crate::matcher::intersection::resolve_intersection;
use crate::model::{
    BoundarySegmentDescription, MatchDiagnostics, MatchQuality, SegmentMatchResult,
    SegmentReferenceType, WardLegalDescription, WardMatchDiagnostics, WardMatchResult,
};
use crate::street_network::StreetNetwork;
use geojson::{Feature, Geometry, Value};
use serde_json::{Map, json};
use tracing::{instrument, warn};

/// The `match_segment` function dispatches a single [`BoundarySegmentDescription`] by reference
/// type, per §4.4.1.
pub fn match_segment(
    description: &BoundarySegmentDescription,
    network: &StreetNetwork,
    reference_point: Option<(f64, f64)>,
    config: &MatcherConfig,
) -> SegmentMatchResult {
    match description.reference_type {
        SegmentReferenceType::MunicipalBoundary => SegmentMatchResult {
            description: description.clone(),
            matched_segments: Vec::new(),
            match_quality: MatchQuality::Partial,
            coordinates: Vec::new(),
            diagnostics: MatchDiagnostics {
                name_similarity: 0.0,
                distance_to_candidate: None,
                alternatives_considered: 0,
                reason: "municipal boundary geometry must be supplied by the boundary collaborator"
                    .to_string(),
            },
        },
        SegmentReferenceType::Coordinate => {
            match description.intersection_streets() {
                Some((s1, s2)) => {
                    resolve_intersection(description, s1, s2, network, reference_point, config)
                }
                None => SegmentMatchResult::failed(
                    description.clone(),
                    "coordinate segment missing an intersection marker".to_string(),
                ),
            }
        }
        _ => match_street_chain(description, network, reference_point, config),
    }
}

/// The `match_ward_description` function resolves every segment in `ward` in order, carrying the
/// last successful match's final point forward as the next segment's reference point, then
/// assembles a closed ring if every segment succeeded, per §4.4.7.
#[instrument(skip(network, config), fields(ward_id = %ward.ward_id, segments = ward.segments.len()))]
pub fn match_ward_description(
    ward: &WardLegalDescription,
    network: &StreetNetwork,
    config: &MatcherConfig,
) -> WardMatchResult {
    let mut segment_matches = Vec::with_capacity(ward.segments.len());
    let mut failed_segments = Vec::new();
    let mut last_point: Option<(f64, f64)> = None;

    for description in &ward.segments {
        let result = match_segment(description, network, last_point, config);
        if result.is_success() {
            last_point = result.coordinates.last().copied();
        } else {
            warn!(index = description.index, reason = %result.diagnostics.reason, "segment match failed");
            failed_segments.push(description.index);
        }
        segment_matches.push(result);
    }

    let total = segment_matches.len();
    let matched = total - failed_segments.len();
    let match_rate = if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    };

    let mut ring_closed = false;
    let mut geometry_valid = false;
    let mut polygon = None;

    if failed_segments.is_empty() && !segment_matches.is_empty() {
        let mut coordinates: Vec<(f64, f64)> = Vec::new();
        let mut gap_failed = false;
        for result in &segment_matches {
            if let Some(&tail) = coordinates.last() {
                if let Some(&head) = result.coordinates.first() {
                    if haversine_m(tail, head) > config.max_segment_gap_m {
                        gap_failed = true;
                        break;
                    }
                }
            }
            coordinates.extend(result.coordinates.iter().copied());
        }

        if !gap_failed && coordinates.len() >= 3 {
            let closing_gap = haversine_m(coordinates[0], *coordinates.last().unwrap());
            if closing_gap <= config.max_segment_gap_m {
                if closing_gap > 1e-9 {
                    coordinates.push(coordinates[0]);
                }
                ring_closed = true;
                geometry_valid = coordinates.len() >= 4;
                if geometry_valid {
                    polygon = Some(build_ring_feature(&coordinates, ward));
                }
            }
        }
    }

    WardMatchResult {
        ward_id: ward.ward_id.clone(),
        segment_matches,
        success: failed_segments.is_empty() && polygon.is_some(),
        failed_segments,
        polygon,
        diagnostics: WardMatchDiagnostics {
            total,
            matched,
            match_rate,
            ring_closed,
            geometry_valid,
        },
    }
}

fn build_ring_feature(coordinates: &[(f64, f64)], ward: &WardLegalDescription) -> Feature {
    let ring: Vec<Vec<f64>> = coordinates.iter().map(|&(lon, lat)| vec![lon, lat]).collect();
    let geometry = Geometry::new(Value::Polygon(vec![ring]));
    let mut properties = Map::new();
    properties.insert("ward_id".to_string(), json!(ward.ward_id));
    properties.insert("ward_name".to_string(), json!(ward.ward_name));
    properties.insert("city_fips".to_string(), json!(ward.city_fips));
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractionConfidence, SourceDocument, SourceDocumentType};
    use crate::street_network::StreetSegment;

    fn seg(name: &str, geometry: Vec<(f64, f64)>) -> StreetSegment {
        StreetSegment {
            id: name.to_string(),
            name: name.to_string(),
            alt_names: Vec::new(),
            street_type: None,
            highway_class: None,
            geometry,
        }
    }

    fn street_segment(index: usize, feature_name: &str) -> BoundarySegmentDescription {
        BoundarySegmentDescription {
            index,
            reference_type: SegmentReferenceType::StreetCenterline,
            feature_name: feature_name.to_string(),
            direction: None,
            from: None,
            to: None,
            raw_text: format!("thence along {feature_name}"),
            parse_confidence: ExtractionConfidence::High,
        }
    }

    #[test]
    fn assembles_closed_square_ring() {
        let network = StreetNetwork::build(vec![
            seg("North Street", vec![(0.0, 1.0), (1.0, 1.0)]),
            seg("East Street", vec![(1.0, 1.0), (1.0, 0.0)]),
            seg("South Street", vec![(1.0, 0.0), (0.0, 0.0)]),
            seg("West Street", vec![(0.0, 0.0), (0.0, 1.0)]),
        ]);
        let ward = WardLegalDescription {
            city_fips: "4129050".to_string(),
            city_name: "Grants Pass".to_string(),
            state: "OR".to_string(),
            ward_id: "1".to_string(),
            ward_name: "Ward 1".to_string(),
            segments: vec![
                street_segment(0, "North Street"),
                street_segment(1, "East Street"),
                street_segment(2, "South Street"),
                street_segment(3, "West Street"),
            ],
            source: SourceDocument::new(
                SourceDocumentType::OrdinanceText,
                "https://example.gov/ward1".to_string(),
                "Ward 1 Ordinance".to_string(),
            ),
            population: None,
            notes: None,
        };
        let config = MatcherConfig::default();
        let result = match_ward_description(&ward, &network, &config);
        assert!(result.success);
        assert!(result.diagnostics.ring_closed);
        assert!(result.polygon.is_some());
    }
}
