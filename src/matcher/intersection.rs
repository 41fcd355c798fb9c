//! §4.4.2: geometric intersection resolution for `coordinate` segments whose `feature_name` encodes
//! an `"intersection:S1:S2"` marker.
use crate::geo_math::{closest_point_on_segment, haversine_m, line_intersection, midpoint};
use crate::matcher::config::MatcherConfig;
use crate::model::{BoundarySegmentDescription, MatchDiagnostics, MatchQuality, SegmentMatchResult};
use crate::street_network::StreetNetwork;

#[derive(Clone, Copy)]
enum Kind {
    Crossing,
    NonCrossing,
}

struct Candidate {
    kind: Kind,
    point: (f64, f64),
    distance: f64,
    s1: usize,
    s2: usize,
}

/// The `resolve_intersection` function computes the single point where `street1` and `street2`
/// meet, per §4.4.2, returning a [`SegmentMatchResult`] whose `matched_segments` is `[s1, s2]` on
/// success.
pub fn resolve_intersection(
    description: &BoundarySegmentDescription,
    street1: &str,
    street2: &str,
    network: &StreetNetwork,
    reference_point: Option<(f64, f64)>,
    config: &MatcherConfig,
) -> SegmentMatchResult {
    let s1_candidates = network.find_by_name(street1);
    let s2_candidates = network.find_by_name(street2);
    if s1_candidates.is_empty() || s2_candidates.is_empty() {
        return SegmentMatchResult::failed(
            description.clone(),
            format!("No street found matching \"{street1}\" or \"{street2}\""),
        );
    }

    let mut non_crossing_candidates: Vec<Candidate> = Vec::new();
    let mut crossing_candidates: Vec<Candidate> = Vec::new();

    for &s1_idx in &s1_candidates {
        for &s2_idx in &s2_candidates {
            let s1 = network.segment(s1_idx).expect("indexed segment");
            let s2 = network.segment(s2_idx).expect("indexed segment");

            for w1 in s1.geometry.windows(2) {
                for w2 in s2.geometry.windows(2) {
                    let (p1, p2) = (w1[0], w1[1]);
                    let (p3, p4) = (w2[0], w2[1]);
                    let Some(inter) = line_intersection(p1, p2, p3, p4) else {
                        continue;
                    };
                    if (0.0..=1.0).contains(&inter.t1) && (0.0..=1.0).contains(&inter.t2) {
                        let dist_from_start = haversine_m(inter.point, p1);
                        if dist_from_start < 10.0 * config.max_snap_distance_m {
                            crossing_candidates.push(Candidate {
                                kind: Kind::Crossing,
                                point: inter.point,
                                distance: 0.0,
                                s1: s1_idx,
                                s2: s2_idx,
                            });
                            continue;
                        }
                    }
                    let close1 = closest_point_on_segment(inter.point, p1, p2);
                    let close2 = closest_point_on_segment(inter.point, p3, p4);
                    let dist = haversine_m(close1, close2);
                    if dist < config.max_snap_distance_m {
                        non_crossing_candidates.push(Candidate {
                            kind: Kind::NonCrossing,
                            point: midpoint(close1, close2),
                            distance: dist,
                            s1: s1_idx,
                            s2: s2_idx,
                        });
                    }
                }
            }

            for &v1 in &s1.geometry {
                for &v2 in &s2.geometry {
                    let dist = haversine_m(v1, v2);
                    if dist < config.max_snap_distance_m {
                        non_crossing_candidates.push(Candidate {
                            kind: Kind::NonCrossing,
                            point: midpoint(v1, v2),
                            distance: dist,
                            s1: s1_idx,
                            s2: s2_idx,
                        });
                    }
                }
            }
        }
    }

    if !crossing_candidates.is_empty() {
        let chosen = select_best(crossing_candidates, reference_point);
        return finish(description, chosen, MatchQuality::Exact);
    }

    if non_crossing_candidates.is_empty() {
        return SegmentMatchResult::failed(
            description.clone(),
            format!("No intersection found within tolerance for \"{street1}\" and \"{street2}\""),
        );
    }

    let chosen = select_best(non_crossing_candidates, reference_point);
    finish(description, chosen, MatchQuality::Fuzzy)
}

fn select_best(mut candidates: Vec<Candidate>, reference_point: Option<(f64, f64)>) -> Candidate {
    if let Some(reference) = reference_point {
        candidates.sort_by(|a, b| {
            haversine_m(a.point, reference)
                .partial_cmp(&haversine_m(b.point, reference))
                .unwrap()
        });
    } else {
        candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap());
    }
    candidates.remove(0)
}

fn finish(
    description: &BoundarySegmentDescription,
    candidate: Candidate,
    quality: MatchQuality,
) -> SegmentMatchResult {
    SegmentMatchResult {
        description: description.clone(),
        matched_segments: vec![candidate.s1, candidate.s2],
        match_quality: quality,
        coordinates: vec![candidate.point],
        diagnostics: MatchDiagnostics {
            name_similarity: 1.0,
            distance_to_candidate: Some(candidate.distance),
            alternatives_considered: 1,
            reason: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractionConfidence, SegmentReferenceType};
    use crate::street_network::StreetSegment;

    fn desc() -> BoundarySegmentDescription {
        BoundarySegmentDescription {
            index: 0,
            reference_type: SegmentReferenceType::Coordinate,
            feature_name: BoundarySegmentDescription::intersection_feature_name(
                "Main Street",
                "Oak Avenue",
            ),
            direction: None,
            from: None,
            to: None,
            raw_text: "STARTING_POINT:Beginning at the intersection of Main Street and Oak Avenue"
                .to_string(),
            parse_confidence: ExtractionConfidence::High,
        }
    }

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

    #[test]
    fn resolves_perpendicular_crossing() {
        let network = StreetNetwork::build(vec![
            seg("Main Street", vec![(-1.0, 0.0), (1.0, 0.0)]),
            seg("Oak Avenue", vec![(0.0, -1.0), (0.0, 1.0)]),
        ]);
        let config = MatcherConfig::default();
        let result = resolve_intersection(&desc(), "Main Street", "Oak Avenue", &network, None, &config);
        assert_eq!(result.match_quality, MatchQuality::Exact);
        assert_eq!(result.coordinates.len(), 1);
        assert!(result.coordinates[0].0.abs() < 1e-6);
        assert!(result.coordinates[0].1.abs() < 1e-6);
    }

    #[test]
    fn resolves_near_miss_within_tolerance() {
        let network = StreetNetwork::build(vec![
            seg("Main Street", vec![(-1.0, 0.0), (0.0, 0.0)]),
            seg("Oak Avenue", vec![(0.00005, 0.0), (0.00005, 1.0)]),
        ]);
        let config = MatcherConfig::default();
        let result = resolve_intersection(&desc(), "Main Street", "Oak Avenue", &network, None, &config);
        assert_eq!(result.match_quality, MatchQuality::Fuzzy);
    }

    #[test]
    fn picks_global_best_non_crossing_across_multiple_segments_per_name() {
        // Two disjoint Main Street segments and two disjoint Oak Avenue segments: only one
        // (s1, s2) pair is within snap tolerance, and it is not the first pair scanned.
        let network = StreetNetwork::build(vec![
            seg("Main Street", vec![(-5.0, 5.0), (-4.0, 5.0)]),
            seg("Main Street", vec![(-1.0, 0.0), (0.0, 0.0)]),
            seg("Oak Avenue", vec![(5.0, -5.0), (5.0, -4.0)]),
            seg("Oak Avenue", vec![(0.00005, 0.0), (0.00005, 1.0)]),
        ]);
        let config = MatcherConfig::default();
        let result = resolve_intersection(&desc(), "Main Street", "Oak Avenue", &network, None, &config);
        assert_eq!(result.match_quality, MatchQuality::Fuzzy);
        assert_eq!(result.matched_segments, vec![1, 3]);
        assert!(result.coordinates[0].0.abs() < 1e-3);
        assert!(result.coordinates[0].1.abs() < 1e-3);
    }

    #[test]
    fn prefers_candidate_nearest_reference_point_across_pairs() {
        // Two valid near-miss pairs within tolerance; the reference point sits next to the
        // second pair, which is farther along but should still win once given a reference.
        let network = StreetNetwork::build(vec![
            seg("Main Street", vec![(-1.0, 0.0), (0.0, 0.0)]),
            seg("Main Street", vec![(9.0, 10.0), (10.0, 10.0)]),
            seg("Oak Avenue", vec![(0.00005, 0.0), (0.00005, 1.0)]),
            seg("Oak Avenue", vec![(10.00005, 10.0), (10.00005, 11.0)]),
        ]);
        let config = MatcherConfig::default();
        let reference = Some((10.0, 10.0));
        let result = resolve_intersection(
            &desc(),
            "Main Street",
            "Oak Avenue",
            &network,
            reference,
            &config,
        );
        assert_eq!(result.match_quality, MatchQuality::Fuzzy);
        assert_eq!(result.matched_segments, vec![1, 3]);
    }

    #[test]
    fn fails_when_street_not_found() {
        let network = StreetNetwork::build(vec![seg("Main Street", vec![(-1.0, 0.0), (1.0, 0.0)])]);
        let config = MatcherConfig::default();
        let result = resolve_intersection(&desc(), "Main Street", "Nonexistent Road", &network, None, &config);
        assert_eq!(result.match_quality, MatchQuality::Failed);
        assert!(result.matched_segments.is_empty());
        assert!(result.coordinates.is_empty());
    }
}
