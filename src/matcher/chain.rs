//! §4.4.3 candidate scoring, §4.4.4 contiguous-chain selection, §4.4.5 coordinate merging, and
//! §4.4.6 final quality classification for non-intersection (`street_centerline` and friends)
//! segments.
use crate::geo_math::haversine_m;
use crate::matcher::config::MatcherConfig;
use crate::model::{
    BoundarySegmentDescription, CardinalDirection, MatchDiagnostics, MatchQuality,
    SegmentMatchResult,
};
use crate::street_network::{StreetNetwork, StreetSegment};

struct ScoredCandidate {
    position: usize,
    name_sim: f64,
    distance_score: f64,
    direction_score: f64,
    total: f64,
    distance_m: f64,
}

fn score_candidate(
    segment: &StreetSegment,
    feature_name: &str,
    reference_point: Option<(f64, f64)>,
    direction: Option<CardinalDirection>,
    max_snap_distance_m: f64,
) -> ScoredCandidate {
    let name_sim = StreetNetwork::name_similarity(feature_name, segment);

    let (distance_score, distance_m) = match reference_point {
        Some(reference) => {
            let to_start = haversine_m(reference, segment.start());
            let to_end = haversine_m(reference, segment.end());
            let closest = to_start.min(to_end);
            (
                (1.0 - closest / max_snap_distance_m).max(0.0),
                closest,
            )
        }
        None => (1.0, 0.0),
    };

    let direction_score = match direction {
        None => 1.0,
        Some(dir) => {
            let (lo, hi) = dir.bearing_wedge();
            let bearing = segment.bearing_deg();
            if bearing_in_wedge(bearing, lo, hi) {
                1.0
            } else {
                0.5
            }
        }
    };

    let total = 0.5 * name_sim + 0.3 * distance_score + 0.2 * direction_score;
    ScoredCandidate {
        position: 0,
        name_sim,
        distance_score,
        direction_score,
        total,
        distance_m,
    }
}

/// Orders candidates by `total` descending. When `prefer_directional_continuity` is set and two
/// candidates' totals tie, the one with the higher `direction_score` sorts first.
fn compare_candidates(
    a: &ScoredCandidate,
    b: &ScoredCandidate,
    prefer_directional_continuity: bool,
) -> std::cmp::Ordering {
    let by_total = b.total.partial_cmp(&a.total).unwrap();
    if prefer_directional_continuity && by_total == std::cmp::Ordering::Equal {
        b.direction_score.partial_cmp(&a.direction_score).unwrap()
    } else {
        by_total
    }
}

fn bearing_in_wedge(bearing: f64, lo: f64, hi: f64) -> bool {
    let norm = |d: f64| ((d % 360.0) + 360.0) % 360.0;
    let b = norm(bearing);
    let lo = norm(lo);
    let hi = norm(hi);
    if lo <= hi {
        b >= lo && b <= hi
    } else {
        b >= lo || b <= hi
    }
}

/// The `match_street_chain` function resolves a street-referencing segment to geometry: gather
/// candidates, score them, select a contiguous chain starting near `reference_point`, merge
/// coordinates, and classify the result.
pub fn match_street_chain(
    description: &BoundarySegmentDescription,
    network: &StreetNetwork,
    reference_point: Option<(f64, f64)>,
    config: &MatcherConfig,
) -> SegmentMatchResult {
    let mut positions = network.find_by_name(&description.feature_name);
    if positions.is_empty() {
        if let Some(reference) = reference_point {
            positions = network.find_near_point(reference, 2.0 * config.max_snap_distance_m);
        }
    }
    if positions.is_empty() {
        return SegmentMatchResult::failed(
            description.clone(),
            format!(
                "No street found matching \"{}\"",
                description.feature_name
            ),
        );
    }

    let mut scored: Vec<ScoredCandidate> = positions
        .iter()
        .map(|&position| {
            let segment = network.segment(position).expect("indexed segment");
            let mut candidate = score_candidate(
                segment,
                &description.feature_name,
                reference_point,
                description.direction,
                config.max_snap_distance_m,
            );
            candidate.position = position;
            candidate
        })
        .filter(|c| c.name_sim >= config.min_name_similarity)
        .collect();

    if scored.is_empty() {
        return SegmentMatchResult::failed(
            description.clone(),
            format!(
                "No candidate for \"{}\" cleared the minimum name similarity",
                description.feature_name
            ),
        );
    }
    scored.sort_by(|a, b| compare_candidates(a, b, config.prefer_directional_continuity));

    let valid: Vec<usize> = scored.iter().map(|c| c.position).collect();
    let chain = select_contiguous_chain(&valid, network, reference_point, config.max_snap_distance_m);
    let coordinates = merge_chain_coordinates(&chain, network, reference_point);

    let best = &scored[0];
    let quality = classify_quality(best.name_sim, best.distance_score, config.min_name_similarity);
    let matched_segments = if quality == MatchQuality::Failed {
        Vec::new()
    } else {
        chain.clone()
    };
    let coordinates = if quality == MatchQuality::Failed {
        Vec::new()
    } else {
        coordinates
    };

    SegmentMatchResult {
        description: description.clone(),
        matched_segments,
        match_quality: quality,
        coordinates,
        diagnostics: MatchDiagnostics {
            name_similarity: best.name_sim,
            distance_to_candidate: Some(best.distance_m),
            alternatives_considered: scored.len(),
            reason: String::new(),
        },
    }
}

/// §4.4.4: greedy nearest-neighbor contiguous chain walk, bounded at `min(|valid|, 50)` iterations.
fn select_contiguous_chain(
    valid: &[usize],
    network: &StreetNetwork,
    reference_point: Option<(f64, f64)>,
    max_snap_distance_m: f64,
) -> Vec<usize> {
    let Some(reference) = reference_point else {
        return vec![valid[0]];
    };
    if valid.len() == 1 {
        return vec![valid[0]];
    }

    let mut seed_idx = 0;
    let mut seed_dist = f64::INFINITY;
    let mut seed_at_start = true;
    for (i, &position) in valid.iter().enumerate() {
        let segment = network.segment(position).expect("indexed segment");
        let to_start = haversine_m(reference, segment.start());
        let to_end = haversine_m(reference, segment.end());
        let (dist, at_start) = if to_start <= to_end {
            (to_start, true)
        } else {
            (to_end, false)
        };
        if dist < seed_dist {
            seed_dist = dist;
            seed_idx = i;
            seed_at_start = at_start;
        }
    }
    if seed_dist > max_snap_distance_m {
        return vec![valid[0]];
    }

    let connection_tolerance = 50.0;
    let mut chain = vec![valid[seed_idx]];
    let mut used = vec![seed_idx];
    let seed_segment = network.segment(valid[seed_idx]).expect("indexed segment");
    let mut free_end = if seed_at_start {
        seed_segment.end()
    } else {
        seed_segment.start()
    };

    let max_iterations = valid.len().min(50);
    for _ in 0..max_iterations {
        let mut best: Option<(usize, f64)> = None;
        for (i, &position) in valid.iter().enumerate() {
            if used.contains(&i) {
                continue;
            }
            let segment = network.segment(position).expect("indexed segment");
            let to_start = haversine_m(free_end, segment.start());
            let to_end = haversine_m(free_end, segment.end());
            let dist = to_start.min(to_end);
            if dist <= connection_tolerance && best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((i, dist));
            }
        }
        let Some((i, _)) = best else {
            break;
        };
        used.push(i);
        let position = valid[i];
        chain.push(position);
        let segment = network.segment(position).expect("indexed segment");
        let to_start = haversine_m(free_end, segment.start());
        let to_end = haversine_m(free_end, segment.end());
        free_end = if to_start <= to_end {
            segment.end()
        } else {
            segment.start()
        };
    }

    chain
}

/// §4.4.5: merge a contiguous chain's vertex lists into one ordered coordinate list.
fn merge_chain_coordinates(
    chain: &[usize],
    network: &StreetNetwork,
    reference_point: Option<(f64, f64)>,
) -> Vec<(f64, f64)> {
    let first = network.segment(chain[0]).expect("indexed segment");
    let mut out = if let Some(reference) = reference_point {
        if haversine_m(reference, first.end()) < haversine_m(reference, first.start()) {
            let mut rev = first.geometry.clone();
            rev.reverse();
            rev
        } else {
            first.geometry.clone()
        }
    } else {
        first.geometry.clone()
    };

    for &position in &chain[1..] {
        let segment = network.segment(position).expect("indexed segment");
        let tail = *out.last().unwrap();
        let to_start = haversine_m(tail, segment.start());
        let to_end = haversine_m(tail, segment.end());
        let mut geometry = segment.geometry.clone();
        let starts_at = if to_end < to_start {
            geometry.reverse();
            geometry[0]
        } else {
            geometry[0]
        };
        if haversine_m(tail, starts_at) < 10.0 {
            geometry.remove(0);
        }
        out.extend(geometry);
    }

    out
}

/// §4.4.6: final quality classification from the chosen candidate's scores.
fn classify_quality(name_sim: f64, distance_score: f64, min_name_similarity: f64) -> MatchQuality {
    if name_sim >= 0.95 && distance_score >= 0.8 {
        MatchQuality::Exact
    } else if name_sim >= min_name_similarity && distance_score >= 0.5 {
        MatchQuality::Fuzzy
    } else if name_sim >= min_name_similarity {
        MatchQuality::Partial
    } else {
        MatchQuality::Failed
    }
}
