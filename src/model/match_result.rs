//! The `match_result` module defines the matcher's output types (§3): the per-segment
//! [`SegmentMatchResult`] with its [`MatchQuality`] tier, and the per-ward [`WardMatchResult`] that
//! aggregates them into a candidate ring.
use crate::model::BoundarySegmentDescription;
use geojson::Feature;
use serde::{Deserialize, Serialize};

/// The `MatchQuality` enum tiers how well a segment's description resolved to street geometry.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchQuality {
    /// High confidence name match with a close, correctly-directed candidate.
    Exact,
    /// Good name match with either distance or direction outside the tight exact bounds.
    Fuzzy,
    /// Name match only; distance and direction unconstrained.
    Partial,
    /// No candidate cleared the minimum name-similarity bar.
    Failed,
}

/// Supporting evidence for a [`SegmentMatchResult`], kept even on failure so callers can explain
/// why a segment did not resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDiagnostics {
    /// Best name-similarity score seen among considered candidates, in `[0, 1]`.
    pub name_similarity: f64,
    /// Distance in meters from the reference point to the chosen candidate, if any.
    pub distance_to_candidate: Option<f64>,
    /// Number of candidate street segments considered.
    pub alternatives_considered: usize,
    /// Free-text explanation, populated on failure or partial match.
    pub reason: String,
}

/// The `SegmentMatchResult` struct is the outcome of resolving one
/// [`BoundarySegmentDescription`] against a street network. Invariant:
/// `match_quality == Failed` implies both `matched_segments` and `coordinates` are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMatchResult {
    /// The description this result resolves.
    pub description: BoundarySegmentDescription,
    /// Positions (into the queried [`crate::street_network::StreetNetwork`]) of the street
    /// segments that contributed to `coordinates`.
    pub matched_segments: Vec<usize>,
    /// How well the match resolved.
    pub match_quality: MatchQuality,
    /// Ordered coordinates this segment contributes to the ward's ring.
    pub coordinates: Vec<(f64, f64)>,
    /// Supporting evidence and explanation.
    pub diagnostics: MatchDiagnostics,
}

impl SegmentMatchResult {
    /// The `failed` function builds a [`SegmentMatchResult`] with `match_quality = Failed` and the
    /// empty-collections invariant satisfied, recording `reason`.
    pub fn failed(description: BoundarySegmentDescription, reason: impl Into<String>) -> Self {
        Self {
            description,
            matched_segments: Vec::new(),
            match_quality: MatchQuality::Failed,
            coordinates: Vec::new(),
            diagnostics: MatchDiagnostics {
                reason: reason.into(),
                ..Default::default()
            },
        }
    }

    /// Returns true when `match_quality` is not [`MatchQuality::Failed`].
    pub fn is_success(&self) -> bool {
        self.match_quality != MatchQuality::Failed
    }
}

/// Summary counters for a [`WardMatchResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardMatchDiagnostics {
    /// Total segments in the ward's description.
    pub total: usize,
    /// Count of segments that resolved successfully.
    pub matched: usize,
    /// `matched / total`, `0.0` if `total == 0`.
    pub match_rate: f64,
    /// True when the assembled ring's first and last coordinates coincide within tolerance.
    pub ring_closed: bool,
    /// True when the assembled ring has at least 4 vertices (3 distinct plus closure).
    pub geometry_valid: bool,
}

/// The `WardMatchResult` struct aggregates one ward's segment matches and, if every segment
/// succeeded and the ring closed, the candidate polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardMatchResult {
    /// `WardLegalDescription.ward_id` this result belongs to.
    pub ward_id: String,
    /// Per-segment results, in the ward's segment order.
    pub segment_matches: Vec<SegmentMatchResult>,
    /// True when every segment matched and the ring assembled.
    pub success: bool,
    /// Indices of segments (into `segment_matches`) that failed to resolve.
    pub failed_segments: Vec<usize>,
    /// Assembled candidate polygon, present only on full success.
    pub polygon: Option<Feature>,
    /// Summary counters.
    pub diagnostics: WardMatchDiagnostics,
}
