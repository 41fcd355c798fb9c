//! Tunables for the §4.4 matcher.

/// The `MatcherConfig` struct carries every tolerance the matcher consults. Defaults mirror §4.4.
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new)]
pub struct MatcherConfig {
    /// Minimum name similarity a candidate must clear to be considered at all.
    #[new(value = "0.75")]
    pub min_name_similarity: f64,
    /// Maximum distance, in meters, an intersection or chain join may snap across.
    #[new(value = "100.0")]
    pub max_snap_distance_m: f64,
    /// Whether a tie in total candidate score should be broken in favor of the higher
    /// `direction_score` (the direction term itself is always applied to `total`; this flag only
    /// governs the tie-break when two candidates score identically).
    #[new(value = "true")]
    pub prefer_directional_continuity: bool,
    /// Maximum haversine gap, in meters, tolerated between consecutive matched segments when a
    /// ward's ring is assembled.
    #[new(value = "200.0")]
    pub max_segment_gap_m: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}
