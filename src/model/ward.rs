//! The `ward` module defines [`WardLegalDescription`], the top-level input to the matcher: a ward's
//! identity plus its ordered perimeter segments.
use crate::model::document::SourceDocument;
use crate::model::segment::BoundarySegmentDescription;
use serde::{Deserialize, Serialize};

/// The `WardLegalDescription` struct names a ward and carries its ordered perimeter segments.
/// Invariant: `segments[i].index == i` for every `i`; a closed ring needs at least 3 segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardLegalDescription {
    /// FIPS code of the municipality this ward belongs to.
    pub city_fips: String,
    /// Name of the municipality.
    pub city_name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Identifier for the ward within the city (e.g. `"3"`).
    pub ward_id: String,
    /// Human-readable ward name, if distinct from its id.
    pub ward_name: String,
    /// Ordered perimeter segments. `segments[i].index` must equal `i`.
    pub segments: Vec<BoundarySegmentDescription>,
    /// Provenance of the legal description text.
    pub source: SourceDocument,
    /// Population of the ward, if known.
    pub population: Option<u64>,
    /// Free-form curator annotation.
    pub notes: Option<String>,
}

impl WardLegalDescription {
    /// The `indices_are_dense` function checks the `segments[i].index == i` invariant.
    pub fn indices_are_dense(&self) -> bool {
        self.segments
            .iter()
            .enumerate()
            .all(|(i, seg)| seg.index == i)
    }

    /// The `has_minimum_segments` function returns true when there are enough segments to close a
    /// ring (at least 3).
    pub fn has_minimum_segments(&self) -> bool {
        self.segments.len() >= 3
    }
}
