//! The `segment` module defines the structured boundary segment produced by the parser: the
//! reference type taxonomy, cardinal direction, extraction confidence tier, and the
//! [`BoundarySegmentDescription`] record itself.
use serde::{Deserialize, Serialize};

/// The `SegmentReferenceType` enum is the closed taxonomy of what a boundary segment is anchored
/// to. `Coordinate` segments carry an intersection marker in `feature_name`
/// (`"intersection:STREET1:STREET2"`) rather than a street or feature name.
#[allow(missing_docs)]
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
pub enum SegmentReferenceType {
    StreetCenterline,
    StreetEdge,
    MunicipalBoundary,
    NaturalFeature,
    Railroad,
    PropertyLine,
    CreekStream,
    Highway,
    Coordinate,
}

/// The `CardinalDirection` enum represents the eight compass directions a boundary segment can be
/// described as running along (including `*erly` forms such as "northerly", which normalize to the
/// same variant as "north").
#[allow(missing_docs)]
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
#[serde(rename_all = "UPPERCASE")]
pub enum CardinalDirection {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl CardinalDirection {
    /// The `match_text` function maps a free-text cardinal word or phrase — abbreviation, full
    /// name, or `*erly` form — to a [`CardinalDirection`]. Returns `None` if `input` does not
    /// describe a direction.
    pub fn match_text(input: &str) -> Option<Self> {
        let trimmed = input.trim().trim_end_matches('.');
        let lower = trimmed.to_lowercase();
        let stripped = lower.strip_suffix("erly").unwrap_or(&lower);
        match stripped {
            "n" | "north" => Some(Self::N),
            "s" | "south" => Some(Self::S),
            "e" | "east" => Some(Self::E),
            "w" | "west" => Some(Self::W),
            "ne" | "northeast" => Some(Self::NE),
            "nw" | "northwest" => Some(Self::NW),
            "se" | "southeast" => Some(Self::SE),
            "sw" | "southwest" => Some(Self::SW),
            _ => None,
        }
    }

    /// The wedge of compass bearings (in degrees, `0` = north, clockwise) a candidate street's
    /// start-to-end bearing must fall within to be considered aligned with this direction, per the
    /// matcher's direction score (90-degree wedges for cardinals, 45-degree wedges for diagonals).
    pub fn bearing_wedge(self) -> (f64, f64) {
        let (center, half_width) = match self {
            Self::N => (0.0, 45.0),
            Self::NE => (45.0, 22.5),
            Self::E => (90.0, 45.0),
            Self::SE => (135.0, 22.5),
            Self::S => (180.0, 45.0),
            Self::SW => (225.0, 22.5),
            Self::W => (270.0, 45.0),
            Self::NW => (315.0, 22.5),
        };
        (center - half_width, center + half_width)
    }
}

/// The `ExtractionConfidence` enum tiers how confident the parser is in a segment's classification.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionConfidence {
    High,
    Medium,
    #[default]
    Low,
}

/// The `BoundarySegmentDescription` struct is one directed edge of a ward perimeter, as extracted
/// by the parser from free-form legal prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySegmentDescription {
    /// 0-based, dense position of this segment within its ward's ordered segment list.
    pub index: usize,
    /// What kind of feature this segment is anchored to.
    pub reference_type: SegmentReferenceType,
    /// Canonical or raw name of the anchoring feature. For `reference_type = Coordinate`, this is
    /// `"intersection:STREET1:STREET2"`.
    pub feature_name: String,
    /// Cardinal direction the boundary travels along this segment, if stated.
    pub direction: Option<CardinalDirection>,
    /// Starting point phrase, if the description names one (`"from <P>"`).
    pub from: Option<String>,
    /// Ending point phrase, if the description names one (`"to <Q>"`).
    pub to: Option<String>,
    /// The raw text this segment was split from, preserved verbatim (including a leading
    /// `STARTING_POINT:` marker when one was attached).
    pub raw_text: String,
    /// How confident the parser is in this segment's classification.
    pub parse_confidence: ExtractionConfidence,
}

impl BoundarySegmentDescription {
    /// The intersection-marker prefix used by [`crate::model::SegmentReferenceType::Coordinate`]
    /// feature names.
    pub const INTERSECTION_PREFIX: &'static str = "intersection:";

    /// The `intersection_streets` function parses `feature_name` as an
    /// `"intersection:STREET1:STREET2"` marker, returning the two street names. Returns `None` if
    /// `reference_type` is not [`SegmentReferenceType::Coordinate`] or the marker is malformed.
    pub fn intersection_streets(&self) -> Option<(&str, &str)> {
        if self.reference_type != SegmentReferenceType::Coordinate {
            return None;
        }
        let rest = self.feature_name.strip_prefix(Self::INTERSECTION_PREFIX)?;
        let mut parts = rest.splitn(2, ':');
        let s1 = parts.next()?;
        let s2 = parts.next()?;
        if s1.is_empty() || s2.is_empty() {
            None
        } else {
            Some((s1, s2))
        }
    }

    /// The `intersection_feature_name` function builds the `"intersection:STREET1:STREET2"` marker
    /// used as a `Coordinate` segment's `feature_name`.
    pub fn intersection_feature_name(street1: &str, street2: &str) -> String {
        format!("{}{}:{}", Self::INTERSECTION_PREFIX, street1, street2)
    }
}
