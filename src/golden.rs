//! The `golden` module defines the golden-vector file format (§6): the stable, versioned JSON
//! document validators check reconstructed wards against.
use crate::error::{ReconstructionError, ReconstructionResult};
use crate::model::WardLegalDescription;
use geojson::Feature;
use serde::{Deserialize, Serialize};

/// How the golden vector's expected polygons were produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionLevel {
    /// Hand-drawn or inferred from a low-resolution source; expect coarse tolerances.
    Approximate,
    /// Digitized from an authoritative source and spot-checked.
    Verified,
    /// Sourced directly from the jurisdiction's own GIS office.
    GroundTruth,
}

/// Human review state of a golden vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Not yet reviewed by a human.
    PendingHumanVerification,
    /// Reviewed and accepted by a human.
    HumanVerified,
    /// Authoritative, no further review needed.
    GroundTruth,
}

/// Optional provenance metadata for a [`GoldenVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenVectorMetadata {
    /// How the expected polygons were produced.
    pub precision_level: PrecisionLevel,
    /// Human review state.
    pub verification_status: VerificationStatus,
    /// Free-text caveat about data quality, surfaced to whoever consumes validation results.
    pub data_quality_warning: Option<String>,
}

/// The `GoldenVector` struct is the reference document a reconstruction is validated against.
/// Invariant: `expected_polygons.len() == expected_ward_count == legal_descriptions.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenVector {
    /// FIPS code of the municipality.
    pub city_fips: String,
    /// Name of the municipality.
    pub city_name: String,
    /// Two-letter state abbreviation.
    pub state: String,
    /// Number of wards expected; must equal `legal_descriptions.len()` and
    /// `expected_polygons.len()`.
    pub expected_ward_count: usize,
    /// Legal descriptions this golden vector was reconstructed from.
    pub legal_descriptions: Vec<WardLegalDescription>,
    /// Reference polygons, one per ward, each tagged with `properties.ward_id`.
    pub expected_polygons: Vec<Feature>,
    /// When this golden vector was last verified.
    pub verified_at: String,
    /// What established the reference polygons (e.g. a GIS office, a digitized map).
    pub verification_source: String,
    /// Free-form curator annotation.
    pub notes: Option<String>,
    /// Optional provenance metadata.
    pub metadata: Option<GoldenVectorMetadata>,
}

impl GoldenVector {
    /// The `from_json` function deserializes a golden vector, failing fast (via
    /// [`ReconstructionError`]) if `city_fips`, `city_name`, or `expected_polygons` are missing or
    /// malformed.
    pub fn from_json(text: &str) -> ReconstructionResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        for required in ["city_fips", "city_name", "expected_polygons"] {
            if value.get(required).is_none() {
                return Err(ReconstructionError::GoldenVector(format!(
                    "missing required field \"{required}\""
                )));
            }
        }
        let vector: GoldenVector = serde_json::from_value(value)?;
        Ok(vector)
    }

    /// The `counts_are_consistent` function checks the
    /// `expected_polygons.len() == expected_ward_count == legal_descriptions.len()` invariant.
    pub fn counts_are_consistent(&self) -> bool {
        self.expected_polygons.len() == self.expected_ward_count
            && self.legal_descriptions.len() == self.expected_ward_count
    }

    /// The `ward_id_of` function reads `properties.ward_id` off an expected polygon feature.
    pub fn ward_id_of(feature: &Feature) -> Option<String> {
        feature
            .properties
            .as_ref()?
            .get("ward_id")?
            .as_str()
            .map(str::to_string)
    }
}
