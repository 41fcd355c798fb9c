//! The `model` module holds the immutable value objects that make up the pipeline's data model
//! (§3): documents, boundary segment descriptions, and ward legal descriptions. Street geometry
//! lives in [`crate::street_network`]; match and build results live alongside the stages that
//! produce them.
mod document;
mod match_result;
mod segment;
mod ward;

pub use document::{SourceDocument, SourceDocumentType};
pub use match_result::{
    MatchDiagnostics, MatchQuality, SegmentMatchResult, WardMatchDiagnostics, WardMatchResult,
};
pub use segment::{
    BoundarySegmentDescription, CardinalDirection, ExtractionConfidence, SegmentReferenceType,
};
pub use ward::WardLegalDescription;
