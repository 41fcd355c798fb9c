//! The `document` module defines [`SourceDocument`], the provenance record attached to a
//! [`crate::model::WardLegalDescription`]. The document itself — PDF bytes, OCR text — is produced
//! by the external `PDFExtractor` collaborator; the core only records where a description came
//! from and when it was retrieved.
use serde::{Deserialize, Serialize};

/// The `SourceDocumentType` enum enumerates the kinds of documents a legal description can be
/// drawn from.
#[allow(missing_docs)]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceDocumentType {
    PdfRedistrictingPlan,
    PdfWardMap,
    #[default]
    OrdinanceText,
    ResolutionText,
    CharterSection,
    WebPage,
    GisMetadata,
}

/// The `SourceDocument` struct records the provenance of a [`crate::model::WardLegalDescription`]:
/// what kind of document it came from, where, and when it was retrieved. The document's own bytes
/// are the external `PDFExtractor` collaborator's concern; this is metadata only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct SourceDocument {
    /// The kind of document the description was drawn from.
    pub document_type: SourceDocumentType,
    /// Locator for the source document (file path, URL, or similar).
    pub source_uri: String,
    /// Human-readable title of the document.
    pub title: String,
    /// Date the ordinance, map or plan took effect, in `YYYY-MM-DD` form.
    #[new(default)]
    pub effective_date: Option<String>,
    /// Timestamp the document was retrieved, in RFC 3339 form.
    #[new(default)]
    pub retrieved_at: Option<String>,
    /// Content hash of the extracted text, for change detection.
    #[new(default)]
    pub content_hash: Option<String>,
    /// Free-form annotation left by whoever curated the source.
    #[new(default)]
    pub notes: Option<String>,
}
