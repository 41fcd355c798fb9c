#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
pub mod builder;
pub mod error;
pub mod geo_math;
pub mod golden;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod street_network;
pub mod validator;
mod utils;

pub use builder::{
    BuildResult, CombinedWards, PolygonBuilderConfig, PolygonRepair, PolygonValidation,
    build_polygon_from_matches, build_ward_polygon, combine_ward_polygons,
};
pub use error::{ReconstructionError, ReconstructionResult};
pub use golden::{GoldenVector, GoldenVectorMetadata, PrecisionLevel, VerificationStatus};
pub use matcher::{MatcherConfig, match_segment, match_ward_description};
pub use model::{
    BoundarySegmentDescription, CardinalDirection, ExtractionConfidence, MatchDiagnostics,
    MatchQuality, SegmentMatchResult, SegmentReferenceType, SourceDocument, SourceDocumentType,
    WardLegalDescription, WardMatchDiagnostics, WardMatchResult,
};
pub use normalizer::{DEFAULT_EQUIV_THRESHOLD, NormalizedStreetName, canonicalize, equiv, sim};
pub use parser::{ParseDiagnostics, ParseResult, parse_description, validate_parsed_segments};
pub use street_network::{StreetNetwork, StreetSegment};
pub use validator::{
    CityValidationResult, GoldenVectorConfig, WardMetrics, WardValidationResult,
    validate_city_against_golden, validate_ward_against_golden,
};
pub use validator::regression::{
    HAUSDORFF_INCREASE_FACTOR, IOU_DROP_THRESHOLD, RegressionReport, WardRegression,
    WardRegressionKind, detect_regressions,
};
