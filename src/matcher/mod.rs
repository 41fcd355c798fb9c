//! The `matcher` module is the core of the pipeline (§4.4): it resolves each
//! [`crate::model::BoundarySegmentDescription`] against a [`crate::street_network::StreetNetwork`]
//! and assembles a ward's segment matches into a candidate ring.
pub mod chain;
pub mod config;
pub mod intersection;
pub mod ward;

pub use config::MatcherConfig;
pub use ward::{match_segment, match_ward_description};
