//! Result formatting
//!
//! This module handles:
//! - Computing the quality report (completeness, missing-field summary)
//! - Wrapping records in the success envelope
//! - Converting failures into the error envelope

mod envelope;
mod report;

pub use envelope::{ResultFormatter, ResultMetadata, ScrapeResult, DEFAULT_COLLECTION};
pub use report::QualityReport;
