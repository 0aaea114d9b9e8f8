//! Success and error envelopes

use crate::extract::PageExtraction;
use crate::output::QualityReport;
use crate::ScrapeError;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection key used when the schema declares no collection
pub const DEFAULT_COLLECTION: &str = "items";

/// Run metadata attached to a successful result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// RFC 3339 timestamp of when the result was produced
    pub extraction_date: String,
    pub num_results: usize,
    pub source_url: String,
}

/// Final outcome of a scraping job
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeResult {
    Success {
        collection_name: String,
        records: Vec<Value>,
        metadata: ResultMetadata,
        quality_report: QualityReport,
    },
    Error {
        error: String,
        details: Option<String>,
    },
}

impl ScrapeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeResult::Success { .. })
    }

    /// Extracted records; empty for an error result
    pub fn records(&self) -> &[Value] {
        match self {
            ScrapeResult::Success { records, .. } => records,
            ScrapeResult::Error { .. } => &[],
        }
    }

    pub fn quality_report(&self) -> Option<&QualityReport> {
        match self {
            ScrapeResult::Success { quality_report, .. } => Some(quality_report),
            ScrapeResult::Error { .. } => None,
        }
    }

    /// Serializes the envelope to JSON text
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Records live under a key named after the collection, next to `metadata`
struct DataSection<'a> {
    collection_name: &'a str,
    records: &'a [Value],
    metadata: &'a ResultMetadata,
}

impl Serialize for DataSection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.collection_name, self.records)?;
        map.serialize_entry("metadata", self.metadata)?;
        map.end()
    }
}

impl Serialize for ScrapeResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match self {
            ScrapeResult::Success {
                collection_name,
                records,
                metadata,
                quality_report,
            } => {
                map.serialize_entry("status", "success")?;
                map.serialize_entry(
                    "data",
                    &DataSection {
                        collection_name,
                        records,
                        metadata,
                    },
                )?;
                map.serialize_entry("quality_report", quality_report)?;
            }
            ScrapeResult::Error { error, details } => {
                map.serialize_entry("status", "error")?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("details", details)?;
                map.serialize_entry("data", &Value::Null)?;
                map.serialize_entry("quality_report", &Value::Null)?;
            }
        }

        map.end()
    }
}

/// Builds result envelopes for one collection
#[derive(Debug, Clone)]
pub struct ResultFormatter {
    collection_name: String,
}

impl ResultFormatter {
    /// Creates a formatter; `None` falls back to the `items` key
    pub fn new(collection_name: Option<&str>) -> Self {
        Self {
            collection_name: collection_name.unwrap_or(DEFAULT_COLLECTION).to_string(),
        }
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// Wraps aggregated records in a success envelope with a quality report
    ///
    /// # Arguments
    ///
    /// * `extraction` - Records and missing-field lists from every page
    /// * `source_url` - The job's start URL
    /// * `errors` - Non-fatal diagnostics for the quality report
    pub fn format_success(
        &self,
        extraction: PageExtraction,
        source_url: &str,
        errors: Vec<String>,
    ) -> ScrapeResult {
        let PageExtraction { records, missing } = extraction;
        let quality_report = QualityReport::compute(records.len(), missing, errors);

        let metadata = ResultMetadata {
            extraction_date: chrono::Utc::now().to_rfc3339(),
            num_results: records.len(),
            source_url: source_url.to_string(),
        };

        ScrapeResult::Success {
            collection_name: self.collection_name.clone(),
            records,
            metadata,
            quality_report,
        }
    }

    /// Error envelope carrying the message and the error kind
    pub fn format_error(error: &ScrapeError) -> ScrapeResult {
        ScrapeResult::Error {
            error: error.to_string(),
            details: Some(error.kind().to_string()),
        }
    }
}
