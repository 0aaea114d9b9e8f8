//! Schema-Harvest: schema-driven adaptive web extraction
//!
//! This crate turns a declarative JSON schema plus a starting URL into structured
//! records scraped from rendered HTML. Selectors are inferred heuristically from
//! the first page, fields are cast to their declared types, pagination is followed,
//! and every run ends in a success or error envelope with a quality report.

pub mod agent;
pub mod config;
pub mod extract;
pub mod output;
pub mod pagination;
pub mod planner;
pub mod schema;
pub mod tools;

use thiserror::Error;

/// Main error type for Schema-Harvest operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Tool invocation error: {0}")]
    Tool(#[from] ToolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Short label naming the error category, used in the error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigurationError",
            Self::Tool(_) => "ToolInvocationError",
            Self::Io(_) => "IoError",
            Self::Json(_) => "SerializationError",
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read job file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in job: {0}")]
    InvalidUrl(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid interactions: {}", format_violations(.0))]
    InvalidInteractions(Vec<config::InteractionViolation>),
}

fn format_violations(violations: &[config::InteractionViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised at the browser tool-call boundary
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{tool} failed: {message}")]
    Failed { tool: tools::ToolName, message: String },

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Transport error calling {tool}: {source}")]
    Transport {
        tool: tools::ToolName,
        source: reqwest::Error,
    },

    #[error("Invalid response from {tool}: {message}")]
    InvalidResponse {
        tool: tools::ToolName,
        message: String,
    },

    #[error("Tool session not started")]
    NotStarted,
}

/// Result type alias for Schema-Harvest operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for tool calls
pub type ToolResult<T> = std::result::Result<T, ToolError>;

// Re-export commonly used types
pub use agent::{run_job, Coordinator};
pub use config::{Interaction, ScrapeConfig, ScrapeOptions};
pub use output::{QualityReport, ScrapeResult};
pub use planner::SelectorPlan;
pub use schema::{CollectionSchema, FieldSpec, FieldType};
pub use tools::{BrowserTools, HttpToolClient};
