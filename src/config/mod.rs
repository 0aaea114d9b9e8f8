//! Job configuration module for Schema-Harvest
//!
//! This module handles loading, parsing, and validating scraping jobs. A job names
//! the start URL, the nested schema to extract, the interactions to replay after
//! every navigation, and the pagination/retry options.
//!
//! # Example
//!
//! ```no_run
//! use schema_harvest::config::load_job;
//! use std::path::Path;
//!
//! let job = load_job(Path::new("job.json")).unwrap();
//! println!("Will fetch at most {} pages", job.options.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Interaction, InteractionViolation, JobFile, RawInteraction, RetrySettings, ScrapeConfig,
    ScrapeOptions, ScrollDirection,
};

// Re-export parser and validation functions
pub use parser::{
    compute_job_hash, job_from_value, load_job, load_job_with_hash, parse_job_json,
    parse_job_toml,
};
pub use validation::validate_interactions;
