use crate::config::types::{JobFile, ScrapeConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and validates a job file from the given path
///
/// Files ending in `.toml` are parsed as TOML; anything else is parsed as JSON.
/// JSON is preferred because it preserves the declaration order of schema keys,
/// which decides the collection and the field order.
///
/// # Arguments
///
/// * `path` - Path to the job file
///
/// # Returns
///
/// * `Ok(ScrapeConfig)` - Successfully loaded and validated job
/// * `Err(ConfigError)` - Failed to read, parse, or validate the job
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use schema_harvest::config::load_job;
///
/// let job = load_job(Path::new("job.json")).unwrap();
/// println!("Start URL: {}", job.url);
/// ```
pub fn load_job(path: &Path) -> Result<ScrapeConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        parse_job_toml(&content)
    } else {
        parse_job_json(&content)
    }
}

/// Parses and validates a job from JSON text
pub fn parse_job_json(content: &str) -> Result<ScrapeConfig, ConfigError> {
    let job: JobFile = serde_json::from_str(content)?;
    validate(job)
}

/// Parses and validates a job from TOML text
pub fn parse_job_toml(content: &str) -> Result<ScrapeConfig, ConfigError> {
    let job: JobFile = toml::from_str(content)?;
    validate(job)
}

/// Parses and validates a job from an already-decoded JSON value
pub fn job_from_value(value: serde_json::Value) -> Result<ScrapeConfig, ConfigError> {
    let job: JobFile = serde_json::from_value(value)?;
    validate(job)
}

/// Computes a SHA-256 hash of the job file content
///
/// The hash is logged at startup so runs can be matched to the exact job
/// definition that produced them.
pub fn compute_job_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a job and returns both the validated config and its hash
pub fn load_job_with_hash(path: &Path) -> Result<(ScrapeConfig, String), ConfigError> {
    let config = load_job(path)?;
    let hash = compute_job_hash(path)?;
    Ok((config, hash))
}
