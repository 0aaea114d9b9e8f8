use crate::config::types::{
    Interaction, InteractionViolation, JobFile, RawInteraction, RetrySettings, ScrapeConfig,
    ScrapeOptions, ScrollDirection,
};
use crate::ConfigError;
use url::Url;

/// Validates a raw job file and converts it into a `ScrapeConfig`
pub fn validate(job: JobFile) -> Result<ScrapeConfig, ConfigError> {
    let url = validate_url(&job.url)?;
    validate_schema(&job.schema)?;
    validate_options(&job.options)?;
    validate_retry(&job.retry)?;
    let interactions =
        validate_interactions(&job.interactions).map_err(ConfigError::InvalidInteractions)?;

    Ok(ScrapeConfig {
        url,
        schema: job.schema,
        interactions,
        options: job.options,
        retry: job.retry,
    })
}

/// Validates the start URL: absolute, HTTP(S), with a host
fn validate_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use the http or https scheme",
            raw
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("'{}' has no host", raw)));
    }

    Ok(url)
}

/// The schema must be a JSON object; collection detection happens later
fn validate_schema(schema: &serde_json::Value) -> Result<(), ConfigError> {
    if !schema.is_object() {
        return Err(ConfigError::InvalidSchema(
            "schema must be a JSON object".to_string(),
        ));
    }
    Ok(())
}

fn validate_options(options: &ScrapeOptions) -> Result<(), ConfigError> {
    if options.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            options.max_pages
        )));
    }
    Ok(())
}

fn validate_retry(retry: &RetrySettings) -> Result<(), ConfigError> {
    if !retry.backoff_factor.is_finite() || retry.backoff_factor < 1.0 {
        return Err(ConfigError::Validation(format!(
            "backoff_factor must be a finite number >= 1.0, got {}",
            retry.backoff_factor
        )));
    }

    Ok(())
}

/// Validates every interaction entry, collecting all violations
///
/// Rules per interaction kind:
/// - click / extract: `selector` is required and non-blank
/// - wait: `duration` is required and >= 0
/// - scroll: `direction` is required and one of `top` / `bottom`
///
/// Kinds this crate does not recognize are not violations; they are returned
/// as `Interaction::Unknown` and skipped when the job runs.
pub fn validate_interactions(
    raw: &[RawInteraction],
) -> Result<Vec<Interaction>, Vec<InteractionViolation>> {
    let mut interactions = Vec::with_capacity(raw.len());
    let mut violations = Vec::new();

    for (index, entry) in raw.iter().enumerate() {
        match validate_interaction(entry) {
            Ok(interaction) => interactions.push(interaction),
            Err(reason) => violations.push(InteractionViolation {
                index,
                kind: entry.kind.clone(),
                reason,
            }),
        }
    }

    if violations.is_empty() {
        Ok(interactions)
    } else {
        Err(violations)
    }
}

fn validate_interaction(entry: &RawInteraction) -> Result<Interaction, String> {
    let kind = entry.kind.trim().to_ascii_lowercase();

    match kind.as_str() {
        "click" => required_selector(entry).map(|selector| Interaction::Click { selector }),
        "extract" => required_selector(entry).map(|selector| Interaction::Extract { selector }),
        "wait" => match entry.duration {
            None => Err("duration is required when type='wait'".to_string()),
            Some(ms) if ms < 0 => Err(format!("duration must be >= 0, got {}", ms)),
            Some(ms) => Ok(Interaction::Wait {
                duration_ms: ms as u64,
            }),
        },
        "scroll" => match entry.direction.as_deref() {
            None => Err("direction is required when type='scroll'".to_string()),
            Some(direction) => direction
                .parse::<ScrollDirection>()
                .map(|direction| Interaction::Scroll { direction }),
        },
        "" => Err("type cannot be empty".to_string()),
        _ => Ok(Interaction::Unknown { kind }),
    }
}

fn required_selector(entry: &RawInteraction) -> Result<String, String> {
    match entry.selector.as_deref().map(str::trim) {
        Some(selector) if !selector.is_empty() => Ok(selector.to_string()),
        Some(_) => Err(format!(
            "selector cannot be blank when type='{}'",
            entry.kind
        )),
        None => Err(format!("selector is required when type='{}'", entry.kind)),
    }
}
