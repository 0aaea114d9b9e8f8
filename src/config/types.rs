use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Job file as written by the caller, before validation
#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    /// Start URL to visit
    pub url: String,

    /// Nested schema describing the records to extract
    pub schema: Value,

    /// Ordered interactions run after every navigation
    #[serde(default)]
    pub interactions: Vec<RawInteraction>,

    #[serde(default)]
    pub options: ScrapeOptions,

    #[serde(default)]
    pub retry: RetrySettings,
}

/// Validated scraping job
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Absolute start URL
    pub url: Url,

    /// Nested schema, kept as JSON so key order is preserved
    pub schema: Value,

    /// Interactions that passed validation (unknown kinds are kept and skipped at run time)
    pub interactions: Vec<Interaction>,

    pub options: ScrapeOptions,

    pub retry: RetrySettings,
}

/// Runtime options for a scraping job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrapeOptions {
    /// Follow "next" links after the first page
    pub pagination: bool,

    /// Upper bound on pages fetched, including the first
    pub max_pages: u32,

    /// Wrap tool calls in the retry policy
    pub retry_failed: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            pagination: false,
            max_pages: 1,
            retry_failed: true,
        }
    }
}

/// Tuning for the exponential-backoff retry policy
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first attempt
    pub retries: u32,

    /// Delay before the first retry (milliseconds)
    pub base_delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay_ms: 500,
            backoff_factor: 2.0,
        }
    }
}

/// Interaction entry as found in the job file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInteraction {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub selector: Option<String>,

    /// Wait duration in milliseconds
    #[serde(default)]
    pub duration: Option<i64>,

    #[serde(default)]
    pub direction: Option<String>,
}

/// A validated user interaction executed against the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Interaction {
    Click { selector: String },
    Wait { duration_ms: u64 },
    Scroll { direction: ScrollDirection },
    Extract { selector: String },
    /// Unrecognized interaction kind; skipped with a diagnostic when run
    Unknown { kind: String },
}

impl Interaction {
    /// Lowercase tag name of this interaction
    pub fn kind(&self) -> &str {
        match self {
            Self::Click { .. } => "click",
            Self::Wait { .. } => "wait",
            Self::Scroll { .. } => "scroll",
            Self::Extract { .. } => "extract",
            Self::Unknown { kind } => kind,
        }
    }
}

/// Scroll target for scroll interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Top,
    Bottom,
}

impl ScrollDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrollDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("unknown scroll direction '{}'", other)),
        }
    }
}

/// A single reason an interaction entry was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionViolation {
    /// Position of the entry in the job's interaction list
    pub index: usize,

    /// Interaction kind as written
    pub kind: String,

    pub reason: String,
}

impl fmt::Display for InteractionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interaction #{} ('{}'): {}",
            self.index, self.kind, self.reason
        )
    }
}
