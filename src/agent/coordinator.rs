//! Job coordinator
//!
//! Runs one scraping job end to end:
//! 1. Analyse the schema
//! 2. Load the start page (navigate, interactions, HTML)
//! 3. Plan selectors from the first page
//! 4. Extract it and follow pagination with the same plan
//! 5. Wrap everything in a result envelope

use crate::agent::{InteractionRunner, PageLoader, RetryPolicy};
use crate::config::{job_from_value, ScrapeConfig};
use crate::output::{ResultFormatter, ScrapeResult};
use crate::pagination::{PageSource, PaginationController};
use crate::planner::build_plan;
use crate::schema::analyse_schema;
use crate::tools::BrowserTools;
use crate::ScrapeError;
use serde_json::Value;

/// Orchestrates a validated job against a browser tool session
#[derive(Debug, Clone)]
pub struct Coordinator {
    config: ScrapeConfig,
}

impl Coordinator {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Retry policy for navigation, HTML fetches and scrolls
    pub fn retry_policy(&self) -> RetryPolicy {
        if self.config.options.retry_failed {
            RetryPolicy::from_settings(&self.config.retry)
        } else {
            RetryPolicy::none()
        }
    }

    /// Runs the job inside a tool session
    ///
    /// The session is started first and always stopped afterwards, whatever
    /// the outcome. Any failure becomes an error envelope; records gathered
    /// before the failure are discarded.
    pub async fn run<T>(&self, tools: &mut T) -> ScrapeResult
    where
        T: BrowserTools + ?Sized,
    {
        tracing::info!("Starting job for {}", self.config.url);

        if let Err(e) = tools.start().await {
            let error = ScrapeError::from(e);
            tracing::error!("Could not start tool session: {}", error);
            return ResultFormatter::format_error(&error);
        }

        let outcome = self.execute(&*tools).await;

        if let Err(e) = tools.stop().await {
            tracing::warn!("Failed to stop tool session cleanly: {}", e);
        }

        match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Job failed: {}", e);
                ResultFormatter::format_error(&e)
            }
        }
    }

    /// Runs the pipeline against an already started session
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeResult)` - A success envelope
    /// * `Err(ScrapeError)` - The schema was invalid or a tool call failed
    ///   after its retries
    pub async fn execute<T>(&self, tools: &T) -> crate::Result<ScrapeResult>
    where
        T: BrowserTools + ?Sized,
    {
        let schema = analyse_schema(&self.config.schema)?;
        if schema.is_empty() {
            tracing::warn!("Schema declares no collection fields; no records will be extracted");
        }

        let retry = self.retry_policy();
        let runner = InteractionRunner::new(
            self.config.interactions.clone(),
            retry.clone(),
            self.config.options.retry_failed,
        );
        let mut loader = PageLoader::new(tools, retry, &runner);

        let start_url = self.config.url.as_str();
        let first_html = loader.load(start_url).await?;
        let plan = build_plan(&first_html, &schema);
        tracing::info!(
            "Planned {} field(s) with item selector {}",
            plan.field_selectors.len(),
            plan.item_selector.as_deref().unwrap_or("<whole document>")
        );

        let outcome = PaginationController::from_options(&self.config.options)
            .run(&mut loader, first_html, &plan, &schema)
            .await?;

        tracing::info!(
            "Extracted {} record(s) from {} page(s)",
            outcome.extraction.len(),
            outcome.pages_visited
        );

        let formatter = ResultFormatter::new(schema.collection_name.as_deref());
        Ok(formatter.format_success(outcome.extraction, start_url, loader.into_diagnostics()))
    }
}

/// Validates a raw job and runs it against a tool session
///
/// Configuration errors produce an error envelope without touching the
/// session.
///
/// # Arguments
///
/// * `tools` - The browser tool session to drive
/// * `job` - The job as JSON (`url`, `schema`, `interactions`, `options`)
pub async fn run_job<T>(tools: &mut T, job: Value) -> ScrapeResult
where
    T: BrowserTools + ?Sized,
{
    match job_from_value(job) {
        Ok(config) => Coordinator::new(config).run(tools).await,
        Err(e) => {
            let error = ScrapeError::from(e);
            tracing::error!("Invalid job: {}", error);
            ResultFormatter::format_error(&error)
        }
    }
}
