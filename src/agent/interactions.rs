//! Replaying configured interactions against the current page

use crate::agent::RetryPolicy;
use crate::config::Interaction;
use crate::tools::BrowserTools;
use crate::ToolResult;
use std::time::Duration;

/// Runs a job's interactions, in order, after every navigation
#[derive(Debug, Clone)]
pub struct InteractionRunner {
    interactions: Vec<Interaction>,
    retry: RetryPolicy,
    click_retry: RetryPolicy,
}

impl InteractionRunner {
    /// Creates a runner
    ///
    /// With `retry_failed` off, clicks and scrolls run once; otherwise scrolls
    /// use `retry` and clicks use the single-retry click policy.
    pub fn new(interactions: Vec<Interaction>, retry: RetryPolicy, retry_failed: bool) -> Self {
        let (retry, click_retry) = if retry_failed {
            (retry, RetryPolicy::for_clicks())
        } else {
            (RetryPolicy::none(), RetryPolicy::none())
        };

        Self {
            interactions,
            retry,
            click_retry,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Runs every interaction against the current page
    ///
    /// Unknown interaction kinds are skipped; one diagnostic line is returned
    /// for each of them. A failing click or scroll aborts the run.
    pub async fn run<T>(&self, tools: &T) -> ToolResult<Vec<String>>
    where
        T: BrowserTools + ?Sized,
    {
        let mut diagnostics = Vec::new();

        if self.interactions.is_empty() {
            tracing::debug!("No interactions configured");
            return Ok(diagnostics);
        }

        tracing::debug!("Running {} interaction(s)", self.interactions.len());

        for (index, interaction) in self.interactions.iter().enumerate() {
            match interaction {
                Interaction::Click { selector } => {
                    tracing::debug!("Clicking '{}'", selector);
                    let selector = selector.as_str();
                    self.click_retry
                        .run("click", move || tools.click(selector))
                        .await?;
                }
                Interaction::Wait { duration_ms } => {
                    tracing::debug!("Waiting {} ms", duration_ms);
                    tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
                }
                Interaction::Scroll { direction } => {
                    tracing::debug!("Scrolling to {}", direction);
                    let direction = *direction;
                    self.retry
                        .run("scroll", move || tools.scroll(direction))
                        .await?;
                }
                Interaction::Extract { selector } => {
                    // Records come from the schema; extract steps have no effect
                    tracing::debug!("Ignoring extract interaction for '{}'", selector);
                }
                Interaction::Unknown { kind } => {
                    tracing::warn!(
                        "Skipping unknown interaction #{} of type '{}'",
                        index,
                        kind
                    );
                    diagnostics.push(format!(
                        "Skipped unknown interaction #{} of type '{}'",
                        index, kind
                    ));
                }
            }
        }

        Ok(diagnostics)
    }
}
