use crate::agent::{InteractionRunner, RetryPolicy};
use crate::pagination::PageSource;
use crate::tools::BrowserTools;
use crate::ToolResult;
use async_trait::async_trait;

/// Loads pages through a tool session: navigate, interact, fetch HTML
///
/// Every tool call runs under the job's retry policy. Diagnostics from
/// skipped interactions are collected once, however many pages replay them.
pub struct PageLoader<'a, T: BrowserTools + ?Sized> {
    tools: &'a T,
    retry: RetryPolicy,
    interactions: &'a InteractionRunner,
    diagnostics: Vec<String>,
}

impl<'a, T: BrowserTools + ?Sized> PageLoader<'a, T> {
    pub fn new(tools: &'a T, retry: RetryPolicy, interactions: &'a InteractionRunner) -> Self {
        Self {
            tools,
            retry,
            interactions,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<String> {
        self.diagnostics
    }
}

#[async_trait]
impl<'a, T: BrowserTools + ?Sized> PageSource for PageLoader<'a, T> {
    async fn load(&mut self, url: &str) -> ToolResult<String> {
        let tools = self.tools;

        tracing::info!("Navigating to {}", url);
        self.retry
            .run("navigate", move || tools.navigate(url))
            .await?;

        for diagnostic in self.interactions.run(tools).await? {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }

        let html = self.retry.run("html", move || tools.html()).await?;
        tracing::debug!("Fetched {} bytes of HTML from {}", html.len(), url);
        Ok(html)
    }

    async fn current_url(&self) -> ToolResult<String> {
        let tools = self.tools;
        self.retry
            .run("current_url", move || tools.current_url())
            .await
    }
}
