//! Browser tool boundary
//!
//! The pipeline never renders pages itself. It drives an external browser
//! automation service through the `BrowserTools` trait, one call per
//! primitive. `HttpToolClient` is the production implementation; tests use
//! in-memory fakes.

mod http;

pub use http::{build_http_client, HttpToolClient};

use crate::config::ScrollDirection;
use crate::{ToolError, ToolResult};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Name of a browser tool exposed by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    Navigate,
    Html,
    Click,
    Scroll,
    CurrentUrl,
}

impl ToolName {
    /// Every tool the pipeline may call
    pub const ALL: [ToolName; 5] = [
        ToolName::Navigate,
        ToolName::Html,
        ToolName::Click,
        ToolName::Scroll,
        ToolName::CurrentUrl,
    ];

    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Navigate => "navigate",
            ToolName::Html => "html",
            ToolName::Click => "click",
            ToolName::Scroll => "scroll",
            ToolName::CurrentUrl => "current_url",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// A browser session driven through tool calls
///
/// One session is owned by one job. `start` is called before any other
/// method and `stop` once the job is over, whether it succeeded or not.
#[async_trait]
pub trait BrowserTools: Send + Sync {
    /// Opens the session
    async fn start(&mut self) -> ToolResult<()> {
        Ok(())
    }

    /// Closes the session
    async fn stop(&mut self) -> ToolResult<()> {
        Ok(())
    }

    /// Loads a URL in the browser
    async fn navigate(&self, url: &str) -> ToolResult<()>;

    /// Returns the rendered HTML of the current page
    async fn html(&self) -> ToolResult<String>;

    /// Clicks the first element matching a CSS selector
    async fn click(&self, selector: &str) -> ToolResult<()>;

    /// Scrolls the page to the top or bottom
    async fn scroll(&self, direction: ScrollDirection) -> ToolResult<()>;

    /// Returns the URL of the current page, after redirects
    async fn current_url(&self) -> ToolResult<String>;
}
