//! HTTP tool client
//!
//! Talks to a browser automation driver that exposes its primitives over a
//! small JSON protocol:
//! - `GET  {base}/mcp/tools/list` returns the registered tool names
//! - `POST {base}/mcp/tools/call` with `{"tool", "params"}` returns
//!   `{"ok", "data", "error"}`

use crate::config::ScrollDirection;
use crate::tools::{BrowserTools, ToolName};
use crate::{ToolError, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct CallRequest<'a> {
    tool: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct CallResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Builds the HTTP client used for driver calls
///
/// # Arguments
///
/// * `timeout` - Per-request timeout; page loads happen inside the driver, so
///   this bounds the slowest tool call
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `BrowserTools` implementation backed by the driver's HTTP endpoints
#[derive(Debug)]
pub struct HttpToolClient {
    base_url: String,
    timeout: Duration,
    client: Option<Client>,
}

impl HttpToolClient {
    /// Creates a client for a driver at `base_url` (e.g. `http://127.0.0.1:8000`)
    ///
    /// No connection is made until `start` is called.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout,
            client: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true between `start` and `stop`
    pub fn is_started(&self) -> bool {
        self.client.is_some()
    }

    async fn call(&self, tool: ToolName, params: Value) -> ToolResult<Value> {
        let client = self.client.as_ref().ok_or(ToolError::NotStarted)?;
        let endpoint = format!("{}/mcp/tools/call", self.base_url);

        tracing::trace!("Calling tool {} with {}", tool, params);

        let response = client
            .post(&endpoint)
            .json(&CallRequest {
                tool: tool.as_str(),
                params,
            })
            .send()
            .await
            .map_err(|source| ToolError::Transport { tool, source })?;

        let status = response.status();
        let body: CallResponse = response.json().await.map_err(|e| ToolError::InvalidResponse {
            tool,
            message: format!("HTTP {}: {}", status, e),
        })?;

        if !body.ok {
            return Err(ToolError::Failed {
                tool,
                message: body
                    .error
                    .unwrap_or_else(|| "Unknown driver error".to_string()),
            });
        }

        Ok(body.data)
    }

    /// Queries the driver's tool list and warns about tools the pipeline needs
    async fn check_tools(&self, client: &Client) {
        let endpoint = format!("{}/mcp/tools/list", self.base_url);

        let body: Value = match client.get(&endpoint).send().await {
            Ok(response) => match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Unreadable tool list from {}: {}", endpoint, e);
                    return;
                }
            },
            Err(e) => {
                tracing::warn!("Could not list driver tools at {}: {}", endpoint, e);
                return;
            }
        };

        let listed = body
            .pointer("/data/tools")
            .or_else(|| body.get("tools"))
            .and_then(Value::as_array);

        let Some(listed) = listed else {
            tracing::debug!("Driver tool list has no 'tools' array");
            return;
        };

        let names: Vec<&str> = listed.iter().filter_map(Value::as_str).collect();
        for tool in ToolName::ALL {
            if !names.contains(&tool.as_str()) {
                tracing::warn!("Driver does not advertise tool '{}'", tool);
            }
        }
    }
}

#[async_trait]
impl BrowserTools for HttpToolClient {
    async fn start(&mut self) -> ToolResult<()> {
        if self.client.is_some() {
            return Ok(());
        }

        let client = build_http_client(self.timeout).map_err(|source| ToolError::Transport {
            tool: ToolName::Navigate,
            source,
        })?;

        self.check_tools(&client).await;
        self.client = Some(client);

        tracing::debug!("Tool session started against {}", self.base_url);
        Ok(())
    }

    async fn stop(&mut self) -> ToolResult<()> {
        if self.client.take().is_some() {
            tracing::debug!("Tool session stopped");
        }
        Ok(())
    }

    async fn navigate(&self, url: &str) -> ToolResult<()> {
        self.call(ToolName::Navigate, json!({ "url": url })).await?;
        Ok(())
    }

    async fn html(&self) -> ToolResult<String> {
        let data = self.call(ToolName::Html, json!({})).await?;

        match data {
            Value::String(html) => Ok(html),
            Value::Object(mut map) => match map.remove("html") {
                Some(Value::String(html)) => Ok(html),
                _ => Err(ToolError::InvalidResponse {
                    tool: ToolName::Html,
                    message: "response data has no 'html' string".to_string(),
                }),
            },
            other => Err(ToolError::InvalidResponse {
                tool: ToolName::Html,
                message: format!("unexpected data: {}", other),
            }),
        }
    }

    async fn click(&self, selector: &str) -> ToolResult<()> {
        self.call(ToolName::Click, json!({ "selector": selector }))
            .await?;
        Ok(())
    }

    async fn scroll(&self, direction: ScrollDirection) -> ToolResult<()> {
        self.call(ToolName::Scroll, json!({ "direction": direction.as_str() }))
            .await?;
        Ok(())
    }

    async fn current_url(&self) -> ToolResult<String> {
        let data = self.call(ToolName::CurrentUrl, json!({})).await?;

        data.get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::InvalidResponse {
                tool: ToolName::CurrentUrl,
                message: "response data has no 'url' string".to_string(),
            })
    }
}
