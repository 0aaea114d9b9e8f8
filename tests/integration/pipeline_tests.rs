//! End-to-end jobs against an in-memory browser
//!
//! `FakeBrowser` serves canned HTML per URL and records every tool call, so the
//! tests can check both the result envelope and how the pipeline drove the
//! session.

use async_trait::async_trait;
use schema_harvest::config::ScrollDirection;
use schema_harvest::tools::{BrowserTools, ToolName};
use schema_harvest::{run_job, ScrapeResult, ToolError, ToolResult};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct SessionLog {
    current: Option<String>,
    navigations: Vec<String>,
    html_fetches: usize,
    clicks: Vec<String>,
    scrolls: Vec<ScrollDirection>,
}

#[derive(Default)]
struct FakeBrowser {
    pages: HashMap<String, String>,
    log: Mutex<SessionLog>,
    started: bool,
    stopped: bool,
}

impl FakeBrowser {
    fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn navigations(&self) -> Vec<String> {
        self.log.lock().unwrap().navigations.clone()
    }

    fn html_fetches(&self) -> usize {
        self.log.lock().unwrap().html_fetches
    }
}

#[async_trait]
impl BrowserTools for FakeBrowser {
    async fn start(&mut self) -> ToolResult<()> {
        self.started = true;
        Ok(())
    }

    async fn stop(&mut self) -> ToolResult<()> {
        self.stopped = true;
        Ok(())
    }

    async fn navigate(&self, url: &str) -> ToolResult<()> {
        let mut log = self.log.lock().unwrap();
        log.navigations.push(url.to_string());

        if !self.pages.contains_key(url) {
            return Err(ToolError::Failed {
                tool: ToolName::Navigate,
                message: format!("net::ERR_NAME_NOT_RESOLVED at {}", url),
            });
        }

        log.current = Some(url.to_string());
        Ok(())
    }

    async fn html(&self) -> ToolResult<String> {
        let mut log = self.log.lock().unwrap();
        log.html_fetches += 1;

        let current = log.current.clone().ok_or(ToolError::Failed {
            tool: ToolName::Html,
            message: "no page loaded".to_string(),
        })?;
        Ok(self.pages[&current].clone())
    }

    async fn click(&self, selector: &str) -> ToolResult<()> {
        self.log.lock().unwrap().clicks.push(selector.to_string());
        Ok(())
    }

    async fn scroll(&self, direction: ScrollDirection) -> ToolResult<()> {
        self.log.lock().unwrap().scrolls.push(direction);
        Ok(())
    }

    async fn current_url(&self) -> ToolResult<String> {
        self.log
            .lock()
            .unwrap()
            .current
            .clone()
            .ok_or(ToolError::Failed {
                tool: ToolName::CurrentUrl,
                message: "no page loaded".to_string(),
            })
    }
}

const PAGE_1: &str = r#"
<html><body>
  <div class="product-card">
    <h2 class="product-name">Laptop Pro</h2>
    <span class="price">$1,234.50</span>
    <span class="availability">In Stock</span>
    <div class="specs"><span class="cpu">M3 Max</span><span class="ram">32 GB</span></div>
  </div>
  <div class="product-card">
    <h2 class="product-name">Laptop Air</h2>
    <span class="price">$999</span>
    <span class="availability">Currently unavailable</span>
  </div>
  <div class="product-card"><p>Sponsored</p></div>
  <nav class="pagination"><a rel="next" href="/laptops?page=2">Next »</a></nav>
</body></html>
"#;

const PAGE_2: &str = r#"
<html><body>
  <div class="product-card">
    <h2 class="product-name">Laptop Mini</h2>
    <span class="price">$649.00</span>
    <span class="availability">Limited</span>
  </div>
</body></html>
"#;

const START: &str = "https://shop.test/laptops";
const SECOND: &str = "https://shop.test/laptops?page=2";

fn laptop_schema() -> Value {
    json!({
        "products": [{
            "name": "string",
            "price": "number",
            "availability": "boolean",
            "specifications": {"cpu": "string", "ram": "string"}
        }],
        "metadata": {"extraction_date": "datetime"}
    })
}

fn job(options: Value, interactions: Value) -> Value {
    json!({
        "url": START,
        "schema": laptop_schema(),
        "interactions": interactions,
        "options": options
    })
}

fn as_json(result: &ScrapeResult) -> Value {
    serde_json::to_value(result).unwrap()
}

#[tokio::test]
async fn test_two_page_chain_with_three_page_budget() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1), (SECOND, PAGE_2)]);
    let options = json!({"pagination": true, "max_pages": 3});

    let result = run_job(&mut browser, job(options, json!([]))).await;

    assert!(result.is_success());
    assert_eq!(browser.navigations(), vec![START, SECOND]);
    assert_eq!(browser.html_fetches(), 2);
    assert!(browser.started && browser.stopped);

    let value = as_json(&result);
    let names: Vec<&str> = value["data"]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Laptop Pro", "Laptop Air", "Laptop Mini"]);
    assert_eq!(value["data"]["metadata"]["num_results"], 3);
    assert_eq!(value["data"]["metadata"]["source_url"], START);
}

#[tokio::test]
async fn test_typed_and_nested_values() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1)]);

    let result = run_job(&mut browser, job(json!({}), json!([]))).await;
    let records = result.records();

    assert_eq!(
        records[0],
        json!({
            "name": "Laptop Pro",
            "price": 1234.5,
            "availability": true,
            "specifications": {"cpu": "M3 Max", "ram": "32 GB"}
        })
    );
    assert_eq!(records[1]["price"], json!(999));
    assert_eq!(records[1]["availability"], json!(false));
    assert!(records[1].get("specifications").is_none());
}

#[tokio::test]
async fn test_zero_field_records_are_not_counted() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1)]);

    let result = run_job(&mut browser, job(json!({}), json!([]))).await;
    let report = result.quality_report().unwrap();

    // The sponsored card matches the item selector but yields no field
    assert_eq!(result.records().len(), 2);
    assert_eq!(report.total_items, 2);
    assert_eq!(report.complete_items, 1);
    assert_eq!(report.completion_rate, 0.5);
    assert_eq!(
        report.missing_fields_summary,
        vec!["specifications.cpu: 1 items", "specifications.ram: 1 items"]
    );
}

#[tokio::test]
async fn test_pagination_off_reads_one_page() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1), (SECOND, PAGE_2)]);
    let options = json!({"pagination": false, "max_pages": 5});

    let result = run_job(&mut browser, job(options, json!([]))).await;

    assert_eq!(browser.navigations(), vec![START]);
    assert_eq!(result.records().len(), 2);
}

#[tokio::test]
async fn test_unparseable_boolean_is_missing() {
    let page = r#"<div class="product-card"><h2 class="product-name">Mini</h2>
                  <span class="availability">Limited</span></div>"#;
    let mut browser = FakeBrowser::with_pages(&[(START, page)]);

    let result = run_job(&mut browser, job(json!({}), json!([]))).await;

    assert_eq!(result.records(), &[json!({"name": "Mini"})]);
    let report = result.quality_report().unwrap();
    assert!(report
        .missing_fields_summary
        .contains(&"availability: 1 items".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_interactions_replayed_on_every_page() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1), (SECOND, PAGE_2)]);
    let interactions = json!([
        {"type": "click", "selector": "#cookie-accept"},
        {"type": "wait", "duration": 200},
        {"type": "scroll", "direction": "bottom"},
        {"type": "hover", "selector": ".menu"}
    ]);
    let options = json!({"pagination": true, "max_pages": 2});

    let result = run_job(&mut browser, job(options, interactions)).await;

    let log = browser.log.lock().unwrap();
    assert_eq!(log.clicks, vec!["#cookie-accept", "#cookie-accept"]);
    assert_eq!(log.scrolls, vec![ScrollDirection::Bottom, ScrollDirection::Bottom]);

    // The unknown interaction is reported once, not once per page
    let report = result.quality_report().unwrap();
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("hover"));
}

#[tokio::test(start_paused = true)]
async fn test_navigation_failure_is_retried_then_reported() {
    let mut browser = FakeBrowser::with_pages(&[]);

    let result = run_job(&mut browser, job(json!({"retry_failed": true}), json!([]))).await;

    // One attempt plus three retries
    assert_eq!(browser.navigations().len(), 4);
    assert!(browser.stopped);

    let value = as_json(&result);
    assert_eq!(value["status"], "error");
    assert_eq!(value["details"], "ToolInvocationError");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("net::ERR_NAME_NOT_RESOLVED"));
    assert_eq!(value["data"], Value::Null);
    assert_eq!(value["quality_report"], Value::Null);
}

#[tokio::test]
async fn test_navigation_failure_without_retry_runs_once() {
    let mut browser = FakeBrowser::with_pages(&[]);

    let result = run_job(&mut browser, job(json!({"retry_failed": false}), json!([]))).await;

    assert!(!result.is_success());
    assert_eq!(browser.navigations().len(), 1);
}

#[tokio::test]
async fn test_invalid_job_never_starts_session() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1)]);
    let interactions = json!([
        {"type": "click"},
        {"type": "scroll", "direction": "sideways"}
    ]);

    let result = run_job(&mut browser, job(json!({}), interactions)).await;

    assert!(!browser.started);
    let value = as_json(&result);
    assert_eq!(value["details"], "ConfigurationError");
    let message = value["error"].as_str().unwrap();
    assert!(message.contains("interaction #0"));
    assert!(message.contains("interaction #1"));
}

#[tokio::test]
async fn test_schema_without_collection_uses_items_key() {
    let mut browser = FakeBrowser::with_pages(&[(START, PAGE_1)]);
    let job = json!({"url": START, "schema": {"title": "string"}});

    let result = run_job(&mut browser, job).await;

    let value = as_json(&result);
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["items"], json!([]));
    assert_eq!(value["quality_report"]["total_items"], 0);
    assert_eq!(value["quality_report"]["completion_rate"], 0.0);
}
