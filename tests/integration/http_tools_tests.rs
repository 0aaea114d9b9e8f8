//! HTTP tool client tests
//!
//! These tests use wiremock to stand in for the browser automation driver.

use schema_harvest::config::ScrollDirection;
use schema_harvest::tools::{BrowserTools, HttpToolClient, ToolName};
use schema_harvest::ToolError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_tool_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/mcp/tools/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {"tools": ["navigate", "html", "click", "scroll", "current_url"]}
        })))
        .mount(server)
        .await;
}

async fn mount_call(server: &MockServer, tool: &str, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .and(body_partial_json(json!({"tool": tool})))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

async fn started_client(server: &MockServer) -> HttpToolClient {
    let mut client = HttpToolClient::new(server.uri(), Duration::from_secs(5));
    client.start().await.expect("Failed to start tool client");
    client
}

#[tokio::test]
async fn test_start_queries_tool_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mcp/tools/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {"tools": ["navigate", "html"]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    assert!(client.is_started());
}

#[tokio::test]
async fn test_navigate_sends_url_param() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .and(body_partial_json(json!({
            "tool": "navigate",
            "params": {"url": "https://shop.test/laptops"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {"url": "https://shop.test/laptops"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    client
        .navigate("https://shop.test/laptops")
        .await
        .expect("navigate should succeed");
}

#[tokio::test]
async fn test_html_accepts_object_payload() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;
    mount_call(
        &server,
        "html",
        json!({"ok": true, "data": {"html": "<html><body>hi</body></html>"}}),
    )
    .await;

    let client = started_client(&server).await;
    assert_eq!(client.html().await.unwrap(), "<html><body>hi</body></html>");
}

#[tokio::test]
async fn test_html_accepts_bare_string_payload() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;
    mount_call(&server, "html", json!({"ok": true, "data": "<p>bare</p>"})).await;

    let client = started_client(&server).await;
    assert_eq!(client.html().await.unwrap(), "<p>bare</p>");
}

#[tokio::test]
async fn test_driver_error_becomes_failed() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;
    mount_call(
        &server,
        "click",
        json!({"ok": false, "error": "Timeout 30000ms exceeded waiting for #buy"}),
    )
    .await;

    let client = started_client(&server).await;
    let err = client.click("#buy").await.unwrap_err();

    match err {
        ToolError::Failed { tool, message } => {
            assert_eq!(tool, ToolName::Click);
            assert!(message.contains("#buy"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_scroll_and_current_url() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .and(body_partial_json(json!({
            "tool": "scroll",
            "params": {"direction": "bottom"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "data": {}})))
        .expect(1)
        .mount(&server)
        .await;
    mount_call(
        &server,
        "current_url",
        json!({"ok": true, "data": {"url": "https://shop.test/laptops?page=2"}}),
    )
    .await;

    let client = started_client(&server).await;
    client.scroll(ScrollDirection::Bottom).await.unwrap();
    assert_eq!(
        client.current_url().await.unwrap(),
        "https://shop.test/laptops?page=2"
    );
}

#[tokio::test]
async fn test_non_json_response_is_invalid() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/mcp/tools/call"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = started_client(&server).await;
    let err = client.html().await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidResponse { tool: ToolName::Html, .. }));
}

#[tokio::test]
async fn test_calls_after_stop_fail() {
    let server = MockServer::start().await;
    mount_tool_list(&server).await;

    let mut client = started_client(&server).await;
    client.stop().await.unwrap();

    assert!(!client.is_started());
    assert!(matches!(
        client.navigate("https://shop.test").await,
        Err(ToolError::NotStarted)
    ));
}
