//! Integration tests for Schema-Harvest
//!
//! - `pipeline_tests`: full jobs against an in-memory browser
//! - `http_tools_tests`: the HTTP tool client against a wiremock driver

mod http_tools_tests;
mod pipeline_tests;
