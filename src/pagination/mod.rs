//! Pagination traversal
//!
//! After the first page is extracted, the controller looks for a next-page
//! link, loads it through a `PageSource`, and extracts it with the first
//! page's selector plan, until the page budget runs out or no link is left.

mod controller;
mod next_link;

pub use controller::{PaginationController, PaginationOutcome};
pub use next_link::{find_next_link, next_page_url, resolve_link};

use crate::ToolResult;
use async_trait::async_trait;

/// Loads pages for the pagination loop
///
/// `load` navigates to a URL, replays the job's interactions, and returns the
/// resulting HTML.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn load(&mut self, url: &str) -> ToolResult<String>;

    async fn current_url(&self) -> ToolResult<String>;
}
