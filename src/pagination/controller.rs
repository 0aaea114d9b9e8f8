use crate::config::ScrapeOptions;
use crate::extract::{extract_records, PageExtraction};
use crate::pagination::{next_page_url, PageSource};
use crate::planner::SelectorPlan;
use crate::schema::CollectionSchema;
use crate::ToolResult;
use std::collections::HashSet;
use url::Url;

/// Records aggregated across every page of a job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationOutcome {
    pub extraction: PageExtraction,
    pub pages_visited: u32,
}

/// Drives successive navigation and extraction rounds
#[derive(Debug, Clone)]
pub struct PaginationController {
    enabled: bool,
    max_pages: u32,
}

impl PaginationController {
    pub fn new(enabled: bool, max_pages: u32) -> Self {
        Self {
            enabled,
            max_pages: max_pages.max(1),
        }
    }

    pub fn from_options(options: &ScrapeOptions) -> Self {
        Self::new(options.pagination, options.max_pages)
    }

    /// Extracts the first page, then follows next links while budget remains
    ///
    /// The loop stops when no next link is found, when the next link points
    /// to a page already visited, or after `max_pages` pages. Every page is
    /// extracted with the same plan.
    ///
    /// # Arguments
    ///
    /// * `source` - Loads pages and reports the current URL
    /// * `first_html` - HTML of the already-loaded first page
    /// * `plan` - Selector plan built from the first page
    /// * `schema` - The analysed collection schema
    pub async fn run<S>(
        &self,
        source: &mut S,
        first_html: String,
        plan: &SelectorPlan,
        schema: &CollectionSchema,
    ) -> ToolResult<PaginationOutcome>
    where
        S: PageSource + ?Sized,
    {
        let mut extraction = extract_records(&first_html, plan, schema);
        let mut pages_visited = 1;
        tracing::info!("Page 1: {} record(s)", extraction.len());

        if !self.enabled || self.max_pages <= 1 {
            return Ok(PaginationOutcome {
                extraction,
                pages_visited,
            });
        }

        let mut visited = HashSet::new();
        let mut html = first_html;

        while pages_visited < self.max_pages {
            let current_url = source.current_url().await?;
            visited.insert(visit_key(&current_url));

            let Some(next_url) = next_page_url(&html, &current_url) else {
                tracing::info!("No next-page link on page {}; stopping", pages_visited);
                break;
            };

            if !visited.insert(visit_key(&next_url)) {
                tracing::info!("Next-page link {} was already visited; stopping", next_url);
                break;
            }

            tracing::debug!("Following next-page link to {}", next_url);
            html = source.load(&next_url).await?;
            pages_visited += 1;

            let page = extract_records(&html, plan, schema);
            tracing::info!("Page {}: {} record(s)", pages_visited, page.len());
            extraction.append(page);
        }

        if pages_visited == self.max_pages {
            tracing::debug!("Page budget of {} exhausted", self.max_pages);
        }

        Ok(PaginationOutcome {
            extraction,
            pages_visited,
        })
    }
}

/// URL identity for cycle detection: fragments are ignored
fn visit_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::build_plan;
    use crate::schema::analyse_schema;
    use crate::ToolError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct FakeSite {
        pages: HashMap<String, String>,
        current: String,
        loads: Vec<String>,
    }

    impl FakeSite {
        fn new(start: &str, pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                current: start.to_string(),
                loads: Vec::new(),
            }
        }

        fn first_html(&self) -> String {
            self.pages[&self.current].clone()
        }
    }

    #[async_trait]
    impl PageSource for FakeSite {
        async fn load(&mut self, url: &str) -> ToolResult<String> {
            self.loads.push(url.to_string());
            self.current = url.to_string();
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ToolError::Failed {
                    tool: crate::tools::ToolName::Navigate,
                    message: format!("404 {}", url),
                })
        }

        async fn current_url(&self) -> ToolResult<String> {
            Ok(self.current.clone())
        }
    }

    const PAGE_1: &str = r#"
        <div class="product"><span class="price">1</span></div>
        <div class="product"><span class="price">2</span></div>
        <a rel="next" href="/list?page=2">Next</a>
    "#;
    const PAGE_2: &str = r#"
        <div class="product"><span class="price">3</span></div>
        <div class="product"><span class="price">4</span></div>
    "#;

    fn schema() -> CollectionSchema {
        analyse_schema(&json!({"products": [{"price": "number"}]})).unwrap()
    }

    #[tokio::test]
    async fn test_two_page_chain_with_larger_budget() {
        let mut site = FakeSite::new(
            "https://shop.test/list",
            &[
                ("https://shop.test/list", PAGE_1),
                ("https://shop.test/list?page=2", PAGE_2),
            ],
        );
        let schema = schema();
        let first = site.first_html();
        let plan = build_plan(&first, &schema);

        let outcome = PaginationController::new(true, 3)
            .run(&mut site, first, &plan, &schema)
            .await
            .unwrap();

        assert_eq!(outcome.pages_visited, 2);
        assert_eq!(site.loads, vec!["https://shop.test/list?page=2"]);
        let prices: Vec<_> = outcome
            .extraction
            .records
            .iter()
            .map(|r| r["price"].clone())
            .collect();
        assert_eq!(prices, vec![json!(1), json!(2), json!(3), json!(4)]);
        assert_eq!(outcome.extraction.missing.len(), 4);
    }

    #[tokio::test]
    async fn test_budget_limits_pages() {
        let mut site = FakeSite::new(
            "https://shop.test/list",
            &[
                ("https://shop.test/list", PAGE_1),
                ("https://shop.test/list?page=2", PAGE_2),
            ],
        );
        let schema = schema();
        let first = site.first_html();
        let plan = build_plan(&first, &schema);

        let outcome = PaginationController::new(true, 1)
            .run(&mut site, first, &plan, &schema)
            .await
            .unwrap();

        assert_eq!(outcome.pages_visited, 1);
        assert!(site.loads.is_empty());
        assert_eq!(outcome.extraction.len(), 2);
    }

    #[tokio::test]
    async fn test_disabled_pagination_ignores_next_link() {
        let mut site = FakeSite::new("https://shop.test/list", &[("https://shop.test/list", PAGE_1)]);
        let schema = schema();
        let first = site.first_html();
        let plan = build_plan(&first, &schema);

        let outcome = PaginationController::new(false, 5)
            .run(&mut site, first, &plan, &schema)
            .await
            .unwrap();

        assert_eq!(outcome.pages_visited, 1);
        assert!(site.loads.is_empty());
    }

    #[tokio::test]
    async fn test_cycle_stops_loop() {
        let looping = r#"
            <div class="product"><span class="price">5</span></div>
            <a rel="next" href="/list#top">Next</a>
        "#;
        let mut site = FakeSite::new("https://shop.test/list", &[("https://shop.test/list", looping)]);
        let schema = schema();
        let first = site.first_html();
        let plan = build_plan(&first, &schema);

        let outcome = PaginationController::new(true, 10)
            .run(&mut site, first, &plan, &schema)
            .await
            .unwrap();

        assert_eq!(outcome.pages_visited, 1);
        assert!(site.loads.is_empty());
    }

    #[tokio::test]
    async fn test_failed_navigation_propagates() {
        let mut site = FakeSite::new("https://shop.test/list", &[("https://shop.test/list", PAGE_1)]);
        let schema = schema();
        let first = site.first_html();
        let plan = build_plan(&first, &schema);

        let result = PaginationController::new(true, 3)
            .run(&mut site, first, &plan, &schema)
            .await;

        assert!(result.is_err());
    }
}
