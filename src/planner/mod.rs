//! Heuristic selector planning
//!
//! This module inspects the first fetched page and produces a `SelectorPlan`:
//! - the repeated "item container" selector scoping one record
//! - an ordered fallback list of CSS selectors for every schema field
//!
//! The plan is computed once per job and reused unchanged on later pages.

mod fields;
mod item;

pub use fields::field_selectors;
pub use item::{canonical_selector, infer_item_selector};

use crate::schema::CollectionSchema;
use scraper::Html;
use serde::Serialize;

/// Ordered candidate selectors for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSelectors {
    /// Dotted field path
    pub field: String,

    /// Candidate selectors, tried first to last
    pub selectors: Vec<String>,
}

/// Selectors used to extract records from every page of a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorPlan {
    /// Selector matching one element per record; `None` means the whole document
    /// is a single implicit container
    pub item_selector: Option<String>,

    /// Per-field candidates, in schema declaration order
    pub field_selectors: Vec<FieldSelectors>,
}

impl SelectorPlan {
    /// Returns the candidate selectors for a field path (empty if unknown)
    pub fn selectors_for(&self, field: &str) -> &[String] {
        self.field_selectors
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.selectors.as_slice())
            .unwrap_or(&[])
    }
}

/// Builds a selector plan from the first page's HTML
///
/// # Arguments
///
/// * `html` - The HTML of the first page, after interactions
/// * `schema` - The analysed collection schema
///
/// # Example
///
/// ```
/// use schema_harvest::planner::build_plan;
/// use schema_harvest::schema::analyse_schema;
/// use serde_json::json;
///
/// let schema = analyse_schema(&json!({"products": [{"price": "number"}]})).unwrap();
/// let html = r#"<div class="product-card"><span class="price">$5</span></div>
///               <div class="product-card"><span class="price">$7</span></div>"#;
/// let plan = build_plan(html, &schema);
/// assert_eq!(plan.item_selector.as_deref(), Some(".product-card"));
/// assert!(plan.selectors_for("price").contains(&".price".to_string()));
/// ```
pub fn build_plan(html: &str, schema: &CollectionSchema) -> SelectorPlan {
    let document = Html::parse_document(html);
    let item_selector = infer_item_selector(&document);

    let field_selectors = schema
        .fields
        .iter()
        .map(|field| FieldSelectors {
            field: field.path.clone(),
            selectors: field_selectors(&field.last_segment()),
        })
        .collect();

    let plan = SelectorPlan {
        item_selector,
        field_selectors,
    };

    tracing::debug!(
        "Selector plan: item selector {:?}, {} field(s)",
        plan.item_selector,
        plan.field_selectors.len()
    );
    for entry in &plan.field_selectors {
        tracing::trace!("  {}: {:?}", entry.field, entry.selectors);
    }

    plan
}
