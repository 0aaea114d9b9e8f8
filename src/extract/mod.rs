//! Record extraction
//!
//! Applies a `SelectorPlan` to one page of HTML and produces typed records,
//! each paired with the list of fields that could not be filled.

mod cast;
mod record;

pub use cast::{cast_boolean, cast_datetime, cast_number, cast_value};
pub use record::assign_nested;

use crate::planner::SelectorPlan;
use crate::schema::{CollectionSchema, FieldType};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

/// Records extracted from one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageExtraction {
    /// Retained records, in container order
    pub records: Vec<Value>,

    /// Missing field paths, one list per retained record
    pub missing: Vec<Vec<String>>,
}

impl PageExtraction {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends another page's records and missing lists
    pub fn append(&mut self, mut other: PageExtraction) {
        self.records.append(&mut other.records);
        self.missing.append(&mut other.missing);
    }
}

/// A field with its selectors parsed for one page
struct CompiledField<'a> {
    path: &'a str,
    field_type: FieldType,
    selectors: Vec<Selector>,
}

/// Extracts records from HTML using a fixed selector plan
///
/// Every element matching the plan's item selector is one container; with no
/// item selector the whole document is a single container. For each field the
/// candidate selectors are tried in order, and the first matched element that
/// yields a non-empty raw value is cast to the field's declared type.
/// Containers where no field could be cast are dropped.
///
/// # Arguments
///
/// * `html` - The page HTML
/// * `plan` - The selector plan computed from the first page
/// * `schema` - The analysed collection schema
///
/// # Example
///
/// ```
/// use schema_harvest::extract::extract_records;
/// use schema_harvest::planner::build_plan;
/// use schema_harvest::schema::analyse_schema;
/// use serde_json::json;
///
/// let schema = analyse_schema(&json!({"products": [{"price": "number"}]})).unwrap();
/// let html = r#"<div class="product"><span class="price">$1,234.50</span></div>"#;
/// let plan = build_plan(html, &schema);
///
/// let page = extract_records(html, &plan, &schema);
/// assert_eq!(page.records, vec![json!({"price": 1234.5})]);
/// ```
pub fn extract_records(html: &str, plan: &SelectorPlan, schema: &CollectionSchema) -> PageExtraction {
    let document = Html::parse_document(html);
    let fields = compile_fields(plan, schema);

    let containers: Vec<ElementRef> = match plan.item_selector.as_deref() {
        Some(item_selector) => match Selector::parse(item_selector) {
            Ok(selector) => document.select(&selector).collect(),
            Err(_) => {
                tracing::warn!(
                    "Item selector '{}' is not valid CSS; using the whole document",
                    item_selector
                );
                vec![document.root_element()]
            }
        },
        None => vec![document.root_element()],
    };

    let mut page = PageExtraction::default();
    let mut dropped = 0usize;

    for container in containers {
        let mut record = Map::new();
        let mut missing = Vec::new();

        for field in &fields {
            let value = first_raw_value(&container, &field.selectors)
                .and_then(|raw| cast_value(&raw, field.field_type));

            match value {
                Some(value) => assign_nested(&mut record, field.path, value),
                None => missing.push(field.path.to_string()),
            }
        }

        if record.is_empty() {
            dropped += 1;
            continue;
        }

        page.records.push(Value::Object(record));
        page.missing.push(missing);
    }

    tracing::debug!(
        "Extracted {} record(s), dropped {} empty container(s)",
        page.records.len(),
        dropped
    );

    page
}

fn compile_fields<'a>(plan: &SelectorPlan, schema: &'a CollectionSchema) -> Vec<CompiledField<'a>> {
    schema
        .fields
        .iter()
        .map(|field| {
            let selectors = plan
                .selectors_for(&field.path)
                .iter()
                .filter_map(|candidate| match Selector::parse(candidate) {
                    Ok(selector) => Some(selector),
                    Err(_) => {
                        tracing::trace!("Skipping unparseable selector '{}'", candidate);
                        None
                    }
                })
                .collect();

            CompiledField {
                path: &field.path,
                field_type: field.declared_type,
                selectors,
            }
        })
        .collect()
}

fn first_raw_value(container: &ElementRef, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        container
            .select(selector)
            .next()
            .and_then(|element| raw_value(&element))
    })
}

/// Raw value of an element: `src` for images, `href` for links, text otherwise
///
/// Text nodes are joined with single spaces and inner whitespace is collapsed.
pub fn raw_value(element: &ElementRef) -> Option<String> {
    let value = element.value();
    let attribute = match value.name() {
        "img" => value.attr("src"),
        "a" => value.attr("href"),
        _ => None,
    };

    let raw = match attribute {
        Some(attribute) => attribute.trim().to_string(),
        None => element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" "),
    };

    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}
