//! Item-container inference
//!
//! Finds the selector that most likely wraps one record on a listing page.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Class-name fragments that usually mark a record container
const ITEM_KEYWORDS: &[&str] = &[
    "product", "card", "item", "listing", "result", "post", "entry", "record",
];

/// Tags that are containers on their own
const STRUCTURAL_TAGS: &[&str] = &["li", "article"];

/// Infers the repeated item-container selector of a document
///
/// Every element is visited in document order. Elements carrying an identity
/// attribute (`data-testid`, `data-id`), a class containing one of the item
/// keywords (which covers `section.item` and `div.item`), or a structural tag
/// (`li`, `article`) are converted to a canonical selector. The selector seen most often wins;
/// on a tie the one discovered first wins.
///
/// # Returns
///
/// * `Some(selector)` - The most frequent canonical selector
/// * `None` - No candidate element exists
pub fn infer_item_selector(document: &Html) -> Option<String> {
    let all = Selector::parse("*").ok()?;

    // (selector, count) in first-discovered order
    let mut tallies: Vec<(String, usize)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for element in document.select(&all) {
        if !is_candidate(&element) {
            continue;
        }

        let Some(selector) = canonical_selector(&element) else {
            continue;
        };

        match positions.get(&selector) {
            Some(&position) => tallies[position].1 += 1,
            None => {
                positions.insert(selector.clone(), tallies.len());
                tallies.push((selector, 1));
            }
        }
    }

    let mut best: Option<&(String, usize)> = None;
    for tally in &tallies {
        // Strictly greater keeps the earliest selector on ties
        if best.map_or(true, |current| tally.1 > current.1) {
            best = Some(tally);
        }
    }

    if let Some((selector, count)) = best {
        tracing::debug!(
            "Item selector '{}' matched {} element(s) among {} candidate selector(s)",
            selector,
            count,
            tallies.len()
        );
    }

    best.map(|(selector, _)| selector.clone())
}

fn is_candidate(element: &ElementRef) -> bool {
    let value = element.value();

    if non_empty_attr(element, "data-testid").is_some() || value.attr("data-id").is_some() {
        return true;
    }

    let tag = value.name();
    if STRUCTURAL_TAGS.contains(&tag) {
        return true;
    }

    value.classes().any(|class| {
        let class = class.to_lowercase();
        ITEM_KEYWORDS.iter().any(|kw| class.contains(kw))
    })
}

/// Converts an element into its canonical selector string
///
/// Preference order: `[data-testid='…']`, `[data-id]`, the full class chain,
/// `#id`, then the bare tag name. Values that cannot be written as a plain
/// CSS identifier or quoted string are skipped in favor of the next form.
pub fn canonical_selector(element: &ElementRef) -> Option<String> {
    let value = element.value();

    if let Some(test_id) = non_empty_attr(element, "data-testid") {
        if let Some(quoted) = quote_attr_value(test_id) {
            return Some(format!("[data-testid={}]", quoted));
        }
    }

    if value.attr("data-id").is_some() {
        return Some("[data-id]".to_string());
    }

    let classes: Vec<&str> = value.classes().filter(|c| is_css_ident(c)).collect();
    if !classes.is_empty() {
        return Some(format!(".{}", classes.join(".")));
    }

    if let Some(id) = value.id().filter(|id| is_css_ident(id)) {
        return Some(format!("#{}", id));
    }

    Some(value.name().to_string())
}

fn non_empty_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn quote_attr_value(value: &str) -> Option<String> {
    if value.contains(['\'', '\\', '\n', '\r']) {
        return None;
    }
    Some(format!("'{}'", value))
}

/// Conservative check for a CSS identifier usable without escaping
fn is_css_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };

    let starts_ok = first.is_ascii_alphabetic()
        || first == '_'
        || (first == '-'
            && name
                .chars()
                .nth(1)
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-'));

    starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
