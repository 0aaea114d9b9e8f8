//! Next-page link detection

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Finds the raw `href` of the next-page link in a document
///
/// Strategies run in order, and the first one yielding a usable link wins:
/// 1. `a[rel~=next]`
/// 2. an `aria-label` containing "next"
/// 3. link text equal to "next" or "next page", ending with "»", or
///    containing "next"
/// 4. common pager markup: `li.next a`, `.pagination a.next`, `.pager a.next`
///
/// Links marked `aria-disabled="true"` and links with no usable `href` are
/// ignored.
pub fn find_next_link(document: &Html) -> Option<String> {
    let anchors: Vec<ElementRef> = select_all(document, "a[href]");

    if let Some(href) = first_usable(select_all(document, "a[rel~=next]")) {
        tracing::trace!("Next link via rel=next");
        return Some(href);
    }

    let labelled = anchors.iter().copied().filter(|a| {
        a.value()
            .attr("aria-label")
            .is_some_and(|label| label.to_lowercase().contains("next"))
    });
    if let Some(href) = first_usable(labelled) {
        tracing::trace!("Next link via aria-label");
        return Some(href);
    }

    let by_text = anchors.iter().copied().filter(|a| {
        let text = collapsed_text(a).to_lowercase();
        text == "next" || text == "next page" || text.ends_with('»') || text.contains("next")
    });
    if let Some(href) = first_usable(by_text) {
        tracing::trace!("Next link via anchor text");
        return Some(href);
    }

    let pager = select_all(document, "li.next a, .pagination a.next, .pager a.next");
    if let Some(href) = first_usable(pager) {
        tracing::trace!("Next link via pager markup");
        return Some(href);
    }

    None
}

/// Finds the next-page link and resolves it against the current page URL
///
/// # Arguments
///
/// * `html` - The current page HTML
/// * `current_url` - The URL the browser is on
///
/// # Returns
///
/// * `Some(url)` - Absolute HTTP(S) URL of the next page
/// * `None` - No next link, or the link cannot be resolved
pub fn next_page_url(html: &str, current_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let href = find_next_link(&document)?;

    let base = match Url::parse(current_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Cannot resolve next link against '{}': {}", current_url, e);
            return None;
        }
    };

    resolve_link(&href, &base)
}

/// Resolves a link against a base URL
///
/// Returns `None` for special schemes (javascript:, mailto:, tel:, data:),
/// fragment-only links, and anything that is not HTTP or HTTPS once resolved.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn first_usable<'a>(candidates: impl IntoIterator<Item = ElementRef<'a>>) -> Option<String> {
    candidates.into_iter().find_map(|anchor| {
        let value = anchor.value();
        if value.attr("aria-disabled") == Some("true") {
            return None;
        }

        let href = value.attr("href")?.trim();
        let lowered = href.to_lowercase();
        if href.is_empty() || href.starts_with('#') || lowered.starts_with("javascript:") {
            return None;
        }
        Some(href.to_string())
    })
}

fn collapsed_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
