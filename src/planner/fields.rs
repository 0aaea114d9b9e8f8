//! Field-selector inference
//!
//! Candidates are generated in three tiers, most precise first:
//! identity/semantic attributes, class names derived from the field name, and
//! domain-keyword expansions for common product-listing fields.

/// Suffixes commonly appended to field class names
const CLASS_SUFFIXES: &[&str] = &["value", "text", "label", "name", "field"];

/// Keyword triggers and the extra selectors they contribute
///
/// A field whose last segment contains any trigger gets the listed selectors.
const DOMAIN_EXPANSIONS: &[(&[&str], &[&str])] = &[
    (
        &["price", "cost"],
        &[
            ".price",
            ".product-price",
            ".cost",
            "[data-price]",
            "[itemprop='price']",
        ],
    ),
    (
        &["name", "title"],
        &[
            ".product-name",
            ".product-title",
            ".title",
            "[itemprop='name']",
            "h1",
            "h2",
            "h3",
        ],
    ),
    (
        &["description", "desc"],
        &[
            ".description",
            ".product-description",
            "[itemprop='description']",
        ],
    ),
    (
        &["image", "photo", "picture"],
        &[
            "img.product-image",
            "img.main-image",
            "[itemprop='image']",
            "img[src]",
        ],
    ),
    (
        &["availability", "stock"],
        &[
            ".availability",
            ".stock",
            "[data-availability]",
            "[aria-label*='in stock']",
            "[aria-label*='available']",
        ],
    ),
    (
        &["cpu", "processor"],
        &[".cpu", ".processor", "[data-cpu]", "[aria-label*='cpu']"],
    ),
    (
        &["ram", "memory"],
        &[
            ".ram",
            ".memory",
            "[data-ram]",
            "[aria-label*='ram']",
            "[aria-label*='memory']",
        ],
    ),
];

/// Generates the ordered, de-duplicated candidate selectors for a field
///
/// # Arguments
///
/// * `segment` - Last segment of the field path, lower-cased (e.g. `cpu` for
///   `specifications.cpu`)
///
/// # Example
///
/// ```
/// use schema_harvest::planner::field_selectors;
///
/// let selectors = field_selectors("image_url");
/// assert_eq!(selectors[0], "[data-testid*='image_url']");
/// assert!(selectors.contains(&".image-url-value".to_string()));
/// assert!(selectors.contains(&"img[src]".to_string()));
/// ```
pub fn field_selectors(segment: &str) -> Vec<String> {
    let segment = segment.trim().to_lowercase();
    let hyphenated = segment.replace('_', "-");
    let mut candidates = Vec::new();

    // Tier 1: identity and semantic attributes
    candidates.push(format!("[data-testid*='{}']", segment));
    candidates.push(format!("[data-testid*='{}']", hyphenated));
    candidates.push(format!("[data-{}]", segment));
    candidates.push(format!("[data-{}]", hyphenated));
    candidates.push(format!("[aria-label*='{}']", segment));
    candidates.push(format!("[role*='{}']", segment));
    candidates.push(format!("[itemprop='{}']", segment));

    // Tier 2: class names
    candidates.push(format!(".{}", segment));
    candidates.push(format!(".{}", hyphenated));
    for suffix in CLASS_SUFFIXES {
        candidates.push(format!(".{}-{}", hyphenated, suffix));
    }

    // Tier 3: domain keyword expansions
    for (triggers, selectors) in DOMAIN_EXPANSIONS {
        if triggers.iter().any(|trigger| segment.contains(trigger)) {
            candidates.extend(selectors.iter().map(|s| s.to_string()));
        }
    }

    dedup_preserving_order(candidates)
}

fn dedup_preserving_order(candidates: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.clone()))
        .collect()
}
