//! Quality report computation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Completeness statistics for the records of one job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Number of emitted records
    pub total_items: usize,

    /// Records with no missing fields
    pub complete_items: usize,

    /// `complete_items / total_items`, rounded to three decimals; 0.0 when empty
    pub completion_rate: f64,

    /// `"field: N items"` lines, most frequently missing first
    pub missing_fields_summary: Vec<String>,

    /// Non-fatal diagnostics collected during the run
    pub errors: Vec<String>,
}

impl QualityReport {
    /// Computes the report for `total_items` records
    ///
    /// `missing` holds one list per record. A shorter list is padded with
    /// empty entries and a longer one truncated; either mismatch is logged.
    ///
    /// # Example
    ///
    /// ```
    /// use schema_harvest::output::QualityReport;
    ///
    /// let missing = vec![vec![], vec!["price".to_string()], vec!["price".to_string()]];
    /// let report = QualityReport::compute(3, missing, Vec::new());
    /// assert_eq!(report.complete_items, 1);
    /// assert_eq!(report.completion_rate, 0.333);
    /// assert_eq!(report.missing_fields_summary, vec!["price: 2 items"]);
    /// ```
    pub fn compute(total_items: usize, mut missing: Vec<Vec<String>>, errors: Vec<String>) -> Self {
        if missing.len() != total_items {
            tracing::warn!(
                "Missing-field lists ({}) do not match record count ({}); aligning",
                missing.len(),
                total_items
            );
            missing.resize_with(total_items, Vec::new);
        }

        if total_items == 0 {
            return Self {
                errors,
                ..Self::default()
            };
        }

        let complete_items = missing.iter().filter(|fields| fields.is_empty()).count();
        let completion_rate = round3(complete_items as f64 / total_items as f64);

        Self {
            total_items,
            complete_items,
            completion_rate,
            missing_fields_summary: summarize_missing(&missing),
            errors,
        }
    }

    /// Returns true when every record is complete
    pub fn is_complete(&self) -> bool {
        self.complete_items == self.total_items
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Counts missing fields; sorted by count descending, ties in first-seen order
fn summarize_missing(missing: &[Vec<String>]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for field in missing.iter().flatten() {
        match positions.get(field.as_str()) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(field.as_str(), counts.len());
                counts.push((field.as_str(), 1));
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(field, count)| format!("{}: {} items", field, count))
        .collect()
}
