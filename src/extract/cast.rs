//! Casting raw element text to declared field types
//!
//! A failed cast is not an error: every function here returns `None` and the
//! caller records the field as missing.

use crate::schema::FieldType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// ASCII digits only; `\d` would also match digits `f64::parse` rejects
static NUMBER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)*").expect("valid number regex"));

const TRUTHY: &[&str] = &["in stock", "available", "yes", "true", "1", "instock"];
const FALSY: &[&str] = &[
    "out of stock",
    "unavailable",
    "no",
    "false",
    "0",
    "outofstock",
];

static TRUTHY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| whole_word_patterns(TRUTHY));
static FALSY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| whole_word_patterns(FALSY));

fn whole_word_patterns(phrases: &[&str]) -> Vec<Regex> {
    phrases
        .iter()
        .map(|phrase| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
                .expect("valid phrase regex")
        })
        .collect()
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Casts raw text to the declared type
///
/// # Returns
///
/// * `Some(Value)` - The cast value
/// * `None` - The text is empty or does not fit the type
pub fn cast_value(raw: &str, field_type: FieldType) -> Option<Value> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    match field_type {
        FieldType::String => Some(Value::String(text.to_string())),
        FieldType::Number => cast_number(text),
        FieldType::Boolean => cast_boolean(text).map(Value::Bool),
        FieldType::Datetime => cast_datetime(text).map(Value::String),
    }
}

/// Extracts the first numeric token and parses it
///
/// A single `.` or `,` is a decimal separator. A separator repeated on its own
/// is digit grouping when every group after the first has three digits
/// (`1,234,567`); otherwise only the first separator counts and it is read as
/// the decimal point (`v1.2.3` is 1.2). When both appear, the last one is the
/// decimal separator (`1,234.50`, `1.234,50`). Whole values come back as
/// integers, anything with a fractional part as a float.
pub fn cast_number(text: &str) -> Option<Value> {
    let token = NUMBER_TOKEN.find(text)?.as_str();
    let normalized = normalize_number(token);
    let parsed: f64 = normalized.parse().ok()?;

    if !parsed.is_finite() {
        return None;
    }

    if parsed.fract() == 0.0 && parsed.abs() < i64::MAX as f64 {
        Some(Value::from(parsed as i64))
    } else {
        serde_json::Number::from_f64(parsed).map(Value::Number)
    }
}

fn normalize_number(token: &str) -> String {
    let dots = token.matches('.').count();
    let commas = token.matches(',').count();

    match (dots, commas) {
        (0, 0) | (1, 0) => token.to_string(),
        (0, 1) => token.replace(',', "."),
        (_, 0) => repeated_separator(token, '.'),
        (0, _) => repeated_separator(token, ','),
        _ => {
            // Both separators present: the last one marks the decimals
            let split = token.rfind(['.', ',']).unwrap_or(token.len());
            let whole: String = token[..split]
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            format!("{}.{}", whole, &token[split + 1..])
        }
    }
}

fn repeated_separator(token: &str, separator: char) -> String {
    let groups: Vec<&str> = token.split(separator).collect();

    if groups[1..].iter().all(|group| group.len() == 3) {
        groups.concat()
    } else {
        format!("{}.{}", groups[0], groups[1])
    }
}

/// Matches whole words against the truthy phrases first, then the falsy ones
pub fn cast_boolean(text: &str) -> Option<bool> {
    if TRUTHY_PATTERNS.iter().any(|re| re.is_match(text)) {
        return Some(true);
    }
    if FALSY_PATTERNS.iter().any(|re| re.is_match(text)) {
        return Some(false);
    }
    None
}

/// Parses ISO-8601 text and returns its canonical ISO-8601 form
///
/// A trailing `Z` is read as `+00:00`. Offset-aware input keeps its offset,
/// naive input stays naive and a bare date becomes midnight. Fractional
/// seconds are written as six digits (microseconds) and omitted when zero.
pub fn cast_datetime(text: &str) -> Option<String> {
    let text = match text.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => text.to_string(),
    };

    for format in AWARE_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(&text, format) {
            let layout = if parsed.nanosecond() == 0 {
                "%Y-%m-%dT%H:%M:%S%:z"
            } else {
                "%Y-%m-%dT%H:%M:%S%.6f%:z"
            };
            return Some(parsed.format(layout).to_string());
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&text, format) {
            let layout = if parsed.nanosecond() == 0 {
                "%Y-%m-%dT%H:%M:%S"
            } else {
                "%Y-%m-%dT%H:%M:%S%.6f"
            };
            return Some(parsed.format(layout).to_string());
        }
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.format("%Y-%m-%dT%H:%M:%S").to_string())
}
