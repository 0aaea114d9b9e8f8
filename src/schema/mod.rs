//! Schema analysis
//!
//! Turns the caller's nested JSON schema into a collection name plus an ordered
//! list of dotted field paths with their declared types.

mod analyser;

pub use analyser::{analyse_schema, flatten_fields};

use serde::Serialize;
use std::fmt;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Datetime,
}

impl FieldType {
    /// Resolves a (lower-cased) type name from the schema
    ///
    /// Unrecognized names resolve to `String`, so the trimmed text is kept as-is.
    pub fn from_name(name: &str) -> Self {
        match name {
            "number" | "integer" | "int" | "float" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "datetime" | "date" => Self::Datetime,
            _ => Self::String,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Datetime => "datetime",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target field of the collection's item template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Dotted path into the output record (e.g. `specifications.cpu`)
    pub path: String,

    /// Type name as written in the schema, lower-cased
    pub type_name: String,

    /// Type the extracted text is cast to
    pub declared_type: FieldType,
}

impl FieldSpec {
    pub fn new(path: impl Into<String>, type_name: &str) -> Self {
        let type_name = type_name.trim().to_lowercase();
        Self {
            path: path.into(),
            declared_type: FieldType::from_name(&type_name),
            type_name,
        }
    }

    /// Last segment of the dotted path, lower-cased
    pub fn last_segment(&self) -> String {
        self.path
            .rsplit('.')
            .next()
            .unwrap_or(&self.path)
            .to_lowercase()
    }
}

/// Result of schema analysis: the target collection and its fields
///
/// Created once per job and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSchema {
    /// Name of the first top-level array-of-objects key, if any
    pub collection_name: Option<String>,

    /// Flattened fields in schema declaration order
    pub fields: Vec<FieldSpec>,
}

impl CollectionSchema {
    /// Looks up the declared type of a field path
    pub fn field_type(&self, path: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|field| field.path == path)
            .map(|field| field.declared_type)
    }

    /// Returns true if the schema declares no target fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
