use crate::schema::{CollectionSchema, FieldSpec};
use crate::ConfigError;
use serde_json::{Map, Value};

/// Analyses a job schema
///
/// Top-level keys are scanned in declaration order. The first key whose value is
/// a non-empty array starting with an object becomes the collection, and that
/// first object is the item template. Every other top-level key (such as
/// `metadata`) is ignored. When no such key exists the result has no collection
/// and no fields.
///
/// # Arguments
///
/// * `schema` - The schema object from the job
///
/// # Returns
///
/// * `Ok(CollectionSchema)` - The detected collection and its flattened fields
/// * `Err(ConfigError)` - The schema is not a JSON object
///
/// # Example
///
/// ```
/// use schema_harvest::schema::analyse_schema;
/// use serde_json::json;
///
/// let schema = json!({"products": [{"name": "string", "specs": {"cpu": "string"}}]});
/// let analysed = analyse_schema(&schema).unwrap();
/// assert_eq!(analysed.collection_name.as_deref(), Some("products"));
/// assert_eq!(analysed.fields[1].path, "specs.cpu");
/// ```
pub fn analyse_schema(schema: &Value) -> Result<CollectionSchema, ConfigError> {
    let object = schema
        .as_object()
        .ok_or_else(|| ConfigError::InvalidSchema("schema must be a JSON object".to_string()))?;

    for (position, (key, value)) in object.iter().enumerate() {
        let template = value
            .as_array()
            .and_then(|items| items.first())
            .and_then(Value::as_object);

        if let Some(template) = template {
            let fields = flatten_fields(template, "");
            tracing::debug!(
                "Schema collection '{}' with {} field(s)",
                key,
                fields.len()
            );

            let ignored = object
                .values()
                .skip(position + 1)
                .filter(|v| is_collection(v))
                .count();
            if ignored > 0 {
                tracing::debug!(
                    "Ignoring {} additional collection(s) after '{}'",
                    ignored,
                    key
                );
            }

            return Ok(CollectionSchema {
                collection_name: Some(key.clone()),
                fields,
            });
        }
    }

    tracing::debug!("No array-of-objects collection found in schema");
    Ok(CollectionSchema::default())
}

fn is_collection(value: &Value) -> bool {
    value
        .as_array()
        .and_then(|items| items.first())
        .is_some_and(Value::is_object)
}

/// Recursively flattens nested objects into dotted paths
///
/// Leaf values are type names. String leaves are used verbatim; any other leaf
/// uses its JSON text.
pub fn flatten_fields(object: &Map<String, Value>, prefix: &str) -> Vec<FieldSpec> {
    let mut fields = Vec::new();

    for (name, value) in object {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        match value {
            Value::Object(nested) => fields.extend(flatten_fields(nested, &path)),
            Value::String(type_name) => fields.push(FieldSpec::new(path, type_name)),
            other => fields.push(FieldSpec::new(path, &other.to_string())),
        }
    }

    fields
}
