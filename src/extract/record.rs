use serde_json::{Map, Value};

/// Writes a value at a dotted path, creating intermediate objects as needed
///
/// A non-object value already sitting on an intermediate segment is replaced
/// by an object.
pub fn assign_nested(record: &mut Map<String, Value>, path: &str, value: Value) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = record;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }

    current.insert(last.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_path() {
        let mut record = Map::new();
        assign_nested(&mut record, "name", json!("Laptop"));
        assert_eq!(Value::Object(record), json!({"name": "Laptop"}));
    }

    #[test]
    fn test_nested_paths_share_parent() {
        let mut record = Map::new();
        assign_nested(&mut record, "specifications.cpu", json!("M3"));
        assign_nested(&mut record, "specifications.ram", json!("16GB"));
        assert_eq!(
            Value::Object(record),
            json!({"specifications": {"cpu": "M3", "ram": "16GB"}})
        );
    }

    #[test]
    fn test_scalar_parent_is_replaced() {
        let mut record = Map::new();
        assign_nested(&mut record, "specs", json!("n/a"));
        assign_nested(&mut record, "specs.cpu", json!("M3"));
        assert_eq!(Value::Object(record), json!({"specs": {"cpu": "M3"}}));
    }
}
