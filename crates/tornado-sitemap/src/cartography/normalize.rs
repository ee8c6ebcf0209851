//! Flatten heterogeneous endpoint payloads into ordered entity lists.

use crate::acquisition::endpoint::PayloadShape;
use serde_json::Value;

/// Flatten `payload` according to `shape`. Anything that does not match
/// the shape yields no entities.
pub fn flatten(shape: &PayloadShape, payload: &Value) -> Vec<Value> {
    match shape {
        PayloadShape::CountryMap { key } => flatten_country_map(payload, key),
        PayloadShape::WrappedList { keys } => flatten_wrapped_list(payload, keys),
        PayloadShape::WrappedObject { keys } => flatten_wrapped_object(payload, keys),
    }
}

fn flatten_country_map(payload: &Value, key: &str) -> Vec<Value> {
    let grouped = match payload {
        Value::Array(items) => return items.clone(),
        Value::Object(map) => map.get(key),
        _ => None,
    };

    match grouped {
        Some(Value::Object(countries)) => countries
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .cloned()
            .collect(),
        // Ungrouped catalogue
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn flatten_wrapped_list(payload: &Value, keys: &[String]) -> Vec<Value> {
    if let Value::Array(items) = payload {
        return items.clone();
    }
    keys.iter()
        .find_map(|key| payload.get(key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

fn flatten_wrapped_object(payload: &Value, keys: &[String]) -> Vec<Value> {
    if let Some(obj) = keys
        .iter()
        .find_map(|key| payload.get(key).filter(|v| v.is_object()))
    {
        return vec![obj.clone()];
    }
    // A bare entity object rather than a wrapper around one.
    match payload {
        Value::Object(map) if !keys.iter().any(|k| map.contains_key(k)) && !map.is_empty() => {
            vec![payload.clone()]
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(entities: &[Value]) -> Vec<&str> {
        entities.iter().filter_map(|e| e["_id"].as_str()).collect()
    }

    #[test]
    fn test_country_map_concatenates_in_key_order() {
        let payload = json!({"data": {
            "US": [{"_id": "1"}],
            "UK": [{"_id": "1"}, {"_id": "2"}],
            "meta": "ignored",
            "AE": {"_id": "not-a-list"}
        }});
        let entities = flatten(&PayloadShape::country_map("data"), &payload);
        assert_eq!(ids(&entities), vec!["1", "1", "2"]);
    }

    #[test]
    fn test_country_map_accepts_flat_list() {
        let shape = PayloadShape::country_map("data");
        assert_eq!(
            ids(&flatten(&shape, &json!({"data": [{"_id": "a"}]}))),
            vec!["a"]
        );
        assert_eq!(ids(&flatten(&shape, &json!([{"_id": "b"}]))), vec!["b"]);
        assert!(flatten(&shape, &json!({"products": []})).is_empty());
        assert!(flatten(&shape, &json!("nope")).is_empty());
    }

    #[test]
    fn test_wrapped_list_key_priority() {
        let shape = PayloadShape::wrapped_list(&["blogs", "data"]);
        assert_eq!(
            ids(&flatten(&shape, &json!({"data": [{"_id": "d"}], "blogs": [{"_id": "b"}]}))),
            vec!["b"]
        );
        assert_eq!(
            ids(&flatten(&shape, &json!({"data": [{"_id": "d"}]}))),
            vec!["d"]
        );
        // A non-list under the preferred key falls through to the next key.
        assert_eq!(
            ids(&flatten(&shape, &json!({"blogs": null, "data": [{"_id": "d"}]}))),
            vec!["d"]
        );
        assert_eq!(ids(&flatten(&shape, &json!([{"_id": "x"}]))), vec!["x"]);
        assert!(flatten(&shape, &json!({"items": [{"_id": "x"}]})).is_empty());
    }

    #[test]
    fn test_wrapped_object() {
        let shape = PayloadShape::wrapped_object(&["data"]);
        assert_eq!(
            ids(&flatten(&shape, &json!({"data": {"_id": "home"}}))),
            vec!["home"]
        );
        assert_eq!(ids(&flatten(&shape, &json!({"_id": "bare"}))), vec!["bare"]);
        assert!(flatten(&shape, &json!({"data": null})).is_empty());
        assert!(flatten(&shape, &json!({})).is_empty());
    }

    #[test]
    fn test_empty_payloads_flatten_to_nothing() {
        for shape in [
            PayloadShape::country_map("data"),
            PayloadShape::wrapped_list(&["blogs", "data"]),
            PayloadShape::wrapped_object(&["data"]),
        ] {
            assert!(flatten(&shape, &shape.empty_payload()).is_empty());
        }
    }
}
