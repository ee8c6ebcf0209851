//! The two things the aggregator reads from a raw entity: its identifier
//! and its modification time. Also first-seen deduplication.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashSet;

const ID_KEYS: [&str; 2] = ["_id", "id"];
const TIMESTAMP_KEYS: [&str; 2] = ["updatedAt", "createdAt"];

/// Identifier of an entity: `_id`, else `id`, as a string or integer.
pub fn entity_id(entity: &Value) -> Option<String> {
    ID_KEYS.iter().find_map(|key| match entity.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Last modification time: `updatedAt`, else `createdAt`. Values that do
/// not parse are skipped rather than trusted.
pub fn entity_timestamp(entity: &Value) -> Option<DateTime<Utc>> {
    TIMESTAMP_KEYS
        .iter()
        .find_map(|key| entity.get(key).and_then(parse_timestamp))
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()?
                        .and_hms_opt(0, 0, 0)
                        .map(|naive| naive.and_utc())
                })
        }
        // Epoch milliseconds
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// An entity that survived deduplication, with its identifier resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntity {
    pub id: String,
    pub entity: Value,
}

/// Keep the first occurrence of each identifier, preserving order.
///
/// Entities without an identifier are dropped: no page can be addressed
/// for them. Returns the survivors and the number of entities discarded.
pub fn dedupe_by_id(entities: Vec<Value>) -> (Vec<KeyedEntity>, usize) {
    let total = entities.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<KeyedEntity> = entities
        .into_iter()
        .filter_map(|entity| {
            let id = entity_id(&entity)?;
            seen.insert(id.clone()).then_some(KeyedEntity { id, entity })
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_id_variants() {
        assert_eq!(entity_id(&json!({"_id": "abc"})), Some("abc".to_string()));
        assert_eq!(entity_id(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(
            entity_id(&json!({"_id": "x", "id": "y"})),
            Some("x".to_string())
        );
        assert_eq!(entity_id(&json!({"_id": ""})), None);
        assert_eq!(entity_id(&json!({"_id": null, "id": "y"})), Some("y".to_string()));
        assert_eq!(entity_id(&json!({"name": "no id"})), None);
        assert_eq!(entity_id(&json!("scalar")), None);
    }

    #[test]
    fn test_entity_timestamp_precedence() {
        let e = json!({"updatedAt": "2025-02-01T00:00:00Z", "createdAt": "2024-01-01T00:00:00Z"});
        assert_eq!(
            entity_timestamp(&e).unwrap().to_rfc3339(),
            "2025-02-01T00:00:00+00:00"
        );

        let e = json!({"createdAt": "2024-01-01T00:00:00.000Z"});
        assert_eq!(
            entity_timestamp(&e).unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );

        let e = json!({"updatedAt": "not a date", "createdAt": "2024-06-30"});
        assert_eq!(
            entity_timestamp(&e).unwrap().to_rfc3339(),
            "2024-06-30T00:00:00+00:00"
        );

        let e = json!({"updatedAt": 1_700_000_000_000_i64});
        assert_eq!(entity_timestamp(&e).unwrap().timestamp(), 1_700_000_000);

        assert!(entity_timestamp(&json!({"_id": "1"})).is_none());
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let entities = vec![
            json!({"_id": "1", "updatedAt": "2024-01-01T00:00:00Z"}),
            json!({"_id": "2"}),
            json!({"_id": "1", "updatedAt": "2025-01-01T00:00:00Z"}),
            json!({"title": "orphan"}),
            json!({"_id": "3"}),
            json!({"_id": "2"}),
        ];
        let (kept, dropped) = dedupe_by_id(entities);
        let ids: Vec<_> = kept.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(dropped, 3);
        // First-seen, not most recently updated.
        assert_eq!(kept[0].entity["updatedAt"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_dedupe_string_and_numeric_ids_collide() {
        let (kept, _) = dedupe_by_id(vec![json!({"id": 7}), json!({"_id": "7"})]);
        assert_eq!(kept.len(), 1);
    }
}
