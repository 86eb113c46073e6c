//! Projection of raw index hits into uniform result records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::memory::core::record::{CATEGORY_FIELD, TEXT_FIELD};
use crate::memory::index::client::Hit;

/// A search result in the gateway's response shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResult {
    /// Record identifier.
    pub id: String,
    /// Stored text, empty when the hit carries none.
    pub text: String,
    /// Relevance score as reported by the index.
    pub score: f64,
    /// Category tag, empty when absent.
    pub category: String,
    /// Backend metadata, passed through untouched.
    pub metadata: Map<String, Value>,
}

impl From<Hit> for NormalizedResult {
    fn from(hit: Hit) -> Self {
        normalize(hit)
    }
}

/// Normalize one hit. Never fails.
#[must_use]
pub fn normalize(hit: Hit) -> NormalizedResult {
    NormalizedResult {
        text: field_text(&hit.fields, TEXT_FIELD),
        category: field_text(&hit.fields, CATEGORY_FIELD),
        id: hit.id,
        score: hit.score,
        metadata: hit.metadata.unwrap_or_default(),
    }
}

/// Normalize a list of hits, keeping their order.
#[must_use]
pub fn normalize_hits(hits: Vec<Hit>) -> Vec<NormalizedResult> {
    hits.into_iter().map(normalize).collect()
}

fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> Hit {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_hit() {
        let result = normalize(raw(json!({
            "_id": "m1",
            "_score": 0.8,
            "fields": {"chunk_text": "likes hiking", "category": "memory"},
            "metadata": {"source": "extension"}
        })));
        assert_eq!(result.id, "m1");
        assert_eq!(result.text, "likes hiking");
        assert_eq!(result.category, "memory");
        assert!((result.score - 0.8).abs() < f64::EPSILON);
        assert_eq!(result.metadata["source"], "extension");
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let result = normalize(raw(json!({"_id": "m2", "_score": 0.1})));
        assert_eq!(result.text, "");
        assert_eq!(result.category, "");
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_non_string_field_rendered_as_json() {
        let result = normalize(raw(json!({
            "_id": "m3",
            "_score": 0.1,
            "fields": {"chunk_text": 42, "category": null}
        })));
        assert_eq!(result.text, "42");
        assert_eq!(result.category, "");
    }

    #[test]
    fn test_order_preserved() {
        let hits = vec![
            raw(json!({"_id": "b", "_score": 0.2})),
            raw(json!({"_id": "a", "_score": 0.9})),
        ];
        let ids: Vec<String> = normalize_hits(hits).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
