//! Index client abstraction shared by the dense and sparse backends.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::memory::core::errors::IndexResult;
use crate::memory::core::record::{CATEGORY_FIELD, IndexRecord, TEXT_FIELD};

/// Boxed future type for index operations.
pub type IndexFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A raw search hit as returned by an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Relevance score; scale is backend-defined, higher is better.
    #[serde(rename = "_score")]
    pub score: f64,
    /// Stored fields (`chunk_text`, `category`, ...).
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Optional backend metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// Backend-side rerank request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RerankOptions {
    /// Rerank model name.
    pub model: String,
    /// Fields the reranker reads.
    pub rank_fields: Vec<String>,
    /// Text to rerank against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl RerankOptions {
    /// Rerank on the text field against `query`.
    #[must_use]
    pub fn on_text(model: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            rank_fields: vec![TEXT_FIELD.to_string()],
            query: Some(query.into()),
        }
    }
}

/// Search parameters sent to an index.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    /// Query text.
    pub text: String,
    /// Maximum number of hits.
    pub top_k: usize,
    /// Metadata filter (exact-match fields).
    pub filter: Map<String, Value>,
    /// Optional rerank pass.
    pub rerank: Option<RerankOptions>,
}

impl SearchRequest {
    /// Create a request with no filter and no rerank.
    #[must_use]
    pub fn new(text: impl Into<String>, top_k: usize) -> Self {
        Self {
            text: text.into(),
            top_k,
            filter: Map::new(),
            rerank: None,
        }
    }

    /// Restrict hits to one category.
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.filter
            .insert(CATEGORY_FIELD.to_string(), Value::String(category.to_string()));
        self
    }

    /// Request a rerank pass.
    #[must_use]
    pub fn with_rerank(mut self, rerank: RerankOptions) -> Self {
        self.rerank = Some(rerank);
        self
    }
}

/// Client for one index backend (dense or sparse).
///
/// One instance per backend is opened at startup and closed at shutdown;
/// handlers only ever read through it.
pub trait IndexClient: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &str;

    /// Search a namespace.
    ///
    /// # Errors
    /// Returns an error if the request fails or the index rejects it.
    fn search<'a>(
        &'a self,
        namespace: &'a str,
        request: &'a SearchRequest,
    ) -> IndexFuture<'a, IndexResult<Vec<Hit>>>;

    /// Insert or replace records in a namespace.
    ///
    /// # Errors
    /// Returns an error if the request fails or the index rejects it.
    fn upsert_records<'a>(
        &'a self,
        namespace: &'a str,
        records: &'a [IndexRecord],
    ) -> IndexFuture<'a, IndexResult<()>>;

    /// Whether the client still accepts requests.
    fn is_open(&self) -> bool;

    /// Release the client.
    ///
    /// # Errors
    /// Returns an error if the client cannot be shut down cleanly.
    fn close(&self) -> IndexFuture<'_, IndexResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_deserializes_pinecone_shape() {
        let hit: Hit = serde_json::from_value(serde_json::json!({
            "_id": "a",
            "_score": 0.42,
            "fields": {"chunk_text": "hello", "category": "memory"}
        }))
        .unwrap();
        assert_eq!(hit.id, "a");
        assert!((hit.score - 0.42).abs() < f64::EPSILON);
        assert_eq!(hit.fields["chunk_text"], "hello");
        assert!(hit.metadata.is_none());
    }

    #[test]
    fn test_hit_without_fields() {
        let hit: Hit = serde_json::from_value(serde_json::json!({"_id": "a", "_score": 1.0})).unwrap();
        assert!(hit.fields.is_empty());
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new("coffee", 4)
            .with_category("memory")
            .with_rerank(RerankOptions::on_text("cohere-rerank-3.5", "coffee"));
        assert_eq!(request.top_k, 4);
        assert_eq!(request.filter[CATEGORY_FIELD], "memory");
        let rerank = request.rerank.unwrap();
        assert_eq!(rerank.rank_fields, vec![TEXT_FIELD.to_string()]);
        assert_eq!(rerank.query.as_deref(), Some("coffee"));
    }
}
