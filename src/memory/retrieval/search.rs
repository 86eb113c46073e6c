//! Retrieval orchestration over the dense and sparse indexes.

use std::sync::Arc;

use tracing::debug;

use crate::memory::core::config::Settings;
use crate::memory::core::errors::{GatewayError, GatewayResult};
use crate::memory::core::record::MEMORY_CATEGORY;
use crate::memory::index::client::{IndexClient, RerankOptions, SearchRequest};
use crate::memory::retrieval::dedup::dedup_combined_results;
use crate::memory::retrieval::normalize::{NormalizedResult, normalize_hits};

/// Query text used to enumerate stored memories.
const LIST_QUERY: &str = "memory";
/// Upper bound on memories returned by a listing.
const LIST_TOP_K: usize = 100;

/// Reject queries that are empty after trimming.
///
/// # Errors
/// Returns [`GatewayError::InvalidQuery`] for empty or whitespace-only input.
pub fn validate_query(query: &str) -> GatewayResult<&str> {
    if query.trim().is_empty() {
        return Err(GatewayError::InvalidQuery(
            "Text query cannot be empty".to_string(),
        ));
    }
    Ok(query)
}

/// Fans queries out to the indexes and shapes the results.
pub struct Retriever {
    dense: Arc<dyn IndexClient>,
    sparse: Arc<dyn IndexClient>,
    namespace: String,
    top_k: usize,
    rerank_model: String,
}

impl Retriever {
    /// Create a retriever over the two index clients.
    #[must_use]
    pub fn new(
        dense: Arc<dyn IndexClient>,
        sparse: Arc<dyn IndexClient>,
        settings: &Settings,
    ) -> Self {
        Self {
            dense,
            sparse,
            namespace: settings.namespace.clone(),
            top_k: settings.top_k,
            rerank_model: settings.rerank_model.clone(),
        }
    }

    fn request(&self, query: &str, rerank: bool) -> SearchRequest {
        let request = SearchRequest::new(query, self.top_k).with_category(MEMORY_CATEGORY);
        if rerank {
            request.with_rerank(RerankOptions::on_text(&self.rerank_model, query))
        } else {
            request
        }
    }

    /// Dense index only, no rerank.
    ///
    /// # Errors
    /// Returns an error if the query is empty or the dense index fails.
    pub async fn semantic_search(&self, query: &str) -> GatewayResult<Vec<NormalizedResult>> {
        let query = validate_query(query)?;
        let request = self.request(query, false);
        let hits = self.dense.search(&self.namespace, &request).await?;
        Ok(normalize_hits(hits))
    }

    /// Sparse index only, no rerank.
    ///
    /// # Errors
    /// Returns an error if the query is empty or the sparse index fails.
    pub async fn lexical_search(&self, query: &str) -> GatewayResult<Vec<NormalizedResult>> {
        let query = validate_query(query)?;
        let request = self.request(query, false);
        let hits = self.sparse.search(&self.namespace, &request).await?;
        Ok(normalize_hits(hits))
    }

    /// Both indexes concurrently with rerank, merged and cut to `top_k`.
    ///
    /// Both branches run to completion; if either fails the whole retrieval fails.
    ///
    /// # Errors
    /// Returns an error if the query is empty or either index fails.
    pub async fn cascading_retrieval(&self, query: &str) -> GatewayResult<Vec<NormalizedResult>> {
        let query = validate_query(query)?;
        let request = self.request(query, true);

        let (dense, sparse) = tokio::join!(
            self.dense.search(&self.namespace, &request),
            self.sparse.search(&self.namespace, &request),
        );
        let (dense, sparse) = (dense?, sparse?);
        let fetched = dense.len() + sparse.len();

        let mut merged = dedup_combined_results(normalize_hits(dense), normalize_hits(sparse));
        merged.truncate(self.top_k);

        debug!(fetched, returned = merged.len(), "cascading retrieval merged");
        Ok(merged)
    }

    /// Enumerate stored memories from the dense index.
    ///
    /// # Errors
    /// Returns an error if the dense index fails.
    pub async fn list_memories(&self) -> GatewayResult<Vec<NormalizedResult>> {
        let request = SearchRequest::new(LIST_QUERY, LIST_TOP_K).with_category(MEMORY_CATEGORY);
        let hits = self.dense.search(&self.namespace, &request).await?;
        Ok(normalize_hits(hits))
    }
}
