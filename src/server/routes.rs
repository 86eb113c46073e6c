//! HTTP route handlers for the memory gateway API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::memory::core::ids::MemoryId;
use crate::memory::ingest::pipeline::{StoreOutcome, store_memory};
use crate::memory::retrieval::normalize::NormalizedResult;

use super::error::ApiError;
use super::state::AppState;

/// Create the API router with all routes.
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/semantic-search", get(semantic_search))
        .route("/api/lexical-search", get(lexical_search))
        .route("/api/cascading-retrieval", get(cascading_retrieval))
        .route("/api/store-memory", post(store_memory_handler))
        .route("/api/test", get(test_endpoint))
        .route("/api/memories", get(list_memories))
        .with_state(state)
}

/// Query string for the search endpoints. A missing query counts as empty.
#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    /// Free-text query.
    pub text_query: Option<String>,
}

impl TextQuery {
    fn text(&self) -> &str {
        self.text_query.as_deref().unwrap_or_default()
    }
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Normalized results, best first.
    pub results: Vec<NormalizedResult>,
}

async fn semantic_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .retriever
        .semantic_search(query.text())
        .await
        .map_err(|e| ApiError::with_context("Semantic search failed", &e))?;
    Ok(Json(SearchResponse { results }))
}

async fn lexical_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .retriever
        .lexical_search(query.text())
        .await
        .map_err(|e| ApiError::with_context("Lexical search failed", &e))?;
    Ok(Json(SearchResponse { results }))
}

async fn cascading_retrieval(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state
        .retriever
        .cascading_retrieval(query.text())
        .await
        .map_err(|e| ApiError::with_context("Cascading retrieval failed", &e))?;
    Ok(Json(SearchResponse { results }))
}

/// Store-memory request body.
#[derive(Debug, Deserialize)]
pub struct MemoryStoreRequest {
    /// Candidate memory text.
    pub message: String,
    /// Client timestamp, echoed back verbatim.
    pub timestamp: String,
    /// Client identifier, echoed back.
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "extension".to_string()
}

/// Store-memory response.
#[derive(Debug, Serialize)]
pub struct MemoryStoreResponse {
    /// Whether the request was handled. True for skips too.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Id of the stored memory; absent when skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<MemoryId>,
    /// Set when the gate declined the memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    /// Echo of the request timestamp.
    pub timestamp: String,
    /// Echo of the request source.
    pub source: String,
}

async fn store_memory_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MemoryStoreRequest>, JsonRejection>,
) -> Result<Json<MemoryStoreResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::invalid_body(&rejection))?;
    let outcome = store_memory(&state.gate, &state.writer, &request.message)
        .await
        .map_err(|e| ApiError::with_context("Failed to store memory", &e))?;

    let (message, memory_id, skipped) = match outcome {
        StoreOutcome::Stored { record, .. } => (
            "Memory stored successfully in Pinecone",
            Some(record.id),
            None,
        ),
        StoreOutcome::Skipped { verdict } => {
            tracing::debug!(reason = %verdict.reason, "memory skipped by gate");
            ("Memory skipped: not a durable fact", None, Some(true))
        }
    };

    Ok(Json(MemoryStoreResponse {
        success: true,
        message: message.to_string(),
        memory_id,
        skipped,
        timestamp: request.timestamp,
        source: request.source,
    }))
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct TestResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Service description.
    pub message: &'static str,
    /// Whether both index clients are open.
    pub pinecone_connected: bool,
}

async fn test_endpoint(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    Json(TestResponse {
        status: "ok",
        message: "Memory service is running with Pinecone",
        pinecone_connected: state.indexes_open(),
    })
}

/// Memory listing response.
#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    /// Number of memories returned.
    pub count: usize,
    /// The memories.
    pub memories: Vec<NormalizedResult>,
}

async fn list_memories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MemoriesResponse>, ApiError> {
    let memories = state
        .retriever
        .list_memories()
        .await
        .map_err(|e| ApiError::with_context("Failed to list memories", &e))?;
    Ok(Json(MemoriesResponse {
        count: memories.len(),
        memories,
    }))
}
