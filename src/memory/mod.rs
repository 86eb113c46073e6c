//! Memory subsystem for the gateway.
//!
//! Organized into:
//! - `core`: settings, errors, identifiers, and records
//! - `index`: index client trait and the Pinecone implementation
//! - `retrieval`: hit normalization, cross-branch dedup, and search orchestration
//! - `gate`: classifier seam and the memory admission gate
//! - `ingest`: dual-index writer, gated store flow, and corpus seeding

pub mod core;
pub mod gate;
pub mod index;
pub mod ingest;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use self::core::{
    ClassifierError, GatewayError, GatewayResult, IndexError, IndexRecord, IndexResult,
    MEMORY_CATEGORY, MemoryId, MemoryRecord, Settings,
};
pub use gate::{GateDecision, GateReason, GateVerdict, MemoryGate, OpenAiClassifier, TextClassifier};
pub use index::{Hit, IndexClient, IndexFuture, PineconeIndex, RerankOptions, SearchRequest};
pub use ingest::{
    MemoryWriter, SeedStats, StoreOutcome, chunk_document, sample_records, seed_and_close,
    store_memory, upsert_in_batches,
};
pub use retrieval::{NormalizedResult, Retriever, dedup_combined_results, normalize_hits};
