//! Retrieval: hit normalization, cross-branch merge, and orchestration.

pub mod dedup;
pub mod normalize;
pub mod search;

pub use dedup::dedup_combined_results;
pub use normalize::{NormalizedResult, normalize, normalize_hits};
pub use search::{Retriever, validate_query};
