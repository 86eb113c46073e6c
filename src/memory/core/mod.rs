//! Core gateway types: settings, errors, identifiers, records.

pub mod config;
pub mod errors;
pub mod ids;
pub mod record;

pub use config::Settings;
pub use errors::{ClassifierError, GatewayError, GatewayResult, IndexError, IndexResult};
pub use ids::MemoryId;
pub use record::{CATEGORY_FIELD, IndexRecord, MEMORY_CATEGORY, MemoryRecord, TEXT_FIELD};
