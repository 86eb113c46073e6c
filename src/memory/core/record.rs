//! Records written to the indexes.

use serde::{Deserialize, Serialize};

use crate::memory::core::ids::MemoryId;

/// Category tag carried by every memory written through the gateway.
pub const MEMORY_CATEGORY: &str = "memory";
/// Field holding the text the indexes embed and rerank on.
pub const TEXT_FIELD: &str = "chunk_text";
/// Field holding the category tag.
pub const CATEGORY_FIELD: &str = "category";

/// Wire shape of an upserted record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Record identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Text to embed.
    pub chunk_text: String,
    /// Optional category tag, used by search filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A memory accepted by the gate and persisted to both indexes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Identifier generated at write time.
    #[serde(rename = "_id")]
    pub id: MemoryId,
    /// Memory text, stored verbatim.
    pub chunk_text: String,
    /// Always [`MEMORY_CATEGORY`].
    pub category: String,
}

impl MemoryRecord {
    /// Build a record with a fresh identifier.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: MemoryId::new(),
            chunk_text: text.into(),
            category: MEMORY_CATEGORY.to_string(),
        }
    }

    /// Wire form of the record.
    #[must_use]
    pub fn to_index_record(&self) -> IndexRecord {
        IndexRecord {
            id: self.id.to_string(),
            chunk_text: self.chunk_text.clone(),
            category: Some(self.category.clone()),
        }
    }
}
