//! Dual-index memory writer.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::memory::core::errors::{GatewayResult, IndexResult};
use crate::memory::core::record::MemoryRecord;
use crate::memory::gate::snippet;
use crate::memory::index::client::IndexClient;

/// Writes accepted memories to both indexes.
pub struct MemoryWriter {
    dense: Arc<dyn IndexClient>,
    sparse: Arc<dyn IndexClient>,
    namespace: String,
}

impl MemoryWriter {
    /// Create a writer targeting `namespace` on both indexes.
    #[must_use]
    pub fn new(
        dense: Arc<dyn IndexClient>,
        sparse: Arc<dyn IndexClient>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            dense,
            sparse,
            namespace: namespace.into(),
        }
    }

    /// Persist `text` as a new memory with a fresh id.
    ///
    /// Both upserts are always attempted. A failure on either side fails the
    /// write; a side that succeeded is not rolled back.
    ///
    /// # Errors
    /// Returns an error if either index rejects the upsert.
    pub async fn write(&self, text: &str) -> GatewayResult<MemoryRecord> {
        let record = MemoryRecord::new(text);
        let records = [record.to_index_record()];

        let (dense, sparse) = tokio::join!(
            self.dense.upsert_records(&self.namespace, &records),
            self.sparse.upsert_records(&self.namespace, &records),
        );
        self.report(&record, &dense, &sparse);
        dense?;
        sparse?;

        info!(memory_id = %record.id, "Stored memory: {}", snippet(text, 50));
        Ok(record)
    }

    fn report(&self, record: &MemoryRecord, dense: &IndexResult<()>, sparse: &IndexResult<()>) {
        for (index, outcome) in [(&self.dense, dense), (&self.sparse, sparse)] {
            if let Err(err) = outcome {
                error!(memory_id = %record.id, index = index.name(), error = %err, "memory upsert failed");
            }
        }
        if dense.is_ok() != sparse.is_ok() {
            warn!(memory_id = %record.id, "memory written to only one index; not rolled back");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::core::errors::GatewayError;
    use crate::memory::core::record::MEMORY_CATEGORY;
    use crate::memory::testing::StubIndex;

    fn writer(dense: &Arc<StubIndex>, sparse: &Arc<StubIndex>) -> MemoryWriter {
        MemoryWriter::new(
            Arc::clone(dense) as Arc<dyn IndexClient>,
            Arc::clone(sparse) as Arc<dyn IndexClient>,
            "ns",
        )
    }

    #[tokio::test]
    async fn test_writes_same_record_to_both_indexes() {
        let dense = Arc::new(StubIndex::empty("dense"));
        let sparse = Arc::new(StubIndex::empty("sparse"));

        let record = writer(&dense, &sparse).write("I prefer window seats").await.unwrap();

        for index in [&dense, &sparse] {
            let upserts = index.upserted();
            assert_eq!(upserts.len(), 1);
            let (namespace, records) = &upserts[0];
            assert_eq!(namespace, "ns");
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].id, record.id.to_string());
            assert_eq!(records[0].chunk_text, "I prefer window seats");
            assert_eq!(records[0].category.as_deref(), Some(MEMORY_CATEGORY));
        }
    }

    #[tokio::test]
    async fn test_each_write_gets_new_id() {
        let dense = Arc::new(StubIndex::empty("dense"));
        let sparse = Arc::new(StubIndex::empty("sparse"));
        let writer = writer(&dense, &sparse);

        let first = writer.write("same text").await.unwrap();
        let second = writer.write("same text").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(dense.upserted().len(), 2);
    }

    #[tokio::test]
    async fn test_one_side_failure_fails_write_after_both_attempts() {
        let dense = Arc::new(StubIndex::empty("dense").failing_upsert());
        let sparse = Arc::new(StubIndex::empty("sparse"));

        let err = writer(&dense, &sparse).write("text").await.unwrap_err();

        assert!(matches!(err, GatewayError::Backend(_)));
        assert_eq!(dense.upserted().len(), 1);
        // The sparse side succeeded and stays written.
        assert_eq!(sparse.upserted().len(), 1);
    }
}
