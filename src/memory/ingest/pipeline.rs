//! Store flow: gate first, then write.

use crate::memory::core::errors::GatewayResult;
use crate::memory::core::record::MemoryRecord;
use crate::memory::gate::admission::MemoryGate;
use crate::memory::gate::verdict::GateVerdict;
use crate::memory::ingest::writer::MemoryWriter;

/// Result of a store request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreOutcome {
    /// The gate accepted the memory and both indexes were written.
    Stored {
        /// Persisted record.
        record: MemoryRecord,
        /// Gate verdict that allowed the write.
        verdict: GateVerdict,
    },
    /// The gate rejected the memory; nothing was written.
    Skipped {
        /// Gate verdict that blocked the write.
        verdict: GateVerdict,
    },
}

impl StoreOutcome {
    /// Whether nothing was written.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Gate `message` and write it when accepted.
///
/// Classifier failures never surface here; only write failures do.
///
/// # Errors
/// Returns an error if the write to either index fails.
pub async fn store_memory(
    gate: &MemoryGate,
    writer: &MemoryWriter,
    message: &str,
) -> GatewayResult<StoreOutcome> {
    let verdict = gate.should_store(message).await;
    if !verdict.should_store() {
        return Ok(StoreOutcome::Skipped { verdict });
    }

    let record = writer.write(message).await?;
    Ok(StoreOutcome::Stored { record, verdict })
}
