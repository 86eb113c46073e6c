//! Write path: dual-index writer, gated store flow, and corpus seeding.

pub mod pipeline;
pub mod seed;
pub mod writer;

pub use pipeline::{StoreOutcome, store_memory};
pub use seed::{
    SAMPLE_DOCUMENTS, SEED_BATCH_SIZE, SeedStats, chunk_document, sample_records, seed_and_close,
    upsert_in_batches,
};
pub use writer::MemoryWriter;
