//! Load the built-in sample corpus into both indexes.
//! Run with: cargo run --bin memory-seed

use anyhow::{Context, Result};

use memory_gateway::memory::core::config::Settings;
use memory_gateway::memory::index::pinecone::PineconeIndex;
use memory_gateway::memory::ingest::seed::{SEED_BATCH_SIZE, sample_records, seed_and_close};
use memory_gateway::start_gateway::init_tracing;

fn main() -> Result<()> {
    init_tracing();

    let settings = Settings::from_env().context("loading settings")?;
    let dense = PineconeIndex::new("dense", &settings.dense_index_host, &settings.pinecone_api_key)
        .context("opening dense index")?;
    let sparse =
        PineconeIndex::new("sparse", &settings.sparse_index_host, &settings.pinecone_api_key)
            .context("opening sparse index")?;

    let records = sample_records();
    tracing::info!(records = records.len(), namespace = %settings.namespace, "Seeding sample corpus");

    let rt = tokio::runtime::Runtime::new().context("creating runtime")?;
    let (dense_stats, sparse_stats) = rt.block_on(async {
        tokio::join!(
            seed_and_close(&dense, &settings.namespace, &records, SEED_BATCH_SIZE),
            seed_and_close(&sparse, &settings.namespace, &records, SEED_BATCH_SIZE),
        )
    });

    if dense_stats.failed_batches + sparse_stats.failed_batches > 0 {
        anyhow::bail!(
            "seeding incomplete: {} dense and {} sparse batches failed",
            dense_stats.failed_batches,
            sparse_stats.failed_batches
        );
    }
    Ok(())
}
