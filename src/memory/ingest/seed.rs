//! Sample corpus loader used to populate empty indexes.
//!
//! Documents are split on sentence boundaries (`". "`) into one record per
//! sentence, ids `"{doc}#{n}"`. Records carry no category tag.

use tracing::{info, warn};

use crate::memory::core::record::IndexRecord;
use crate::memory::index::client::IndexClient;

/// Upsert batch size accepted by integrated-embedding indexes.
pub const SEED_BATCH_SIZE: usize = 96;

/// Built-in sample documents as `(id, content)`.
pub const SAMPLE_DOCUMENTS: [(&str, &str); 10] = [
    (
        "doc1",
        "The quick brown fox jumps over the lazy dog. This is a classic pangram used for testing. It contains every letter of the alphabet.",
    ),
    (
        "doc2",
        "Machine learning is a subset of artificial intelligence. It focuses on the use of data and algorithms to imitate the way humans learn. Deep learning is a type of machine learning.",
    ),
    (
        "doc3",
        "Python is a high-level programming language. It is widely used for web development, data science, and automation. Python has a simple and readable syntax.",
    ),
    (
        "doc4",
        "Basketball is a team sport played on a rectangular court. Two teams of five players try to score by shooting a ball through a hoop. The game was invented in 1891.",
    ),
    (
        "doc5",
        "Climate change refers to long-term shifts in global temperatures. It is primarily caused by human activities. Rising sea levels and extreme weather events are major concerns.",
    ),
    (
        "doc6",
        "The solar system consists of the Sun and everything that orbits it. This includes eight planets, their moons, and countless asteroids. Earth is the third planet from the Sun.",
    ),
    (
        "doc7",
        "Coffee is one of the most popular beverages worldwide. It is made from roasted coffee beans. The caffeine in coffee helps people stay alert and focused.",
    ),
    (
        "doc8",
        "Electric vehicles use electric motors for propulsion. They are powered by rechargeable battery packs. EVs produce zero direct emissions and are considered environmentally friendly.",
    ),
    (
        "doc9",
        "The internet is a global network of interconnected computers. It enables communication and information sharing worldwide. The World Wide Web was invented in 1989.",
    ),
    (
        "doc10",
        "Photosynthesis is the process used by plants to convert light energy. They transform carbon dioxide and water into glucose and oxygen. This process is essential for life on Earth.",
    ),
];

/// Counters from one seeding run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedStats {
    /// Batches sent.
    pub batches: usize,
    /// Batches the index rejected.
    pub failed_batches: usize,
    /// Records in accepted batches.
    pub records_written: usize,
}

/// Split one document into sentence records.
///
/// Blank sentences are dropped but still consume a chunk number.
#[must_use]
pub fn chunk_document(doc_id: &str, content: &str) -> Vec<IndexRecord> {
    content
        .split(". ")
        .enumerate()
        .filter(|(_, sentence)| !sentence.trim().is_empty())
        .map(|(chunk, sentence)| {
            let mut text = sentence.trim().to_string();
            if !sentence.ends_with('.') {
                text.push('.');
            }
            IndexRecord {
                id: format!("{doc_id}#{chunk}"),
                chunk_text: text,
                category: None,
            }
        })
        .collect()
}

/// Records for the whole sample corpus.
#[must_use]
pub fn sample_records() -> Vec<IndexRecord> {
    SAMPLE_DOCUMENTS
        .iter()
        .flat_map(|(id, content)| chunk_document(id, content))
        .collect()
}

/// Upsert `records` in batches. A rejected batch is logged and skipped.
pub async fn upsert_in_batches(
    index: &dyn IndexClient,
    namespace: &str,
    records: &[IndexRecord],
    batch_size: usize,
) -> SeedStats {
    let mut stats = SeedStats::default();
    for batch in records.chunks(batch_size.max(1)) {
        stats.batches += 1;
        match index.upsert_records(namespace, batch).await {
            Ok(()) => stats.records_written += batch.len(),
            Err(err) => {
                stats.failed_batches += 1;
                let first = batch.first().map_or("", |record| record.id.as_str());
                warn!(index = index.name(), first_id = first, size = batch.len(), error = %err, "Error upserting batch");
            }
        }
    }
    info!(
        index = index.name(),
        batches = stats.batches,
        failed = stats.failed_batches,
        written = stats.records_written,
        "Seeding finished"
    );
    stats
}

/// Seed `index` with `records`, then close it.
///
/// A failed close is logged; the seeding counters are returned either way.
pub async fn seed_and_close(
    index: &dyn IndexClient,
    namespace: &str,
    records: &[IndexRecord],
    batch_size: usize,
) -> SeedStats {
    let stats = upsert_in_batches(index, namespace, records, batch_size).await;
    if let Err(err) = index.close().await {
        warn!(index = index.name(), error = %err, "Failed to close index client");
    }
    stats
}
