//! Cross-branch deduplication of dense and sparse results.
//!
//! Both branches are concatenated (dense first), collapsed by id keeping the
//! highest score, then globally re-sorted by descending score. Scores are only
//! comparable across branches when both were reranked by the same model.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::memory::retrieval::normalize::NormalizedResult;

/// Merge two result lists into one duplicate-free list, best score first.
///
/// On equal scores the earlier occurrence wins, so dense beats sparse and
/// the first-seen order is kept among ties.
#[must_use]
pub fn dedup_combined_results(
    dense: Vec<NormalizedResult>,
    sparse: Vec<NormalizedResult>,
) -> Vec<NormalizedResult> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(dense.len() + sparse.len());
    let mut kept: Vec<NormalizedResult> = Vec::with_capacity(dense.len() + sparse.len());

    for result in dense.into_iter().chain(sparse) {
        match slots.entry(result.id.clone()) {
            Entry::Occupied(slot) => {
                let current = &mut kept[*slot.get()];
                if result.score > current.score {
                    *current = result;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(kept.len());
                kept.push(result);
            }
        }
    }

    // Stable sort: ties keep first-seen order.
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept
}
