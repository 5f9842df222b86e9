//! Logical-product deduplication.

use hashbrown::HashSet;

use crate::score::ScoredItem;

/// Collapse rows sharing a `product_id` to the highest-scoring one.
///
/// Sorts by score descending first (stable, so ties keep catalog order),
/// then keeps the first row seen per logical product. Non-duplicates keep
/// their score order.
pub fn dedupe_products(mut scored: Vec<ScoredItem>) -> Vec<ScoredItem> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut seen: HashSet<u64> = HashSet::with_capacity(scored.len());
    scored
        .into_iter()
        .filter(|candidate| seen.insert(candidate.item.product_id))
        .collect()
}
