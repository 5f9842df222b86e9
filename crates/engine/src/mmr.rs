//! Maximal-marginal-relevance diversification of the ranked candidates.

use ndarray::Array2;

use crate::score::ScoredItem;

/// Relevance/redundancy trade-off used by the engine.
pub const DEFAULT_LAMBDA: f32 = 0.7;
/// Floor for embedding norms, so zero vectors divide cleanly.
const NORM_EPSILON: f32 = 1e-8;

/// Greedy MMR selection of up to `k` items.
///
/// The first pick is the highest fused score; each later pick maximizes
/// `λ·relevance − (1−λ)·max cosine against the selected set`. Ties go to
/// the earlier candidate. Embeddings are looked up by `doc_index` and
/// unit-normalized up front.
pub fn diversify(
    items: Vec<ScoredItem>,
    doc_embeddings: &Array2<f32>,
    lambda: f32,
    k: usize,
) -> Vec<ScoredItem> {
    if items.is_empty() || k == 0 {
        return Vec::new();
    }

    let dim = doc_embeddings.ncols();
    let mut unit = Array2::<f32>::zeros((items.len(), dim));
    for (pos, candidate) in items.iter().enumerate() {
        let row = doc_embeddings.row(candidate.doc_index);
        let norm = row.dot(&row).sqrt().max(NORM_EPSILON);
        unit.row_mut(pos).assign(&row.mapv(|v| v / norm));
    }

    let limit = k.min(items.len());
    let mut remaining: Vec<usize> = (0..items.len()).collect();
    let mut picked: Vec<usize> = Vec::with_capacity(limit);

    while picked.len() < limit {
        let mut best_pos = 0;
        let mut best_value = f32::NEG_INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let value = if picked.is_empty() {
                items[idx].score
            } else {
                let penalty = picked
                    .iter()
                    .map(|&sel| unit.row(idx).dot(&unit.row(sel)))
                    .fold(f32::NEG_INFINITY, f32::max);
                lambda * items[idx].score - (1.0 - lambda) * penalty
            };
            if value > best_value {
                best_value = value;
                best_pos = pos;
            }
        }
        picked.push(remaining.remove(best_pos));
    }

    let mut slots: Vec<Option<ScoredItem>> = items.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| slots[idx].take())
        .collect()
}
