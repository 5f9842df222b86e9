//! Multi-signal scoring: lexical + semantic similarity fused with budget
//! fit, context bonus, and popularity.

use serde::{Deserialize, Serialize};

use catalog::CatalogItem;
use lexicon::{patterns_for, Lexicon};
use textnorm::{normalize, Tokenizer};
use vecspace::{cosine_dense, cosine_sparse, weighted_embedding, NormalizedItem, VectorIndex};

use crate::slots::QuerySlots;

/// Fusion weights. The similarity and bonus terms sum to 1.0 by default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub semantic: f32,
    pub lexical: f32,
    pub budget: f32,
    pub context: f32,
    pub popularity: f32,
    /// Flat deduction for out-of-budget items in soft mode, applied after
    /// the budget-fit scale-down.
    pub soft_budget_penalty: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: 0.35,
            lexical: 0.25,
            budget: 0.20,
            context: 0.10,
            popularity: 0.10,
            soft_budget_penalty: 0.03,
        }
    }
}

/// Per-item context bonus for a matching occasion or relation hint.
const CONTEXT_HINT_BONUS: f32 = 0.06;
/// Combined context bonus ceiling.
const CONTEXT_BONUS_CAP: f32 = 0.12;
/// Multiplier applied to budget fit when the price falls outside the range.
const OUTSIDE_FIT_SCALE: f32 = 0.4;

/// One fully scored candidate. `reason` stays empty until the diversifier
/// has picked the final set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    /// Row position in the catalog snapshot, used to fetch embeddings.
    pub doc_index: usize,
    pub score: f32,
    pub sim_semantic: f32,
    pub sim_lexical: f32,
    pub budget_fit: f32,
    pub budget_outside: bool,
    pub context_score: f32,
    pub matched_keywords: Vec<String>,
    pub reason: String,
}

/// True when the item text contains any synonym of an active forbidden
/// category.
pub fn violates_forbidden(text: &str, forbidden: &[String], lexicon: &Lexicon) -> bool {
    forbidden.iter().any(|canonical| {
        patterns_for(&lexicon.forbidden_synonyms, canonical)
            .iter()
            .any(|pattern| text.contains(pattern.as_str()))
    })
}

/// Closeness of a price to the budget range, plus whether it falls outside.
///
/// Fit peaks at the range midpoint and decays linearly; prices outside the
/// stated bounds keep a scaled-down fit rather than zero, so soft mode can
/// still rank them.
pub fn compute_budget_fit(price: u64, budget_min: Option<u64>, budget_max: Option<u64>) -> (f32, bool) {
    if budget_min.is_none() && budget_max.is_none() {
        return (1.0, false);
    }
    let lo = budget_min.unwrap_or(0);
    let hi = budget_max.unwrap_or_else(|| price.max(lo));
    let mid = if budget_min.is_some() && budget_max.is_some() {
        (lo + hi) as f64 / 2.0
    } else if budget_max.is_some() {
        hi as f64
    } else {
        lo as f64
    };
    let mid = mid.max(1.0);
    let fit = (1.0 - (price as f64 - mid).abs() / mid).max(0.0) as f32;

    let below = budget_min.is_some_and(|min| price < min);
    let above = budget_max.is_some_and(|max| price > max);
    let outside = below || above;
    if outside {
        (fit * OUTSIDE_FIT_SCALE, true)
    } else {
        (fit, false)
    }
}

/// Bonus when the item text carries a hint for the resolved occasion or
/// relation. A slot with no hint table entry falls back to its own label.
pub fn compute_context_score(text: &str, slots: &QuerySlots, lexicon: &Lexicon) -> f32 {
    let mut score = 0.0;
    for (slot, hints) in [
        (&slots.occasion, &lexicon.occasion_hints),
        (&slots.relation, &lexicon.relation_hints),
    ] {
        let Some(label) = slot else { continue };
        let patterns = patterns_for(hints, label);
        let hit = if patterns.is_empty() {
            text.contains(label.as_str())
        } else {
            patterns.iter().any(|hint| text.contains(hint.as_str()))
        };
        if hit {
            score += CONTEXT_HINT_BONUS;
        }
    }
    score.min(CONTEXT_BONUS_CAP)
}

/// Score every catalog item against the query.
///
/// Returns candidates in catalog order, unsorted; forbidden-term hits are
/// excluded outright, as are out-of-budget items under `hard_budget`. An
/// empty return is a valid outcome, not an error.
#[allow(clippy::too_many_arguments)]
pub fn score_items(
    query_terms: &[String],
    query_text: &str,
    items: &[NormalizedItem],
    index: &VectorIndex,
    lexicon: &Lexicon,
    slots: &QuerySlots,
    weights: &ScoreWeights,
    hard_budget: bool,
    tokenizer: &Tokenizer,
) -> Vec<ScoredItem> {
    let fallback_terms;
    let terms: &[String] = if query_terms.is_empty() {
        fallback_terms = tokenizer
            .tokenize(query_text, false)
            .into_iter()
            .take(crate::slots::CORE_KEYWORD_CAP)
            .collect::<Vec<_>>();
        &fallback_terms
    } else {
        query_terms
    };
    let joined = if terms.is_empty() {
        normalize(query_text)
    } else {
        terms.join(" ")
    };

    let query_row = index.tfidf.transform(&joined);
    let query_embedding = weighted_embedding(&query_row, &index.tfidf, &index.embedding);

    let mut scored = Vec::new();
    for (doc_index, normalized) in items.iter().enumerate() {
        if violates_forbidden(&normalized.text, &slots.forbidden, lexicon) {
            continue;
        }
        let (budget_fit, budget_outside) =
            compute_budget_fit(normalized.item.price, slots.budget_min, slots.budget_max);
        if hard_budget && budget_outside {
            continue;
        }
        let context_score = compute_context_score(&normalized.text, slots, lexicon);
        let sim_lexical = cosine_sparse(&query_row, &index.rows[doc_index]);
        let sim_semantic = cosine_dense(query_embedding.view(), index.doc_embedding(doc_index));
        let matched_keywords: Vec<String> = terms
            .iter()
            .filter(|term| normalized.token_set.contains(term.as_str()))
            .cloned()
            .collect();

        let mut score = weights.semantic * sim_semantic
            + weights.lexical * sim_lexical
            + weights.budget * budget_fit
            + weights.context * context_score
            + weights.popularity * normalized.popularity_norm;
        if budget_outside && !hard_budget {
            score -= weights.soft_budget_penalty;
        }

        scored.push(ScoredItem {
            item: normalized.item.clone(),
            doc_index,
            score,
            sim_semantic,
            sim_lexical,
            budget_fit,
            budget_outside,
            context_score,
            matched_keywords,
            reason: String::new(),
        });
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_budget_means_perfect_fit() {
        assert_eq!(compute_budget_fit(25_000, None, None), (1.0, false));
    }

    #[test]
    fn fit_peaks_at_the_midpoint() {
        let (at_mid, outside) = compute_budget_fit(30_000, Some(20_000), Some(40_000));
        assert!((at_mid - 1.0).abs() < 1e-6);
        assert!(!outside);
        let (off_mid, _) = compute_budget_fit(25_000, Some(20_000), Some(40_000));
        assert!(off_mid < at_mid);
        assert!(off_mid > 0.0);
    }

    #[test]
    fn upper_bound_only_uses_the_bound_as_midpoint() {
        let (fit, outside) = compute_budget_fit(30_000, None, Some(30_000));
        assert!((fit - 1.0).abs() < 1e-6);
        assert!(!outside);
    }

    #[test]
    fn outside_prices_are_flagged_and_scaled() {
        let (inside, _) = compute_budget_fit(29_000, None, Some(30_000));
        let (fit, outside) = compute_budget_fit(31_000, None, Some(30_000));
        assert!(outside);
        assert!(fit < inside * OUTSIDE_FIT_SCALE + 1e-6);
        let (_, below) = compute_budget_fit(10_000, Some(20_000), Some(40_000));
        assert!(below);
    }

    #[test]
    fn context_bonus_caps_at_two_hints() {
        let lexicon = Lexicon::default();
        let slots = QuerySlots {
            occasion: Some("생일".into()),
            relation: Some("직장동료".into()),
            ..QuerySlots::default()
        };
        let both = compute_context_score("생일 파티 오피스 데스크 용품", &slots, &lexicon);
        assert_eq!(both, CONTEXT_BONUS_CAP);
        let one = compute_context_score("생일 케이크 토퍼", &slots, &lexicon);
        assert_eq!(one, CONTEXT_HINT_BONUS);
        let none = compute_context_score("스텐 텀블러", &slots, &lexicon);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn forbidden_synonyms_match_item_text() {
        let lexicon = Lexicon::default();
        let forbidden = vec!["향".to_string()];
        assert!(violates_forbidden("로즈 향수 미니어처", &forbidden, &lexicon));
        assert!(violates_forbidden("진한 향 디퓨저", &forbidden, &lexicon));
        assert!(!violates_forbidden("무향 핸드크림", &forbidden, &lexicon));
        assert!(!violates_forbidden("로즈 향수", &[], &lexicon));
    }
}
