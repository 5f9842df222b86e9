//! Human-readable explanations for the selected items, plus a quality
//! guard summary over the whole result set.

use serde::Serialize;

use lexicon::{match_slot, Lexicon};
use vecspace::NormalizedItem;

use crate::score::{violates_forbidden, ScoredItem};
use crate::slots::QuerySlots;

/// Minimum budget fit for the "fits budget" phrasing.
const BUDGET_FIT_OK: f32 = 0.6;

fn guard_phrase(text: &str, slots: &QuerySlots, lexicon: &Lexicon) -> Option<String> {
    if slots.forbidden.is_empty() {
        return None;
    }
    let mut hits = Vec::new();
    for (label, terms) in &lexicon.guard_terms {
        if terms.iter().any(|term| text.contains(term.as_str())) {
            hits.push(label.as_str());
            if hits.len() == 2 {
                break;
            }
        }
    }
    if hits.is_empty() {
        None
    } else {
        Some(format!("금기 충족: {}", hits.join("/")))
    }
}

/// The keyword fragment: top 3 matched terms, or an exploratory label
/// drawn from the category/style hint tables when nothing matched.
fn keyword_phrase(scored: &ScoredItem, text: &str, lexicon: &Lexicon) -> String {
    if !scored.matched_keywords.is_empty() {
        let top: Vec<&str> = scored
            .matched_keywords
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        return format!("{} 키워드 매칭", top.join("/"));
    }
    let angle = match_slot(&lexicon.category_hints, text)
        .or_else(|| match_slot(&lexicon.style_hints, text));
    match angle {
        Some(label) => format!("취향 탐색·{label}"),
        None => "취향 탐색".to_string(),
    }
}

/// Compose the explanation string for one selected item.
pub fn compose_reason(
    scored: &ScoredItem,
    normalized: &NormalizedItem,
    slots: &QuerySlots,
    lexicon: &Lexicon,
) -> String {
    let text = normalized.text.as_str();

    let band = ((scored.item.price as f64 / 10_000.0).round() as u64).max(1);
    let budget_desc = if !scored.budget_outside && scored.budget_fit >= BUDGET_FIT_OK {
        format!("{band}만 원대 예산 적합")
    } else {
        format!("{band}만 원대 예산 보완")
    };

    let pop = scored.item.popularity;
    let pop_text = if pop >= 1_000 {
        format!("인기 {}k", pop / 1_000)
    } else {
        format!("인기 {pop}")
    };
    let quality = format!("평점 {:.1}·{}", scored.item.rating, pop_text);

    let mut pieces = vec![keyword_phrase(scored, text, lexicon), budget_desc, quality];
    if let Some(guard) = guard_phrase(text, slots, lexicon) {
        pieces.push(guard);
    }
    pieces.join(", ")
}

/// Aggregate quality counters over a final result set.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GuardSummary {
    /// Results whose text still matches an active forbidden synonym.
    /// Always zero when the scorer did its job.
    pub forbidden_hits: usize,
    /// Results priced outside the stated budget.
    pub budget_outside: usize,
    pub total: usize,
}

impl GuardSummary {
    /// Share of results outside the budget, in [0, 1].
    pub fn budget_outside_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.budget_outside as f32 / self.total as f32
        }
    }
}

/// Count forbidden violations and budget escapes in the final results.
pub fn summarize_guards(
    results: &[ScoredItem],
    items: &[NormalizedItem],
    slots: &QuerySlots,
    lexicon: &Lexicon,
) -> GuardSummary {
    let mut summary = GuardSummary {
        total: results.len(),
        ..GuardSummary::default()
    };
    for scored in results {
        if violates_forbidden(&items[scored.doc_index].text, &slots.forbidden, lexicon) {
            summary.forbidden_hits += 1;
        }
        if scored.budget_outside {
            summary.budget_outside += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogItem, MemorySource, RawProductRow};
    use textnorm::Tokenizer;

    fn normalized(title: &str, tags: &[&str], price: u64) -> NormalizedItem {
        let row = RawProductRow {
            title: title.to_string(),
            price,
            rating: 4.6,
            popularity: 2_300,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..RawProductRow::default()
        };
        let items = catalog::load_catalog(&MemorySource::new(vec![row]))
            .unwrap_or_else(|e| panic!("load: {e}"));
        vecspace::enrich(items, &Tokenizer::new(Vec::<String>::new()), false)
            .into_iter()
            .next()
            .unwrap_or_else(|| panic!("one item"))
    }

    fn scored_for(item: &NormalizedItem, matched: &[&str]) -> ScoredItem {
        ScoredItem {
            item: item.item.clone(),
            doc_index: 0,
            score: 0.8,
            sim_semantic: 0.0,
            sim_lexical: 0.4,
            budget_fit: 0.9,
            budget_outside: false,
            context_score: 0.0,
            matched_keywords: matched.iter().map(|m| m.to_string()).collect(),
            reason: String::new(),
        }
    }

    fn item_helper(id: u32, price: u64, outside: bool) -> ScoredItem {
        ScoredItem {
            item: CatalogItem {
                id,
                product_id: id as u64,
                title: format!("item-{id}"),
                price,
                rating: 4.0,
                popularity: 10,
                tags: vec![],
                category_path: vec![],
                image: String::new(),
                link: String::new(),
            },
            doc_index: 0,
            score: 0.5,
            sim_semantic: 0.0,
            sim_lexical: 0.0,
            budget_fit: 0.5,
            budget_outside: outside,
            context_score: 0.0,
            matched_keywords: vec![],
            reason: String::new(),
        }
    }

    #[test]
    fn matched_keywords_lead_the_reason() {
        let lexicon = Lexicon::default();
        let item = normalized("스텐 텀블러", &["보온", "보냉"], 28_000);
        let scored = scored_for(&item, &["텀블러", "보온", "스텐", "보냉"]);
        let reason = compose_reason(&scored, &item, &QuerySlots::default(), &lexicon);
        assert!(reason.starts_with("텀블러/보온/스텐 키워드 매칭"));
        assert!(reason.contains("3만 원대 예산 적합"));
        assert!(reason.contains("평점 4.6·인기 2k"));
        assert!(!reason.contains("금기 충족"));
    }

    #[test]
    fn exploratory_fallback_names_a_category_angle() {
        let lexicon = Lexicon::default();
        let item = normalized("스텐 텀블러", &["주방"], 28_000);
        let scored = scored_for(&item, &[]);
        let reason = compose_reason(&scored, &item, &QuerySlots::default(), &lexicon);
        assert!(reason.starts_with("취향 탐색·주방/리빙"));
    }

    #[test]
    fn low_fit_or_outside_reads_as_tradeoff() {
        let lexicon = Lexicon::default();
        let item = normalized("무드등", &[], 52_000);
        let mut scored = scored_for(&item, &["무드등"]);
        scored.budget_outside = true;
        scored.budget_fit = 0.2;
        let reason = compose_reason(&scored, &item, &QuerySlots::default(), &lexicon);
        assert!(reason.contains("5만 원대 예산 보완"));
    }

    #[test]
    fn guard_phrase_requires_active_forbidden() {
        let lexicon = Lexicon::default();
        let item = normalized("무향 핸드크림", &["저자극"], 15_000);
        let scored = scored_for(&item, &["핸드크림"]);

        let without = compose_reason(&scored, &item, &QuerySlots::default(), &lexicon);
        assert!(!without.contains("금기 충족"));

        let slots = QuerySlots {
            forbidden: vec!["향".to_string()],
            ..QuerySlots::default()
        };
        let with = compose_reason(&scored, &item, &slots, &lexicon);
        assert!(with.contains("금기 충족: 무향/저자극"));
    }

    #[test]
    fn guard_summary_counts_budget_escapes() {
        let lexicon = Lexicon::default();
        let items = vec![
            normalized("텀블러", &[], 25_000),
            normalized("무드등", &[], 52_000),
        ];
        let mut results = vec![item_helper(1, 25_000, false), item_helper(2, 52_000, true)];
        results[1].doc_index = 1;
        let summary = summarize_guards(&results, &items, &QuerySlots::default(), &lexicon);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.forbidden_hits, 0);
        assert_eq!(summary.budget_outside, 1);
        assert!((summary.budget_outside_ratio() - 0.5).abs() < 1e-6);
    }
}
