//! Embedding-based keyword expansion.

use hashbrown::HashSet;
use lexicon::{patterns_for, Lexicon};
use vecspace::EmbeddingModel;

/// Neighbors fetched per core keyword.
const NEIGHBORS_PER_KEYWORD: usize = 5;
/// Minimum cosine similarity for an expansion candidate.
const MIN_SIMILARITY: f32 = 0.4;
/// Expansions accepted per core keyword.
const MAX_PER_KEYWORD: usize = 3;
/// Total query-term cap, checked after each keyword's batch.
const GLOBAL_CAP: usize = 12;

fn is_forbidden_term(candidate: &str, lexicon: &Lexicon, forbidden: &[String]) -> bool {
    forbidden.iter().any(|canonical| {
        candidate == canonical
            || patterns_for(&lexicon.forbidden_synonyms, canonical)
                .iter()
                .any(|p| p == candidate)
    })
}

/// Expand core keywords with embedding nearest-neighbors.
///
/// Degrades to the deduplicated core list when no model was trained.
/// Candidates below [`MIN_SIMILARITY`], already present, or belonging to an
/// active forbidden category are skipped; at most [`MAX_PER_KEYWORD`] are
/// taken per keyword and expansion stops once [`GLOBAL_CAP`] terms exist.
pub fn expand_keywords(
    core: &[String],
    model: &EmbeddingModel,
    lexicon: &Lexicon,
    forbidden: &[String],
) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for keyword in core {
        if seen.insert(keyword.as_str()) {
            expanded.push(keyword.clone());
        }
    }

    let word_vectors = match model {
        EmbeddingModel::Present(wv) => wv,
        EmbeddingModel::Absent => return expanded,
    };
    if expanded.is_empty() {
        return expanded;
    }

    for keyword in core {
        if !word_vectors.contains(keyword) {
            continue;
        }
        let mut added = 0;
        for (candidate, similarity) in word_vectors.most_similar(keyword, NEIGHBORS_PER_KEYWORD) {
            if similarity < MIN_SIMILARITY {
                continue;
            }
            if expanded.iter().any(|t| t == &candidate)
                || is_forbidden_term(&candidate, lexicon, forbidden)
            {
                continue;
            }
            expanded.push(candidate);
            added += 1;
            if added >= MAX_PER_KEYWORD {
                break;
            }
        }
        if expanded.len() >= GLOBAL_CAP {
            break;
        }
    }
    expanded
}
