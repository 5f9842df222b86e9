//! Sparse TF-IDF model over the catalog corpus.
//!
//! Matches the classic smooth-idf formulation: `idf = ln((1+n)/(1+df)) + 1`,
//! raw term counts, rows l2-normalized. Cosine between two rows is then a
//! plain sparse dot product. The token pattern is fixed: maximal runs of
//! ASCII alphanumerics or Hangul syllables, so digits stay indexable (model
//! numbers, capacities) even though the tokenizer drops them from keywords.

use fxhash::FxHashMap;

/// Sparse l2-normalized weight vector, sorted by ascending term id.
pub type SparseVec = Vec<(u32, f32)>;

/// Fixed tokenizing pattern: runs of ASCII alphanumeric or Hangul chars.
pub fn pattern_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || textnorm::is_hangul_syllable(c)))
        .filter(|t| !t.is_empty())
}

/// TF-IDF vocabulary and learned inverse document frequencies.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocab: FxHashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Fit over the corpus and return the model plus one row per document.
    pub fn fit(texts: &[&str]) -> (Self, Vec<SparseVec>) {
        // Deterministic vocabulary: lexicographic term order.
        let mut df: std::collections::BTreeMap<&str, u32> = std::collections::BTreeMap::new();
        for text in texts {
            let mut seen: hashbrown::HashSet<&str> = hashbrown::HashSet::new();
            for token in pattern_tokens(text) {
                if seen.insert(token) {
                    *df.entry(token).or_insert(0) += 1;
                }
            }
        }

        let n = texts.len() as f32;
        let mut vocab = FxHashMap::default();
        let mut terms = Vec::with_capacity(df.len());
        let mut idf = Vec::with_capacity(df.len());
        for (term, count) in df {
            let id = terms.len() as u32;
            vocab.insert(term.to_string(), id);
            terms.push(term.to_string());
            idf.push(((1.0 + n) / (1.0 + count as f32)).ln() + 1.0);
        }

        let model = Self { vocab, terms, idf };
        let rows = texts.iter().map(|text| model.transform(text)).collect();
        (model, rows)
    }

    /// Weight a single text against the learned vocabulary. Unknown terms
    /// are ignored; an empty or out-of-vocabulary text yields an empty row.
    pub fn transform(&self, text: &str) -> SparseVec {
        let mut counts: FxHashMap<u32, f32> = FxHashMap::default();
        for token in pattern_tokens(text) {
            if let Some(&id) = self.vocab.get(token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        let mut row: SparseVec = counts
            .into_iter()
            .map(|(id, tf)| (id, tf * self.idf[id as usize]))
            .collect();
        row.sort_unstable_by_key(|&(id, _)| id);

        let norm: f32 = row.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    /// Term string for a vocabulary id.
    pub fn term(&self, id: u32) -> &str {
        &self.terms[id as usize]
    }

    pub fn vocab_len(&self) -> usize {
        self.terms.len()
    }
}

/// Cosine similarity between two l2-normalized sparse rows (their dot
/// product). Either row empty yields 0.
pub fn cosine_sparse(a: &SparseVec, b: &SparseVec) -> f32 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}
