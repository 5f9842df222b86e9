//! Dense word vectors and TF-IDF-weighted item embeddings.

use ndarray::{Array1, Array2, ArrayView1};

use crate::tfidf::{SparseVec, TfidfModel};

/// Learned word vectors: one fixed-width dense vector per vocabulary term.
#[derive(Debug, Clone)]
pub struct WordVectors {
    vocab: fxhash::FxHashMap<String, usize>,
    terms: Vec<String>,
    vectors: Array2<f32>,
}

impl WordVectors {
    /// Build from parallel term/vector data. `vectors` rows correspond to
    /// `terms` entries.
    pub fn new(terms: Vec<String>, vectors: Array2<f32>) -> Self {
        debug_assert_eq!(terms.len(), vectors.nrows());
        let vocab = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        Self {
            vocab,
            terms,
            vectors,
        }
    }

    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    pub fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>> {
        self.vocab.get(token).map(|&idx| self.vectors.row(idx))
    }

    /// Nearest neighbors of a vocabulary token by cosine similarity,
    /// descending, excluding the token itself. Unknown token → empty.
    pub fn most_similar(&self, token: &str, topn: usize) -> Vec<(String, f32)> {
        let Some(&query_idx) = self.vocab.get(token) else {
            return Vec::new();
        };
        let query = self.vectors.row(query_idx);
        let mut scored: Vec<(usize, f32)> = (0..self.terms.len())
            .filter(|&idx| idx != query_idx)
            .map(|idx| (idx, cosine_dense(query, self.vectors.row(idx))))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(topn)
            .map(|(idx, sim)| (self.terms[idx].clone(), sim))
            .collect()
    }
}

/// The embedding model is either trained or deliberately absent.
///
/// Absent is a supported production mode, not an error: semantic similarity
/// degrades to zero and keyword expansion becomes a no-op. Both call sites
/// match on this exhaustively.
#[derive(Debug, Clone)]
pub enum EmbeddingModel {
    Present(WordVectors),
    Absent,
}

impl EmbeddingModel {
    pub fn is_present(&self) -> bool {
        matches!(self, EmbeddingModel::Present(_))
    }

    /// Embedding width; the degenerate zero-vector sentinel is 1-wide.
    pub fn dim(&self) -> usize {
        match self {
            EmbeddingModel::Present(wv) => wv.dim(),
            EmbeddingModel::Absent => 1,
        }
    }
}

/// TF-IDF-weighted mean of token embeddings for one sparse row.
///
/// Weights are the row's (already normalized) TF-IDF values; the sum of the
/// weights actually used divides the accumulated vector. Rows with no
/// embeddable terms — and the Absent model — yield a zero vector, whose
/// cosine against anything is 0.
pub fn weighted_embedding(
    row: &SparseVec,
    tfidf: &TfidfModel,
    model: &EmbeddingModel,
) -> Array1<f32> {
    let word_vectors = match model {
        EmbeddingModel::Present(wv) => wv,
        EmbeddingModel::Absent => return Array1::zeros(1),
    };

    let mut acc = Array1::<f32>::zeros(word_vectors.dim());
    let mut weight_sum = 0.0f32;
    for &(term_id, weight) in row {
        if let Some(vector) = word_vectors.get(tfidf.term(term_id)) {
            acc.scaled_add(weight, &vector);
            weight_sum += weight;
        }
    }
    if weight_sum > 0.0 {
        acc /= weight_sum;
    }
    acc
}

/// Cosine similarity between dense vectors; 0 when either norm is 0 or the
/// lengths differ (e.g. a sentinel zero vector against a trained one).
pub fn cosine_dense(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    a.dot(&b) / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_vectors() -> WordVectors {
        WordVectors::new(
            vec!["텀블러".into(), "머그".into(), "무드등".into()],
            array![[1.0, 0.0], [0.9, 0.1], [0.0, 1.0]],
        )
    }

    #[test]
    fn most_similar_orders_by_cosine_and_excludes_self() {
        let wv = toy_vectors();
        let neighbors = wv.most_similar("텀블러", 2);
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, "머그");
        assert!(neighbors[0].1 > neighbors[1].1);
        assert!(wv.most_similar("없는단어", 2).is_empty());
    }

    #[test]
    fn absent_model_yields_unit_width_zero_vector() {
        let (tfidf, rows) = TfidfModel::fit(&["텀블러 머그"]);
        let embedding = weighted_embedding(&rows[0], &tfidf, &EmbeddingModel::Absent);
        assert_eq!(embedding.len(), 1);
        assert_eq!(embedding[0], 0.0);
    }

    #[test]
    fn weighted_embedding_averages_by_used_weight() {
        let (tfidf, rows) = TfidfModel::fit(&["텀블러 무드등"]);
        let model = EmbeddingModel::Present(toy_vectors());
        let embedding = weighted_embedding(&rows[0], &tfidf, &model);
        assert_eq!(embedding.len(), 2);
        // Both terms carry equal tf-idf weight here, so the result is the
        // plain mean of their vectors.
        assert!((embedding[0] - 0.5).abs() < 1e-5);
        assert!((embedding[1] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn out_of_embedding_vocab_terms_are_skipped() {
        let (tfidf, rows) = TfidfModel::fit(&["텀블러 향수"]);
        let model = EmbeddingModel::Present(toy_vectors());
        let embedding = weighted_embedding(&rows[0], &tfidf, &model);
        // 향수 has no word vector; only 텀블러 contributes and the division
        // by used weight restores its unit direction.
        assert!((embedding[0] - 1.0).abs() < 1e-5);
        assert!(embedding[1].abs() < 1e-5);
    }

    #[test]
    fn cosine_dense_guards_zero_and_mismatched() {
        let a = array![0.0, 0.0];
        let b = array![1.0, 0.0];
        let c = array![0.0];
        assert_eq!(cosine_dense(a.view(), b.view()), 0.0);
        assert_eq!(cosine_dense(c.view(), b.view()), 0.0);
        assert!((cosine_dense(b.view(), b.view()) - 1.0).abs() < 1e-6);
    }
}
