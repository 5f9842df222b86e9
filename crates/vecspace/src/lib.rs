//! Vector space over the gift catalog.
//!
//! Combines two views of the same corpus: a sparse TF-IDF matrix for exact
//! lexical overlap and optional dense word embeddings for semantic
//! similarity. Both are built in one pass by [`VectorSpaceBuilder`] and the
//! result is a read-only [`VectorIndex`] shared across queries.

pub mod corpus;
pub mod embed;
pub mod tfidf;
pub mod train;

pub use corpus::{enrich, NormalizedItem};
pub use embed::{cosine_dense, weighted_embedding, EmbeddingModel, WordVectors};
pub use tfidf::{cosine_sparse, SparseVec, TfidfModel};
pub use train::{train_word_vectors, EmbeddingTrainConfig};

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum VectorError {
    /// No items survived ingestion; there is nothing to index.
    #[error("cannot build a vector space over an empty catalog")]
    EmptyCorpus,
}

/// Build-time knobs for the vector space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorConfig {
    /// Run the morphology noun pass over catalog text when a backend is
    /// attached to the tokenizer.
    pub use_morphology: bool,
    /// Train skip-gram embeddings over the catalog. Off by default; the
    /// engine runs fine in lexical-only mode.
    pub train_embeddings: bool,
    pub embedding: EmbeddingTrainConfig,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            use_morphology: false,
            train_embeddings: false,
            embedding: EmbeddingTrainConfig::default(),
        }
    }
}

impl VectorConfig {
    pub fn with_morphology(mut self, enabled: bool) -> Self {
        self.use_morphology = enabled;
        self
    }

    pub fn with_embeddings(mut self, enabled: bool) -> Self {
        self.train_embeddings = enabled;
        self
    }

    pub fn with_embedding_config(mut self, embedding: EmbeddingTrainConfig) -> Self {
        self.embedding = embedding;
        self
    }
}

/// Immutable vector-space snapshot: TF-IDF model, one sparse row and one
/// dense embedding per catalog item, and the embedding model itself.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    pub tfidf: TfidfModel,
    pub rows: Vec<SparseVec>,
    /// One row per item; `(n, 1)` zeros when the model is Absent.
    pub doc_embeddings: Array2<f32>,
    pub embedding: EmbeddingModel,
}

impl VectorIndex {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn doc_embedding(&self, idx: usize) -> ArrayView1<'_, f32> {
        self.doc_embeddings.row(idx)
    }
}

/// Builds a [`VectorIndex`] from enriched catalog items.
#[derive(Debug, Clone, Default)]
pub struct VectorSpaceBuilder {
    config: VectorConfig,
}

impl VectorSpaceBuilder {
    pub fn new(config: VectorConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, items: &[NormalizedItem]) -> Result<VectorIndex, VectorError> {
        if items.is_empty() {
            return Err(VectorError::EmptyCorpus);
        }

        let texts: Vec<&str> = items.iter().map(|i| i.text.as_str()).collect();
        let (tfidf, rows) = TfidfModel::fit(&texts);

        let embedding = if self.config.train_embeddings {
            let token_lists: Vec<Vec<String>> =
                items.iter().map(|i| i.tokens.clone()).collect();
            match train_word_vectors(&token_lists, &self.config.embedding) {
                Some(wv) => EmbeddingModel::Present(wv),
                None => EmbeddingModel::Absent,
            }
        } else {
            EmbeddingModel::Absent
        };

        let dim = embedding.dim();
        let mut doc_embeddings = Array2::<f32>::zeros((items.len(), dim));
        if embedding.is_present() {
            for (idx, row) in rows.iter().enumerate() {
                let vector = weighted_embedding(row, &tfidf, &embedding);
                doc_embeddings.row_mut(idx).assign(&vector);
            }
        }

        info!(
            items = items.len(),
            vocab = tfidf.vocab_len(),
            embeddings = embedding.is_present(),
            "vector space built"
        );
        Ok(VectorIndex {
            tfidf,
            rows,
            doc_embeddings,
            embedding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::RawProductRow;
    use textnorm::Tokenizer;

    fn enriched() -> Vec<NormalizedItem> {
        let rows = vec![
            RawProductRow {
                title: "스텐 텀블러 보온 보냉".into(),
                price: 25_000,
                popularity: 100,
                ..RawProductRow::default()
            },
            RawProductRow {
                title: "무드등 수면등 조명".into(),
                price: 28_000,
                popularity: 50,
                ..RawProductRow::default()
            },
        ];
        let items = catalog::load_catalog(&catalog::MemorySource::new(rows)).unwrap();
        enrich(items, &Tokenizer::new(Vec::<String>::new()), false)
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let builder = VectorSpaceBuilder::default();
        assert!(matches!(builder.build(&[]), Err(VectorError::EmptyCorpus)));
    }

    #[test]
    fn lexical_only_build_uses_sentinel_embeddings() {
        let index = VectorSpaceBuilder::default().build(&enriched()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(!index.embedding.is_present());
        assert_eq!(index.doc_embeddings.dim(), (2, 1));
        assert_eq!(
            cosine_dense(index.doc_embedding(0), index.doc_embedding(1)),
            0.0
        );
    }

    #[test]
    fn trained_build_produces_dense_rows() {
        let config = VectorConfig::default()
            .with_embeddings(true)
            .with_embedding_config(EmbeddingTrainConfig::default().with_dim(8).with_epochs(5));
        let index = VectorSpaceBuilder::new(config).build(&enriched()).unwrap();
        assert!(index.embedding.is_present());
        assert_eq!(index.doc_embeddings.ncols(), 8);
        // Each doc embeds its own tokens, so it has a nonzero vector.
        assert!(index.doc_embedding(0).iter().any(|&v| v != 0.0));
    }

    #[test]
    fn rows_match_transform_of_the_same_text() {
        let items = enriched();
        let index = VectorSpaceBuilder::default().build(&items).unwrap();
        let again = index.tfidf.transform(&items[0].text);
        assert_eq!(index.rows[0], again);
    }
}
