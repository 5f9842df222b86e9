//! Reproducible skip-gram training with negative sampling.
//!
//! Small-corpus trainer for the catalog vocabulary: single-threaded,
//! seeded, fixed hyperparameters by default (vector width 100, context
//! window 5, minimum term frequency 1), so two builds over the same catalog
//! produce identical vectors. The production default skips training
//! entirely; see `VectorConfig::train_embeddings`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embed::WordVectors;

/// Hyperparameters for skip-gram training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingTrainConfig {
    /// Vector width.
    pub dim: usize,
    /// Context window radius.
    pub window: usize,
    /// Minimum term frequency for vocabulary membership.
    pub min_count: u64,
    /// RNG seed; same seed + same corpus → same vectors.
    pub seed: u64,
    /// Full passes over the corpus.
    pub epochs: usize,
    /// Negative samples per positive pair.
    pub negative: usize,
    /// Initial learning rate, decayed linearly per epoch.
    pub learning_rate: f32,
}

impl Default for EmbeddingTrainConfig {
    fn default() -> Self {
        Self {
            dim: 100,
            window: 5,
            min_count: 1,
            seed: 42,
            epochs: 50,
            negative: 5,
            learning_rate: 0.025,
        }
    }
}

impl EmbeddingTrainConfig {
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

struct Vocab {
    terms: Vec<String>,
    ids: fxhash::FxHashMap<String, usize>,
    counts: Vec<u64>,
}

fn build_vocab(corpus: &[Vec<String>], min_count: u64) -> Vocab {
    let mut counts: std::collections::BTreeMap<&str, u64> = std::collections::BTreeMap::new();
    for sentence in corpus {
        for token in sentence {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }
    // Frequency-descending, term-ascending for ties: deterministic ids.
    let mut entries: Vec<(&str, u64)> = counts
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let terms: Vec<String> = entries.iter().map(|(term, _)| term.to_string()).collect();
    let ids = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| (term.clone(), idx))
        .collect();
    let counts = entries.iter().map(|&(_, count)| count).collect();
    Vocab { terms, ids, counts }
}

/// Cumulative unigram^0.75 table for negative sampling.
fn negative_table(counts: &[u64]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(counts.len());
    let mut total = 0.0f64;
    for &count in counts {
        total += (count as f64).powf(0.75);
        cumulative.push(total);
    }
    cumulative
}

fn sample_negative(table: &[f64], rng: &mut fastrand::Rng) -> usize {
    let total = *table.last().unwrap_or(&0.0);
    let target = rng.f64() * total;
    table.partition_point(|&c| c <= target).min(table.len() - 1)
}

/// Train skip-gram word vectors over the catalog token sequences.
///
/// Returns `None` when the filtered vocabulary is empty (degenerate corpus)
/// so the caller can fall back to `EmbeddingModel::Absent`.
pub fn train_word_vectors(
    corpus: &[Vec<String>],
    cfg: &EmbeddingTrainConfig,
) -> Option<WordVectors> {
    let vocab = build_vocab(corpus, cfg.min_count);
    if vocab.terms.is_empty() {
        return None;
    }

    let dim = cfg.dim;
    let mut rng = fastrand::Rng::with_seed(cfg.seed);

    // word2vec-style init: input uniform in ±0.5/dim, output zeros.
    let mut input = Array2::<f32>::zeros((vocab.terms.len(), dim));
    for value in input.iter_mut() {
        *value = (rng.f32() - 0.5) / dim as f32;
    }
    let mut output = Array2::<f32>::zeros((vocab.terms.len(), dim));

    let table = negative_table(&vocab.counts);
    let sentences: Vec<Vec<usize>> = corpus
        .iter()
        .map(|sentence| {
            sentence
                .iter()
                .filter_map(|token| vocab.ids.get(token).copied())
                .collect()
        })
        .collect();

    for epoch in 0..cfg.epochs {
        let lr = (cfg.learning_rate * (1.0 - epoch as f32 / cfg.epochs as f32)).max(1e-4);
        for sentence in &sentences {
            for (center_pos, &center) in sentence.iter().enumerate() {
                let lo = center_pos.saturating_sub(cfg.window);
                let hi = (center_pos + cfg.window + 1).min(sentence.len());
                for context_pos in lo..hi {
                    if context_pos == center_pos {
                        continue;
                    }
                    let context = sentence[context_pos];
                    let mut grad_center = vec![0.0f32; dim];

                    // Positive pair plus `negative` sampled non-pairs.
                    for k in 0..=cfg.negative {
                        let (target, label) = if k == 0 {
                            (context, 1.0f32)
                        } else {
                            let neg = sample_negative(&table, &mut rng);
                            if neg == context {
                                continue;
                            }
                            (neg, 0.0f32)
                        };
                        let center_row = input.row(center);
                        let target_row = output.row(target);
                        let score = sigmoid(center_row.dot(&target_row));
                        let gradient = (label - score) * lr;
                        for d in 0..dim {
                            grad_center[d] += gradient * output[(target, d)];
                            output[(target, d)] += gradient * input[(center, d)];
                        }
                    }
                    for d in 0..dim {
                        input[(center, d)] += grad_center[d];
                    }
                }
            }
        }
    }

    debug!(
        vocab = vocab.terms.len(),
        dim,
        epochs = cfg.epochs,
        "skip-gram training complete"
    );
    Some(WordVectors::new(vocab.terms, input))
}
