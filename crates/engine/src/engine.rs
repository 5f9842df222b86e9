use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use catalog::CatalogSource;
use lexicon::Lexicon;
use textnorm::{Morphology, Tokenizer};
use vecspace::VectorConfig;

use crate::dedupe::dedupe_products;
use crate::env::{Environment, EnvironmentCache};
use crate::error::EngineError;
use crate::expand::expand_keywords;
use crate::mmr::{diversify, DEFAULT_LAMBDA};
use crate::reason::{compose_reason, summarize_guards};
use crate::score::{score_items, ScoreWeights, ScoredItem};
use crate::slots::{BudgetConfig, QuerySlots, SlotExtractor};


/// Fallback keyword count when slot extraction finds no core keywords.
const FALLBACK_KEYWORDS: usize = 4;

/// Engine-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Run the morphology noun pass over query text when a backend is
    /// attached. Queries are short, so this is on by default; catalog-side
    /// morphology is controlled separately via `vector`.
    pub query_morphology: bool,
    pub budget: BudgetConfig,
    pub weights: ScoreWeights,
    pub vector: VectorConfig,
    /// MMR relevance/redundancy trade-off in [0, 1].
    pub mmr_lambda: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            query_morphology: true,
            budget: BudgetConfig::default(),
            weights: ScoreWeights::default(),
            vector: VectorConfig::default(),
            mmr_lambda: DEFAULT_LAMBDA,
        }
    }
}

impl EngineConfig {
    pub fn with_vector(mut self, vector: VectorConfig) -> Self {
        self.vector = vector;
        self
    }

    pub fn with_budget(mut self, budget: BudgetConfig) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_mmr_lambda(mut self, lambda: f32) -> Self {
        self.mmr_lambda = lambda;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.mmr_lambda) {
            return Err(EngineError::InvalidConfig(
                "mmr_lambda must be between 0.0 and 1.0".into(),
            ));
        }
        let w = &self.weights;
        for (name, value) in [
            ("semantic", w.semantic),
            ("lexical", w.lexical),
            ("budget", w.budget),
            ("context", w.context),
            ("popularity", w.popularity),
            ("soft_budget_penalty", w.soft_budget_penalty),
        ] {
            if value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "weight {name} must be >= 0.0"
                )));
            }
        }
        Ok(())
    }
}

/// One recommendation response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    /// Selected items in MMR order, each with a composed reason.
    pub items: Vec<ScoredItem>,
    pub slots: QuerySlots,
    /// The top-K actually applied (requested value floored at 1).
    pub applied_top_k: usize,
}

/// The recommendation engine: slot extraction, keyword expansion, scoring,
/// deduplication, MMR diversification, and reason composition over a shared
/// catalog environment.
pub struct Engine {
    lexicon: Arc<Lexicon>,
    tokenizer: Arc<Tokenizer>,
    extractor: SlotExtractor,
    cache: Arc<EnvironmentCache>,
    config: EngineConfig,
    source: Arc<dyn CatalogSource>,
}

impl Engine {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        lexicon: Lexicon,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let lexicon = Arc::new(lexicon);
        let tokenizer = Arc::new(Tokenizer::new(lexicon.stopwords.clone()));
        let extractor = SlotExtractor::new(Arc::clone(&lexicon), config.budget.clone());
        let cache = Arc::new(EnvironmentCache::new(
            Arc::clone(&source),
            Arc::clone(&tokenizer),
            config.vector.clone(),
        ));
        Ok(Self {
            lexicon,
            tokenizer,
            extractor,
            cache,
            config,
            source,
        })
    }

    /// Attach a morphological analyzer. Must be called before the first
    /// query or warm-up, since the environment tokenizes catalog text with
    /// the tokenizer it was created with.
    pub fn with_morphology(mut self, morphology: Arc<dyn Morphology>) -> Self {
        let tokenizer = Arc::new(
            Tokenizer::new(self.lexicon.stopwords.clone()).with_morphology(morphology),
        );
        self.cache = Arc::new(EnvironmentCache::new(
            Arc::clone(&self.source),
            Arc::clone(&tokenizer),
            self.config.vector.clone(),
        ));
        self.tokenizer = tokenizer;
        self
    }

    /// Start the one-shot background environment build.
    pub fn warm_up(&self) {
        self.cache.warm_up();
    }

    /// Rebuild the environment from the source, replacing the snapshot.
    pub fn force_reload(&self) -> Result<Arc<Environment>, EngineError> {
        self.cache.ensure(true)
    }

    pub fn is_ready(&self) -> bool {
        self.cache.is_ready()
    }

    /// Score and rank a query against the catalog.
    ///
    /// Per-query problems never fail: unparseable queries yield empty slots
    /// and exhausted candidate sets yield an empty item list. Only a failed
    /// environment build surfaces as an error.
    pub fn recommend(
        &self,
        query: &str,
        top_k: usize,
        hard_budget: bool,
    ) -> Result<Recommendation, EngineError> {
        let applied_top_k = top_k.max(1);
        let env = self.cache.ensure(false)?;

        let mut slots = self
            .extractor
            .extract(query, &self.tokenizer, self.config.query_morphology);
        if slots.core_keywords.is_empty() {
            slots.core_keywords = self
                .tokenizer
                .tokenize(query, self.config.query_morphology)
                .into_iter()
                .take(FALLBACK_KEYWORDS)
                .collect();
        }
        debug!(core = ?slots.core_keywords, forbidden = ?slots.forbidden, "slots extracted");

        let query_terms = expand_keywords(
            &slots.core_keywords,
            &env.index.embedding,
            &self.lexicon,
            &slots.forbidden,
        );
        debug!(terms = query_terms.len(), "keywords expanded");

        let scored = score_items(
            &query_terms,
            query,
            &env.items,
            &env.index,
            &self.lexicon,
            &slots,
            &self.config.weights,
            hard_budget,
            &self.tokenizer,
        );
        debug!(candidates = scored.len(), "scoring complete");

        let deduped = dedupe_products(scored);
        let mut selected = diversify(
            deduped,
            &env.index.doc_embeddings,
            self.config.mmr_lambda,
            applied_top_k,
        );
        for item in &mut selected {
            item.reason =
                compose_reason(item, &env.items[item.doc_index], &slots, &self.lexicon);
        }

        let guards = summarize_guards(&selected, &env.items, &slots, &self.lexicon);
        debug!(
            selected = selected.len(),
            forbidden_hits = guards.forbidden_hits,
            budget_outside_ratio = guards.budget_outside_ratio(),
            "query complete"
        );

        Ok(Recommendation {
            items: selected,
            slots,
            applied_top_k,
        })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("ready", &self.is_ready())
            .field("config", &self.config)
            .finish()
    }
}
