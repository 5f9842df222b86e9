//! Workspace umbrella crate for the giftrec recommendation engine.
//!
//! Re-exports the layered crates so callers can depend on `giftrec` alone:
//! vocabulary tables (`lexicon`), Korean text normalization (`textnorm`),
//! catalog loading (`catalog`), the TF-IDF/embedding vector space
//! (`vecspace`), and the query engine (`engine`).

pub use catalog::{
    load_catalog, CatalogError, CatalogItem, CatalogSource, JsonlDirSource, MemorySource,
    RawProductRow,
};
pub use engine::{
    BudgetConfig, Engine, EngineConfig, EngineError, EnvironmentCache, GuardSummary, QuerySlots,
    Recommendation, ScoreWeights, ScoredItem, SlotExtractor,
};
pub use lexicon::Lexicon;
pub use textnorm::{normalize, Morphology, Tokenizer};
pub use vecspace::{
    EmbeddingModel, EmbeddingTrainConfig, NormalizedItem, TfidfModel, VectorConfig, VectorIndex,
    VectorSpaceBuilder, WordVectors,
};
