use catalog::CatalogError;
use thiserror::Error;
use vecspace::VectorError;

/// Errors surfaced by the engine. Per-query problems (empty query, no
/// surviving candidates) are absorbed into empty results and never appear
/// here; only environment construction and configuration can fail.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid engine configuration.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    /// Catalog source missing, unreadable, or empty.
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
    /// Vector space could not be built over the loaded catalog.
    #[error("vector space build failed: {0}")]
    Vector(#[from] VectorError),
}
