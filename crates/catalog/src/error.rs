use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a catalog snapshot.
///
/// A missing or empty source is fatal to the index build: the engine must
/// never silently serve an empty catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog source not found: {0}")]
    MissingSource(PathBuf),
    #[error("catalog source yielded no items")]
    Empty,
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSONL record at {path}:{line}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
