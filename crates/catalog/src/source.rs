use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CatalogError;
use crate::types::{ProbePage, RawProductRow};

/// Anything that can produce raw catalog rows.
///
/// The engine does not care where rows come from; the probe JSONL directory
/// and the in-memory source below are the two shipped implementations.
pub trait CatalogSource: Send + Sync {
    fn load(&self) -> Result<Vec<RawProductRow>, CatalogError>;

    /// Human-readable description for logs and error context.
    fn describe(&self) -> String;
}

/// In-memory source, used by tests and by callers that fetch rows
/// themselves (object storage, database, fixtures).
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawProductRow>,
}

impl MemorySource {
    pub fn new(rows: Vec<RawProductRow>) -> Self {
        Self { rows }
    }
}

impl CatalogSource for MemorySource {
    fn load(&self) -> Result<Vec<RawProductRow>, CatalogError> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory({} rows)", self.rows.len())
    }
}

/// Directory of `part_*.jsonl` probe files, one crawled listing page per
/// line. Pages flagged `ok: false` and blank lines are skipped.
#[derive(Debug, Clone)]
pub struct JsonlDirSource {
    dir: PathBuf,
}

impl JsonlDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn part_files(&self) -> Result<Vec<PathBuf>, CatalogError> {
        if !self.dir.is_dir() {
            return Err(CatalogError::MissingSource(self.dir.clone()));
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|source| CatalogError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let mut parts: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_part_file(path))
            .collect();
        if parts.is_empty() {
            return Err(CatalogError::MissingSource(self.dir.clone()));
        }
        parts.sort();
        Ok(parts)
    }

    fn load_part(&self, path: &Path, rows: &mut Vec<RawProductRow>) -> Result<(), CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let page: ProbePage =
                serde_json::from_str(&line).map_err(|source| CatalogError::Parse {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })?;
            if !page.ok {
                continue;
            }
            rows.extend(page.into_rows());
        }
        Ok(())
    }
}

fn is_part_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with("part_") && name.ends_with(".jsonl"))
        .unwrap_or(false)
}

impl CatalogSource for JsonlDirSource {
    fn load(&self) -> Result<Vec<RawProductRow>, CatalogError> {
        let mut rows = Vec::new();
        for part in self.part_files()? {
            debug!(part = %part.display(), "reading catalog part");
            self.load_part(&part, &mut rows)?;
        }
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("jsonl({})", self.dir.display())
    }
}
