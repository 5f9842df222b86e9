//! Shared, read-mostly recommendation environment.
//!
//! The catalog snapshot and vector index are built once and served to every
//! query through an `Arc`. Queries on the fast path take a read lock and
//! clone the handle; only a (re)build holds the build mutex. A background
//! warm-up can be kicked off once at startup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{error, info};

use catalog::CatalogSource;
use textnorm::Tokenizer;
use vecspace::{enrich, NormalizedItem, VectorConfig, VectorIndex, VectorSpaceBuilder};

use crate::error::EngineError;

/// One immutable catalog snapshot with its vector index.
#[derive(Debug)]
pub struct Environment {
    pub items: Vec<NormalizedItem>,
    pub index: VectorIndex,
}

/// Cache around [`Environment`] with double-checked build locking.
pub struct EnvironmentCache {
    current: RwLock<Option<Arc<Environment>>>,
    build_lock: Mutex<()>,
    warm_started: AtomicBool,
    source: Arc<dyn CatalogSource>,
    tokenizer: Arc<Tokenizer>,
    vector: VectorConfig,
}

impl EnvironmentCache {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        tokenizer: Arc<Tokenizer>,
        vector: VectorConfig,
    ) -> Self {
        Self {
            current: RwLock::new(None),
            build_lock: Mutex::new(()),
            warm_started: AtomicBool::new(false),
            source,
            tokenizer,
            vector,
        }
    }

    /// Whether an environment has been published.
    pub fn is_ready(&self) -> bool {
        self.current
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Return the shared environment, building it on first use.
    ///
    /// Fast path: a read lock and an `Arc` clone. Slow path: the build
    /// mutex, a re-check, then load → enrich → vector-space build. A query
    /// never observes a partially built environment: the snapshot is
    /// published atomically after the build completes.
    pub fn ensure(&self, force_reload: bool) -> Result<Arc<Environment>, EngineError> {
        if !force_reload {
            if let Ok(guard) = self.current.read() {
                if let Some(env) = guard.as_ref() {
                    return Ok(Arc::clone(env));
                }
            }
        }

        let _build = self
            .build_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !force_reload {
            if let Ok(guard) = self.current.read() {
                if let Some(env) = guard.as_ref() {
                    return Ok(Arc::clone(env));
                }
            }
        }

        info!(source = %self.source.describe(), "building recommendation environment");
        let loaded = catalog::load_catalog(self.source.as_ref())?;
        let items = enrich(loaded, &self.tokenizer, self.vector.use_morphology);
        let index = VectorSpaceBuilder::new(self.vector.clone()).build(&items)?;
        let env = Arc::new(Environment { items, index });

        if let Ok(mut guard) = self.current.write() {
            *guard = Some(Arc::clone(&env));
        }
        info!(items = env.items.len(), "environment ready");
        Ok(env)
    }

    /// Kick off a one-shot background build.
    ///
    /// The atomic flag makes repeated calls no-ops, including while a
    /// warm-up is still in flight. Runs on the current tokio runtime when
    /// one exists, otherwise on a plain thread.
    pub fn warm_up(self: &Arc<Self>) {
        if self.warm_started.swap(true, Ordering::SeqCst) {
            return;
        }
        let cache = Arc::clone(self);
        let warm = move || {
            if let Err(err) = cache.ensure(false) {
                error!(%err, "environment warm-up failed");
            }
        };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn_blocking(warm);
        } else {
            std::thread::spawn(warm);
        }
    }
}

impl std::fmt::Debug for EnvironmentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentCache")
            .field("ready", &self.is_ready())
            .field("warm_started", &self.warm_started.load(Ordering::SeqCst))
            .field("source", &self.source.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogError, MemorySource, RawProductRow};

    fn rows() -> Vec<RawProductRow> {
        vec![
            RawProductRow {
                title: "스텐 텀블러".into(),
                price: 25_000,
                popularity: 100,
                ..RawProductRow::default()
            },
            RawProductRow {
                title: "무드등".into(),
                price: 30_000,
                popularity: 50,
                ..RawProductRow::default()
            },
        ]
    }

    fn cache(rows: Vec<RawProductRow>) -> Arc<EnvironmentCache> {
        Arc::new(EnvironmentCache::new(
            Arc::new(MemorySource::new(rows)),
            Arc::new(Tokenizer::new(Vec::<String>::new())),
            VectorConfig::default(),
        ))
    }

    #[test]
    fn ensure_builds_once_and_shares_the_snapshot() {
        let cache = cache(rows());
        assert!(!cache.is_ready());
        let first = cache.ensure(false).unwrap();
        assert!(cache.is_ready());
        let second = cache.ensure(false).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.items.len(), 2);
    }

    #[test]
    fn force_reload_publishes_a_fresh_snapshot() {
        let cache = cache(rows());
        let first = cache.ensure(false).unwrap();
        let reloaded = cache.ensure(true).unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        // Later callers see the new snapshot.
        let third = cache.ensure(false).unwrap();
        assert!(Arc::ptr_eq(&reloaded, &third));
    }

    #[test]
    fn empty_catalog_is_a_build_error() {
        let cache = cache(vec![]);
        let err = cache.ensure(false).unwrap_err();
        assert!(matches!(err, EngineError::Catalog(CatalogError::Empty)));
        assert!(!cache.is_ready());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn warm_up_is_idempotent() {
        let cache = cache(rows());
        cache.warm_up();
        cache.warm_up();
        // The flag flips on the first call regardless of build completion.
        assert!(cache.warm_started.load(Ordering::SeqCst));
        // A direct ensure converges on the same environment either way.
        let env = cache.ensure(false).unwrap();
        assert_eq!(env.items.len(), 2);
    }
}
