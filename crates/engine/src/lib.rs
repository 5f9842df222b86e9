//! # Gift Recommendation Engine (`engine`)
//!
//! ## Purpose
//!
//! `engine` sits on top of the catalog (`catalog`), text (`textnorm`), and
//! vector-space (`vecspace`) layers. It turns a free-text Korean gift query
//! into structured slots, expands keywords over the embedding space, scores
//! the whole catalog with a fused lexical/semantic/rule signal, collapses
//! duplicate products, diversifies the top-K with MMR, and attaches a
//! human-readable reason to every pick.
//!
//! ## Core Types
//!
//! - [`Engine`]: the production entry point; owns the shared environment
//!   cache and exposes [`Engine::recommend`].
//! - [`EngineConfig`]: fusion weights, budget parser knobs, MMR lambda, and
//!   vector-space build options.
//! - [`QuerySlots`]: budget range, occasion, relation, forbidden categories,
//!   core keywords.
//! - [`ScoredItem`]: one ranked candidate with its per-signal breakdown and
//!   composed reason.
//! - [`Recommendation`]: the full response (items + slots + applied top-K).
//! - [`EnvironmentCache`]: double-checked-locking cache around the catalog
//!   snapshot and its [`vecspace::VectorIndex`], with idempotent background
//!   warm-up.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use catalog::JsonlDirSource;
//! use lexicon::Lexicon;
//! use engine::{Engine, EngineConfig};
//!
//! let source = Arc::new(JsonlDirSource::new("data/probe"));
//! let engine = Engine::new(source, Lexicon::default(), EngineConfig::default())
//!     .expect("engine init");
//! engine.warm_up();
//!
//! let rec = engine
//!     .recommend("여사친 생일 3만 이하, 향 강한 건 싫어", 8, false)
//!     .expect("recommend");
//! for item in &rec.items {
//!     println!("{} {}원 score={:.3} {}", item.item.title, item.item.price, item.score, item.reason);
//! }
//! ```
//!
//! ## Degraded Modes
//!
//! Skipping embedding training (the production default) is not an error:
//! semantic similarity reads as zero and keyword expansion passes the core
//! keywords through. Empty queries and exhausted candidate sets yield empty,
//! well-formed results.

pub mod dedupe;
pub mod engine;
pub mod env;
pub mod error;
pub mod expand;
pub mod mmr;
pub mod reason;
pub mod score;
pub mod slots;

pub use crate::dedupe::dedupe_products;
pub use crate::engine::{Engine, EngineConfig, Recommendation};
pub use crate::env::{Environment, EnvironmentCache};
pub use crate::error::EngineError;
pub use crate::expand::expand_keywords;
pub use crate::mmr::{diversify, DEFAULT_LAMBDA};
pub use crate::reason::{compose_reason, summarize_guards, GuardSummary};
pub use crate::score::{
    compute_budget_fit, compute_context_score, score_items, ScoreWeights, ScoredItem,
};
pub use crate::slots::{parse_budget, BudgetConfig, QuerySlots, SlotExtractor};
