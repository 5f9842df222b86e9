//! Korean-aware text normalization and tokenization.
//!
//! [`normalize`] produces the canonical lowercase form all downstream
//! components (TF-IDF, slot extraction, forbidden matching) operate on.
//! [`Tokenizer`] splits normalized text into meaningful terms: stopwords and
//! digit-bearing tokens are dropped and grammatical suffixes (조사/어미) are
//! stripped so that 선물로 and 선물 land on the same term.
//!
//! A morphological analyzer can be plugged in through the [`Morphology`]
//! trait as a soft optimization; the rule-based pass always runs and is the
//! guaranteed fallback, so queries are never left untokenized.

mod suffix;

pub use suffix::strip_korean_suffix;

use std::sync::Arc;

use hashbrown::HashSet;
use unicode_normalization::UnicodeNormalization;

/// Returns true for characters kept by [`normalize`].
#[inline]
fn is_meaningful(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || is_hangul_syllable(ch)
}

/// Hangul syllable block (가..힣).
#[inline]
pub fn is_hangul_syllable(ch: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&ch)
}

/// True if the token consists entirely of Hangul syllables.
pub fn is_hangul_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(is_hangul_syllable)
}

/// True if the token contains any ASCII digit.
pub fn contains_digit(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

/// Canonical normalization: NFKC, lowercase, everything outside
/// {digit, ASCII letter, Hangul syllable} becomes a delimiter, runs of
/// delimiters collapse to a single space.
///
/// Never fails; an input with no meaningful characters yields `""`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.nfkc() {
        // Lowercasing can expand a single character into multiple.
        for lower in ch.to_lowercase() {
            if is_meaningful(lower) {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(lower);
            } else {
                pending_space = true;
            }
        }
    }
    out
}

/// Optional morphological analyzer hook.
///
/// Implementations extract noun-like tokens from already-normalized text.
/// Failure is expressed as an empty result; the tokenizer treats the
/// analyzer as best-effort and always runs the rule-based pass as well.
pub trait Morphology: Send + Sync {
    fn nouns(&self, text: &str) -> Vec<String>;
}

/// Stopword-aware tokenizer over [`normalize`]d text.
#[derive(Clone)]
pub struct Tokenizer {
    stopwords: HashSet<String>,
    morphology: Option<Arc<dyn Morphology>>,
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer")
            .field("stopwords", &self.stopwords.len())
            .field("morphology", &self.morphology.is_some())
            .finish()
    }
}

impl Tokenizer {
    /// Build a tokenizer from a stopword list. No morphology by default.
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            morphology: None,
        }
    }

    /// Attach a morphological analyzer.
    pub fn with_morphology(mut self, morphology: Arc<dyn Morphology>) -> Self {
        self.morphology = Some(morphology);
        self
    }

    fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Tokenize free text into meaningful terms, deduplicated preserving
    /// first occurrence.
    ///
    /// When `use_morphology` is set and an analyzer is attached, its
    /// noun-like tokens come first; the rule-based whitespace pass with
    /// suffix stripping then supplements them. Tokens containing digits and
    /// stopwords are dropped in both passes.
    pub fn tokenize(&self, text: &str, use_morphology: bool) -> Vec<String> {
        let norm = normalize(text);
        let mut out: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let mut push_unique = |token: &str, out: &mut Vec<String>, seen: &mut HashSet<String>| {
            if !seen.contains(token) {
                seen.insert(token.to_string());
                out.push(token.to_string());
            }
        };

        if use_morphology {
            if let Some(morphology) = &self.morphology {
                for noun in morphology.nouns(&norm) {
                    let n = normalize(&noun);
                    if n.is_empty() || self.is_stopword(&n) || contains_digit(&n) {
                        continue;
                    }
                    push_unique(&n, &mut out, &mut seen);
                }
            }
        }

        for token in norm.split_whitespace() {
            if self.is_stopword(token) || contains_digit(token) {
                continue;
            }
            let core = strip_korean_suffix(token);
            if core.is_empty() || self.is_stopword(core) {
                continue;
            }
            push_unique(core, &mut out, &mut seen);
        }

        out
    }
}
