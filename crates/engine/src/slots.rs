//! Query slot extraction: budget range, occasion, relation, forbidden
//! categories, and core keywords.

use hashbrown::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use lexicon::{match_slot, Lexicon};
use textnorm::{contains_digit, normalize, Tokenizer};

/// Structured view of one free-text query. Ephemeral, per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuerySlots {
    /// Lower budget bound in KRW, when the query states one.
    pub budget_min: Option<u64>,
    /// Upper budget bound in KRW, when the query states one.
    pub budget_max: Option<u64>,
    pub occasion: Option<String>,
    pub relation: Option<String>,
    /// Canonical forbidden categories, in lexicon order.
    pub forbidden: Vec<String>,
    /// Deduplicated keywords, capped at [`CORE_KEYWORD_CAP`].
    pub core_keywords: Vec<String>,
}

/// Hard cap on extracted core keywords.
pub const CORE_KEYWORD_CAP: usize = 6;

/// Tunables for the budget parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetConfig {
    /// Bare numbers below this are assumed to mean ten-thousands of KRW
    /// ("3" in a gift query means 30,000 won, not 3 won). Locale-specific,
    /// hence a knob rather than a constant.
    pub bare_wan_threshold: u64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            bare_wan_threshold: 200,
        }
    }
}

impl BudgetConfig {
    pub fn with_bare_wan_threshold(mut self, threshold: u64) -> Self {
        self.bare_wan_threshold = threshold;
        self
    }
}

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    // Alternation order matters: 만원 before 만, 천원 before 천.
    Regex::new(r"(\d+)\s*(만원|만|천원|천)?").unwrap_or_else(|e| panic!("amount regex: {e}"))
});

static BAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*만\s*원?\s*대").unwrap_or_else(|e| panic!("band regex: {e}"))
});

const UPPER_WORDS: [&str; 6] = ["이하", "이내", "언더", "아래", "밑", "까지"];
const LOWER_WORDS: [&str; 5] = ["이상", "이후", "부터", "넘", "초과"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Auto,
    Lower,
    Upper,
}

/// The ±5-character context used to classify an amount as lower/upper bound.
fn window_around(text: &str, start: usize, end: usize) -> String {
    let before: String = {
        let mut chars: Vec<char> = text[..start].chars().rev().take(5).collect();
        chars.reverse();
        chars.into_iter().collect()
    };
    let after: String = text[end..].chars().take(5).collect();
    format!("{before}{}{after}", &text[start..end])
}

/// Parse a budget range out of normalized query text.
///
/// "N만원대" resolves first as a ±10% band around N·10,000. Otherwise every
/// `<number><optional 만/천 unit>` occurrence is classified by indicator
/// words in its surrounding window; the largest lower bound and the
/// tightest upper bound win. Unmarked amounts fall back to a sorted pair
/// (two or more) or a single upper bound.
pub fn parse_budget(text: &str, config: &BudgetConfig) -> (Option<u64>, Option<u64>) {
    if let Some(caps) = BAND_RE.captures(text) {
        if let Ok(n) = caps[1].parse::<u64>() {
            let center = (n * 10_000) as f64;
            return (
                Some((center * 0.9).round() as u64),
                Some((center * 1.1).round() as u64),
            );
        }
    }

    let mut values: Vec<(u64, Bound)> = Vec::new();
    for caps in AMOUNT_RE.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let Ok(num) = m.as_str().parse::<u64>() else {
            continue;
        };
        let unit = caps.get(2).map(|u| u.as_str()).unwrap_or("");
        let amount = if unit.starts_with('만') {
            num * 10_000
        } else if unit.starts_with('천') {
            num * 1_000
        } else if num < config.bare_wan_threshold {
            num * 10_000
        } else {
            num
        };

        let full = caps.get(0).map(|w| w.end()).unwrap_or(m.end());
        let window = window_around(text, m.start(), full);
        let mut bound = Bound::Auto;
        if UPPER_WORDS.iter().any(|w| window.contains(w)) {
            bound = Bound::Upper;
        }
        if LOWER_WORDS.iter().any(|w| window.contains(w)) {
            bound = Bound::Lower;
        }
        values.push((amount, bound));
    }

    let mut budget_min: Option<u64> = None;
    let mut budget_max: Option<u64> = None;
    for &(amount, bound) in &values {
        match bound {
            Bound::Lower => budget_min = Some(budget_min.unwrap_or(0).max(amount)),
            Bound::Upper => budget_max = Some(budget_max.map_or(amount, |b| b.min(amount))),
            Bound::Auto => {}
        }
    }

    if budget_min.is_none() && budget_max.is_none() && !values.is_empty() {
        let amounts: Vec<u64> = values.iter().map(|&(a, _)| a).collect();
        if amounts.len() >= 2 {
            let (a, b) = (amounts[0], amounts[1]);
            budget_min = Some(a.min(b));
            budget_max = Some(a.max(b));
        } else {
            budget_max = Some(amounts[0]);
        }
    }
    (budget_min, budget_max)
}

/// Turns free-text queries into [`QuerySlots`] using the lexicon's tables.
#[derive(Debug, Clone)]
pub struct SlotExtractor {
    lexicon: std::sync::Arc<Lexicon>,
    budget: BudgetConfig,
}

impl SlotExtractor {
    pub fn new(lexicon: std::sync::Arc<Lexicon>, budget: BudgetConfig) -> Self {
        Self { lexicon, budget }
    }

    /// Extract every slot. Never fails: a query with nothing recognizable
    /// yields a default-empty slot set.
    pub fn extract(&self, query: &str, tokenizer: &Tokenizer, use_morphology: bool) -> QuerySlots {
        let normalized = normalize(query);
        let (budget_min, budget_max) = parse_budget(&normalized, &self.budget);
        let occasion = match_slot(&self.lexicon.occasion_map, &normalized).map(str::to_string);
        let relation = match_slot(&self.lexicon.relation_map, &normalized).map(str::to_string);

        let mut forbidden = Vec::new();
        for (canonical, patterns) in &self.lexicon.forbidden_synonyms {
            if patterns.iter().any(|p| normalized.contains(p.as_str())) {
                forbidden.push(canonical.clone());
            }
        }

        let special: HashSet<&str> = self
            .lexicon
            .slot_pattern_tokens()
            .chain(self.lexicon.forbidden_pattern_tokens())
            .chain(self.lexicon.budget_unit_words.iter().map(String::as_str))
            .collect();

        let mut core = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for token in tokenizer.tokenize(query, use_morphology) {
            if special.contains(token.as_str()) || contains_digit(&token) {
                continue;
            }
            if seen.insert(token.clone()) {
                core.push(token);
            }
            if core.len() == CORE_KEYWORD_CAP {
                break;
            }
        }

        QuerySlots {
            budget_min,
            budget_max,
            occasion,
            relation,
            forbidden,
            core_keywords: core,
        }
    }
}
