use catalog::CatalogItem;
use hashbrown::HashSet;
use textnorm::{normalize, Tokenizer};

/// A catalog row enriched with its normalized text, meaningful tokens, and
/// min-max-scaled popularity. 1:1 with [`CatalogItem`], immutable.
#[derive(Debug, Clone)]
pub struct NormalizedItem {
    pub item: CatalogItem,
    /// Normalized concatenation of title + tags + category path.
    pub text: String,
    /// Meaningful tokens, deduplicated preserving first occurrence.
    pub tokens: Vec<String>,
    /// Same tokens as a set, for keyword-containment checks at query time.
    pub token_set: HashSet<String>,
    /// Popularity scaled to [0, 1] across the snapshot; 0.5 when every item
    /// shares one popularity value.
    pub popularity_norm: f32,
}

fn item_text(item: &CatalogItem) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(1 + item.tags.len() + item.category_path.len());
    parts.push(item.title.as_str());
    parts.extend(item.tags.iter().map(String::as_str));
    parts.extend(item.category_path.iter().map(String::as_str));
    normalize(&parts.join(" "))
}

/// Enrich a loaded catalog into normalized items.
///
/// `use_morphology` controls whether the tokenizer's noun pass runs for
/// catalog text; the production default is off since the rule-based pass is
/// much cheaper over thousands of rows.
pub fn enrich(
    items: Vec<CatalogItem>,
    tokenizer: &Tokenizer,
    use_morphology: bool,
) -> Vec<NormalizedItem> {
    let pop_min = items.iter().map(|i| i.popularity).min().unwrap_or(0);
    let pop_max = items.iter().map(|i| i.popularity).max().unwrap_or(0);
    let pop_span = pop_max.saturating_sub(pop_min);

    items
        .into_iter()
        .map(|item| {
            let text = item_text(&item);
            let tokens = tokenizer.tokenize(&text, use_morphology);
            let token_set: HashSet<String> = tokens.iter().cloned().collect();
            let popularity_norm = if pop_span == 0 {
                0.5
            } else {
                (item.popularity - pop_min) as f32 / pop_span as f32
            };
            NormalizedItem {
                item,
                text,
                tokens,
                token_set,
                popularity_norm,
            }
        })
        .collect()
}
