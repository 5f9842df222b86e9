use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One immutable catalog row after loading.
///
/// `id` is assigned monotonically at load time and uniquely identifies the
/// row within one catalog snapshot. `product_id` is the *logical* product
/// identity: several rows (e.g. the same product crawled from different
/// listing pages) may share it, and the deduplicator collapses them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u32,
    pub product_id: u64,
    pub title: String,
    /// Price in KRW (minor currency unit).
    pub price: u64,
    /// Rating in [0, 5]; 0.0 when the source carried none.
    pub rating: f32,
    /// Raw popularity count (review count in the probe data).
    pub popularity: u64,
    pub tags: Vec<String>,
    pub category_path: Vec<String>,
    pub image: String,
    pub link: String,
}

/// Raw row as produced by a [`CatalogSource`](crate::CatalogSource), before
/// id assignment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawProductRow {
    /// Logical product identity; rows without one get their row id.
    #[serde(default)]
    pub product_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub popularity: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_path: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub link: String,
}

/// One crawled listing page in the probe JSONL format (`part_*.jsonl`).
#[derive(Debug, Clone, Deserialize)]
pub struct ProbePage {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub path: Vec<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub products: Vec<ProbeProduct>,
}

fn default_ok() -> bool {
    true
}

/// One product entry inside a [`ProbePage`]. Field types are loose on
/// purpose: the crawler emits prices as strings with thousands separators
/// and ratings as either numbers or strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeProduct {
    #[serde(default)]
    pub prod_name: String,
    #[serde(default)]
    pub price: JsonValue,
    #[serde(default)]
    pub rating_weighted: JsonValue,
    #[serde(default)]
    pub rating: JsonValue,
    #[serde(default)]
    pub review_count: JsonValue,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub image: String,
}

/// Strip every non-digit character and parse the rest as KRW.
pub fn parse_price(value: &JsonValue) -> u64 {
    let text = match value {
        JsonValue::Null => return 0,
        JsonValue::Number(n) => return n.as_u64().unwrap_or(0),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn parse_float(value: &JsonValue) -> Option<f32> {
    match value {
        JsonValue::Number(n) => n.as_f64().map(|f| f as f32),
        JsonValue::String(s) if !s.is_empty() => s.trim().parse().ok(),
        _ => None,
    }
}

/// Weighted rating first, plain rating as fallback, 0.0 when absent.
pub fn parse_rating(product: &ProbeProduct) -> f32 {
    parse_float(&product.rating_weighted)
        .or_else(|| parse_float(&product.rating))
        .unwrap_or(0.0)
}

/// Review count as the popularity signal, 0 when absent.
pub fn parse_popularity(product: &ProbeProduct) -> u64 {
    match &product.review_count {
        JsonValue::Number(n) => n.as_u64().unwrap_or(0),
        JsonValue::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Split a raw tag blob on newlines and slashes into trimmed tags.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(['\n', '/'])
        .flat_map(|part| part.split("\\n"))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

impl ProbePage {
    /// Expand this page into raw rows, carrying the page category path and
    /// link onto every product.
    pub fn into_rows(self) -> Vec<RawProductRow> {
        let categories: Vec<String> = self.path.into_iter().filter(|p| !p.is_empty()).collect();
        let link = self.link;
        self.products
            .into_iter()
            .map(|product| RawProductRow {
                product_id: None,
                title: product.prod_name.trim().to_string(),
                price: parse_price(&product.price),
                rating: parse_rating(&product),
                popularity: parse_popularity(&product),
                tags: split_tags(&product.tags),
                category_path: categories.clone(),
                image: product.image,
                link: link.clone(),
            })
            .collect()
    }
}
