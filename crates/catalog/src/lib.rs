//! Catalog loading for the giftrec engine.
//!
//! Turns raw probe rows (crawled listing pages, JSONL part files, or
//! in-memory fixtures) into the canonical [`CatalogItem`] schema:
//! monotonically increasing row ids, cleaned prices/ratings/popularity,
//! split tags, and the page category path attached to every product.
//!
//! A catalog snapshot is immutable after load. An empty or missing source
//! is a hard error — downstream index builds must never run over nothing.

mod error;
mod source;
mod types;

pub use error::CatalogError;
pub use source::{CatalogSource, JsonlDirSource, MemorySource};
pub use types::{
    parse_popularity, parse_price, parse_rating, split_tags, CatalogItem, ProbePage, ProbeProduct,
    RawProductRow,
};

use tracing::info;

/// Load a catalog snapshot from a source, assigning row ids.
///
/// Row ids start at 1 and increase in source order. Rows without an
/// explicit logical `product_id` get their row id, so deduplication is a
/// no-op for them.
pub fn load_catalog(source: &dyn CatalogSource) -> Result<Vec<CatalogItem>, CatalogError> {
    let rows = source.load()?;
    if rows.is_empty() {
        return Err(CatalogError::Empty);
    }

    let items: Vec<CatalogItem> = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let id = (idx + 1) as u32;
            CatalogItem {
                id,
                product_id: row.product_id.unwrap_or(id as u64),
                title: row.title,
                price: row.price,
                rating: row.rating,
                popularity: row.popularity,
                tags: row.tags,
                category_path: row.category_path,
                image: row.image,
                link: row.link,
            }
        })
        .collect();

    info!(items = items.len(), source = %source.describe(), "catalog loaded");
    Ok(items)
}
