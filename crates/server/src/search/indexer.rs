//! Search index builder.
//!
//! Rebuilds the in-memory index from the catalog in a background task: once
//! at startup, and again after every catalog mutation. The whole catalog is
//! small enough that a full rebuild is cheaper than bookkeeping incremental
//! updates.

use sqlx::PgPool;
use tracing::{error, info};

use crate::db::products::ProductRepository;

use super::{IndexedProduct, SearchIndex};

/// Spawn a background task to (re)build the search index from the catalog.
///
/// Until the first build completes, `SearchIndex::search()` returns empty
/// results.
pub fn spawn_rebuild(search: SearchIndex, pool: PgPool) {
    tokio::spawn(async move {
        let products = match ProductRepository::new(&pool).all_for_index().await {
            Ok(rows) => rows
                .into_iter()
                .map(|(id, name, in_stock)| IndexedProduct { id, name, in_stock })
                .collect::<Vec<_>>(),
            Err(e) => {
                error!(error = %e, "Failed to load products for search index");
                return;
            }
        };

        let count = products.len();
        match search.replace(&products) {
            Ok(()) => info!(count, "Search index rebuilt"),
            Err(e) => error!(error = %e, "Failed to build search index"),
        }
    });
}
