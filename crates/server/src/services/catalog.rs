//! Catalog service: product queries and admin-only mutations.
//!
//! Read operations are public and only ever surface in-stock products
//! (except category enumeration, which spans the whole catalog on purpose).
//! Mutations require a resolved admin identity, passed in explicitly by the
//! route layer — nothing here re-derives identity from ambient state.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{info, instrument};

use sugar_maple_core::ProductId;

use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::{NewProduct, Product, ProductPatch, ProductView};
use crate::models::session::CurrentAdmin;
use crate::search::SearchIndex;
use crate::services::media::MediaStore;

/// Maximum number of featured products returned.
const FEATURED_LIMIT: i64 = 6;

/// Maximum number of search hits considered.
const SEARCH_LIMIT: usize = 50;

/// Filters for a catalog listing.
///
/// When both are present, search wins and the category is ignored.
#[derive(Debug, Default, Clone)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    search: &'a SearchIndex,
    media: &'a MediaStore,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, search: &'a SearchIndex, media: &'a MediaStore) -> Self {
        Self {
            products: ProductRepository::new(pool),
            search,
            media,
        }
    }

    /// List in-stock products.
    ///
    /// Search text takes precedence over the category filter: a search is
    /// relevance-ranked against the search index and the category argument
    /// is ignored entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the search index or database query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<ProductView>> {
        let search_term = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let products = if let Some(term) = search_term {
            let hits = self.search.search(term, SEARCH_LIMIT)?;
            let mut by_id: HashMap<ProductId, Product> = self
                .products
                .get_many_in_stock(&hits)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

            // Preserve relevance order from the index
            hits.iter().filter_map(|id| by_id.remove(id)).collect()
        } else if let Some(category) = filter.category.as_deref() {
            self.products.list_in_stock(Some(category)).await?
        } else {
            self.products.list_in_stock(None).await?
        };

        Ok(products.into_iter().map(|p| self.view(p)).collect())
    }

    /// Up to 6 in-stock featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn featured(&self) -> Result<Vec<ProductView>> {
        let products = self.products.featured(FEATURED_LIMIT).await?;
        Ok(products.into_iter().map(|p| self.view(p)).collect())
    }

    /// Get a single product by ID. Absence is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductView>> {
        let product = self.products.get(id).await?;
        Ok(product.map(|p| self.view(p)))
    }

    /// Distinct categories across all products, including out-of-stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn categories(&self) -> Result<Vec<String>> {
        Ok(self.products.categories().await?)
    }

    /// Create a product. `in_stock` is forced true regardless of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[instrument(skip(self, admin, new), fields(admin = %admin.email))]
    pub async fn create(&self, admin: &CurrentAdmin, new: &NewProduct) -> Result<ProductView> {
        let product = self.products.create(new).await?;
        info!(product_id = %product.id, admin = %admin.email, "Product created");
        Ok(self.view(product))
    }

    /// Apply a partial patch to a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product doesn't exist.
    #[instrument(skip(self, admin, patch), fields(admin = %admin.email))]
    pub async fn update(
        &self,
        admin: &CurrentAdmin,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<()> {
        self.products.update(id, patch).await.map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("product not found".to_string())
            }
            other => other.into(),
        })?;

        info!(product_id = %id, admin = %admin.email, "Product updated");
        Ok(())
    }

    /// Delete a product.
    ///
    /// Orders referencing the product are left untouched; their snapshot
    /// totals and `product_id` survive the deletion.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product doesn't exist.
    #[instrument(skip(self, admin), fields(admin = %admin.email))]
    pub async fn delete(&self, admin: &CurrentAdmin, id: ProductId) -> Result<()> {
        self.products.delete(id).await.map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound("product not found".to_string())
            }
            other => other.into(),
        })?;

        info!(product_id = %id, admin = %admin.email, "Product deleted");
        Ok(())
    }

    fn view(&self, product: Product) -> ProductView {
        let image_url = self.media.resolve(product.image_id);
        ProductView::new(product, image_url)
    }
}
