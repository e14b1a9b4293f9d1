//! Product repository for database operations.
//!
//! Customer-facing reads only ever see in-stock rows; the one deliberate
//! exception is [`ProductRepository::categories`], which spans the whole
//! catalog so the category selector stays populated while items are
//! temporarily out of stock.

use sqlx::PgPool;
use uuid::Uuid;

use sugar_maple_core::ProductId;

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: sugar_maple_core::Price,
    category: String,
    in_stock: bool,
    featured: bool,
    image_id: Option<Uuid>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            in_stock: row.in_stock,
            featured: row.featured,
            image_id: row.image_id.map(sugar_maple_core::MediaId::new),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, in_stock, featured, \
                               image_id, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List in-stock products, optionally restricted to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_stock(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = match category {
            Some(category) => {
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM store.products \
                     WHERE in_stock AND category = $1 \
                     ORDER BY created_at"
                ))
                .bind(category)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM store.products \
                     WHERE in_stock \
                     ORDER BY created_at"
                ))
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Fetch the in-stock products among `ids`.
    ///
    /// Result order is unspecified; callers re-order by their own criteria
    /// (the catalog service preserves search relevance order).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many_in_stock(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let uuids: Vec<Uuid> = ids.iter().map(ProductId::as_uuid).collect();

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products \
             WHERE in_stock AND id = ANY($1)"
        ))
        .bind(uuids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Up to `limit` in-stock products flagged as featured.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn featured(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products \
             WHERE in_stock AND featured \
             ORDER BY created_at \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by ID. Absence is a valid result, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM store.products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Distinct category values across *all* products, including
    /// out-of-stock ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar(
            "SELECT DISTINCT category FROM store.products ORDER BY category",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Create a product. `in_stock` is forced true regardless of input.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO store.products \
             (name, description, price, category, in_stock, featured, image_id) \
             VALUES ($1, $2, $3, $4, TRUE, $5, $6) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.category)
        .bind(new.featured)
        .bind(new.image_id.map(|id| id.as_uuid()))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial patch. Fields absent from the patch are unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist —
    /// patching a missing row is surfaced, never silently ignored.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE store.products SET \
                 name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 category = COALESCE($5, category), \
                 image_id = COALESCE($6, image_id), \
                 in_stock = COALESCE($7, in_stock), \
                 featured = COALESCE($8, featured), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.category.as_deref())
        .bind(patch.image_id.map(|id| id.as_uuid()))
        .bind(patch.in_stock)
        .bind(patch.featured)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product.
    ///
    /// Never cascades to orders: rows referencing the deleted id keep their
    /// snapshot totals and now-dangling `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM store.products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// All products as (id, name, `in_stock`) triples for the search indexer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn all_for_index(
        &self,
    ) -> Result<Vec<(ProductId, String, bool)>, RepositoryError> {
        let rows: Vec<(Uuid, String, bool)> =
            sqlx::query_as("SELECT id, name, in_stock FROM store.products")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, in_stock)| (ProductId::new(id), name, in_stock))
            .collect())
    }
}
