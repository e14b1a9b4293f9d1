//! Order repository for database operations.
//!
//! Orders are append-only: customers create them, the admin relabels their
//! status, nothing ever deletes them. `product_id` carries no foreign key —
//! a deleted product leaves its orders dangling on purpose.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use sugar_maple_core::{OrderId, OrderStatus, ProductId};

use super::RepositoryError;
use crate::models::order::Order;
use crate::models::product::Product;

/// Database row for an order.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    product_id: Uuid,
    customer_name: String,
    customer_email: String,
    quantity: i32,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

/// Database row for an order LEFT JOINed with its product. Product columns
/// are null when the product has been deleted.
#[derive(sqlx::FromRow)]
struct OrderProductRow {
    id: Uuid,
    product_id: Uuid,
    customer_name: String,
    customer_email: String,
    quantity: i32,
    total_price: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    p_id: Option<Uuid>,
    p_name: Option<String>,
    p_description: Option<String>,
    p_price: Option<sugar_maple_core::Price>,
    p_category: Option<String>,
    p_in_stock: Option<bool>,
    p_featured: Option<bool>,
    p_image_id: Option<Uuid>,
    p_created_at: Option<DateTime<Utc>>,
    p_updated_at: Option<DateTime<Utc>>,
}

fn order_from_parts(
    id: Uuid,
    product_id: Uuid,
    customer_name: String,
    customer_email: String,
    quantity: i32,
    total_price: Decimal,
    status: &str,
    created_at: DateTime<Utc>,
) -> Result<Order, RepositoryError> {
    let status: OrderStatus = status.parse().map_err(|e: String| {
        RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
    })?;

    Ok(Order {
        id: OrderId::new(id),
        product_id: ProductId::new(product_id),
        customer_name,
        customer_email,
        quantity,
        total_price,
        status,
        created_at,
    })
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        order_from_parts(
            row.id,
            row.product_id,
            row.customer_name,
            row.customer_email,
            row.quantity,
            row.total_price,
            &row.status,
            row.created_at,
        )
    }
}

impl OrderProductRow {
    fn into_pair(self) -> Result<(Order, Option<Product>), RepositoryError> {
        let product = match (
            self.p_id,
            self.p_name,
            self.p_description,
            self.p_price,
            self.p_category,
            self.p_in_stock,
            self.p_featured,
            self.p_created_at,
            self.p_updated_at,
        ) {
            (
                Some(id),
                Some(name),
                Some(description),
                Some(price),
                Some(category),
                Some(in_stock),
                Some(featured),
                Some(created_at),
                Some(updated_at),
            ) => Some(Product {
                id: ProductId::new(id),
                name,
                description,
                price,
                category,
                in_stock,
                featured,
                image_id: self.p_image_id.map(sugar_maple_core::MediaId::new),
                created_at,
                updated_at,
            }),
            _ => None,
        };

        let order = order_from_parts(
            self.id,
            self.product_id,
            self.customer_name,
            self.customer_email,
            self.quantity,
            self.total_price,
            &self.status,
            self.created_at,
        )?;

        Ok((order, product))
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new order with its precomputed snapshot total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        customer_name: &str,
        customer_email: &str,
        quantity: i32,
        total_price: Decimal,
    ) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(
            "INSERT INTO store.orders \
             (product_id, customer_name, customer_email, quantity, total_price, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, product_id, customer_name, customer_email, quantity, total_price, \
                       status, created_at",
        )
        .bind(product_id.as_uuid())
        .bind(customer_name)
        .bind(customer_email)
        .bind(quantity)
        .bind(total_price)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// All orders joined with the current state of their product.
    ///
    /// Ordering follows the status index descending, then newest first —
    /// the same shape a by-status index walked in reverse produces.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is invalid.
    pub async fn list_with_products(
        &self,
    ) -> Result<Vec<(Order, Option<Product>)>, RepositoryError> {
        let rows: Vec<OrderProductRow> = sqlx::query_as(
            "SELECT o.id, o.product_id, o.customer_name, o.customer_email, o.quantity, \
                    o.total_price, o.status, o.created_at, \
                    p.id AS p_id, p.name AS p_name, p.description AS p_description, \
                    p.price AS p_price, p.category AS p_category, p.in_stock AS p_in_stock, \
                    p.featured AS p_featured, p.image_id AS p_image_id, \
                    p.created_at AS p_created_at, p.updated_at AS p_updated_at \
             FROM store.orders o \
             LEFT JOIN store.products p ON p.id = o.product_id \
             ORDER BY o.status DESC, o.created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderProductRow::into_pair).collect()
    }

    /// Overwrite an order's status.
    ///
    /// Any status is accepted regardless of the current one; the
    /// progression is advisory, not enforced.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE store.orders SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
