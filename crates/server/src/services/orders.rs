//! Order service: customer order intake and admin order management.
//!
//! Placing an order captures the product's price at that instant into an
//! immutable snapshot total. No inventory is reserved or decremented —
//! stock tracking is explicitly out of scope.

use sqlx::PgPool;
use tracing::{info, instrument};

use sugar_maple_core::{OrderId, OrderStatus};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::order::{Order, OrderWithProduct, PlaceOrder};
use crate::models::product::ProductView;
use crate::models::session::CurrentAdmin;
use crate::services::media::MediaStore;

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    products: ProductRepository<'a>,
    media: &'a MediaStore,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, media: &'a MediaStore) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            products: ProductRepository::new(pool),
            media,
        }
    }

    /// Place an order. Customer-facing; no identity required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the quantity is zero or absurd.
    /// Returns `AppError::NotFound` if the product doesn't exist at this
    /// instant.
    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    pub async fn place(&self, input: &PlaceOrder) -> Result<Order> {
        if input.quantity == 0 {
            return Err(AppError::BadRequest(
                "quantity must be at least 1".to_string(),
            ));
        }
        let quantity = i32::try_from(input.quantity)
            .map_err(|_| AppError::BadRequest("quantity too large".to_string()))?;

        let product = self
            .products
            .get(input.product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))?;

        // Snapshot: price × quantity, fixed here forever
        let total_price = product.price.total(input.quantity);

        let order = self
            .orders
            .create(
                product.id,
                &input.customer_name,
                &input.customer_email,
                quantity,
                total_price,
            )
            .await?;

        info!(order_id = %order.id, total = %order.total_price, "Order placed");
        Ok(order)
    }

    /// All orders with their (possibly deleted) product. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[instrument(skip(self, admin), fields(admin = %admin.email))]
    pub async fn list(&self, admin: &CurrentAdmin) -> Result<Vec<OrderWithProduct>> {
        let rows = self.orders.list_with_products().await?;

        Ok(rows
            .into_iter()
            .map(|(order, product)| OrderWithProduct {
                order,
                product: product.map(|p| {
                    let image_url = self.media.resolve(p.image_id);
                    ProductView::new(p, image_url)
                }),
            })
            .collect())
    }

    /// Overwrite an order's status. Admin-only.
    ///
    /// Any status value is accepted regardless of the current one — the
    /// progression is advisory labeling, not an enforced state machine.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the order doesn't exist.
    #[instrument(skip(self, admin), fields(admin = %admin.email))]
    pub async fn update_status(
        &self,
        admin: &CurrentAdmin,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<()> {
        self.orders.update_status(id, status).await.map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("order not found".to_string()),
            other => other.into(),
        })?;

        info!(order_id = %id, status = %status, admin = %admin.email, "Order status updated");
        Ok(())
    }
}
