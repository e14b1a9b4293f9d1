//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sugar_maple_core::{OrderId, OrderStatus, ProductId};

use super::product::ProductView;

/// A customer order.
///
/// `total_price` is a snapshot of `product price × quantity` captured at
/// creation time. It is never recalculated, even if the product's price
/// changes or the product is deleted afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    /// The ordered product. May dangle: products can be deleted while
    /// orders referencing them persist.
    pub product_id: ProductId,
    pub customer_name: String,
    /// Stored verbatim; the store does not validate customer email format.
    pub customer_email: String,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order joined with the current state of its product.
///
/// `product` is `None` when the product has been deleted since the order
/// was placed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithProduct {
    #[serde(flatten)]
    pub order: Order,
    pub product: Option<ProductView>,
}

/// Input for placing an order.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrder {
    pub product_id: ProductId,
    pub customer_name: String,
    pub customer_email: String,
    pub quantity: u32,
}
