//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sugar_maple_core::{MediaId, Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative price in the store's currency unit.
    pub price: Price,
    pub category: String,
    /// Whether the product is currently purchasable. Out-of-stock products
    /// are hidden from customer-facing listings but stay in the catalog.
    pub in_stock: bool,
    pub featured: bool,
    /// Reference to an uploaded media blob, if any.
    pub image_id: Option<MediaId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product as returned to clients, with its image reference resolved to a
/// fetchable URL (`None` when the product has no image).
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub image_url: Option<String>,
}

impl ProductView {
    #[must_use]
    pub const fn new(product: Product, image_url: Option<String>) -> Self {
        Self { product, image_url }
    }
}

/// Input for creating a product.
///
/// `in_stock` is deliberately absent: new products are always created in
/// stock, regardless of what the caller sends.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub image_id: Option<MediaId>,
    #[serde(default)]
    pub featured: bool,
}

/// A partial product update.
///
/// `None` fields are left unchanged. There is no way to *clear* an image
/// through a patch, only to replace it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub category: Option<String>,
    pub image_id: Option<MediaId>,
    pub in_stock: Option<bool>,
    pub featured: Option<bool>,
}

impl ProductPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image_id.is_none()
            && self.in_stock.is_none()
            && self.featured.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_rejects_negative_price() {
        let json = r#"{"name":"Lamp","description":"d","price":"-1","category":"Home"}"#;
        assert!(serde_json::from_str::<NewProduct>(json).is_err());
    }

    #[test]
    fn test_patch_defaults_to_empty() {
        let patch: ProductPatch = serde_json::from_str("{}").expect("empty patch");
        assert!(patch.is_empty());

        let patch: ProductPatch =
            serde_json::from_str(r#"{"in_stock":false}"#).expect("partial patch");
        assert!(!patch.is_empty());
        assert_eq!(patch.in_stock, Some(false));
        assert!(patch.name.is_none());
    }
}
