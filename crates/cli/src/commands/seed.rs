//! Catalog seeding command.
//!
//! Inserts a handful of sample products through the same repository the
//! server uses, so seeded rows look exactly like admin-created ones
//! (`in_stock` forced true, timestamps from the database).

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use sugar_maple_core::Price;
use sugar_maple_server::db::products::ProductRepository;
use sugar_maple_server::models::product::NewProduct;

use super::CommandError;

/// Seeding errors.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("repository error: {0}")]
    Repository(#[from] sugar_maple_server::db::RepositoryError),
    #[error("invalid seed price: {0}")]
    InvalidPrice(String),
}

/// Sample products: (name, description, price, category, featured).
const SEED_PRODUCTS: &[(&str, &str, &str, &str, bool)] = &[
    (
        "Amber Maple Syrup",
        "A 250ml bottle of amber-grade syrup from the spring run.",
        "14.50",
        "Pantry",
        true,
    ),
    (
        "Maple Butter",
        "Whipped maple spread, nothing but boiled sap.",
        "9.75",
        "Pantry",
        false,
    ),
    (
        "Cast Iron Sap Kettle",
        "Reproduction 4-quart kettle for small-batch boiling.",
        "68.00",
        "Equipment",
        true,
    ),
    (
        "Brass Lamp",
        "Workshop lamp with a hand-finished brass shade.",
        "20.00",
        "Home",
        false,
    ),
];

/// Seed the catalog with sample products.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let products = ProductRepository::new(&pool);

    for (name, description, price, category, featured) in SEED_PRODUCTS {
        let price: Price = price
            .parse()
            .map_err(|_| SeedError::InvalidPrice((*price).to_string()))?;

        let created = products
            .create(&NewProduct {
                name: (*name).to_string(),
                description: (*description).to_string(),
                price,
                category: (*category).to_string(),
                image_id: None,
                featured: *featured,
            })
            .await?;

        tracing::info!(product_id = %created.id, name, "Seeded product");
    }

    tracing::info!(count = SEED_PRODUCTS.len(), "Seeding complete!");
    Ok(())
}
