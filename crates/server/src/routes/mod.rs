//! HTTP route handlers for the store backend.
//!
//! Every operation is a typed JSON endpoint; the presentation layer is a
//! separate client and entirely out of scope here.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Liveness check
//! GET  /health/ready                   - Readiness check (database ping)
//!
//! # Catalog (public)
//! GET  /api/products                   - List in-stock products (?search=, ?category=)
//! GET  /api/products/featured          - Up to 6 featured in-stock products
//! GET  /api/products/{id}              - Single product, or null
//! GET  /api/categories                 - Distinct categories (includes out-of-stock)
//!
//! # Orders & contact (public)
//! POST /api/orders                     - Place an order (server-side total)
//! POST /api/contact                    - Submit a contact message
//!
//! # Auth
//! POST /api/auth/admin/sign-in         - Admin credential check + session
//! POST /api/auth/sign-out              - Drop the session
//! GET  /api/auth/me                    - Current identity, or null
//!
//! # Admin (requires resolved identity)
//! POST   /api/admin/products           - Create product (in_stock forced true)
//! PATCH  /api/admin/products/{id}      - Partial update
//! DELETE /api/admin/products/{id}      - Delete (orders keep dangling refs)
//! POST   /api/admin/uploads            - Issue signed upload URL
//! GET    /api/admin/orders             - All orders with joined products
//! POST   /api/admin/orders/{id}/status - Overwrite order status
//! GET    /api/admin/contacts           - All contact messages
//! POST   /api/admin/contacts/{id}/status - Overwrite contact status
//!
//! # Media blobs
//! PUT  /api/media/{id}                 - Upload against a signed URL (write-once)
//! GET  /api/media/{id}                 - Serve a stored blob
//! ```

pub mod auth;
pub mod contacts;
pub mod media;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the public catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/featured", get(products::featured))
        .route("/products/{id}", get(products::get_by_id))
        .route("/categories", get(products::categories))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/sign-in", post(auth::admin_sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            patch(products::update).delete(products::remove),
        )
        .route("/uploads", post(products::generate_upload_url))
        .route("/orders", get(orders::list))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/contacts", get(contacts::list))
        .route("/contacts/{id}/status", post(contacts::update_status))
}

/// Create the media routes router.
pub fn media_routes() -> Router<AppState> {
    Router::new().route("/{id}", put(media::upload).get(media::fetch))
}

/// Create all API routes for the store backend.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .route("/orders", post(orders::create))
        .route("/contact", post(contacts::submit))
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .nest("/media", media_routes());

    Router::new().nest("/api", api)
}
