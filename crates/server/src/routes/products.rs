//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sugar_maple_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, ProductPatch, ProductView};
use crate::services::catalog::{CatalogService, ListFilter};
use crate::services::media::UploadTicket;
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// List in-stock products, filtered by search text or category.
///
/// GET /api/products?search=&category=
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    let filter = ListFilter {
        search: query.search,
        category: query.category,
    };

    Ok(Json(catalog.list(&filter).await?))
}

/// Up to 6 in-stock featured products.
///
/// GET /api/products/featured
pub async fn featured(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    Ok(Json(catalog.featured().await?))
}

/// Single product by id. The body is `null` when the product doesn't exist —
/// absence is a representable result, not an error.
///
/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Option<ProductView>>> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    Ok(Json(catalog.get(id).await?))
}

/// Distinct categories across all products, including out-of-stock.
///
/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    Ok(Json(catalog.categories().await?))
}

/// Create a product (admin). `in_stock` is forced true server-side.
///
/// POST /api/admin/products
#[instrument(skip(state, admin, new))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductView>)> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    let view = catalog.create(&admin, &new).await?;
    state.spawn_search_rebuild();

    Ok((StatusCode::CREATED, Json(view)))
}

/// Patch a product (admin). Absent fields are left unchanged.
///
/// PATCH /api/admin/products/{id}
#[instrument(skip(state, admin, patch))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    Json(patch): Json<ProductPatch>,
) -> Result<StatusCode> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    catalog.update(&admin, id, &patch).await?;
    state.spawn_search_rebuild();

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product (admin). Existing orders keep their dangling reference.
///
/// DELETE /api/admin/products/{id}
#[instrument(skip(state, admin))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    let catalog = CatalogService::new(state.pool(), state.search(), state.media());
    catalog.delete(&admin, id).await?;
    state.spawn_search_rebuild();

    Ok(StatusCode::NO_CONTENT)
}

/// Issue a short-lived signed upload URL (admin). The ticket's id becomes a
/// candidate `image_id` once the upload completes.
///
/// POST /api/admin/uploads
#[instrument(skip(state, admin), fields(admin = %admin.email))]
pub async fn generate_upload_url(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<UploadTicket>> {
    Ok(Json(state.media().issue_upload()))
}
