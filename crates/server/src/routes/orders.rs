//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sugar_maple_core::{OrderId, OrderStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::order::{Order, OrderWithProduct, PlaceOrder};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Status update form.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    pub status: OrderStatus,
}

/// Place an order. Public; the total is computed server-side as a snapshot
/// of the product's current price.
///
/// POST /api/orders
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PlaceOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    let orders = OrderService::new(state.pool(), state.media());
    let order = orders.place(&input).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// All orders with their (possibly deleted) product (admin).
///
/// GET /api/admin/orders
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<OrderWithProduct>>> {
    let orders = OrderService::new(state.pool(), state.media());
    Ok(Json(orders.list(&admin).await?))
}

/// Overwrite an order's status (admin). Any transition is accepted.
///
/// POST /api/admin/orders/{id}/status
#[instrument(skip(state, admin))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    Json(form): Json<UpdateStatusForm>,
) -> Result<StatusCode> {
    let orders = OrderService::new(state.pool(), state.media());
    orders.update_status(&admin, id, form.status).await?;

    Ok(StatusCode::NO_CONTENT)
}
