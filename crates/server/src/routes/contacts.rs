//! Contact form route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use sugar_maple_core::{ContactId, ContactStatus};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::contact::{Contact, NewContact};
use crate::services::contacts::ContactService;
use crate::state::AppState;

/// Status update form.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    pub status: ContactStatus,
}

/// Submit a contact message. Public; always starts with status `new`.
///
/// POST /api/contact
#[instrument(skip(state, input))]
pub async fn submit(
    State(state): State<AppState>,
    Json(input): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>)> {
    let contacts = ContactService::new(state.pool());
    let contact = contacts.submit(&input).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// All contact messages (admin).
///
/// GET /api/admin/contacts
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Contact>>> {
    let contacts = ContactService::new(state.pool());
    Ok(Json(contacts.list(&admin).await?))
}

/// Overwrite a contact's status (admin). Any transition is accepted.
///
/// POST /api/admin/contacts/{id}/status
#[instrument(skip(state, admin))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ContactId>,
    Json(form): Json<UpdateStatusForm>,
) -> Result<StatusCode> {
    let contacts = ContactService::new(state.pool());
    contacts.update_status(&admin, id, form.status).await?;

    Ok(StatusCode::NO_CONTENT)
}
