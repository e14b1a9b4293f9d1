//! Authentication route handlers.
//!
//! Admin sign-in is a two-step handshake: the credential check runs first
//! (and lazily creates the admin user row), then the session is established
//! through the session store. Sign-out drops the session record.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::OptionalAdmin;
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::session::CurrentAdmin;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Admin sign-in form.
#[derive(Debug, Deserialize)]
pub struct AdminSignInForm {
    pub email: String,
    pub password: String,
}

/// Response for sign-in/sign-out.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
}

/// Admin sign-in.
///
/// POST /api/auth/admin/sign-in
///
/// Checks the submitted pair against the configured admin credentials; on
/// mismatch of either half the response is the same access-denied error.
/// On success the admin user row is ensured and the session is established.
#[instrument(skip(state, session, form))]
pub async fn admin_sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AdminSignInForm>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool(), state.config());
    let user = auth.admin_sign_in(&form.email, &form.password).await?;

    let admin = CurrentAdmin {
        user_id: user.id,
        email: user.email,
    };
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("failed to establish session: {e}")))?;

    Ok(Json(AuthResponse { success: true }))
}

/// Sign out the current session.
///
/// POST /api/auth/sign-out
pub async fn sign_out(session: Session) -> Result<Json<AuthResponse>> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(AuthResponse { success: true }))
}

/// The current identity, or `null` when not signed in.
///
/// GET /api/auth/me
pub async fn me(OptionalAdmin(admin): OptionalAdmin) -> Json<Option<CurrentAdmin>> {
    Json(admin)
}
