//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side failures to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Error responses are JSON bodies of the form
//! `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::search::SearchError;
use crate::services::auth::AuthError;
use crate::services::media::MediaError;

/// Application-level error type for the store backend.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Search index operation failed.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Media storage operation failed.
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An identity is required and absent.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is a server-side failure worth capturing.
    const fn is_server_failure(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Internal(_)
                | Self::Search(_)
                | Self::Media(MediaError::Io(_))
                | Self::Auth(AuthError::BadHashConfig | AuthError::Repository(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::AccessDenied => StatusCode::FORBIDDEN,
                AuthError::BadHashConfig | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Media(err) => match err {
                MediaError::Expired | MediaError::BadSignature => StatusCode::FORBIDDEN,
                MediaError::AlreadyExists => StatusCode::CONFLICT,
                MediaError::NotFound => StatusCode::NOT_FOUND,
                MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Search(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details never leave the server.
    fn message(&self) -> String {
        match self {
            Self::NotFound(what) => what.clone(),
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) | Self::Internal(_) | Self::Search(_) => {
                "Internal server error".to_string()
            }
            // The access-denied message never reveals which credential half
            // was wrong.
            Self::Auth(AuthError::AccessDenied) => {
                "Access denied. Invalid admin credentials.".to_string()
            }
            Self::Auth(_) => "Internal server error".to_string(),
            Self::Media(err) => match err {
                MediaError::Expired => "Upload URL expired".to_string(),
                MediaError::BadSignature => "Invalid upload signature".to_string(),
                MediaError::AlreadyExists => "Media already exists".to_string(),
                MediaError::NotFound => "Media not found".to_string(),
                MediaError::Io(_) => "Internal server error".to_string(),
            },
            Self::Unauthorized(_) => "Unauthorized".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_failure() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product not found".to_string());
        assert_eq!(err.to_string(), "Not found: product not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::AccessDenied)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("connection string leaked".to_string());
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_access_denied_message_is_fixed() {
        let err = AppError::Auth(AuthError::AccessDenied);
        assert_eq!(err.message(), "Access denied. Invalid admin credentials.");
    }
}
