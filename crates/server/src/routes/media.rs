//! Media blob route handlers.
//!
//! PUT accepts an upload against a previously issued signed URL; GET serves
//! stored blobs publicly (resolved image URLs point here).

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;

use sugar_maple_core::MediaId;

use crate::error::Result;
use crate::state::AppState;

/// Signature parameters carried on an upload URL.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub expires: i64,
    pub sig: String,
}

/// Accept an upload against a signed URL. Write-once.
///
/// PUT /api/media/{id}?expires=..&sig=..
#[instrument(skip(state, query, body), fields(media_id = %id, bytes = body.len()))]
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<MediaId>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<StatusCode> {
    state
        .media()
        .verify(id, query.expires, &query.sig, Utc::now())?;
    state.media().store(id, &body).await?;

    Ok(StatusCode::CREATED)
}

/// Serve a stored blob.
///
/// GET /api/media/{id}
pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<MediaId>,
) -> Result<impl IntoResponse> {
    let bytes = state.media().open(id).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        bytes,
    ))
}
