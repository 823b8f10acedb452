// src/handlers/admin.rs

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{authz::AdminAuthorizer, error::AppError, store::PostStore, utils::jwt::Claims};

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub key: Option<String>,
}

/// Hard-deletes a post and its tag links from the moderation dashboard.
/// Requires: an active session + the admin key.
///
/// Deleting an id that never existed still returns 204 (the store
/// treats it as a no-op).
pub async fn delete_post(
    State(store): State<PostStore>,
    State(authorizer): State<Arc<dyn AdminAuthorizer>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<impl IntoResponse, AppError> {
    let capability = authorizer.authorize(&claims, params.key.as_deref())?;

    store
        .delete_post(&id, &capability.forum_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete post {}: {:?}", id, e);
            e
        })?;

    Ok(StatusCode::NO_CONTENT)
}
