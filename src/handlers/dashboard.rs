use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    authz::AdminAuthorizer,
    error::AppError,
    models::post::PageParams,
    store::{self, PostStore},
    utils::jwt::Claims,
};

/// Moderation listing for the dashboard.
/// Requires: an active session + the admin key.
pub async fn dashboard_posts(
    State(store): State<PostStore>,
    State(authorizer): State<Arc<dyn AdminAuthorizer>>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let capability = authorizer.authorize(&claims, params.key.as_deref())?;

    let limit = store::clamp_limit(params.limit.as_deref().and_then(|v| v.parse().ok()));
    let offset = store::clamp_offset(params.offset.as_deref().and_then(|v| v.parse().ok()));

    let data = store
        .dashboard_posts(&capability.forum_id, limit, offset)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list dashboard posts: {:?}", e);
            e
        })?;

    Ok(Json(data))
}
