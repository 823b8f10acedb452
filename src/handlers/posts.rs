use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::post::PageParams,
    store::{self, PostStore},
    utils::jwt::Claims,
};

/// Forum feed for the session's forum (recent first).
pub async fn list_feed(
    State(store): State<PostStore>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = store::clamp_limit(params.limit.as_deref().and_then(|v| v.parse().ok()));
    let offset = store::clamp_offset(params.offset.as_deref().and_then(|v| v.parse().ok()));

    let posts = store
        .feed_posts(&claims.forum_id, limit, offset)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list feed posts: {:?}", e);
            e
        })?;

    Ok(Json(posts))
}

/// Get a single post by ID.
pub async fn get_post(
    State(store): State<PostStore>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = store
        .get_post(&id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}
