use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::tag::Tag;

/// Represents the 'posts' table in the database.
///
/// `title` and `content` hold whatever the ingestion path stored:
/// AES-GCM ciphertext for current rows, plaintext for legacy ones.
/// The store decrypts them at read time.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: String,

    /// Tenant partition key separating one forum's posts from another's.
    pub forum_id: String,

    pub title: String,
    pub content: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A post with its tags eagerly loaded, as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPost {
    #[serde(flatten)]
    pub post: Post,

    pub tags: Vec<Tag>,
}

/// One page of dashboard posts plus the frame it was cut with.
///
/// `total` is counted under its own cache key, so it may briefly
/// disagree with the page within the freshness window.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardPostsResponse {
    pub posts: Vec<DashboardPost>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Query parameters for the paginated listings.
///
/// Numbers are kept as raw strings: malformed values fall back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    /// Admin key; only checked by the dashboard routes.
    pub key: Option<String>,

    pub limit: Option<String>,
    pub offset: Option<String>,
}
