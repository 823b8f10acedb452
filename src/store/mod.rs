//! Data access for the post store: the paginated, cached, encrypted
//! listing pipeline plus the moderation delete path.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::AppError,
    models::{
        post::{DashboardPost, DashboardPostsResponse, Post},
        tag::Tag,
    },
    utils::crypto::ContentCipher,
};

pub mod cache;

use cache::TtlCache;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Clamps a requested page size into `[1, MAX_LIMIT]`, defaulting when
/// absent or unparseable.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    match limit {
        Some(limit) => limit.clamp(1, MAX_LIMIT),
        None => DEFAULT_LIMIT,
    }
}

/// Clamps a requested offset to be non-negative, defaulting to 0.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Notified after a post deletion commits.
///
/// Hooks keep derived caches in step with the store; the deletion is
/// not transactionally coupled to them, so a stale read can land in
/// between.
pub trait InvalidationHook: Send + Sync {
    fn post_deleted(&self, forum_id: &str);
}

/// Clears a forum's cached feed pages when one of its posts is deleted.
struct FeedInvalidation {
    feeds: Arc<TtlCache<Vec<DashboardPost>>>,
}

impl InvalidationHook for FeedInvalidation {
    fn post_deleted(&self, forum_id: &str) {
        self.feeds.invalidate_prefix(&feed_tag(forum_id));
    }
}

fn feed_tag(forum_id: &str) -> String {
    format!("posts:{}:feed", forum_id)
}

/// Row shape for the tag eager-load join.
#[derive(Debug, FromRow)]
struct PostTagRow {
    post_id: String,
    id: String,
    name: String,
}

/// Read/delete access to posts, with per-query TTL caching.
///
/// The dashboard cache keys (`dashboard:total:*`, `dashboard:page:*`)
/// have no mutation-wired invalidation: a delete may be invisible
/// there for up to the freshness window. Only the public feed tag is
/// cleared eagerly, through the registered hooks.
#[derive(Clone)]
pub struct PostStore {
    pool: SqlitePool,
    cipher: ContentCipher,
    totals: Arc<TtlCache<i64>>,
    pages: Arc<TtlCache<Vec<DashboardPost>>>,
    feeds: Arc<TtlCache<Vec<DashboardPost>>>,
    hooks: Arc<Vec<Arc<dyn InvalidationHook>>>,
}

impl PostStore {
    pub fn new(pool: SqlitePool, cipher: ContentCipher, freshness_window: Duration) -> Self {
        let feeds = Arc::new(TtlCache::new(freshness_window));

        let hooks: Vec<Arc<dyn InvalidationHook>> = vec![Arc::new(FeedInvalidation {
            feeds: feeds.clone(),
        })];

        Self {
            pool,
            cipher,
            totals: Arc::new(TtlCache::new(freshness_window)),
            pages: Arc::new(TtlCache::new(freshness_window)),
            feeds,
            hooks: Arc::new(hooks),
        }
    }

    /// Cached count of all posts in the forum.
    ///
    /// Served from its own cache key, independent of any page, so it
    /// can be staler or fresher than the page it is shown next to.
    pub async fn count_posts(&self, forum_id: &str) -> Result<i64, AppError> {
        let key = format!("dashboard:total:{}", forum_id);
        if let Some(total) = self.totals.get(&key) {
            return Ok(total);
        }

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE forum_id = ?")
            .bind(forum_id)
            .fetch_one(&self.pool)
            .await?;

        self.totals.insert(key, total);
        Ok(total)
    }

    /// Cached page of raw posts (titles/contents still encrypted),
    /// newest first with ids breaking timestamp ties, tags eagerly
    /// loaded.
    async fn page_posts_raw(
        &self,
        forum_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DashboardPost>, AppError> {
        let key = format!("dashboard:page:{}:{}:{}", forum_id, limit, offset);
        if let Some(page) = self.pages.get(&key) {
            return Ok(page);
        }

        let page = self.fetch_page(forum_id, limit, offset).await?;
        self.pages.insert(key, page.clone());
        Ok(page)
    }

    async fn fetch_page(
        &self,
        forum_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DashboardPost>, AppError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, forum_id, title, content, created_at
            FROM posts
            WHERE forum_id = ?
            ORDER BY created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(forum_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut tags_by_post = self.tags_for(&posts).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                DashboardPost { post, tags }
            })
            .collect())
    }

    /// Eager-loads tags for a page of posts with a single IN query.
    async fn tags_for(&self, posts: &[Post]) -> Result<HashMap<String, Vec<Tag>>, AppError> {
        if posts.is_empty() {
            return Ok(HashMap::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT tp.post_id AS post_id, t.id AS id, t.name AS name \
             FROM tags_to_posts tp \
             JOIN tags t ON t.id = tp.tag_id \
             WHERE tp.post_id IN (",
        );
        let mut separated = builder.separated(", ");
        for post in posts {
            separated.push_bind(&post.id);
        }
        builder.push(")");

        let rows: Vec<PostTagRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        let mut tags_by_post: HashMap<String, Vec<Tag>> = HashMap::new();
        for row in rows {
            tags_by_post.entry(row.post_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
            });
        }

        Ok(tags_by_post)
    }

    /// Read-time decode of a post's title and content. Total: fields
    /// that fail to decrypt pass through as stored.
    fn decode_post(&self, mut entry: DashboardPost) -> DashboardPost {
        entry.post.title = self.cipher.decode_field(&entry.post.title).into_inner();
        entry.post.content = self.cipher.decode_field(&entry.post.content).into_inner();
        entry
    }

    /// The dashboard listing pipeline.
    ///
    /// Count and page queries run concurrently against their own cache
    /// keys; the fetched page then goes through the read-time decode,
    /// preserving query order.
    pub async fn dashboard_posts(
        &self,
        forum_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<DashboardPostsResponse, AppError> {
        let (total, page) = tokio::try_join!(
            self.count_posts(forum_id),
            self.page_posts_raw(forum_id, limit, offset),
        )?;

        let posts = page.into_iter().map(|p| self.decode_post(p)).collect();

        Ok(DashboardPostsResponse {
            posts,
            total,
            limit,
            offset,
        })
    }

    /// Public feed page for a forum, decoded before caching.
    ///
    /// Cached under the forum's feed tag so a delete clears every
    /// cached feed page at once.
    pub async fn feed_posts(
        &self,
        forum_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DashboardPost>, AppError> {
        let key = format!("{}:{}:{}", feed_tag(forum_id), limit, offset);
        if let Some(page) = self.feeds.get(&key) {
            return Ok(page);
        }

        let page: Vec<DashboardPost> = self
            .fetch_page(forum_id, limit, offset)
            .await?
            .into_iter()
            .map(|p| self.decode_post(p))
            .collect();

        self.feeds.insert(key, page.clone());
        Ok(page)
    }

    /// Single post with tags, decoded. Not cached.
    pub async fn get_post(&self, id: &str) -> Result<Option<DashboardPost>, AppError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, forum_id, title, content, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(post) = post else {
            return Ok(None);
        };

        let mut tags_by_post = self.tags_for(std::slice::from_ref(&post)).await?;
        let tags = tags_by_post.remove(&post.id).unwrap_or_default();

        Ok(Some(self.decode_post(DashboardPost { post, tags })))
    }

    /// Hard-deletes a post and its tag associations, then notifies the
    /// registered invalidation hooks with the session's forum.
    ///
    /// Deleting an id that does not exist is a silent no-op; the hooks
    /// still fire. Returns the number of post rows removed.
    pub async fn delete_post(&self, id: &str, forum_id: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tags_to_posts WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        // Hooks run after the commit, so a stale cached read can still
        // be served in between; the dashboard tolerates that window.
        for hook in self.hooks.iter() {
            hook.post_deleted(forum_id);
        }

        Ok(result.rows_affected())
    }
}
