//! The relational-store seam
//!
//! Everything above this trait (query helpers, serializers, pages) is
//! storage-agnostic. `PgStore` backs it with PostgreSQL; `MemoryStore`
//! keeps the same ordering and aggregation rules in process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Comment, Identity, NewPost, Post, Tag, TagTitle};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

/// Read-mostly access to posts, tags, comments, likes, and identities.
///
/// Ordering contracts:
/// - post lists are newest first unless stated otherwise
/// - comments are oldest first
/// - a post's tags come back in attachment order
#[async_trait]
pub trait BlogStore: Send + Sync + 'static {
    /// Posts with `from <= published_at < to`, oldest first.
    async fn posts_published_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Post>, DbError>;

    /// Posts by descending like count, `likes_count` annotated.
    /// Ties go to the newer post.
    async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DbError>;

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, DbError>;

    async fn posts_with_tag(&self, tag_id: i64, limit: i64) -> Result<Vec<Post>, DbError>;

    /// Most recently published post with this slug.
    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, DbError>;

    /// Comment counts for exactly `post_ids`, in one aggregate query.
    /// Posts without comments map to 0.
    async fn comments_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, DbError>;

    async fn count_comments(&self, post_id: i64) -> Result<i64, DbError>;

    async fn count_likes(&self, post_id: i64) -> Result<i64, DbError>;

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DbError>;

    /// Batched identity lookup. Unknown ids are absent from the map.
    async fn identities(&self, ids: &[i64]) -> Result<HashMap<i64, Identity>, DbError>;

    /// `(post_id, tag)` pairs for all `post_ids`, each tag carrying its
    /// `posts_count`.
    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DbError>;

    /// Tags by descending post count, `posts_count` annotated.
    /// Ties are ordered by title.
    async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DbError>;

    async fn tag_by_title(&self, title: &str) -> Result<Option<Tag>, DbError>;

    async fn count_posts_with_tag(&self, tag_id: i64) -> Result<i64, DbError>;

    async fn create_identity(&self, username: &str, is_staff: bool) -> Result<Identity, DbError>;

    /// Create a tag, returning the existing one on a title clash.
    async fn create_tag(&self, title: TagTitle) -> Result<Tag, DbError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, DbError>;

    /// Link a tag to a post. Linking twice is a no-op.
    async fn attach_tag(&self, post_id: i64, tag_id: i64) -> Result<(), DbError>;

    /// Record a like. Liking twice is a no-op.
    async fn add_like(&self, post_id: i64, identity_id: i64) -> Result<(), DbError>;

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Comment, DbError>;

    /// Delete a post with its comments, likes, and tag links.
    /// Returns false when no such post existed.
    async fn delete_post(&self, post_id: i64) -> Result<bool, DbError>;

    /// Cheap round-trip for health checks.
    async fn ping(&self) -> Result<(), DbError>;
}
