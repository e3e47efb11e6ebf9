//! PostgreSQL-backed `BlogStore`

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::repos::{CommentRepo, IdentityRepo, PostRepo, TagRepo};
use super::{BlogStore, DbError};
use crate::models::{Comment, Identity, NewPost, Post, Tag, TagTitle};

/// Store over a shared connection pool; cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BlogStore for PgStore {
    async fn posts_published_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Post>, DbError> {
        PostRepo::new(&self.pool).published_between(from, to).await
    }

    async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        PostRepo::new(&self.pool).popular(limit).await
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        PostRepo::new(&self.pool).recent(limit).await
    }

    async fn posts_with_tag(&self, tag_id: i64, limit: i64) -> Result<Vec<Post>, DbError> {
        PostRepo::new(&self.pool).with_tag(tag_id, limit).await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, DbError> {
        PostRepo::new(&self.pool).by_slug(slug).await
    }

    async fn comments_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, DbError> {
        PostRepo::new(&self.pool).comments_counts(post_ids).await
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64, DbError> {
        CommentRepo::new(&self.pool).count_for_post(post_id).await
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64, DbError> {
        CommentRepo::new(&self.pool).count_likes(post_id).await
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DbError> {
        CommentRepo::new(&self.pool).for_post(post_id).await
    }

    async fn identities(&self, ids: &[i64]) -> Result<HashMap<i64, Identity>, DbError> {
        IdentityRepo::new(&self.pool).by_ids(ids).await
    }

    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DbError> {
        TagRepo::new(&self.pool).for_posts(post_ids).await
    }

    async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DbError> {
        TagRepo::new(&self.pool).popular(limit).await
    }

    async fn tag_by_title(&self, title: &str) -> Result<Option<Tag>, DbError> {
        TagRepo::new(&self.pool).by_title(title).await
    }

    async fn count_posts_with_tag(&self, tag_id: i64) -> Result<i64, DbError> {
        PostRepo::new(&self.pool).count_with_tag(tag_id).await
    }

    async fn create_identity(&self, username: &str, is_staff: bool) -> Result<Identity, DbError> {
        IdentityRepo::new(&self.pool).create(username, is_staff).await
    }

    async fn create_tag(&self, title: TagTitle) -> Result<Tag, DbError> {
        TagRepo::new(&self.pool).create(title).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DbError> {
        PostRepo::new(&self.pool).create(post).await
    }

    async fn attach_tag(&self, post_id: i64, tag_id: i64) -> Result<(), DbError> {
        PostRepo::new(&self.pool).attach_tag(post_id, tag_id).await
    }

    async fn add_like(&self, post_id: i64, identity_id: i64) -> Result<(), DbError> {
        CommentRepo::new(&self.pool).add_like(post_id, identity_id).await
    }

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Comment, DbError> {
        CommentRepo::new(&self.pool)
            .create(post_id, author_id, text, published_at)
            .await
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool, DbError> {
        PostRepo::new(&self.pool).delete(post_id).await
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
