//! Post repository
//!
//! - list queries aggregate in SQL (no per-row follow-ups)
//! - `comments_counts` is the single batched count behind
//!   `PostQuery::fetch_with_comments_count`

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::DbError;
use crate::models::{NewPost, Post};

/// Map a `blog_posts` row; relations and counts start unloaded.
fn post_from_row(r: &PgRow) -> Post {
    Post {
        id: r.get("id"),
        title: r.get("title"),
        text: r.get("text"),
        slug: r.get("slug"),
        image: r.get("image"),
        published_at: r.get("published_at"),
        author_id: r.get("author_id"),
        author: None,
        tags: None,
        likes_count: None,
        comments_count: None,
    }
}

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Posts inside a half-open publication window, oldest first.
    pub async fn published_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, text, slug, image, published_at, author_id
            FROM blog_posts
            WHERE published_at >= $1 AND published_at < $2
            ORDER BY published_at ASC, id ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    /// Posts by like count with the count annotated.
    ///
    /// Uses LEFT JOIN so unliked posts rank with 0 in the same query.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                p.id, p.title, p.text, p.slug, p.image, p.published_at, p.author_id,
                COUNT(l.user_id) AS likes_count
            FROM blog_posts p
            LEFT JOIN blog_post_likes l ON l.post_id = p.id
            GROUP BY p.id
            ORDER BY likes_count DESC, p.published_at DESC, p.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Post {
                likes_count: Some(r.get("likes_count")),
                ..post_from_row(r)
            })
            .collect())
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, text, slug, image, published_at, author_id
            FROM blog_posts
            ORDER BY published_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    pub async fn with_tag(&self, tag_id: i64, limit: i64) -> Result<Vec<Post>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.title, p.text, p.slug, p.image, p.published_at, p.author_id
            FROM blog_posts p
            JOIN blog_post_tags pt ON pt.post_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY p.published_at DESC, p.id DESC
            LIMIT $2
            "#,
        )
        .bind(tag_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(post_from_row).collect())
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Option<Post>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, text, slug, image, published_at, author_id
            FROM blog_posts
            WHERE slug = $1
            ORDER BY published_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.as_ref().map(post_from_row))
    }

    /// Comment counts for a fixed id set in one aggregate query.
    pub async fn comments_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, DbError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT p.id, COUNT(c.id)
            FROM blog_posts p
            LEFT JOIN blog_comments c ON c.post_id = p.id
            WHERE p.id = ANY($1)
            GROUP BY p.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn count_with_tag(&self, tag_id: i64) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blog_post_tags WHERE tag_id = $1")
            .bind(tag_id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    pub async fn create(&self, post: NewPost) -> Result<Post, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO blog_posts (title, text, slug, image, published_at, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, text, slug, image, published_at, author_id
            "#,
        )
        .bind(&post.title)
        .bind(&post.text)
        .bind(post.slug.as_str())
        .bind(post.image.as_deref())
        .bind(post.published_at)
        .bind(post.author_id)
        .fetch_one(self.pool)
        .await?;

        Ok(post_from_row(&row))
    }

    /// Link a tag; the (post, tag) pair is unique so repeats are ignored.
    pub async fn attach_tag(&self, post_id: i64, tag_id: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO blog_post_tags (post_id, tag_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, tag_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete a post; comments, likes, and tag links go with it via
    /// ON DELETE CASCADE.
    pub async fn delete(&self, post_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(post_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

