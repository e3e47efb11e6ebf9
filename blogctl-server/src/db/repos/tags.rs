//! Tag repository
//!
//! - create: INSERT with ON CONFLICT (idempotent)
//! - popular / per-post tags: post counts come from a JOIN, not a loop

use sqlx::{PgPool, Row};

use crate::db::DbError;
use crate::models::{Tag, TagTitle};

/// Tag repository
pub struct TagRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TagRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a tag, returning the existing one on conflict.
    pub async fn create(&self, title: TagTitle) -> Result<Tag, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO blog_tags (title) VALUES ($1)
            ON CONFLICT (title) DO UPDATE SET title = EXCLUDED.title
            RETURNING id, title
            "#,
        )
        .bind(title.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(Tag {
            id: row.get("id"),
            title: row.get("title"),
            posts_count: None,
        })
    }

    /// Tags by post count, most used first.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Tag>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count
            FROM blog_tags t
            LEFT JOIN blog_post_tags pt ON pt.tag_id = t.id
            GROUP BY t.id, t.title
            ORDER BY posts_count DESC, t.title ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| Tag {
                id: r.get("id"),
                title: r.get("title"),
                posts_count: Some(r.get("posts_count")),
            })
            .collect())
    }

    pub async fn by_title(&self, title: &str) -> Result<Option<Tag>, DbError> {
        let row = sqlx::query("SELECT id, title FROM blog_tags WHERE title = $1")
            .bind(title)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| Tag {
            id: r.get("id"),
            title: r.get("title"),
            posts_count: None,
        }))
    }

    /// Tags of several posts in one query, each with its own post count.
    ///
    /// Rows come back grouped by post and in attachment order within a post.
    pub async fn for_posts(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DbError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT pt.post_id, t.id, t.title, counts.posts_count
            FROM blog_post_tags pt
            JOIN blog_tags t ON t.id = pt.tag_id
            JOIN (
                SELECT tag_id, COUNT(*) AS posts_count
                FROM blog_post_tags
                GROUP BY tag_id
            ) counts ON counts.tag_id = t.id
            WHERE pt.post_id = ANY($1)
            ORDER BY pt.post_id, pt.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.get("post_id"),
                    Tag {
                        id: r.get("id"),
                        title: r.get("title"),
                        posts_count: Some(r.get("posts_count")),
                    },
                )
            })
            .collect())
    }
}
