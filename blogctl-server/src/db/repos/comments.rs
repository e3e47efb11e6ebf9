//! Comment and like repository

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::db::DbError;
use crate::models::{Comment, Identity};

fn comment_from_row(r: &PgRow) -> Comment {
    Comment {
        id: r.get("id"),
        post_id: r.get("post_id"),
        text: r.get("text"),
        published_at: r.get("published_at"),
        author: Identity {
            id: r.get("author_id"),
            username: r.get("username"),
            is_staff: r.get("is_staff"),
        },
    }
}

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Comments of a post with authors joined, oldest first.
    pub async fn for_post(&self, post_id: i64) -> Result<Vec<Comment>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.post_id, c.text, c.published_at, c.author_id, u.username, u.is_staff
            FROM blog_comments c
            JOIN auth_users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.published_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(comment_from_row).collect())
    }

    pub async fn count_for_post(&self, post_id: i64) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blog_comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    /// Insert a comment and return it with the author joined.
    pub async fn create(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Comment, DbError> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO blog_comments (post_id, author_id, text, published_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id, post_id, author_id, text, published_at
            )
            SELECT i.id, i.post_id, i.text, i.published_at, i.author_id, u.username, u.is_staff
            FROM inserted i
            JOIN auth_users u ON u.id = i.author_id
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(text)
        .bind(published_at)
        .fetch_one(self.pool)
        .await?;

        Ok(comment_from_row(&row))
    }

    pub async fn count_likes(&self, post_id: i64) -> Result<i64, DbError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blog_post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    /// Record a like; the primary key makes repeats a no-op.
    pub async fn add_like(&self, post_id: i64, user_id: i64) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO blog_post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
