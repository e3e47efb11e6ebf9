//! Database migrations for blog tables
//!
//! Every statement is idempotent, so this runs on each `serve` start-up.

use sqlx::PgPool;

use super::DbError;

/// Run all blog migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running blog migrations...");

    // Identities are owned by the auth provider; this is the minimal mirror
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS auth_users (
            id BIGSERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            is_staff BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Slug is intentionally not UNIQUE
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_posts (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(200) NOT NULL,
            text TEXT NOT NULL,
            slug VARCHAR(200) NOT NULL,
            image TEXT,
            published_at TIMESTAMPTZ NOT NULL,
            author_id BIGINT NOT NULL REFERENCES auth_users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_tags (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(20) NOT NULL UNIQUE CHECK (title = lower(title))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Link id doubles as attachment order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_post_tags (
            id BIGSERIAL PRIMARY KEY,
            post_id BIGINT NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
            tag_id BIGINT NOT NULL REFERENCES blog_tags(id) ON DELETE CASCADE,
            UNIQUE (post_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_post_likes (
            post_id BIGINT NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
            user_id BIGINT NOT NULL REFERENCES auth_users(id) ON DELETE CASCADE,
            PRIMARY KEY (post_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blog_comments (
            id BIGSERIAL PRIMARY KEY,
            post_id BIGINT NOT NULL REFERENCES blog_posts(id) ON DELETE CASCADE,
            author_id BIGINT NOT NULL REFERENCES auth_users(id) ON DELETE CASCADE,
            text TEXT NOT NULL,
            published_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Blog migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    // Post indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_posts_slug ON blog_posts(slug)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_blog_posts_published ON blog_posts(published_at DESC)",
    )
    .execute(pool)
    .await?;

    // Relation indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_post_tags_tag ON blog_post_tags(tag_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_blog_comments_post ON blog_comments(post_id)")
        .execute(pool)
        .await?;

    Ok(())
}
