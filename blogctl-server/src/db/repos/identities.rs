//! Identity lookups against the auth mirror table

use std::collections::HashMap;

use sqlx::PgPool;

use crate::db::DbError;
use crate::models::Identity;

/// Identity repository
pub struct IdentityRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> IdentityRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Batched lookup keyed by id.
    pub async fn by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Identity>, DbError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let identities: Vec<Identity> = sqlx::query_as(
            "SELECT id, username, is_staff FROM auth_users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        Ok(identities.into_iter().map(|i| (i.id, i)).collect())
    }

    pub async fn create(&self, username: &str, is_staff: bool) -> Result<Identity, DbError> {
        let identity: Identity = sqlx::query_as(
            r#"
            INSERT INTO auth_users (username, is_staff)
            VALUES ($1, $2)
            RETURNING id, username, is_staff
            "#,
        )
        .bind(username)
        .bind(is_staff)
        .fetch_one(self.pool)
        .await?;

        Ok(identity)
    }
}
