//! Tag query helpers

use crate::db::{BlogStore, DbError};
use crate::models::Tag;

/// Query helpers over tags
pub struct TagQuery<'a> {
    store: &'a dyn BlogStore,
}

impl<'a> TagQuery<'a> {
    pub fn new(store: &'a dyn BlogStore) -> Self {
        Self { store }
    }

    /// Tags by descending post count, each with `posts_count` set.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Tag>, DbError> {
        self.store.popular_tags(limit).await
    }

    /// Look a tag up by title. Stored titles are lowercase, so the
    /// requested title is lowercased too.
    pub async fn by_title(&self, title: &str) -> Result<Tag, DbError> {
        let normalized = title.trim().to_lowercase();
        self.store
            .tag_by_title(&normalized)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "tag",
                id: title.to_owned(),
            })
    }
}
