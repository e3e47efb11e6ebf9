//! Post query helpers
//!
//! Filtering and ordering happen in the store. The batched helpers
//! (`fetch_with_comments_count`, `prefetch_authors_and_tags_with_posts_count`)
//! take an already-materialized post list and fill in what the serializer
//! needs with one store round-trip per relation.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, TimeZone, Utc};

use crate::db::{BlogStore, DbError};
use crate::models::{Post, Tag};

/// Query helpers over posts
pub struct PostQuery<'a> {
    store: &'a dyn BlogStore,
}

/// Midnight UTC on January 1st of `year`, if representable.
fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

impl<'a> PostQuery<'a> {
    pub fn new(store: &'a dyn BlogStore) -> Self {
        Self { store }
    }

    /// Posts published in calendar year `year` (UTC), oldest first.
    pub async fn year(&self, year: i32) -> Result<Vec<Post>, DbError> {
        let window = year
            .checked_add(1)
            .and_then(|next| Some((start_of_year(year)?, start_of_year(next)?)));

        match window {
            Some((from, to)) => self.store.posts_published_between(from, to).await,
            None => Ok(Vec::new()),
        }
    }

    /// Posts by descending like count, each with `likes_count` set.
    pub async fn popular(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        self.store.popular_posts(limit).await
    }

    /// Newest posts first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        self.store.recent_posts(limit).await
    }

    /// Newest posts carrying `tag`.
    pub async fn with_tag(&self, tag: &Tag, limit: i64) -> Result<Vec<Post>, DbError> {
        self.store.posts_with_tag(tag.id, limit).await
    }

    pub async fn by_slug(&self, slug: &str) -> Result<Post, DbError> {
        self.store
            .post_by_slug(slug)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "post",
                id: slug.to_owned(),
            })
    }

    /// Attach `comments_count` to every post in `posts`.
    ///
    /// One aggregate query covers the whole set; the order of `posts` is
    /// kept.
    pub async fn fetch_with_comments_count(&self, mut posts: Vec<Post>) -> Result<Vec<Post>, DbError> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        let counts = self.store.comments_counts(&ids).await?;

        for post in &mut posts {
            post.comments_count = Some(counts.get(&post.id).copied().unwrap_or(0));
        }

        tracing::debug!(posts = posts.len(), "attached comment counts");
        Ok(posts)
    }

    /// Eager-load authors and tags; each tag carries its own `posts_count`.
    ///
    /// Two queries regardless of the number of posts.
    pub async fn prefetch_authors_and_tags_with_posts_count(
        &self,
        mut posts: Vec<Post>,
    ) -> Result<Vec<Post>, DbError> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let author_ids: Vec<i64> = posts
            .iter()
            .map(|p| p.author_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let post_ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let authors = self.store.identities(&author_ids).await?;
        let mut tags_by_post: HashMap<i64, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in self.store.tags_for_posts(&post_ids).await? {
            tags_by_post.entry(post_id).or_default().push(tag);
        }

        for post in &mut posts {
            let author = authors
                .get(&post.author_id)
                .cloned()
                .ok_or_else(|| DbError::NotFound {
                    resource: "identity",
                    id: post.author_id.to_string(),
                })?;
            post.author = Some(author);
            post.tags = Some(tags_by_post.remove(&post.id).unwrap_or_default());
        }

        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_bounds() {
        assert_eq!(
            start_of_year(2024).map(|d| d.to_rfc3339()).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert_eq!(start_of_year(i32::MAX), None);
    }
}
