//! In-process `BlogStore`
//!
//! Mirrors the ordering, aggregation, and cascade rules of the SQL in
//! `repos/`. Every trait call counts as one query, which lets tests
//! assert that batched paths stay batched.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{BlogStore, DbError};
use crate::models::{Comment, Identity, NewPost, Post, Tag, TagTitle};

#[derive(Default)]
struct Tables {
    next_id: i64,
    identities: BTreeMap<i64, Identity>,
    posts: BTreeMap<i64, Post>,
    tags: BTreeMap<i64, Tag>,
    /// (post_id, tag_id) in attachment order
    post_tags: Vec<(i64, i64)>,
    /// (post_id, user_id)
    likes: BTreeSet<(i64, i64)>,
    comments: BTreeMap<i64, Comment>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn likes_of(&self, post_id: i64) -> i64 {
        self.likes.iter().filter(|(p, _)| *p == post_id).count() as i64
    }

    fn comments_of(&self, post_id: i64) -> i64 {
        self.comments.values().filter(|c| c.post_id == post_id).count() as i64
    }

    fn posts_of(&self, tag_id: i64) -> i64 {
        self.post_tags.iter().filter(|(_, t)| *t == tag_id).count() as i64
    }

    /// All posts newest first; id breaks ties so output is stable.
    fn posts_newest_first(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.posts.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }

    fn require_post(&self, post_id: i64) -> Result<(), DbError> {
        if self.posts.contains_key(&post_id) {
            Ok(())
        } else {
            Err(not_found("post", post_id))
        }
    }

    fn require_identity(&self, id: i64) -> Result<&Identity, DbError> {
        self.identities
            .get(&id)
            .ok_or_else(|| not_found("identity", id))
    }
}

fn not_found(resource: &'static str, id: i64) -> DbError {
    DbError::NotFound {
        resource,
        id: id.to_string(),
    }
}

fn limit_to(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

/// In-memory store for tests and `serve --in-memory`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served since creation or the last reset.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn reset_query_count(&self) {
        self.queries.store(0, Ordering::SeqCst);
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn posts_published_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Post>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.published_at >= from && p.published_at < to)
            .cloned()
            .collect();
        posts.sort_by(|a, b| a.published_at.cmp(&b.published_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables
            .posts_newest_first()
            .into_iter()
            .map(|p| Post {
                likes_count: Some(tables.likes_of(p.id)),
                ..p
            })
            .collect();
        // Stable sort keeps the newest-first order among equal counts
        posts.sort_by(|a, b| b.likes_count.cmp(&a.likes_count));
        posts.truncate(limit_to(limit));
        Ok(posts)
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut posts = tables.posts_newest_first();
        posts.truncate(limit_to(limit));
        Ok(posts)
    }

    async fn posts_with_tag(&self, tag_id: i64, limit: i64) -> Result<Vec<Post>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables
            .posts_newest_first()
            .into_iter()
            .filter(|p| tables.post_tags.contains(&(p.id, tag_id)))
            .take(limit_to(limit))
            .collect())
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables
            .posts_newest_first()
            .into_iter()
            .find(|p| p.slug == slug))
    }

    async fn comments_counts(&self, post_ids: &[i64]) -> Result<HashMap<i64, i64>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(post_ids
            .iter()
            .filter(|id| tables.posts.contains_key(*id))
            .map(|id| (*id, tables.comments_of(*id)))
            .collect())
    }

    async fn count_comments(&self, post_id: i64) -> Result<i64, DbError> {
        self.record_query();
        Ok(self.tables.read().await.comments_of(post_id))
    }

    async fn count_likes(&self, post_id: i64) -> Result<i64, DbError> {
        self.record_query();
        Ok(self.tables.read().await.likes_of(post_id))
    }

    async fn comments_for_post(&self, post_id: i64) -> Result<Vec<Comment>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.published_at.cmp(&b.published_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn identities(&self, ids: &[i64]) -> Result<HashMap<i64, Identity>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.identities.get(id).map(|i| (*id, i.clone())))
            .collect())
    }

    async fn tags_for_posts(&self, post_ids: &[i64]) -> Result<Vec<(i64, Tag)>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut pairs: Vec<(i64, Tag)> = tables
            .post_tags
            .iter()
            .filter(|(post_id, _)| post_ids.contains(post_id))
            .filter_map(|(post_id, tag_id)| {
                tables.tags.get(tag_id).map(|tag| {
                    (
                        *post_id,
                        Tag {
                            posts_count: Some(tables.posts_of(tag.id)),
                            ..tag.clone()
                        },
                    )
                })
            })
            .collect();
        // Stable: attachment order survives within each post
        pairs.sort_by_key(|(post_id, _)| *post_id);
        Ok(pairs)
    }

    async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .tags
            .values()
            .map(|t| Tag {
                posts_count: Some(tables.posts_of(t.id)),
                ..t.clone()
            })
            .collect();
        tags.sort_by(|a, b| {
            b.posts_count
                .cmp(&a.posts_count)
                .then_with(|| a.title.cmp(&b.title))
        });
        tags.truncate(limit_to(limit));
        Ok(tags)
    }

    async fn tag_by_title(&self, title: &str) -> Result<Option<Tag>, DbError> {
        self.record_query();
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.title == title).cloned())
    }

    async fn count_posts_with_tag(&self, tag_id: i64) -> Result<i64, DbError> {
        self.record_query();
        Ok(self.tables.read().await.posts_of(tag_id))
    }

    async fn create_identity(&self, username: &str, is_staff: bool) -> Result<Identity, DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let identity = Identity {
            id,
            username: username.to_owned(),
            is_staff,
        };
        tables.identities.insert(id, identity.clone());
        Ok(identity)
    }

    async fn create_tag(&self, title: TagTitle) -> Result<Tag, DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables.tags.values().find(|t| t.title == title.as_str()) {
            return Ok(existing.clone());
        }
        let id = tables.allocate_id();
        let tag = Tag {
            id,
            title: title.into_string(),
            posts_count: None,
        };
        tables.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        tables.require_identity(post.author_id)?;
        let id = tables.allocate_id();
        let post = Post {
            id,
            title: post.title,
            text: post.text,
            slug: post.slug.as_str().to_owned(),
            image: post.image,
            published_at: post.published_at,
            author_id: post.author_id,
            author: None,
            tags: None,
            likes_count: None,
            comments_count: None,
        };
        tables.posts.insert(id, post.clone());
        Ok(post)
    }

    async fn attach_tag(&self, post_id: i64, tag_id: i64) -> Result<(), DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        if !tables.tags.contains_key(&tag_id) {
            return Err(not_found("tag", tag_id));
        }
        if !tables.post_tags.contains(&(post_id, tag_id)) {
            tables.post_tags.push((post_id, tag_id));
        }
        Ok(())
    }

    async fn add_like(&self, post_id: i64, identity_id: i64) -> Result<(), DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        tables.require_identity(identity_id)?;
        tables.likes.insert((post_id, identity_id));
        Ok(())
    }

    async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        text: &str,
        published_at: DateTime<Utc>,
    ) -> Result<Comment, DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        tables.require_post(post_id)?;
        let author = tables.require_identity(author_id)?.clone();
        let id = tables.allocate_id();
        let comment = Comment {
            id,
            post_id,
            text: text.to_owned(),
            published_at,
            author,
        };
        tables.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn delete_post(&self, post_id: i64) -> Result<bool, DbError> {
        self.record_query();
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&post_id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.post_id != post_id);
        tables.likes.retain(|(p, _)| *p != post_id);
        tables.post_tags.retain(|(p, _)| *p != post_id);
        Ok(true)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    async fn seeded() -> (MemoryStore, Identity, Post) {
        let store = MemoryStore::new();
        let author = store.create_identity("editor", true).await.unwrap();
        let post = store
            .create_post(NewPost::new("First", "Body", "first", at(1), &author).unwrap())
            .await
            .unwrap();
        (store, author, post)
    }

    #[tokio::test]
    async fn create_tag_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.create_tag(TagTitle::new("Rust").unwrap()).await.unwrap();
        let b = store.create_tag(TagTitle::new("RUST").unwrap()).await.unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.title, "rust");
    }

    #[tokio::test]
    async fn delete_post_cascades() {
        let (store, author, post) = seeded().await;
        let tag = store.create_tag(TagTitle::new("misc").unwrap()).await.unwrap();
        store.attach_tag(post.id, tag.id).await.unwrap();
        store.add_like(post.id, author.id).await.unwrap();
        store.add_comment(post.id, author.id, "hi", at(2)).await.unwrap();

        assert!(store.delete_post(post.id).await.unwrap());

        assert_eq!(store.count_comments(post.id).await.unwrap(), 0);
        assert_eq!(store.count_likes(post.id).await.unwrap(), 0);
        assert_eq!(store.count_posts_with_tag(tag.id).await.unwrap(), 0);
        assert!(!store.delete_post(post.id).await.unwrap());
    }

    #[tokio::test]
    async fn likes_are_per_identity() {
        let (store, author, post) = seeded().await;
        store.add_like(post.id, author.id).await.unwrap();
        store.add_like(post.id, author.id).await.unwrap();
        assert_eq!(store.count_likes(post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn slug_lookup_prefers_newest() {
        let (store, author, _older) = seeded().await;
        let newer = store
            .create_post(NewPost::new("Again", "Body", "first", at(5), &author).unwrap())
            .await
            .unwrap();
        let found = store.post_by_slug("first").await.unwrap().unwrap();
        assert_eq!(found.id, newer.id);
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let (store, author, _) = seeded().await;
        let err = store.add_like(999, author.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "post", .. }));
    }

    #[tokio::test]
    async fn counts_every_call() {
        let (store, _, post) = seeded().await;
        store.reset_query_count();
        store.count_comments(post.id).await.unwrap();
        store.comments_counts(&[post.id]).await.unwrap();
        assert_eq!(store.query_count(), 2);
    }
}
