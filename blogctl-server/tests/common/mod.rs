//! Shared fixtures for integration tests

#![allow(dead_code)]

use blogctl_server::db::{BlogStore, MemoryStore};
use blogctl_server::models::{Identity, NewPost, Post, TagTitle};
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap()
}

/// Store pre-populated with one staff author and a few readers.
pub struct Fixture {
    pub store: MemoryStore,
    pub author: Identity,
    pub readers: Vec<Identity>,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::new();
        let author = store.create_identity("editor", true).await.unwrap();
        let mut readers = Vec::new();
        for i in 0..5 {
            readers.push(
                store
                    .create_identity(&format!("reader{i}"), false)
                    .await
                    .unwrap(),
            );
        }
        Self {
            store,
            author,
            readers,
        }
    }

    /// Create a post with `likes` likes, `comments` comments, and `tags`
    /// attached in the given order.
    pub async fn post(
        &self,
        slug: &str,
        published_at: DateTime<Utc>,
        likes: usize,
        comments: usize,
        tags: &[&str],
    ) -> Post {
        let post = self
            .store
            .create_post(
                NewPost::new(&slug.replace('-', " "), "Body text", slug, published_at, &self.author)
                    .unwrap(),
            )
            .await
            .unwrap();

        for reader in self.readers.iter().take(likes) {
            self.store.add_like(post.id, reader.id).await.unwrap();
        }
        for i in 0..comments {
            let reader = &self.readers[i % self.readers.len()];
            self.store
                .add_comment(
                    post.id,
                    reader.id,
                    &format!("comment {i}"),
                    published_at + Duration::minutes(i as i64 + 1),
                )
                .await
                .unwrap();
        }
        for title in tags {
            let tag = self
                .store
                .create_tag(TagTitle::new(title).unwrap())
                .await
                .unwrap();
            self.store.attach_tag(post.id, tag.id).await.unwrap();
        }

        post
    }
}
