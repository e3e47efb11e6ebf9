//! Demo content for the in-memory preview server
//!
//! Seeds one staff author, a handful of readers, and posts with tags,
//! likes, and comments so every page has something to show.

use chrono::{DateTime, Duration, Utc};

use crate::db::BlogStore;
use crate::error::PageResult;
use crate::models::{NewPost, TagTitle};

const READERS: [&str; 4] = ["anna", "boris", "chen", "dana"];

struct DemoPost {
    slug: &'static str,
    title: &'static str,
    text: &'static str,
    tags: &'static [&'static str],
    likes: usize,
    comments: usize,
}

const POSTS: &[DemoPost] = &[
    DemoPost {
        slug: "hello-world",
        title: "Hello, world",
        text: "The first post on this blog. Expect notes on tooling, travel, and whatever else comes up.",
        tags: &["news", "meta"],
        likes: 4,
        comments: 3,
    },
    DemoPost {
        slug: "async-rust-notes",
        title: "Notes on async Rust",
        text: "Futures are lazy, executors drive them, and most surprises come from holding a lock across an await point.",
        tags: &["rust", "programming"],
        likes: 3,
        comments: 2,
    },
    DemoPost {
        slug: "ci-cd-on-a-budget",
        title: "CI/CD on a budget",
        text: "A single runner, a cache directory, and a test suite that finishes in under a minute go a long way.",
        tags: &["ci/cd", "programming"],
        likes: 2,
        comments: 1,
    },
    DemoPost {
        slug: "mountain-weekend",
        title: "A weekend in the mountains",
        text: "Two days, one tent, and far too many photos of the same ridge at different times of day.",
        tags: &["travel"],
        likes: 1,
        comments: 0,
    },
    DemoPost {
        slug: "c-sharp-vs-rust",
        title: "Coming to Rust from C#",
        text: "Ownership replaces the garbage collector, traits replace interfaces, and enums finally carry data.",
        tags: &["rust", "c#"],
        likes: 0,
        comments: 2,
    },
    DemoPost {
        slug: "reading-list",
        title: "Reading list",
        text: "Books queued up for the next few months, roughly in the order they will actually get read.",
        tags: &[],
        likes: 0,
        comments: 0,
    },
];

/// What `seed` created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub posts: usize,
    pub likes: usize,
    pub comments: usize,
}

/// Populate `store` with demo content published in the days before `now`.
pub async fn seed(store: &dyn BlogStore, now: DateTime<Utc>) -> PageResult<SeedSummary> {
    let author = store.create_identity("editor", true).await?;
    let mut readers = Vec::with_capacity(READERS.len());
    for name in READERS {
        readers.push(store.create_identity(name, false).await?);
    }

    let mut summary = SeedSummary {
        posts: 0,
        likes: 0,
        comments: 0,
    };

    // Earlier entries are published earlier
    for (age, demo) in POSTS.iter().rev().enumerate() {
        let published_at = now - Duration::days(age as i64 + 1);
        let post = store
            .create_post(NewPost::new(
                demo.title,
                demo.text,
                demo.slug,
                published_at,
                &author,
            )?)
            .await?;

        for title in demo.tags {
            let tag = store.create_tag(TagTitle::new(title)?).await?;
            store.attach_tag(post.id, tag.id).await?;
        }
        for reader in readers.iter().take(demo.likes) {
            store.add_like(post.id, reader.id).await?;
        }
        for (i, reader) in readers.iter().cycle().take(demo.comments).enumerate() {
            let text = format!("Comment {} from {}", i + 1, reader.username);
            store
                .add_comment(post.id, reader.id, &text, published_at + Duration::hours(i as i64 + 1))
                .await?;
        }

        summary.posts += 1;
        summary.likes += demo.likes.min(readers.len());
        summary.comments += demo.comments;
    }

    tracing::info!(
        posts = summary.posts,
        likes = summary.likes,
        comments = summary.comments,
        "seeded demo content"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetStorage;
    use crate::db::MemoryStore;
    use crate::pages::Pages;

    #[tokio::test]
    async fn seeded_store_fills_every_page() {
        let store = MemoryStore::new();
        let summary = seed(&store, Utc::now()).await.unwrap();
        assert_eq!(summary.posts, POSTS.len());

        let assets = AssetStorage::default();
        let pages = Pages::new(&store, &assets);

        let index = pages.index().await.unwrap();
        assert_eq!(index.page_posts.len(), 5);
        assert_eq!(index.most_popular_posts[0].slug, "hello-world");
        assert!(!index.popular_tags.is_empty());

        let detail = pages.post_detail("hello-world").await.unwrap();
        assert_eq!(detail.post.likes_amount, 4);
        assert_eq!(detail.post.comments.len(), 3);

        let tagged = pages.tag_filter("ci/cd").await.unwrap();
        assert_eq!(tagged.posts[0].slug, "ci-cd-on-a-budget");
    }

    #[tokio::test]
    async fn last_demo_post_is_newest() {
        let store = MemoryStore::new();
        seed(&store, Utc::now()).await.unwrap();

        let recent = store.recent_posts(1).await.unwrap();
        assert_eq!(recent[0].slug, POSTS[POSTS.len() - 1].slug);
    }
}
