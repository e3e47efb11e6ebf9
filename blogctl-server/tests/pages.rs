//! Page assembly against the in-memory store

mod common;

use blogctl_server::db::BlogStore;
use blogctl_server::models::TagTitle;
use blogctl_server::query::{PostQuery, TagQuery};
use blogctl_server::{AssetStorage, CommentsAmount, Pages, Serializer};
use common::{at, Fixture};

#[tokio::test]
async fn post_detail_reports_likes_comments_and_tag_order() {
    let fx = Fixture::new().await;
    fx.post("hello-world", at(2024, 3, 1), 2, 3, &["news", "misc"])
        .await;
    let assets = AssetStorage::default();

    let ctx = Pages::new(&fx.store, &assets)
        .post_detail("hello-world")
        .await
        .unwrap();

    assert_eq!(ctx.post.likes_amount, 2);
    assert_eq!(ctx.post.comments.len(), 3);
    assert_eq!(ctx.post.tags[0].title, "news");
    assert_eq!(ctx.post.tags[1].title, "misc");
    assert_eq!(ctx.post.author, "editor");
    // oldest comment first
    assert_eq!(ctx.post.comments[0].text, "comment 0");
}

#[tokio::test]
async fn empty_store_gives_empty_index() {
    let fx = Fixture::new().await;
    let assets = AssetStorage::default();

    let ctx = Pages::new(&fx.store, &assets).index().await.unwrap();

    assert!(ctx.most_popular_posts.is_empty());
    assert!(ctx.page_posts.is_empty());
    assert!(ctx.popular_tags.is_empty());
}

#[tokio::test]
async fn index_lists_newest_posts_with_counts() {
    let fx = Fixture::new().await;
    for day in 1..=7 {
        fx.post(&format!("post-{day}"), at(2024, 1, day), 0, day as usize % 3, &["news"])
            .await;
    }
    let assets = AssetStorage::default();

    let ctx = Pages::new(&fx.store, &assets).index().await.unwrap();

    let slugs: Vec<_> = ctx.page_posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["post-7", "post-6", "post-5", "post-4", "post-3"]);
    assert_eq!(ctx.page_posts[0].comments_amount, 1);
    assert_eq!(ctx.page_posts[1].comments_amount, 0);
    assert_eq!(ctx.page_posts[0].first_tag_title.as_deref(), Some("news"));
    assert_eq!(ctx.popular_tags[0].posts_with_tag, 7);
}

#[tokio::test]
async fn unknown_tag_is_not_found() {
    let fx = Fixture::new().await;
    let assets = AssetStorage::default();

    let err = Pages::new(&fx.store, &assets)
        .tag_filter("nope")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn tag_filter_matches_title_case_insensitively() {
    let fx = Fixture::new().await;
    fx.post("tagged", at(2024, 5, 1), 1, 2, &["rust"]).await;
    fx.post("untagged", at(2024, 5, 2), 0, 0, &[]).await;
    let assets = AssetStorage::default();

    let ctx = Pages::new(&fx.store, &assets)
        .tag_filter("RUST")
        .await
        .unwrap();

    assert_eq!(ctx.tag, "rust");
    assert_eq!(ctx.posts.len(), 1);
    assert_eq!(ctx.posts[0].slug, "tagged");
    assert_eq!(ctx.posts[0].comments_amount, 2);
    assert_eq!(ctx.most_popular_posts[0].slug, "tagged");
}

#[tokio::test]
async fn popular_posts_are_ordered_by_likes() {
    let fx = Fixture::new().await;
    for (i, likes) in [1usize, 4, 0, 3, 2, 5].iter().enumerate() {
        fx.post(&format!("p{i}"), at(2024, 2, i as u32 + 1), *likes, 0, &[])
            .await;
    }

    let popular = PostQuery::new(&fx.store).popular(5).await.unwrap();
    assert_eq!(popular.len(), 5);

    let mut likes = Vec::new();
    for post in &popular {
        likes.push(fx.store.count_likes(post.id).await.unwrap());
    }
    assert!(likes.windows(2).all(|w| w[0] >= w[1]), "{likes:?}");
    assert_eq!(likes[0], 5);
}

#[tokio::test]
async fn comments_count_uses_one_query_and_only_touches_given_posts() {
    let fx = Fixture::new().await;
    let a = fx.post("a", at(2024, 1, 1), 0, 2, &[]).await;
    let b = fx.post("b", at(2024, 1, 2), 0, 0, &[]).await;
    let c = fx.post("c", at(2024, 1, 3), 0, 4, &[]).await;

    let query = PostQuery::new(&fx.store);
    fx.store.reset_query_count();
    let counted = query
        .fetch_with_comments_count(vec![a.clone(), b.clone()])
        .await
        .unwrap();

    assert_eq!(fx.store.query_count(), 1);
    assert_eq!(counted[0].comments_count, Some(2));
    assert_eq!(counted[1].comments_count, Some(0));

    // A list mixing counted and uncounted posts keeps the split
    let mut mixed = counted;
    mixed.insert(1, c);
    let state: Vec<_> = mixed
        .iter()
        .map(|p| (p.slug.as_str(), p.comments_count))
        .collect();
    assert_eq!(state, [("a", Some(2)), ("c", None), ("b", Some(0))]);

    let assets = AssetStorage::default();
    let serializer = Serializer::new(&fx.store, &assets);
    assert!(serializer
        .posts(&mixed, CommentsAmount::Precomputed)
        .await
        .is_err());

    let recounted = query.fetch_with_comments_count(mixed).await.unwrap();
    let counts: Vec<_> = recounted.iter().map(|p| p.comments_count).collect();
    assert_eq!(counts, [Some(2), Some(4), Some(0)]);
}

#[tokio::test]
async fn prefetch_uses_two_queries() {
    let fx = Fixture::new().await;
    for day in 1..=4 {
        fx.post(&format!("p{day}"), at(2024, 4, day), 0, 0, &["news", "misc"])
            .await;
    }

    let query = PostQuery::new(&fx.store);
    let posts = query.recent(10).await.unwrap();
    fx.store.reset_query_count();
    let posts = query
        .prefetch_authors_and_tags_with_posts_count(posts)
        .await
        .unwrap();

    assert_eq!(fx.store.query_count(), 2);
    for post in &posts {
        assert_eq!(post.author.as_ref().unwrap().username, "editor");
        let tags = post.tags.as_ref().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].posts_count, Some(4));
    }
}

#[tokio::test]
async fn unused_tag_serializes_with_zero_posts() {
    let fx = Fixture::new().await;
    let tag = fx
        .store
        .create_tag(TagTitle::new("lonely").unwrap())
        .await
        .unwrap();
    let assets = AssetStorage::default();

    let view = Serializer::new(&fx.store, &assets).tag(&tag).await.unwrap();

    assert_eq!(view.title, "lonely");
    assert_eq!(view.posts_with_tag, 0);
}

#[tokio::test]
async fn precomputed_serialization_requires_counts() {
    let fx = Fixture::new().await;
    let post = fx.post("bare", at(2024, 1, 1), 0, 1, &[]).await;
    let assets = AssetStorage::default();
    let serializer = Serializer::new(&fx.store, &assets);

    assert!(serializer
        .post(&post, CommentsAmount::Precomputed)
        .await
        .is_err());

    let live = serializer.post(&post, CommentsAmount::Live).await.unwrap();
    assert_eq!(live.comments_amount, 1);
    assert_eq!(live.first_tag_title, None);
}

#[tokio::test]
async fn year_returns_posts_in_publication_order() {
    let fx = Fixture::new().await;
    fx.post("late", at(2024, 11, 5), 0, 0, &[]).await;
    fx.post("old", at(2023, 6, 1), 0, 0, &[]).await;
    fx.post("early", at(2024, 1, 2), 0, 0, &[]).await;

    let posts = PostQuery::new(&fx.store).year(2024).await.unwrap();

    let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, ["early", "late"]);
}

#[tokio::test]
async fn popular_tags_break_ties_by_title() {
    let fx = Fixture::new().await;
    fx.post("one", at(2024, 1, 1), 0, 0, &["zeta", "alpha", "mid"])
        .await;
    fx.post("two", at(2024, 1, 2), 0, 0, &["mid"]).await;

    let tags = TagQuery::new(&fx.store).popular(5).await.unwrap();

    let titles: Vec<_> = tags.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["mid", "alpha", "zeta"]);
}
