//! Flat, display-ready records for templates and the JSON API
//!
//! Field names here are the wire contract for every page consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::AssetStorage;
use crate::db::{BlogStore, DbError};
use crate::error::{PageError, PageResult};
use crate::models::{Comment, Identity, Post, Tag};

/// Characters of post text shown in list views
pub const TEASER_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagView {
    pub title: String,
    pub posts_with_tag: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostView {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagView>,
    /// `None` for a post without tags
    pub first_tag_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetailView {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagView>,
}

/// Where `comments_amount` comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsAmount {
    /// Read `Post::comments_count`; the caller must have run
    /// `PostQuery::fetch_with_comments_count`.
    Precomputed,
    /// Issue a count query for this post.
    Live,
}

/// First `TEASER_LEN` characters of `text`.
pub fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LEN).collect()
}

pub fn serialize_comment(comment: &Comment) -> CommentView {
    CommentView {
        text: comment.text.clone(),
        published_at: comment.published_at,
        author: comment.author.username.clone(),
    }
}

/// Serializers bound to a store and asset storage.
pub struct Serializer<'a> {
    store: &'a dyn BlogStore,
    assets: &'a AssetStorage,
}

impl<'a> Serializer<'a> {
    pub fn new(store: &'a dyn BlogStore, assets: &'a AssetStorage) -> Self {
        Self { store, assets }
    }

    /// `posts_with_tag` is always a fresh count, even if the tag was loaded
    /// with a `posts_count` annotation.
    pub async fn tag(&self, tag: &Tag) -> PageResult<TagView> {
        Ok(TagView {
            title: tag.title.clone(),
            posts_with_tag: self.store.count_posts_with_tag(tag.id).await?,
        })
    }

    pub async fn tags(&self, tags: &[Tag]) -> PageResult<Vec<TagView>> {
        let mut views = Vec::with_capacity(tags.len());
        for tag in tags {
            views.push(self.tag(tag).await?);
        }
        Ok(views)
    }

    /// Serialize a post for list views.
    ///
    /// Author and tags are read from the eager-loaded fields when present
    /// and queried per post otherwise.
    pub async fn post(&self, post: &Post, comments: CommentsAmount) -> PageResult<PostView> {
        let comments_amount = match comments {
            CommentsAmount::Precomputed => {
                post.comments_count
                    .ok_or_else(|| PageError::MissingCommentsCount {
                        slug: post.slug.clone(),
                    })?
            }
            CommentsAmount::Live => self.store.count_comments(post.id).await?,
        };

        let author = self.author_of(post).await?;
        let tags = self.tags_of(post).await?;
        let tag_views = self.tags(&tags).await?;

        Ok(PostView {
            title: post.title.clone(),
            teaser_text: teaser(&post.text),
            author: author.username,
            comments_amount,
            image_url: self.assets.url(post.image.as_deref()),
            published_at: post.published_at,
            slug: post.slug.clone(),
            first_tag_title: tags.first().map(|t| t.title.clone()),
            tags: tag_views,
        })
    }

    pub async fn posts(&self, posts: &[Post], comments: CommentsAmount) -> PageResult<Vec<PostView>> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.post(post, comments).await?);
        }
        Ok(views)
    }

    /// Full record for the detail page.
    pub async fn post_detail(
        &self,
        post: &Post,
        comments: &[Comment],
        likes_amount: i64,
    ) -> PageResult<PostDetailView> {
        let author = self.author_of(post).await?;
        let tags = self.tags_of(post).await?;

        Ok(PostDetailView {
            title: post.title.clone(),
            text: post.text.clone(),
            author: author.username,
            comments: comments.iter().map(serialize_comment).collect(),
            likes_amount,
            image_url: self.assets.url(post.image.as_deref()),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: self.tags(&tags).await?,
        })
    }

    async fn author_of(&self, post: &Post) -> PageResult<Identity> {
        if let Some(author) = &post.author {
            return Ok(author.clone());
        }

        let mut found = self.store.identities(&[post.author_id]).await?;
        found.remove(&post.author_id).ok_or_else(|| {
            PageError::Db(DbError::NotFound {
                resource: "identity",
                id: post.author_id.to_string(),
            })
        })
    }

    async fn tags_of(&self, post: &Post) -> PageResult<Vec<Tag>> {
        if let Some(tags) = &post.tags {
            return Ok(tags.clone());
        }

        Ok(self
            .store
            .tags_for_posts(&[post.id])
            .await?
            .into_iter()
            .map(|(_, tag)| tag)
            .collect())
    }
}
