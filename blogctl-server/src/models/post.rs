//! Post model, slug validation, and the post builder
//!
//! Relations that are expensive to load (author, tags) and the aggregate
//! counts are optional on `Post`: the query layer fills them in batches,
//! and the serializer falls back to per-post queries when they are absent.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use super::identity::Identity;
use super::tag::Tag;
use super::validation::{check_length, ValidationError};

/// Maximum length for post titles
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length for post slugs
pub const MAX_SLUG_LEN: usize = 200;

/// Slug pattern: starts with alphanumeric, allows hyphens/underscores
static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("invalid slug regex"));

/// Validated post slug
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostSlug(String);

impl PostSlug {
    /// Create a slug, validating format.
    ///
    /// # Example
    /// ```
    /// use blogctl_server::models::PostSlug;
    ///
    /// assert!(PostSlug::new("hello-world").is_ok());
    /// assert!(PostSlug::new("Hello World").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        check_length("slug", s, MAX_SLUG_LEN)?;

        if !SLUG_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "slug",
                reason: "must be lowercase alphanumeric with hyphens/underscores, starting with alphanumeric",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Post record as loaded from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    /// Asset reference, resolved to a URL by `AssetStorage`
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author_id: i64,

    /// Eager-loaded author
    pub author: Option<Identity>,
    /// Eager-loaded tags, in attachment order
    pub tags: Option<Vec<Tag>>,
    /// Like count annotated by the popularity query
    pub likes_count: Option<i64>,
    /// Comment count attached by `PostQuery::fetch_with_comments_count`
    pub comments_count: Option<i64>,
}

impl Post {
    /// Route of the detail page for this post
    pub fn absolute_url(&self) -> String {
        format!("/post/{}", self.slug)
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub slug: PostSlug,
    pub image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author_id: i64,
}

impl NewPost {
    /// Build a post for `author`, who must be staff.
    pub fn new(
        title: &str,
        text: &str,
        slug: &str,
        published_at: DateTime<Utc>,
        author: &Identity,
    ) -> Result<Self, ValidationError> {
        check_length("title", title, MAX_TITLE_LEN)?;
        let slug = PostSlug::new(slug)?;

        if !author.is_staff {
            return Err(ValidationError::NotStaff {
                username: author.username.clone(),
            });
        }

        Ok(Self {
            title: title.to_owned(),
            text: text.to_owned(),
            slug,
            image: None,
            published_at,
            author_id: author.id,
        })
    }

    /// Attach an image asset reference; blank references are dropped.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = if image.trim().is_empty() { None } else { Some(image) };
        self
    }
}

/// Comment record with its author joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: Identity,
}
