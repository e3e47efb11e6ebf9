//! Page assembly: one routine per route, each producing a typed context
//!
//! Every page is built from the current store state. The queries that make
//! up one page are not isolated from each other, so counts in different
//! panels can disagree under concurrent writes.

use serde::{Deserialize, Serialize};

use crate::assets::AssetStorage;
use crate::db::BlogStore;
use crate::error::PageResult;
use crate::query::{PostQuery, TagQuery};
use crate::serialize::{CommentsAmount, PostDetailView, PostView, Serializer, TagView};

/// Entries in each side panel and in the index post list
pub const PANEL_SIZE: i64 = 5;

/// Posts listed on a tag-filter page
pub const TAG_PAGE_POSTS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexContext {
    pub most_popular_posts: Vec<PostView>,
    pub page_posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetailContext {
    pub post: PostDetailView,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagFilterContext {
    pub tag: String,
    pub popular_tags: Vec<TagView>,
    pub posts: Vec<PostView>,
    pub most_popular_posts: Vec<PostView>,
}

/// A page name together with its context, as handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Index(IndexContext),
    PostDetail(PostDetailContext),
    TagFilter(TagFilterContext),
    Contacts,
}

impl Page {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::Index(_) => "index.html",
            Page::PostDetail(_) => "post-details.html",
            Page::TagFilter(_) => "posts-list.html",
            Page::Contacts => "contacts.html",
        }
    }
}

/// Page builders over a store
pub struct Pages<'a> {
    store: &'a dyn BlogStore,
    assets: &'a AssetStorage,
}

impl<'a> Pages<'a> {
    pub fn new(store: &'a dyn BlogStore, assets: &'a AssetStorage) -> Self {
        Self { store, assets }
    }

    fn serializer(&self) -> Serializer<'a> {
        Serializer::new(self.store, self.assets)
    }

    /// Home page: most liked posts, most used tags, newest posts.
    pub async fn index(&self) -> PageResult<IndexContext> {
        let posts = PostQuery::new(self.store);

        let most_popular_posts = self.popular_posts_panel(CommentsAmount::Precomputed).await?;
        let popular_tags = self.popular_tags_panel().await?;

        let fresh = posts.recent(PANEL_SIZE).await?;
        let fresh = posts.prefetch_authors_and_tags_with_posts_count(fresh).await?;
        let fresh = posts.fetch_with_comments_count(fresh).await?;
        let page_posts = self
            .serializer()
            .posts(&fresh, CommentsAmount::Precomputed)
            .await?;

        tracing::debug!(
            popular = most_popular_posts.len(),
            fresh = page_posts.len(),
            tags = popular_tags.len(),
            "built index page"
        );

        Ok(IndexContext {
            most_popular_posts,
            page_posts,
            popular_tags,
        })
    }

    /// Detail page for the post with `slug`.
    pub async fn post_detail(&self, slug: &str) -> PageResult<PostDetailContext> {
        let post = PostQuery::new(self.store).by_slug(slug).await?;

        let comments = self.store.comments_for_post(post.id).await?;
        let likes_amount = self.store.count_likes(post.id).await?;
        let serialized = self
            .serializer()
            .post_detail(&post, &comments, likes_amount)
            .await?;

        let popular_tags = self.popular_tags_panel().await?;
        let most_popular_posts = self.popular_posts_panel(CommentsAmount::Precomputed).await?;

        tracing::debug!(slug, comments = comments.len(), likes_amount, "built post page");

        Ok(PostDetailContext {
            post: serialized,
            popular_tags,
            most_popular_posts,
        })
    }

    /// Up to `TAG_PAGE_POSTS` newest posts carrying the tag titled `title`.
    ///
    /// Post lists on this page, the side panel included, are serialized on
    /// the live path.
    pub async fn tag_filter(&self, title: &str) -> PageResult<TagFilterContext> {
        let tag = TagQuery::new(self.store).by_title(title).await?;

        let popular_tags = self.popular_tags_panel().await?;
        let most_popular_posts = self.popular_posts_panel(CommentsAmount::Live).await?;

        let related = PostQuery::new(self.store)
            .with_tag(&tag, TAG_PAGE_POSTS)
            .await?;
        let posts = self
            .serializer()
            .posts(&related, CommentsAmount::Live)
            .await?;

        tracing::debug!(tag = %tag.title, posts = posts.len(), "built tag page");

        Ok(TagFilterContext {
            tag: tag.title,
            popular_tags,
            posts,
            most_popular_posts,
        })
    }

    /// Static contacts page; no data.
    pub fn contacts(&self) -> Page {
        Page::Contacts
    }

    async fn popular_tags_panel(&self) -> PageResult<Vec<TagView>> {
        let tags = TagQuery::new(self.store).popular(PANEL_SIZE).await?;
        self.serializer().tags(&tags).await
    }

    /// Most liked posts. `Precomputed` eager-loads relations and counts in
    /// batches; `Live` serializes straight from the popularity query.
    async fn popular_posts_panel(&self, comments: CommentsAmount) -> PageResult<Vec<PostView>> {
        let query = PostQuery::new(self.store);
        let mut popular = query.popular(PANEL_SIZE).await?;

        if comments == CommentsAmount::Precomputed {
            popular = query
                .prefetch_authors_and_tags_with_posts_count(popular)
                .await?;
            popular = query.fetch_with_comments_count(popular).await?;
        }

        self.serializer().posts(&popular, comments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_names() {
        assert_eq!(Page::Contacts.template_name(), "contacts.html");
        let index = Page::Index(IndexContext {
            most_popular_posts: vec![],
            page_posts: vec![],
            popular_tags: vec![],
        });
        assert_eq!(index.template_name(), "index.html");
    }
}
