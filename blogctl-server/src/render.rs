//! Templating collaborator: turns a `Page` into HTML.

use askama::Template;

use crate::pages::{IndexContext, Page, PostDetailContext, TagFilterContext};
use crate::serialize::{PostDetailView, PostView, TagView};

#[derive(Debug, thiserror::Error)]
#[error("failed to render {template}: {message}")]
pub struct RenderError {
    pub template: &'static str,
    pub message: String,
}

/// Custom template filters
mod filters {
    /// `{{ tag.title|tag_segment }}`: the title as one encoded path segment
    pub fn tag_segment<T: std::fmt::Display>(title: T) -> ::askama::Result<String> {
        Ok(crate::models::path_segment(&title.to_string()))
    }
}

/// Produces the HTML body for a page.
pub trait PageRenderer: Send + Sync + 'static {
    fn render(&self, page: Page) -> Result<String, RenderError>;
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    most_popular_posts: Vec<PostView>,
    page_posts: Vec<PostView>,
    popular_tags: Vec<TagView>,
}

#[derive(Template)]
#[template(path = "post-details.html")]
struct PostDetailTemplate {
    post: PostDetailView,
    popular_tags: Vec<TagView>,
    most_popular_posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "posts-list.html")]
struct TagFilterTemplate {
    tag: String,
    popular_tags: Vec<TagView>,
    posts: Vec<PostView>,
    most_popular_posts: Vec<PostView>,
}

#[derive(Template)]
#[template(path = "contacts.html")]
struct ContactsTemplate {}

/// Renderer backed by the compiled templates in `templates/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaRenderer;

impl PageRenderer for AskamaRenderer {
    fn render(&self, page: Page) -> Result<String, RenderError> {
        let template = page.template_name();
        let rendered = match page {
            Page::Index(IndexContext {
                most_popular_posts,
                page_posts,
                popular_tags,
            }) => IndexTemplate {
                most_popular_posts,
                page_posts,
                popular_tags,
            }
            .render(),
            Page::PostDetail(PostDetailContext {
                post,
                popular_tags,
                most_popular_posts,
            }) => PostDetailTemplate {
                post,
                popular_tags,
                most_popular_posts,
            }
            .render(),
            Page::TagFilter(TagFilterContext {
                tag,
                popular_tags,
                posts,
                most_popular_posts,
            }) => TagFilterTemplate {
                tag,
                popular_tags,
                posts,
                most_popular_posts,
            }
            .render(),
            Page::Contacts => ContactsTemplate {}.render(),
        };

        rendered.map_err(|e| RenderError {
            template,
            message: e.to_string(),
        })
    }
}
