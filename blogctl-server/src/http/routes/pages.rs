//! HTML page endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Html,
    routing::get,
    Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::pages::Page;

fn render(state: &AppState, page: Page) -> Result<Html<String>, ApiError> {
    Ok(Html(state.renderer.render(page)?))
}

/// GET / - home page
async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let ctx = state.pages().index().await?;
    render(&state, Page::Index(ctx))
}

/// GET /post/{slug} - post detail
async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, ApiError> {
    let ctx = state.pages().post_detail(&slug).await?;
    render(&state, Page::PostDetail(ctx))
}

/// GET /tag/{tag_title} - posts carrying a tag
async fn tag_filter(
    State(state): State<Arc<AppState>>,
    Path(tag_title): Path<String>,
) -> Result<Html<String>, ApiError> {
    let ctx = state.pages().tag_filter(&tag_title).await?;
    render(&state, Page::TagFilter(ctx))
}

/// GET /contacts - static page
async fn contacts(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let page = state.pages().contacts();
    render(&state, page)
}

/// Page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/post/{slug}", get(post_detail))
        .route("/tag/{tag_title}", get(tag_filter))
        .route("/contacts", get(contacts))
}
