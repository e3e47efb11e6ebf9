//! JSON page contexts - the same data the templates receive

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::pages::{IndexContext, PostDetailContext, TagFilterContext};

/// GET /api/index
async fn index(State(state): State<Arc<AppState>>) -> Result<Json<IndexContext>, ApiError> {
    Ok(Json(state.pages().index().await?))
}

/// GET /api/post/{slug}
async fn post_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetailContext>, ApiError> {
    Ok(Json(state.pages().post_detail(&slug).await?))
}

/// GET /api/tag/{tag_title}
async fn tag_filter(
    State(state): State<Arc<AppState>>,
    Path(tag_title): Path<String>,
) -> Result<Json<TagFilterContext>, ApiError> {
    Ok(Json(state.pages().tag_filter(&tag_title).await?))
}

/// API routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/index", get(index))
        .route("/api/post/{slug}", get(post_detail))
        .route("/api/tag/{tag_title}", get(tag_filter))
}
