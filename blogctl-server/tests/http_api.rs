//! HTTP routes served from the in-memory store

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use blogctl_server::http::{build_router, AppState};
use blogctl_server::{AskamaRenderer, AssetStorage, BlogConfig};
use common::{at, Fixture};
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> Router {
    let fx = Fixture::new().await;
    fx.post("hello-world", at(2024, 3, 1), 2, 3, &["news", "misc"])
        .await;
    fx.post("second", at(2024, 3, 2), 1, 0, &["news"]).await;
    router(fx)
}

fn router(fx: Fixture) -> Router {
    let state = AppState::new(
        Arc::new(fx.store),
        Arc::new(AskamaRenderer),
        AssetStorage::default(),
    );
    build_router(state, &BlogConfig::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn api_index_returns_contexts() {
    let (status, json) = get_json(app().await, "/api/index").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page_posts"][0]["slug"], "second");
    assert_eq!(json["most_popular_posts"][0]["slug"], "hello-world");
    assert_eq!(json["most_popular_posts"][0]["comments_amount"], 3);
    assert_eq!(json["popular_tags"][0]["title"], "news");
    assert_eq!(json["popular_tags"][0]["posts_with_tag"], 2);
}

#[tokio::test]
async fn api_post_detail() {
    let (status, json) = get_json(app().await, "/api/post/hello-world").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["post"]["likes_amount"], 2);
    assert_eq!(json["post"]["comments"].as_array().unwrap().len(), 3);
    assert_eq!(json["post"]["tags"][0]["title"], "news");
}

#[tokio::test]
async fn api_unknown_tag_is_404() {
    let (status, json) = get_json(app().await, "/api/tag/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn tag_page_renders_html() {
    let (status, body) = get(app().await, "/tag/news").await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("hello world"));
    assert!(html.contains("second"));
}

#[tokio::test]
async fn index_page_renders_html() {
    let (status, body) = get(app().await, "/").await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("news"));
}

/// Every `href="/tag/..."` target in `html`, in document order.
fn tag_links(html: &str) -> Vec<String> {
    html.split(r#"href=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .filter(|href| href.starts_with("/tag/"))
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn tag_links_with_reserved_characters_resolve() {
    let fx = Fixture::new().await;
    fx.post("tooling", at(2024, 6, 1), 0, 1, &["c#", "a/b"]).await;
    let app = router(fx);

    let (status, body) = get(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    let links = tag_links(&String::from_utf8(body).unwrap());
    assert!(links.contains(&"/tag/c%23".to_string()), "{links:?}");
    assert!(links.contains(&"/tag/a%2Fb".to_string()), "{links:?}");

    for link in &links {
        let (status, _) = get(app.clone(), link).await;
        assert_eq!(status, StatusCode::OK, "{link}");
    }

    let (status, json) = get_json(app, "/api/tag/a%2Fb").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tag"], "a/b");
    assert_eq!(json["posts"][0]["slug"], "tooling");
}
