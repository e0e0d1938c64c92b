use std::fs;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use folio::{handlers, AppState, Config, MemoryStore};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(static_dir: &TempDir) -> axum::Router {
    let mut config = Config::new();
    config.static_dir = Arc::new(static_dir.path().to_path_buf());
    handlers::router(AppState::new(&config, Arc::new(MemoryStore::new())))
}

#[tokio::test]
async fn test_root_serves_index_without_cache() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("index.html"), "<html>wiki</html>").unwrap();
    let app = app(&temp);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    assert!(response.headers().contains_key(header::EXPIRES));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>wiki</html>");
}

#[tokio::test]
async fn test_scripts_are_cached_for_a_year() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("js")).unwrap();
    fs::write(temp.path().join("js/app.js"), "1").unwrap();
    let app = app(&temp);

    let response = app
        .oneshot(Request::builder().uri("/js/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/javascript");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=31536000");
}

#[tokio::test]
async fn test_directory_path_serves_nested_index() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("help")).unwrap();
    fs::write(temp.path().join("help/index.html"), "help").unwrap();
    let app = app(&temp);

    let response = app
        .oneshot(Request::builder().uri("/help/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let temp = TempDir::new().unwrap();
    let app = app(&temp);

    let response = app
        .oneshot(Request::builder().uri("/missing.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
