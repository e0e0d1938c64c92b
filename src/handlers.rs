use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path as AxumPath, Query, State},
    http::{HeaderMap, HeaderName, HeaderValue, Response, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;

use crate::errors::WikiError;
use crate::services::AssetService;
use crate::types::{AppState, PageRequest};

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/page", get(get_page).put(put_page).post(post_page))
        .route("/api/page/", get(get_page).put(put_page).post(post_page))
        .route("/api/page/*path", get(get_page).put(put_page).post(post_page))
        .route("/api/preview", post(post_preview))
        .route("/", get(handle_static))
        .route("/*path", get(handle_static))
        .with_state(state)
}

/// Handle page reads
pub async fn get_page(
    State(state): State<AppState>,
    path: Option<AxumPath<String>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, WikiError> {
    let mut req = PageRequest::new(page_path(path));
    req.format = query.get("format").cloned();
    log::info!("GET page '{}'", req.path);
    Ok(Json(state.pages.get(&req)?))
}

/// Handle page updates
pub async fn put_page(
    State(state): State<AppState>,
    path: Option<AxumPath<String>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, WikiError> {
    let req = write_request(&state, path, &headers, body);
    log::info!("PUT page '{}'", req.path);
    Ok(Json(state.pages.update(&req)?))
}

/// Handle page creation
pub async fn post_page(
    State(state): State<AppState>,
    path: Option<AxumPath<String>>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, WikiError> {
    let req = write_request(&state, path, &headers, body);
    log::info!("POST page '{}'", req.path);
    Ok(Json(state.pages.create(&req)?))
}

/// Handle preview rendering
pub async fn post_preview(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, WikiError> {
    let req = PageRequest::default().with_body(body);
    Ok(Json(state.pages.preview(&req)?))
}

/// Handle frontend asset requests
pub async fn handle_static(
    State(state): State<AppState>,
    path: Option<AxumPath<String>>,
) -> Result<impl IntoResponse, WikiError> {
    let assets = AssetService::new(state.static_dir.as_ref().clone());
    let asset = assets.load(&page_path(path))?;

    let headers = asset.headers(OffsetDateTime::now_utc());
    let mut resp = Response::new(Body::from(asset.bytes));
    *resp.status_mut() = StatusCode::OK;
    for (name, value) in headers {
        if let Ok(value) = HeaderValue::from_str(&value) {
            resp.headers_mut().insert(HeaderName::from_static(name), value);
        }
    }
    Ok(resp)
}

/// Wildcard capture with leading separators removed, so `//a` addresses `a`
fn page_path(path: Option<AxumPath<String>>) -> String {
    path.map(|AxumPath(p)| p.trim_start_matches('/').to_string()).unwrap_or_default()
}

fn write_request(
    state: &AppState,
    path: Option<AxumPath<String>>,
    headers: &HeaderMap,
    body: String,
) -> PageRequest {
    let mut req = PageRequest::new(page_path(path)).with_body(body);
    req.actor = actor_from_headers(headers, &state.user_header);
    req
}

/// Authenticated user name from the trusted auth header, if any
pub fn actor_from_headers(headers: &HeaderMap, header: &str) -> Option<String> {
    headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
