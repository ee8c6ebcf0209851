use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::{error::AppError, robots::render_robots, state::AppState};

pub const SITEMAP_CACHE_CONTROL: &str = "public, max-age=3600, s-maxage=3600";

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/sitemap.xml", get(sitemap_xml_handler))
        .route("/sitemap.json", get(sitemap_json_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Always answers 200 with a well-formed document; a failed generation is
/// served as the fallback sitemap without the shared-cache header.
pub async fn sitemap_xml_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let sitemap = state.cache.get_or_generate(&state.aggregator).await;

    let (body, cacheable) = match sitemap.to_xml() {
        Ok(body) => (body, !sitemap.is_fallback()),
        Err(e) => {
            error!(error = %e, "rendering sitemap failed, serving fallback");
            (state.aggregator.fallback().to_xml()?, false)
        }
    };

    let mut response = (StatusCode::OK, [(CONTENT_TYPE, "application/xml")], body).into_response();
    if cacheable {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(SITEMAP_CACHE_CONTROL));
    }
    Ok(response)
}

pub async fn sitemap_json_handler(State(state): State<AppState>) -> Response {
    let sitemap = state.cache.get_or_generate(&state.aggregator).await;

    let mut response = Json(&sitemap.records).into_response();
    if !sitemap.is_fallback() {
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(SITEMAP_CACHE_CONTROL));
    }
    response
}

pub async fn robots_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(state.frontend_url()),
    )
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
