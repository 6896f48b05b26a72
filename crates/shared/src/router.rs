// ABOUTME: Assembles the companion-server application router.
// ABOUTME: Health route, JSON 404 fallback, security headers, CORS and request tracing.

use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;
use crate::cors::CorsOptions;
use crate::error::SharedError;
use crate::health::{self, HealthState};
use crate::security::SecurityOptions;

/// Router with the default CORS and security policies.
pub fn router(config: &ServerConfig) -> Result<Router, SharedError> {
    router_with(config, &CorsOptions::default(), &SecurityOptions::default())
}

pub fn router_with(
    config: &ServerConfig,
    cors: &CorsOptions,
    security: &SecurityOptions,
) -> Result<Router, SharedError> {
    let mut app = health::routes(HealthState::from_config(config)).fallback(not_found);
    for layer in security.layers()? {
        app = app.layer(layer);
    }
    Ok(app.layer(cors.layer()).layer(
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
            )
        }),
    ))
}

async fn not_found(method: Method, uri: Uri) -> Response {
    warn!(%method, path = %uri.path(), "no route");
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response()
}
