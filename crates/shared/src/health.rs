// ABOUTME: Health-check endpoint reporting service identity and uptime.
// ABOUTME: GET answers 200 with a JSON status; other methods get a JSON 405.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;

use crate::config::ServerConfig;

pub const HEALTH_PATH: &str = "/api/health";

#[derive(Debug, Clone)]
pub struct HealthState {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub started: Instant,
}

impl HealthState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            service: config.service_name.clone(),
            version: config.service_version.clone(),
            environment: config.environment().to_string(),
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    /// Whole seconds since the process started serving.
    pub uptime: u64,
    pub environment: String,
}

pub fn routes(state: HealthState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health).fallback(method_not_allowed))
        .with_state(Arc::new(state))
}

async fn health(State(state): State<Arc<HealthState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        ok: true,
        service: state.service.clone(),
        version: state.version.clone(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started.elapsed().as_secs(),
        environment: state.environment.clone(),
    })
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "ok": false, "error": "Method not allowed" })),
    )
        .into_response()
}
