//! System endpoints: health check and client refresh hints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    store: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, store reachability, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (status_code, status, store) = match state.event_service.health_check().await {
        Ok(()) => (StatusCode::OK, "healthy", "ok".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", e.to_string())
        }
    };
    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            store,
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Suggested re-fetch intervals for polling clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshConfig {
    chat_interval_ms: u64,
    poll_interval_ms: u64,
    chat_history_limit: usize,
    chat_max_age_secs: u64,
}

/// `GET /config/refresh` — Client polling intervals and chat limits.
#[utoipa::path(
    get,
    path = "/config/refresh",
    tag = "System",
    summary = "Client refresh hints",
    description = "Returns how often clients should re-fetch chat and poll snapshots, and the chat retention limits.",
    responses(
        (status = 200, description = "Refresh hints", body = RefreshConfig),
    )
)]
pub async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    let policy = state.chat_service.policy();
    (
        StatusCode::OK,
        Json(RefreshConfig {
            chat_interval_ms: state.refresh.chat_ms,
            poll_interval_ms: state.refresh.poll_ms,
            chat_history_limit: policy.max_messages,
            chat_max_age_secs: policy.max_age.as_secs(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/refresh", get(refresh_handler))
}
