//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! All resource endpoints are mounted under `/api/v1`.

pub mod docs;
pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Upper bound on a single HTTP request, WebSocket upgrades excluded.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST, WebSocket, docs, and HTTP layers.
pub fn build_app(state: AppState) -> Router {
    let router = build_router().layer(TimeoutLayer::new(REQUEST_TIMEOUT));
    let router = router.route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(docs::swagger_router());

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::{EventBus, RetentionPolicy};
    use crate::persistence::MemoryStore;

    fn app() -> Router {
        build_app(AppState::new(
            Arc::new(MemoryStore::new()),
            EventBus::new(16),
            RetentionPolicy::default(),
        ))
    }

    async fn status_of(uri: &str) -> StatusCode {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("bad request");
        };
        let Ok(response) = app().oneshot(request).await else {
            panic!("router failed");
        };
        response.status()
    }

    #[tokio::test]
    async fn routes_are_mounted() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
        assert_eq!(status_of("/config/refresh").await, StatusCode::OK);
        assert_eq!(status_of("/api/v1/events").await, StatusCode::OK);
        assert_eq!(status_of("/api/v1/admin/events").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let id = crate::domain::EventId::new();
        assert_eq!(
            status_of(&format!("/api/v1/events/{id}")).await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of("/api/v1/events/xyz").await, StatusCode::BAD_REQUEST);
        assert_eq!(status_of("/nowhere").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn bad_query_string_is_invalid_input() {
        assert_eq!(
            status_of("/api/v1/events?status=bogus").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of("/api/v1/events?page=abc").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of("/api/v1/events?status=live").await, StatusCode::OK);
    }
}
