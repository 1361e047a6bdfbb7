//! Aggregated OpenAPI document and the optional Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto;
use crate::api::handlers;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI specification for every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::events::list_events,
        handlers::events::get_event,
        handlers::poll::get_results,
        handlers::poll::vote,
        handlers::chat::list_messages,
        handlers::chat::send_message,
        handlers::admin::list_events,
        handlers::admin::create_event,
        handlers::admin::update_event,
        handlers::admin::delete_event,
        handlers::system::health_handler,
        handlers::system::refresh_handler,
    ),
    components(schemas(
        dto::EventDto,
        dto::EventRequest,
        dto::EventListResponse,
        dto::PaginationMeta,
        dto::VoteRequest,
        dto::PollOptionDto,
        dto::PollResultsResponse,
        dto::SendMessageRequest,
        dto::ChatMessageDto,
        dto::ChatHistoryResponse,
        crate::domain::EventStatus,
        ErrorResponse,
        ErrorBody,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Events", description = "Public match list"),
        (name = "Poll", description = "Per-match betting poll"),
        (name = "Chat", description = "Per-match live chat"),
        (name = "Admin", description = "Match management"),
        (name = "System", description = "Health and client configuration"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme referenced by the admin paths.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Swagger UI at `/docs`, backed by `/api-doc/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn swagger_router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    utoipa_swagger_ui::SwaggerUi::new("/docs")
        .url("/api-doc/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/events",
            "/api/v1/events/{id}",
            "/api/v1/events/{id}/poll",
            "/api/v1/events/{id}/poll/votes",
            "/api/v1/events/{id}/chat",
            "/api/v1/admin/events",
            "/api/v1/admin/events/{id}",
            "/health",
            "/config/refresh",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
