//! Admin match CRUD: list, create, update, delete.
//!
//! Every handler takes an [`AdminGuard`]. When the service runs with an
//! admin token the guard demands `Authorization: Bearer <token>`; without
//! one the routes are open.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use subtle::ConstantTimeEq;

use crate::api::dto::{EventDto, EventRequest};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, MatchdayError};

/// Proof that the request may use admin routes.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard;

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = MatchdayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_token.as_deref() else {
            return Ok(Self);
        };

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);

        match presented {
            Some(token) if token_matches(token, expected) => Ok(Self),
            Some(_) => Err(MatchdayError::Unauthorized("invalid admin token".to_string())),
            None => Err(MatchdayError::Unauthorized(
                "missing bearer token".to_string(),
            )),
        }
    }
}

/// Compares in time independent of where the tokens first differ.
fn token_matches(presented: &str, expected: &str) -> bool {
    bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

/// `GET /admin/events` — Every match, unpaginated.
///
/// # Errors
///
/// Returns [`MatchdayError::Unauthorized`] without a valid token, or a
/// store error.
#[utoipa::path(
    get,
    path = "/api/v1/admin/events",
    operation_id = "admin_list_events",
    tag = "Admin",
    summary = "List all matches",
    responses(
        (status = 200, description = "All matches by start time", body = Vec<EventDto>),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn list_events(
    _guard: AdminGuard,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, MatchdayError> {
    let events = state.event_service.list_events(None).await?;
    Ok(Json(
        events.into_iter().map(EventDto::from).collect::<Vec<_>>(),
    ))
}

/// `POST /admin/events` — Create a match.
///
/// # Errors
///
/// Returns [`MatchdayError::Unauthorized`] without a valid token, or
/// [`MatchdayError::InvalidInput`] when a field fails validation.
#[utoipa::path(
    post,
    path = "/api/v1/admin/events",
    tag = "Admin",
    summary = "Create a match",
    request_body = EventRequest,
    responses(
        (status = 201, description = "Match created", body = EventDto),
        (status = 400, description = "Invalid match fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn create_event(
    _guard: AdminGuard,
    State(state): State<AppState>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MatchdayError> {
    let Json(req) = body?;
    let event = state.event_service.create_event(req.into_draft()?).await?;
    Ok((StatusCode::CREATED, Json(EventDto::from(event))))
}

/// `PUT /admin/events/{id}` — Replace a match's fields.
///
/// # Errors
///
/// Returns [`MatchdayError::Unauthorized`] without a valid token,
/// [`MatchdayError::InvalidInput`] when a field fails validation, or
/// [`MatchdayError::EventNotFound`] for an unknown match.
#[utoipa::path(
    put,
    path = "/api/v1/admin/events/{id}",
    tag = "Admin",
    summary = "Update a match",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Match updated", body = EventDto),
        (status = 400, description = "Invalid match fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn update_event(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let Json(req) = body?;
    let event = state
        .event_service
        .update_event(event_id, req.into_draft()?)
        .await?;
    Ok(Json(EventDto::from(event)))
}

/// `DELETE /admin/events/{id}` — Delete a match with its poll and chat.
///
/// # Errors
///
/// Returns [`MatchdayError::Unauthorized`] without a valid token, or
/// [`MatchdayError::EventNotFound`] for an unknown match.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/events/{id}",
    tag = "Admin",
    summary = "Delete a match",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Match deleted"),
        (status = 401, description = "Missing or invalid admin token", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn delete_event(
    _guard: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    state.event_service.delete_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/events", get(list_events).post(create_event))
        .route("/admin/events/{id}", put(update_event).delete(delete_event))
}
