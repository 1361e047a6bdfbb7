//! Public match list and detail handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{EventDto, EventListParams, EventListResponse};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, MatchdayError};

/// `GET /events` — List matches by start time.
///
/// # Errors
///
/// Returns [`MatchdayError::InvalidInput`] for a malformed query string, or
/// a store error.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List matches",
    description = "Returns matches ordered by scheduled start time, optionally filtered by status.",
    params(EventListParams),
    responses(
        (status = 200, description = "Paginated match list", body = EventListResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    params: Result<Query<EventListParams>, QueryRejection>,
) -> Result<impl IntoResponse, MatchdayError> {
    let Query(params) = params?;
    let events = state.event_service.list_events(params.status).await?;
    let (page, pagination) = params.paginate(events);

    Ok(Json(EventListResponse {
        data: page.into_iter().map(EventDto::from).collect(),
        pagination,
    }))
}

/// `GET /events/{id}` — Get one match.
///
/// # Errors
///
/// Returns [`MatchdayError::EventNotFound`] if the match does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get match details",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Match details", body = EventDto),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let event = state.event_service.get_event(event_id).await?;
    Ok(Json(EventDto::from(event)))
}

/// Public match routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/{id}", get(get_event))
}
