//! Poll handlers: read the tally, cast a vote.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{PollResultsResponse, VoteRequest};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, MatchdayError};

/// `GET /events/{id}/poll` — Current tally.
///
/// The first read of a match seeds one zero-vote option per team.
///
/// # Errors
///
/// Returns [`MatchdayError::EventNotFound`] if the match does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/poll",
    tag = "Poll",
    summary = "Get poll results",
    description = "Returns vote counts and percentages ordered by option name. Clients poll this every few seconds.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Poll snapshot", body = PollResultsResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let tally = state.poll_service.results(event_id).await?;
    Ok(Json(PollResultsResponse::from_tally(event_id, &tally)))
}

/// `POST /events/{id}/poll/votes` — Cast one vote.
///
/// # Errors
///
/// Returns [`MatchdayError::EventNotFound`] for an unknown match or
/// [`MatchdayError::InvalidInput`] for a blank option.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/poll/votes",
    tag = "Poll",
    summary = "Submit a vote",
    description = "Adds one vote to the named option, creating it if needed, and returns the updated snapshot.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote recorded", body = PollResultsResponse),
        (status = 400, description = "Blank option name", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let Json(req) = body?;
    let tally = state.poll_service.vote(event_id, &req.option_name).await?;
    Ok(Json(PollResultsResponse::from_tally(event_id, &tally)))
}

/// Poll routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/poll", get(get_results))
        .route("/events/{id}/poll/votes", post(vote))
}
