//! Chat handlers: read recent history, post a message.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ChatHistoryResponse, ChatMessageDto, SendMessageRequest};
use crate::app_state::AppState;
use crate::domain::EventId;
use crate::error::{ErrorResponse, MatchdayError};

/// `GET /events/{id}/chat` — Recent messages, oldest first.
///
/// # Errors
///
/// Returns [`MatchdayError`] on a malformed id or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/chat",
    tag = "Chat",
    summary = "Get recent chat",
    description = "Expires messages older than the retention window, then returns the latest messages of the match.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Chat history", body = ChatHistoryResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let messages = state.chat_service.list_recent(event_id).await?;
    Ok(Json(ChatHistoryResponse {
        event_id,
        messages: messages.into_iter().map(ChatMessageDto::from).collect(),
    }))
}

/// `POST /events/{id}/chat` — Post a message.
///
/// # Errors
///
/// Returns [`MatchdayError::EventNotFound`] for an unknown match or
/// [`MatchdayError::InvalidInput`] when the username or message is out of
/// bounds.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/chat",
    tag = "Chat",
    summary = "Send a chat message",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = ChatMessageDto),
        (status = 400, description = "Invalid username or message", body = ErrorResponse),
        (status = 404, description = "Match not found", body = ErrorResponse),
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, MatchdayError> {
    let event_id: EventId = id.parse()?;
    let Json(req) = body?;
    let stored = state
        .chat_service
        .send(event_id, &req.username, &req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(ChatMessageDto::from(stored))))
}

/// Chat routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events/{id}/chat", get(list_messages).post(send_message))
}
