//! Chat DTOs: history and message submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ChatMessage, EventId};

/// Request body for `POST /events/{id}/chat`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    /// Display name, 2–20 characters after trimming (longer is truncated).
    pub username: String,
    /// Message body, 1–200 characters after trimming.
    pub message: String,
}

/// One chat line.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatMessageDto {
    /// Display name.
    pub username: String,
    /// Message body.
    pub message: String,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
}

impl From<ChatMessage> for ChatMessageDto {
    fn from(msg: ChatMessage) -> Self {
        Self {
            username: msg.username,
            message: msg.message,
            created_at: msg.created_at,
        }
    }
}

/// Response body for `GET /events/{id}/chat`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryResponse {
    /// Event the chat belongs to.
    pub event_id: EventId,
    /// Messages oldest first, at most the configured history limit.
    pub messages: Vec<ChatMessageDto>,
}
