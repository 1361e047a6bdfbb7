//! Event DTOs for the public list/detail endpoints and the admin form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Event, EventDraft, EventId, EventStatus};
use crate::error::MatchdayError;

/// Request body for `POST /admin/events` and `PUT /admin/events/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EventRequest {
    /// Home side.
    pub team_a: String,
    /// Away side.
    pub team_b: String,
    /// Competition name.
    pub league: String,
    /// Scheduled kick-off (RFC 3339).
    pub start_time: DateTime<Utc>,
    /// Video stream URL.
    pub stream_url: String,
    /// Broadcast status. Defaults to `UPCOMING`.
    #[serde(default)]
    pub status: EventStatus,
}

impl EventRequest {
    /// Validates the request into an [`EventDraft`].
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::InvalidInput`] on blank, oversized, or
    /// duplicate team fields.
    pub fn into_draft(self) -> Result<EventDraft, MatchdayError> {
        EventDraft::new(
            &self.team_a,
            &self.team_b,
            &self.league,
            self.start_time,
            &self.stream_url,
            self.status,
        )
    }
}

/// A match as returned by every event endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventDto {
    /// Event identifier.
    pub id: EventId,
    /// Home side.
    pub team_a: String,
    /// Away side.
    pub team_b: String,
    /// Competition name.
    pub league: String,
    /// Scheduled kick-off.
    pub start_time: DateTime<Utc>,
    /// Video stream URL.
    pub stream_url: String,
    /// Broadcast status.
    pub status: EventStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            team_a: event.team_a,
            team_b: event.team_b,
            league: event.league,
            start_time: event.start_time,
            stream_url: event.stream_url,
            status: event.status,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Events ordered by start time ascending.
    pub data: Vec<EventDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
