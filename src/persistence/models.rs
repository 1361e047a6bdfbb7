//! Database row shapes and their conversion into domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ChatMessage, Event, EventId, PollOption};
use crate::error::MatchdayError;

/// Column tuple of the `events` table, in `SELECT` order.
pub type EventRow = (
    Uuid,
    String,
    String,
    String,
    DateTime<Utc>,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Column tuple of the `poll_options` table, in `SELECT` order.
pub type PollOptionRow = (Uuid, String, i64, DateTime<Utc>);

/// Column tuple of the `chat_messages` table, in `SELECT` order.
pub type ChatMessageRow = (i64, Uuid, String, String, DateTime<Utc>);

/// Converts an `events` row.
///
/// # Errors
///
/// Returns [`MatchdayError::PersistenceError`] if the stored status is not
/// one of the known values.
pub fn event_from_row(row: EventRow) -> Result<Event, MatchdayError> {
    let (id, team_a, team_b, league, start_time, stream_url, status, created_at, updated_at) = row;
    let status = status
        .parse()
        .map_err(|_| MatchdayError::PersistenceError(format!("bad status for event {id}")))?;
    Ok(Event {
        id: EventId::from_uuid(id),
        team_a,
        team_b,
        league,
        start_time,
        stream_url,
        status,
        created_at,
        updated_at,
    })
}

/// Converts a `poll_options` row. Negative counts read as zero.
#[must_use]
pub fn poll_option_from_row(row: PollOptionRow) -> PollOption {
    let (event_id, option_name, votes, updated_at) = row;
    PollOption {
        event_id: EventId::from_uuid(event_id),
        option_name,
        votes: u64::try_from(votes).unwrap_or_default(),
        updated_at,
    }
}

/// Converts a `chat_messages` row.
#[must_use]
pub fn chat_message_from_row(row: ChatMessageRow) -> ChatMessage {
    let (id, event_id, username, message, created_at) = row;
    ChatMessage {
        id,
        event_id: EventId::from_uuid(event_id),
        username,
        message,
        created_at,
    }
}

/// Clamps a `usize` count into a SQL `BIGINT` bind value.
#[must_use]
pub fn sql_limit(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_a_persistence_error() {
        let now = Utc::now();
        let row: EventRow = (
            Uuid::new_v4(),
            "Red".to_string(),
            "Blue".to_string(),
            "Cup".to_string(),
            now,
            "https://cdn.example.com/a.m3u8".to_string(),
            "POSTPONED".to_string(),
            now,
            now,
        );
        assert!(matches!(
            event_from_row(row),
            Err(MatchdayError::PersistenceError(_))
        ));
    }

    #[test]
    fn negative_votes_read_as_zero() {
        let option = poll_option_from_row((Uuid::new_v4(), "Red".to_string(), -3, Utc::now()));
        assert_eq!(option.votes, 0);
    }
}
