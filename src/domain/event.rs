//! Match records as managed through the admin surface.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::EventId;
use crate::error::MatchdayError;

/// Longest accepted team or league name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Longest accepted stream URL, in characters.
pub const MAX_STREAM_URL_CHARS: usize = 2048;

/// Broadcast status of a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Scheduled, not started yet.
    #[default]
    Upcoming,
    /// Currently streaming.
    Live,
    /// Over.
    Finished,
}

impl EventStatus {
    /// Returns the stored/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Live => "LIVE",
            Self::Finished => "FINISHED",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = MatchdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UPCOMING" => Ok(Self::Upcoming),
            "LIVE" => Ok(Self::Live),
            "FINISHED" => Ok(Self::Finished),
            other => Err(MatchdayError::InvalidInput(format!(
                "unknown event status: {other}"
            ))),
        }
    }
}

/// Accepts any casing, like [`EventStatus::from_str`].
impl<'de> Deserialize<'de> for EventStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Self>().map_err(serde::de::Error::custom)
    }
}

/// A persisted match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
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
    /// Video stream location handed to the player.
    pub stream_url: String,
    /// Broadcast status.
    pub status: EventStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last admin edit.
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Builds a new event from a validated draft, stamping both timestamps
    /// with `now`.
    #[must_use]
    pub fn from_draft(id: EventId, draft: EventDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            team_a: draft.team_a,
            team_b: draft.team_b,
            league: draft.league,
            start_time: draft.start_time,
            stream_url: draft.stream_url,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces every editable field with the draft's and bumps `updated_at`.
    pub fn apply(&mut self, draft: EventDraft, now: DateTime<Utc>) {
        self.team_a = draft.team_a;
        self.team_b = draft.team_b;
        self.league = draft.league;
        self.start_time = draft.start_time;
        self.stream_url = draft.stream_url;
        self.status = draft.status;
        self.updated_at = now;
    }

    /// The two option names a fresh poll is seeded with.
    #[must_use]
    pub fn team_names(&self) -> [String; 2] {
        [self.team_a.clone(), self.team_b.clone()]
    }
}

/// Admin-supplied event fields, trimmed and validated.
///
/// Construct through [`EventDraft::new`]; a value of this type always
/// satisfies the admin form rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    team_a: String,
    team_b: String,
    league: String,
    start_time: DateTime<Utc>,
    stream_url: String,
    status: EventStatus,
}

impl EventDraft {
    /// Validates raw admin input.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::InvalidInput`] if a text field is blank or
    /// too long, or if both teams have the same name.
    pub fn new(
        team_a: &str,
        team_b: &str,
        league: &str,
        start_time: DateTime<Utc>,
        stream_url: &str,
        status: EventStatus,
    ) -> Result<Self, MatchdayError> {
        let team_a = required("team_a", team_a, MAX_NAME_CHARS)?;
        let team_b = required("team_b", team_b, MAX_NAME_CHARS)?;
        let league = required("league", league, MAX_NAME_CHARS)?;
        let stream_url = required("stream_url", stream_url, MAX_STREAM_URL_CHARS)?;

        if team_a == team_b {
            return Err(MatchdayError::InvalidInput(
                "team_a and team_b must differ".to_string(),
            ));
        }

        Ok(Self {
            team_a,
            team_b,
            league,
            start_time,
            stream_url,
            status,
        })
    }

    /// Status the event will be stored with.
    #[must_use]
    pub const fn status(&self) -> EventStatus {
        self.status
    }
}

fn required(field: &str, value: &str, max_chars: usize) -> Result<String, MatchdayError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MatchdayError::InvalidInput(format!("{field} is required")));
    }
    if value.chars().count() > max_chars {
        return Err(MatchdayError::InvalidInput(format!(
            "{field} too long (max {max_chars} characters)"
        )));
    }
    Ok(value.to_string())
}
