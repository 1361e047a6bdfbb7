//! Notifications reflecting site state mutations.
//!
//! Every successful write emits a [`SiteEvent`] through the
//! [`super::EventBus`]. WebSocket subscribers receive the events for the
//! matches they follow; polling clients are unaffected.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventId, EventStatus};

/// Notification emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SiteEvent {
    /// An admin created a match.
    EventCreated {
        /// Match identifier.
        event_id: EventId,
        /// Initial status.
        status: EventStatus,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An admin edited a match.
    EventUpdated {
        /// Match identifier.
        event_id: EventId,
        /// Status after the edit.
        status: EventStatus,
        /// Edit timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An admin deleted a match, along with its poll and chat.
    EventDeleted {
        /// Match identifier.
        event_id: EventId,
        /// Deletion timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A vote changed the tally.
    PollUpdated {
        /// Match identifier.
        event_id: EventId,
        /// Option that received the vote.
        option_name: String,
        /// Full tally after the vote, ordered by option name.
        results: BTreeMap<String, u64>,
        /// Vote timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A chat message was accepted.
    ChatMessagePosted {
        /// Match identifier.
        event_id: EventId,
        /// Normalized username.
        username: String,
        /// Normalized message body.
        message: String,
        /// Server-assigned creation time.
        created_at: DateTime<Utc>,
    },
}

impl SiteEvent {
    /// Returns the match this notification concerns.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventCreated { event_id, .. }
            | Self::EventUpdated { event_id, .. }
            | Self::EventDeleted { event_id, .. }
            | Self::PollUpdated { event_id, .. }
            | Self::ChatMessagePosted { event_id, .. } => *event_id,
        }
    }

    /// Returns the notification type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::EventUpdated { .. } => "event_updated",
            Self::EventDeleted { .. } => "event_deleted",
            Self::PollUpdated { .. } => "poll_updated",
            Self::ChatMessagePosted { .. } => "chat_message_posted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_updated_serializes_with_tag() {
        let mut results = BTreeMap::new();
        results.insert("Blue".to_string(), 0);
        results.insert("Red".to_string(), 1);
        let event = SiteEvent::PollUpdated {
            event_id: EventId::new(),
            option_name: "Red".to_string(),
            results,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "poll_updated");

        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"poll_updated\""));
        assert!(json.contains("\"Red\":1"));
    }

    #[test]
    fn event_id_accessor() {
        let id = EventId::new();
        let event = SiteEvent::EventDeleted {
            event_id: id,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_id(), id);
    }
}
