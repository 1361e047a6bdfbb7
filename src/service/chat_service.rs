//! Chat service: message intake and retention.
//!
//! Two independent prunes keep the log small. Reads first drop every
//! message older than [`RetentionPolicy::max_age`] across all events;
//! writes then trim the written event to [`RetentionPolicy::max_messages`].
//! Neither runs on a timer.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::chat::{normalize_message, normalize_username};
use crate::domain::{ChatMessage, EventBus, EventId, NewChatMessage, RetentionPolicy, SiteEvent};
use crate::error::MatchdayError;
use crate::persistence::MatchStore;

/// Ephemeral per-event chat log.
#[derive(Debug, Clone)]
pub struct ChatService {
    store: Arc<dyn MatchStore>,
    event_bus: EventBus,
    policy: RetentionPolicy,
}

impl ChatService {
    /// Creates a new `ChatService`.
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, event_bus: EventBus, policy: RetentionPolicy) -> Self {
        Self {
            store,
            event_bus,
            policy,
        }
    }

    /// Returns the retention policy in force.
    #[must_use]
    pub const fn policy(&self) -> RetentionPolicy {
        self.policy
    }

    /// Most recent messages of an event, oldest first, after the age prune.
    ///
    /// An unknown event simply has no messages.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list_recent(&self, event_id: EventId) -> Result<Vec<ChatMessage>, MatchdayError> {
        let cutoff = self.policy.cutoff(Utc::now());
        let expired = self.store.prune_chat_before(cutoff).await?;
        if expired > 0 {
            tracing::debug!(expired, "expired chat messages pruned");
        }

        self.store
            .recent_chat_messages(event_id, self.policy.max_messages)
            .await
    }

    /// Validates and stores a message, then trims the event's history.
    ///
    /// Checks run in order and stop at the first failure: the event must
    /// exist, the trimmed username needs two characters, the trimmed message
    /// must be non-empty and at most 200 characters. Usernames over 20
    /// characters are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`],
    /// [`MatchdayError::InvalidInput`], or a store error.
    pub async fn send(
        &self,
        event_id: EventId,
        username: &str,
        message: &str,
    ) -> Result<ChatMessage, MatchdayError> {
        if self.store.get_event(event_id).await?.is_none() {
            return Err(MatchdayError::EventNotFound(event_id));
        }
        let username = normalize_username(username)?;
        let message = normalize_message(message)?;

        let stored = self
            .store
            .insert_chat_message(NewChatMessage {
                event_id,
                username,
                message,
                created_at: Utc::now(),
            })
            .await?;

        let trimmed = self
            .store
            .prune_chat_keep_latest(event_id, self.policy.max_messages)
            .await?;

        let _ = self.event_bus.publish(SiteEvent::ChatMessagePosted {
            event_id,
            username: stored.username.clone(),
            message: stored.message.clone(),
            created_at: stored.created_at,
        });

        tracing::debug!(%event_id, user = %stored.username, trimmed, "chat message stored");
        Ok(stored)
    }
}
