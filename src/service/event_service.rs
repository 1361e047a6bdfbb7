//! Event service: admin CRUD over matches and the public lookups.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Event, EventBus, EventDraft, EventId, EventStatus, SiteEvent};
use crate::error::MatchdayError;
use crate::persistence::MatchStore;

/// Orchestration layer for match records.
#[derive(Debug, Clone)]
pub struct EventService {
    store: Arc<dyn MatchStore>,
    event_bus: EventBus,
}

impl EventService {
    /// Creates a new `EventService`.
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns the event, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`] for an unknown id, or a
    /// store error.
    pub async fn get_event(&self, id: EventId) -> Result<Event, MatchdayError> {
        self.store
            .get_event(id)
            .await?
            .ok_or(MatchdayError::EventNotFound(id))
    }

    /// Lists events by start time ascending, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list_events(
        &self,
        status: Option<EventStatus>,
    ) -> Result<Vec<Event>, MatchdayError> {
        self.store.list_events(status).await
    }

    /// Creates an event from a validated draft.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event, MatchdayError> {
        let event = Event::from_draft(EventId::new(), draft, Utc::now());
        self.store.insert_event(&event).await?;

        let _ = self.event_bus.publish(SiteEvent::EventCreated {
            event_id: event.id,
            status: event.status,
            timestamp: event.created_at,
        });

        tracing::info!(event_id = %event.id, team_a = %event.team_a, team_b = %event.team_b, "event created");
        Ok(event)
    }

    /// Replaces every editable field of an event.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`] for an unknown id, or a
    /// store error.
    pub async fn update_event(
        &self,
        id: EventId,
        draft: EventDraft,
    ) -> Result<Event, MatchdayError> {
        let mut event = self.get_event(id).await?;
        event.apply(draft, Utc::now());

        if !self.store.update_event(&event).await? {
            return Err(MatchdayError::EventNotFound(id));
        }

        let _ = self.event_bus.publish(SiteEvent::EventUpdated {
            event_id: id,
            status: event.status,
            timestamp: event.updated_at,
        });

        tracing::info!(event_id = %id, status = %event.status, "event updated");
        Ok(event)
    }

    /// Deletes an event with its poll and chat.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`] for an unknown id, or a
    /// store error.
    pub async fn delete_event(&self, id: EventId) -> Result<(), MatchdayError> {
        if !self.store.delete_event(id).await? {
            return Err(MatchdayError::EventNotFound(id));
        }

        let _ = self.event_bus.publish(SiteEvent::EventDeleted {
            event_id: id,
            timestamp: Utc::now(),
        });

        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns the store's error when it is not.
    pub async fn health_check(&self) -> Result<(), MatchdayError> {
        self.store.health_check().await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn make_service() -> EventService {
        EventService::new(Arc::new(MemoryStore::new()), EventBus::new(64))
    }

    fn draft(team_b: &str, status: EventStatus) -> EventDraft {
        let Ok(draft) = EventDraft::new(
            "Red",
            team_b,
            "Cup",
            Utc::now(),
            "https://cdn.example.com/a.m3u8",
            status,
        ) else {
            panic!("valid draft");
        };
        draft
    }

    #[tokio::test]
    async fn create_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus.subscribe();

        let Ok(event) = service.create_event(draft("Blue", EventStatus::Upcoming)).await else {
            panic!("create failed");
        };

        let Ok(note) = rx.recv().await else {
            panic!("expected notification");
        };
        assert_eq!(note.event_type_str(), "event_created");
        assert_eq!(note.event_id(), event.id);
    }

    #[tokio::test]
    async fn update_replaces_fields() {
        let service = make_service();
        let Ok(event) = service.create_event(draft("Blue", EventStatus::Upcoming)).await else {
            panic!("create failed");
        };

        let Ok(updated) = service
            .update_event(event.id, draft("Green", EventStatus::Live))
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(updated.team_b, "Green");
        assert_eq!(updated.status, EventStatus::Live);
        assert!(updated.updated_at >= event.updated_at);

        let Ok(fetched) = service.get_event(event.id).await else {
            panic!("get failed");
        };
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let service = make_service();
        let id = EventId::new();
        assert!(matches!(
            service.get_event(id).await,
            Err(MatchdayError::EventNotFound(_))
        ));
        assert!(matches!(
            service.update_event(id, draft("Blue", EventStatus::Live)).await,
            Err(MatchdayError::EventNotFound(_))
        ));
        assert!(matches!(
            service.delete_event(id).await,
            Err(MatchdayError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_event() {
        let service = make_service();
        let Ok(event) = service.create_event(draft("Blue", EventStatus::Finished)).await else {
            panic!("create failed");
        };
        assert!(service.delete_event(event.id).await.is_ok());
        assert!(service.get_event(event.id).await.is_err());
        assert!(matches!(service.list_events(None).await, Ok(list) if list.is_empty()));
    }
}
