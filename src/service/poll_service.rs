//! Poll service: lazy seeding, vote counting, and tally snapshots.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::poll::normalize_option_name;
use crate::domain::{EventBus, EventId, PollTally, SiteEvent};
use crate::error::MatchdayError;
use crate::persistence::MatchStore;

/// Per-event vote tallies.
///
/// Options are seeded from the event's two teams the first time anyone
/// reads the poll. Any other option name is created on its first vote.
/// Nothing here tracks who voted; repeat votes all count.
#[derive(Debug, Clone)]
pub struct PollService {
    store: Arc<dyn MatchStore>,
    event_bus: EventBus,
}

impl PollService {
    /// Creates a new `PollService`.
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Current tally, seeding the two team options if the poll has no rows.
    ///
    /// Seeding is insert-or-ignore, so repeated or concurrent first reads
    /// converge on the same two rows.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`] if the poll is empty and the
    /// event does not exist, or a store error.
    pub async fn results(&self, event_id: EventId) -> Result<PollTally, MatchdayError> {
        let tally: PollTally = self.store.poll_options(event_id).await?.into_iter().collect();
        if !tally.is_empty() {
            return Ok(tally);
        }

        let event = self
            .store
            .get_event(event_id)
            .await?
            .ok_or(MatchdayError::EventNotFound(event_id))?;

        let created = self
            .store
            .seed_poll_options(event_id, &event.team_names())
            .await?;
        let tally: PollTally = self.store.poll_options(event_id).await?.into_iter().collect();
        tracing::debug!(%event_id, created, options = tally.len(), "poll seeded");
        Ok(tally)
    }

    /// Records one vote and returns the updated tally.
    ///
    /// # Errors
    ///
    /// Returns [`MatchdayError::EventNotFound`] for an unknown event,
    /// [`MatchdayError::InvalidInput`] for a blank option name, or a store
    /// error. Nothing is written on failure.
    pub async fn vote(
        &self,
        event_id: EventId,
        option_name: &str,
    ) -> Result<PollTally, MatchdayError> {
        if self.store.get_event(event_id).await?.is_none() {
            return Err(MatchdayError::EventNotFound(event_id));
        }
        let option_name = normalize_option_name(option_name)?;

        self.store.increment_vote(event_id, &option_name).await?;
        let tally: PollTally = self
            .store
            .poll_options(event_id)
            .await?
            .into_iter()
            .collect();

        let _ = self.event_bus.publish(SiteEvent::PollUpdated {
            event_id,
            option_name: option_name.clone(),
            results: tally.as_map().clone(),
            timestamp: Utc::now(),
        });

        tracing::debug!(%event_id, option = %option_name, total = tally.total(), "vote recorded");
        Ok(tally)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Event, EventDraft, EventStatus};
    use crate::persistence::MemoryStore;

    async fn setup() -> (PollService, Arc<MemoryStore>, EventId) {
        let store = Arc::new(MemoryStore::new());
        let Ok(draft) = EventDraft::new(
            "Red",
            "Blue",
            "Cup",
            Utc::now(),
            "https://cdn.example.com/a.m3u8",
            EventStatus::Live,
        ) else {
            panic!("valid draft");
        };
        let event = Event::from_draft(EventId::new(), draft, Utc::now());
        let Ok(()) = store.insert_event(&event).await else {
            panic!("insert failed");
        };
        let dyn_store: Arc<dyn MatchStore> = Arc::clone(&store) as Arc<dyn MatchStore>;
        (
            PollService::new(dyn_store, EventBus::new(64)),
            store,
            event.id,
        )
    }

    fn pairs(tally: &PollTally) -> Vec<(String, u64)> {
        tally.iter().map(|(n, v)| (n.to_string(), v)).collect()
    }

    #[tokio::test]
    async fn first_read_seeds_both_teams() {
        let (service, _, id) = setup().await;
        let Ok(first) = service.results(id).await else {
            panic!("results failed");
        };
        assert_eq!(
            pairs(&first),
            vec![("Blue".to_string(), 0), ("Red".to_string(), 0)]
        );

        let Ok(second) = service.results(id).await else {
            panic!("results failed");
        };
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_first_reads_do_not_duplicate() {
        let (service, store, id) = setup().await;
        let (a, b) = tokio::join!(service.results(id), service.results(id));
        assert!(a.is_ok() && b.is_ok());
        assert!(matches!(store.poll_options(id).await, Ok(rows) if rows.len() == 2));
    }

    #[tokio::test]
    async fn results_for_unknown_event_is_not_found() {
        let (service, _, _) = setup().await;
        assert!(matches!(
            service.results(EventId::new()).await,
            Err(MatchdayError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn vote_increments_only_that_option() {
        let (service, _, id) = setup().await;
        let _ = service.results(id).await;

        let Ok(after) = service.vote(id, "Red").await else {
            panic!("vote failed");
        };
        assert_eq!(after.votes("Red"), Some(1));
        assert_eq!(after.votes("Blue"), Some(0));

        let Ok(after) = service.vote(id, " Red ").await else {
            panic!("vote failed");
        };
        assert_eq!(after.votes("Red"), Some(2));
        assert_eq!(after.votes("Blue"), Some(0));
    }

    #[tokio::test]
    async fn red_blue_green_scenario() {
        let (service, _, id) = setup().await;
        let Ok(seeded) = service.results(id).await else {
            panic!("results failed");
        };
        assert_eq!(
            pairs(&seeded),
            vec![("Blue".to_string(), 0), ("Red".to_string(), 0)]
        );

        let Ok(after_red) = service.vote(id, "Red").await else {
            panic!("vote failed");
        };
        assert_eq!(
            pairs(&after_red),
            vec![("Blue".to_string(), 0), ("Red".to_string(), 1)]
        );

        let Ok(after_green) = service.vote(id, "Green").await else {
            panic!("vote failed");
        };
        assert_eq!(
            pairs(&after_green),
            vec![
                ("Blue".to_string(), 0),
                ("Green".to_string(), 1),
                ("Red".to_string(), 1)
            ]
        );
    }

    #[tokio::test]
    async fn vote_on_missing_event_writes_nothing() {
        let (service, store, _) = setup().await;
        let ghost = EventId::new();
        assert!(matches!(
            service.vote(ghost, "Red").await,
            Err(MatchdayError::EventNotFound(_))
        ));
        assert!(matches!(store.poll_options(ghost).await, Ok(rows) if rows.is_empty()));
    }

    #[tokio::test]
    async fn blank_vote_is_invalid() {
        let (service, store, id) = setup().await;
        assert!(matches!(
            service.vote(id, "   ").await,
            Err(MatchdayError::InvalidInput(_))
        ));
        assert!(matches!(store.poll_options(id).await, Ok(rows) if rows.is_empty()));
    }

    #[tokio::test]
    async fn vote_publishes_tally() {
        let (service, _, id) = setup().await;
        let mut rx = service.event_bus.subscribe();
        let _ = service.vote(id, "Blue").await;

        let Ok(SiteEvent::PollUpdated { results, .. }) = rx.recv().await else {
            panic!("expected poll_updated");
        };
        assert_eq!(results.get("Blue"), Some(&1));
    }
}
