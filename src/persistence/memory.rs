//! Process-local implementation of [`MatchStore`].
//!
//! [`MemoryStore`] keeps all three tables behind a single
//! [`tokio::sync::RwLock`]. Every mutation takes the write lock for its
//! whole duration, which gives the same atomicity the PostgreSQL upserts
//! provide. Intended for tests and the `memory` backend; nothing survives a
//! restart.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use tokio::sync::RwLock;

use super::{MatchStore, StoreResult};
use crate::domain::{ChatMessage, Event, EventId, EventStatus, NewChatMessage, PollOption};
use crate::error::MatchdayError;

#[derive(Debug, Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    polls: HashMap<EventId, BTreeMap<String, PollOption>>,
    chat: HashMap<EventId, Vec<ChatMessage>>,
    next_chat_id: i64,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Orders a chat log oldest first, insertion order breaking ties.
fn sort_chronologically(log: &mut [ChatMessage]) {
    log.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

impl MatchStore for MemoryStore {
    fn get_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<Option<Event>>> {
        Box::pin(async move { Ok(self.tables.read().await.events.get(&id).cloned()) })
    }

    fn list_events(&self, status: Option<EventStatus>) -> BoxFuture<'_, StoreResult<Vec<Event>>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let mut events: Vec<Event> = tables
                .events
                .values()
                .filter(|e| status.is_none_or(|s| e.status == s))
                .cloned()
                .collect();
            events.sort_by(|a, b| {
                a.start_time
                    .cmp(&b.start_time)
                    .then(a.created_at.cmp(&b.created_at))
            });
            Ok(events)
        })
    }

    fn insert_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if tables.events.contains_key(&event.id) {
                return Err(MatchdayError::Conflict(format!(
                    "event {} already exists",
                    event.id
                )));
            }
            tables.events.insert(event.id, event.clone());
            Ok(())
        })
    }

    fn update_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            match tables.events.get_mut(&event.id) {
                Some(stored) => {
                    *stored = event.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn delete_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<bool>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let existed = tables.events.remove(&id).is_some();
            tables.polls.remove(&id);
            tables.chat.remove(&id);
            Ok(existed)
        })
    }

    fn poll_options(&self, event_id: EventId) -> BoxFuture<'_, StoreResult<Vec<PollOption>>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            Ok(tables
                .polls
                .get(&event_id)
                .map(|rows| rows.values().cloned().collect())
                .unwrap_or_default())
        })
    }

    fn seed_poll_options<'a>(
        &'a self,
        event_id: EventId,
        names: &'a [String],
    ) -> BoxFuture<'a, StoreResult<u64>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if !tables.events.contains_key(&event_id) {
                return Err(MatchdayError::Conflict(format!(
                    "event {event_id} does not exist"
                )));
            }
            let now = Utc::now();
            let rows = tables.polls.entry(event_id).or_default();
            let mut created = 0;
            for name in names {
                if !rows.contains_key(name) {
                    rows.insert(
                        name.clone(),
                        PollOption {
                            event_id,
                            option_name: name.clone(),
                            votes: 0,
                            updated_at: now,
                        },
                    );
                    created += 1;
                }
            }
            Ok(created)
        })
    }

    fn increment_vote<'a>(
        &'a self,
        event_id: EventId,
        option_name: &'a str,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if !tables.events.contains_key(&event_id) {
                return Err(MatchdayError::Conflict(format!(
                    "event {event_id} does not exist"
                )));
            }
            let now = Utc::now();
            let row = tables
                .polls
                .entry(event_id)
                .or_default()
                .entry(option_name.to_string())
                .or_insert_with(|| PollOption {
                    event_id,
                    option_name: option_name.to_string(),
                    votes: 0,
                    updated_at: now,
                });
            row.votes = row.votes.saturating_add(1);
            row.updated_at = now;
            Ok(())
        })
    }

    fn insert_chat_message(
        &self,
        message: NewChatMessage,
    ) -> BoxFuture<'_, StoreResult<ChatMessage>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            if !tables.events.contains_key(&message.event_id) {
                return Err(MatchdayError::Conflict(format!(
                    "event {} does not exist",
                    message.event_id
                )));
            }
            tables.next_chat_id += 1;
            let stored = ChatMessage {
                id: tables.next_chat_id,
                event_id: message.event_id,
                username: message.username,
                message: message.message,
                created_at: message.created_at,
            };
            tables
                .chat
                .entry(stored.event_id)
                .or_default()
                .push(stored.clone());
            Ok(stored)
        })
    }

    fn recent_chat_messages(
        &self,
        event_id: EventId,
        limit: usize,
    ) -> BoxFuture<'_, StoreResult<Vec<ChatMessage>>> {
        Box::pin(async move {
            let tables = self.tables.read().await;
            let mut log = tables.chat.get(&event_id).cloned().unwrap_or_default();
            sort_chronologically(&mut log);
            let skip = log.len().saturating_sub(limit);
            Ok(log.into_iter().skip(skip).collect())
        })
    }

    fn prune_chat_before(&self, cutoff: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let mut removed = 0;
            for log in tables.chat.values_mut() {
                let before = log.len();
                log.retain(|m| m.created_at >= cutoff);
                removed += before - log.len();
            }
            Ok(removed as u64)
        })
    }

    fn prune_chat_keep_latest(
        &self,
        event_id: EventId,
        keep: usize,
    ) -> BoxFuture<'_, StoreResult<u64>> {
        Box::pin(async move {
            let mut tables = self.tables.write().await;
            let Some(log) = tables.chat.get_mut(&event_id) else {
                return Ok(0);
            };
            sort_chronologically(log);
            let excess = log.len().saturating_sub(keep);
            log.drain(..excess);
            Ok(excess as u64)
        })
    }

    fn health_check(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventDraft, EventStatus};

    fn make_event() -> Event {
        let Ok(draft) = EventDraft::new(
            "Red",
            "Blue",
            "Cup",
            Utc::now(),
            "https://cdn.example.com/a.m3u8",
            EventStatus::Upcoming,
        ) else {
            panic!("valid draft");
        };
        Event::from_draft(EventId::new(), draft, Utc::now())
    }

    fn chat(event_id: EventId, text: &str, created_at: DateTime<Utc>) -> NewChatMessage {
        NewChatMessage {
            event_id,
            username: "fan".to_string(),
            message: text.to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = MemoryStore::new();
        let event = make_event();
        assert!(store.insert_event(&event).await.is_ok());

        let Ok(Some(fetched)) = store.get_event(event.id).await else {
            panic!("event not found");
        };
        assert_eq!(fetched, event);
    }

    #[tokio::test]
    async fn duplicate_insert_conflicts() {
        let store = MemoryStore::new();
        let event = make_event();
        let _ = store.insert_event(&event).await;
        assert!(matches!(
            store.insert_event(&event).await,
            Err(MatchdayError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn list_orders_by_start_time_and_filters() {
        let store = MemoryStore::new();
        let mut late = make_event();
        late.start_time = Utc::now() + chrono::Duration::hours(2);
        let mut early = make_event();
        early.start_time = Utc::now() + chrono::Duration::hours(1);
        early.status = EventStatus::Live;
        let _ = store.insert_event(&late).await;
        let _ = store.insert_event(&early).await;

        let Ok(all) = store.list_events(None).await else {
            panic!("list failed");
        };
        let ids: Vec<EventId> = all.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);

        let Ok(live) = store.list_events(Some(EventStatus::Live)).await else {
            panic!("list failed");
        };
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn delete_cascades() {
        let store = MemoryStore::new();
        let event = make_event();
        let _ = store.insert_event(&event).await;
        let _ = store.increment_vote(event.id, "Red").await;
        let _ = store
            .insert_chat_message(chat(event.id, "hi", Utc::now()))
            .await;

        assert!(matches!(store.delete_event(event.id).await, Ok(true)));
        assert!(matches!(store.delete_event(event.id).await, Ok(false)));
        assert!(matches!(store.poll_options(event.id).await, Ok(rows) if rows.is_empty()));
        assert!(matches!(
            store.recent_chat_messages(event.id, 100).await,
            Ok(log) if log.is_empty()
        ));
    }

    #[tokio::test]
    async fn seeding_ignores_existing_rows() {
        let store = MemoryStore::new();
        let event = make_event();
        let _ = store.insert_event(&event).await;
        let names = event.team_names();

        assert!(matches!(store.seed_poll_options(event.id, &names).await, Ok(2)));
        let _ = store.increment_vote(event.id, "Red").await;
        assert!(matches!(store.seed_poll_options(event.id, &names).await, Ok(0)));

        let Ok(rows) = store.poll_options(event.id).await else {
            panic!("read failed");
        };
        let red = rows.iter().find(|r| r.option_name == "Red").map(|r| r.votes);
        assert_eq!(red, Some(1));
    }

    #[tokio::test]
    async fn recent_breaks_timestamp_ties_by_insertion() {
        let store = MemoryStore::new();
        let event = make_event();
        let _ = store.insert_event(&event).await;
        let at = Utc::now();
        for text in ["first", "second", "third"] {
            let _ = store.insert_chat_message(chat(event.id, text, at)).await;
        }

        let Ok(log) = store.recent_chat_messages(event.id, 2).await else {
            panic!("read failed");
        };
        let texts: Vec<&str> = log.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["second", "third"]);

        assert!(matches!(store.prune_chat_keep_latest(event.id, 1).await, Ok(2)));
        let Ok(log) = store.recent_chat_messages(event.id, 100).await else {
            panic!("read failed");
        };
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().map(|m| m.message.as_str()), Some("third"));
    }
}
