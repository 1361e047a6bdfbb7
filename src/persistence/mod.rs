//! Persistence layer: the [`MatchStore`] seam and its implementations.
//!
//! Services receive an `Arc<dyn MatchStore>` at construction time; no store
//! handle is global. [`postgres::PostgresStore`] is the production backend,
//! [`memory::MemoryStore`] keeps everything in process for tests and demos.
//!
//! Every method is a single atomic statement from the caller's point of
//! view. In particular [`MatchStore::seed_poll_options`] and
//! [`MatchStore::increment_vote`] must stay race-safe when two requests hit
//! the same `(event, option)` key at once.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;

use crate::domain::{ChatMessage, Event, EventId, EventStatus, NewChatMessage, PollOption};
use crate::error::MatchdayError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, MatchdayError>;

/// Storage for events, poll counters and chat messages.
pub trait MatchStore: Send + Sync + fmt::Debug {
    /// Fetches one event.
    fn get_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<Option<Event>>>;

    /// Lists events by start time ascending, optionally only one status.
    fn list_events(&self, status: Option<EventStatus>) -> BoxFuture<'_, StoreResult<Vec<Event>>>;

    /// Inserts a new event.
    fn insert_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<()>>;

    /// Overwrites an existing event. Returns `false` if the id is unknown.
    fn update_event<'a>(&'a self, event: &'a Event) -> BoxFuture<'a, StoreResult<bool>>;

    /// Deletes an event together with its poll rows and chat messages.
    /// Returns `false` if the id is unknown.
    fn delete_event(&self, id: EventId) -> BoxFuture<'_, StoreResult<bool>>;

    /// Poll rows of an event ordered by option name ascending.
    fn poll_options(&self, event_id: EventId) -> BoxFuture<'_, StoreResult<Vec<PollOption>>>;

    /// Inserts zero-vote rows for `names`, ignoring rows that already exist.
    /// Returns how many rows were created.
    fn seed_poll_options<'a>(
        &'a self,
        event_id: EventId,
        names: &'a [String],
    ) -> BoxFuture<'a, StoreResult<u64>>;

    /// Adds one vote to `option_name`, creating the row at one vote if absent.
    fn increment_vote<'a>(
        &'a self,
        event_id: EventId,
        option_name: &'a str,
    ) -> BoxFuture<'a, StoreResult<()>>;

    /// Appends a chat message and returns it with its sequence id.
    fn insert_chat_message(&self, message: NewChatMessage)
    -> BoxFuture<'_, StoreResult<ChatMessage>>;

    /// The `limit` most recent messages of an event, oldest first.
    fn recent_chat_messages(
        &self,
        event_id: EventId,
        limit: usize,
    ) -> BoxFuture<'_, StoreResult<Vec<ChatMessage>>>;

    /// Deletes messages of every event created before `cutoff`.
    fn prune_chat_before(&self, cutoff: DateTime<Utc>) -> BoxFuture<'_, StoreResult<u64>>;

    /// Deletes all but the `keep` most recent messages of one event.
    fn prune_chat_keep_latest(
        &self,
        event_id: EventId,
        keep: usize,
    ) -> BoxFuture<'_, StoreResult<u64>>;

    /// Verifies the backend is reachable.
    fn health_check(&self) -> BoxFuture<'_, StoreResult<()>>;
}
