//! Domain layer: core types, validation rules, and the event system.
//!
//! This module contains the server-side domain model: event identity and
//! records, poll tallies, chat messages with their retention policy, and
//! the event bus for broadcasting state changes to WebSocket clients.

pub mod chat;
pub mod event;
pub mod event_bus;
pub mod event_id;
pub mod poll;
pub mod site_event;

pub use chat::{ChatMessage, NewChatMessage, RetentionPolicy};
pub use event::{Event, EventDraft, EventStatus};
pub use event_bus::EventBus;
pub use event_id::EventId;
pub use poll::{PollOption, PollTally};
pub use site_event::SiteEvent;
