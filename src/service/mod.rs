//! Service layer: business logic orchestration.
//!
//! Each service owns an injected [`crate::persistence::MatchStore`] handle
//! and an [`crate::domain::EventBus`]. Mutations follow the pattern:
//! validate → single store write → read back → publish notification →
//! return snapshot.

pub mod chat_service;
pub mod event_service;
pub mod poll_service;

pub use chat_service::ChatService;
pub use event_service::EventService;
pub use poll_service::PollService;
