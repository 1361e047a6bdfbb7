//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EventBus, RetentionPolicy};
use crate::persistence::MatchStore;
use crate::service::{ChatService, EventService, PollService};

/// Client refresh hints served to polling front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIntervals {
    /// Chat re-fetch interval in milliseconds.
    pub chat_ms: u64,
    /// Poll re-fetch interval in milliseconds.
    pub poll_ms: u64,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            chat_ms: 3000,
            poll_ms: 5000,
        }
    }
}

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Match CRUD and lookups.
    pub event_service: Arc<EventService>,
    /// Poll tallies and voting.
    pub poll_service: Arc<PollService>,
    /// Chat intake and retention.
    pub chat_service: Arc<ChatService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Bearer token guarding admin routes; `None` leaves them open.
    pub admin_token: Option<Arc<str>>,
    /// Refresh hints for polling clients.
    pub refresh: RefreshIntervals,
}

impl AppState {
    /// Wires the three services around one store and one bus.
    ///
    /// Admin routes start open and refresh hints at their defaults; see
    /// [`AppState::with_admin_token`] and [`AppState::with_refresh`].
    #[must_use]
    pub fn new(store: Arc<dyn MatchStore>, event_bus: EventBus, policy: RetentionPolicy) -> Self {
        Self {
            event_service: Arc::new(EventService::new(Arc::clone(&store), event_bus.clone())),
            poll_service: Arc::new(PollService::new(Arc::clone(&store), event_bus.clone())),
            chat_service: Arc::new(ChatService::new(store, event_bus.clone(), policy)),
            event_bus,
            admin_token: None,
            refresh: RefreshIntervals::default(),
        }
    }

    /// Requires `Authorization: Bearer <token>` on admin routes.
    #[must_use]
    pub fn with_admin_token(mut self, token: &str) -> Self {
        self.admin_token = Some(Arc::from(token));
        self
    }

    /// Overrides the refresh hints.
    #[must_use]
    pub fn with_refresh(mut self, refresh: RefreshIntervals) -> Self {
        self.refresh = refresh;
        self
    }
}
