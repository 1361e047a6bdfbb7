//! # matchday
//!
//! Backend for a live soccer streaming site: match listings, a per-match
//! betting poll, and a short-lived per-match chat.
//!
//! Clients poll the REST endpoints on fixed intervals; the same writes are
//! also pushed to WebSocket subscribers. All state lives behind a
//! [`MatchStore`](persistence::MatchStore), backed by PostgreSQL in
//! production and by process-local tables for tests.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP polling, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── EventService / PollService / ChatService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     └── MatchStore (persistence/)
//!           ├── PostgresStore
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
