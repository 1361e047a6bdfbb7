//! WebSocket push channel: connection loop, command parsing, and
//! per-connection subscriptions.
//!
//! Clients connect to `/ws`, subscribe to one or more event ids (or `"*"`),
//! and receive every [`SiteEvent`](crate::domain::SiteEvent) published for
//! those events. The REST polling endpoints keep working alongside.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
