//! Read/write loop for a single WebSocket connection.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{EventId, SiteEvent};

/// Runs the read/write loop for a single WebSocket connection.
///
/// Client commands adjust the subscription set; site events from the
/// [`broadcast::Receiver`] are forwarded when they match it.
pub async fn run_connection(socket: WebSocket, mut event_rx: broadcast::Receiver<SiteEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(&text, &mut subs);
                        let json = serde_json::to_string(&reply).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            event = event_rx.recv() => {
                match event {
                    Ok(site_event) => {
                        if !subs.matches(site_event.event_id()) {
                            continue;
                        }
                        tracing::debug!(
                            event_type = site_event.event_type_str(),
                            event_id = %site_event.event_id(),
                            "forwarding site event"
                        );
                        let msg = WsMessage::new(
                            uuid::Uuid::new_v4().to_string(),
                            WsMessageType::Event,
                            serde_json::to_value(&site_event).unwrap_or_default(),
                        );
                        let json = serde_json::to_string(&msg).unwrap_or_default();
                        if ws_tx.send(Message::text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Splits raw ids into parsed event ids and the wildcard flag.
fn parse_event_ids(raw: &[String]) -> Result<(Vec<EventId>, bool), String> {
    let mut ids = Vec::with_capacity(raw.len());
    let mut wildcard = false;
    for s in raw {
        if s == "*" {
            wildcard = true;
        } else {
            let id = s.parse::<EventId>().map_err(|e| e.to_string())?;
            ids.push(id);
        }
    }
    Ok((ids, wildcard))
}

/// Applies one client text frame and returns the reply to send.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> WsMessage {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return WsMessage::error("", 400, "malformed JSON");
    };
    if msg.msg_type != WsMessageType::Command {
        return WsMessage::error(msg.id, 400, "expected a command message");
    }
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return WsMessage::error(msg.id, 404, "unknown command");
    };

    match command {
        WsCommand::Subscribe { event_ids } => match parse_event_ids(&event_ids) {
            Ok((ids, wildcard)) => {
                subs.subscribe(&ids, wildcard);
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "subscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(reason) => WsMessage::error(msg.id, 400, &reason),
        },
        WsCommand::Unsubscribe { event_ids } => match parse_event_ids(&event_ids) {
            Ok((ids, wildcard)) => {
                subs.unsubscribe(&ids, wildcard);
                WsMessage::new(
                    msg.id,
                    WsMessageType::Response,
                    serde_json::json!({
                        "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        "remaining_count": subs.count(),
                        "wildcard": subs.is_subscribed_all(),
                    }),
                )
            }
            Err(reason) => WsMessage::error(msg.id, 400, &reason),
        },
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn command(id: &str, payload: &serde_json::Value) -> String {
        serde_json::json!({ "id": id, "type": "command", "payload": payload }).to_string()
    }

    #[test]
    fn subscribe_adds_ids() {
        let mut subs = SubscriptionManager::new();
        let event_id = EventId::new();
        let text = command(
            "c1",
            &serde_json::json!({ "command": "subscribe", "event_ids": [event_id.to_string()] }),
        );

        let reply = handle_text_message(&text, &mut subs);
        assert_eq!(reply.msg_type, WsMessageType::Response);
        assert_eq!(reply.id, "c1");
        assert_eq!(reply.payload["count"], 1);
        assert!(subs.matches(event_id));
    }

    #[test]
    fn wildcard_subscribe() {
        let mut subs = SubscriptionManager::new();
        let text = command(
            "c2",
            &serde_json::json!({ "command": "subscribe", "event_ids": ["*"] }),
        );
        let reply = handle_text_message(&text, &mut subs);
        assert_eq!(reply.payload["wildcard"], true);
        assert!(subs.matches(EventId::new()));
    }

    #[test]
    fn malformed_id_leaves_subscriptions_untouched() {
        let mut subs = SubscriptionManager::new();
        let text = command(
            "c3",
            &serde_json::json!({ "command": "subscribe", "event_ids": ["*", "nope"] }),
        );
        let reply = handle_text_message(&text, &mut subs);
        assert_eq!(reply.msg_type, WsMessageType::Error);
        assert!(!subs.is_subscribed_all());
    }

    #[test]
    fn garbage_and_unknown_commands() {
        let mut subs = SubscriptionManager::new();
        let reply = handle_text_message("{not json", &mut subs);
        assert_eq!(reply.payload["code"], 400);

        let text = command("c4", &serde_json::json!({ "command": "get_state" }));
        let reply = handle_text_message(&text, &mut subs);
        assert_eq!(reply.payload["code"], 404);
    }

    #[test]
    fn unsubscribe_reports_remaining() {
        let mut subs = SubscriptionManager::new();
        let a = EventId::new();
        let b = EventId::new();
        subs.subscribe(&[a, b], false);

        let text = command(
            "c5",
            &serde_json::json!({ "command": "unsubscribe", "event_ids": [a.to_string()] }),
        );
        let reply = handle_text_message(&text, &mut subs);
        assert_eq!(reply.payload["remaining_count"], 1);
        assert!(!subs.matches(a));
    }
}
