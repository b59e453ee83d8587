//! Typed push events and the in-process event bus
//!
//! The notification channel delivers `PushEvent`s; consumers that want to
//! observe state changes register a handler on an [`EventBus`] and hold
//! the returned [`Subscription`] — dropping it always unregisters the
//! handler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Message payload carried by an inbound-message event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A new message arrived for some conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub conversation_id: String,
    pub message: EventMessage,
}

impl MessageEvent {
    pub fn new(
        conversation_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message: EventMessage {
                content: content.into(),
                created_at,
            },
        }
    }
}

/// Typed events delivered by the push channel
///
/// Payloads that do not match any variant (missing fields, unknown tags)
/// fail deserialization and are dropped by the transport; this layer
/// never sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PushEvent {
    /// Inbound message for a conversation
    Message(MessageEvent),
    /// Channel connection state reported by the server
    Status { status: String },
    /// Server-side error notice
    Error { message: String },
}

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct BusInner<T> {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<u64, Handler<T>>>,
}

/// In-process publish/subscribe hub
///
/// Handlers run synchronously on the publisher's task; invocation order
/// across handlers is unspecified.
pub struct EventBus<T> {
    inner: Arc<BusInner<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(0),
                handlers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a handler; the returned disposer unregisters it on drop
    pub fn subscribe<F>(&self, handler: F) -> Subscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut handlers) = self.inner.handlers.lock() {
            handlers.insert(id, Arc::new(handler));
        }
        Subscription {
            id,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Deliver an event to every registered handler
    pub fn publish(&self, event: &T) {
        // Snapshot the handlers so one may subscribe/unsubscribe reentrantly
        let handlers: Vec<Handler<T>> = match self.inner.handlers.lock() {
            Ok(handlers) => handlers.values().cloned().collect(),
            Err(_) => return,
        };
        if handlers.is_empty() {
            tracing::debug!("No subscribers for event");
            return;
        }
        for handler in handlers {
            handler(event);
        }
    }

    /// Number of live subscriptions
    pub fn handler_count(&self) -> usize {
        self.inner
            .handlers
            .lock()
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposer for a registered handler
pub struct Subscription<T> {
    id: u64,
    inner: Arc<BusInner<T>>,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Ok(mut handlers) = self.inner.handlers.lock() {
            handlers.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_subscribe_receives_published_events() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_ref = Arc::clone(&seen);

        let _sub = bus.subscribe(move |n| {
            seen_ref.fetch_add(*n as usize, Ordering::SeqCst);
        });

        bus.publish(&2);
        bus.publish(&3);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_dropping_subscription_unregisters_handler() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_ref = Arc::clone(&seen);

        let sub = bus.subscribe(move |_| {
            seen_ref.fetch_add(1, Ordering::SeqCst);
        });
        bus.publish(&1);
        assert_eq!(bus.handler_count(), 1);

        drop(sub);
        assert_eq!(bus.handler_count(), 0);
        bus.publish(&1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_push_event_message_wire_format() {
        let json = r#"{
            "type": "message",
            "conversationId": "c-4",
            "message": {"content": "hi", "createdAt": "2025-11-02T12:00:00Z"}
        }"#;
        let event: PushEvent = serde_json::from_str(json).unwrap();
        match event {
            PushEvent::Message(ev) => {
                assert_eq!(ev.conversation_id, "c-4");
                assert_eq!(ev.message.content, "hi");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_push_event_rejects_malformed_payloads() {
        // Missing the message payload entirely
        assert!(serde_json::from_str::<PushEvent>(r#"{"type": "message", "conversationId": "c-1"}"#)
            .is_err());
        // Unknown tag
        assert!(serde_json::from_str::<PushEvent>(r#"{"type": "typing", "conversationId": "c-1"}"#)
            .is_err());
        // Missing conversation id
        assert!(serde_json::from_str::<PushEvent>(
            r#"{"type": "message", "message": {"content": "x", "createdAt": "2025-11-02T12:00:00Z"}}"#
        )
        .is_err());
    }
}
