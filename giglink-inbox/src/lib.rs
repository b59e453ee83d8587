//! Live conversation list for giglink
//!
//! Three pieces: the pure [`reconciler`] that keeps the in-memory list
//! ordered and deduplicated, the [`channel`] transport that turns the
//! push WebSocket into a serial stream of typed events, and the
//! [`service`] that wires both to the snapshot API.

pub mod channel;
pub mod reconciler;
pub mod service;

pub use channel::PushChannel;
pub use reconciler::{filter_by_text, ConversationList, EventOutcome};
pub use service::{InboxService, InboxUpdate, SnapshotSource, UpdateReason};
