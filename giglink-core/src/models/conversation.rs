//! Conversation and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The counterpart user of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Display name shown in the conversation list
    pub display_name: String,
    /// Avatar URL, if the user has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// The most recent message of a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One entry of the conversation list
///
/// The list itself is ordered most-recently-active first and holds each
/// id at most once; see `giglink-inbox` for the reconciliation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Opaque identifier, unique key
    pub id: String,
    /// Title of the order the thread is tied to
    pub order_title: String,
    /// The counterpart user
    pub other_user: Participant,
    /// Most recent message, absent for never-used threads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessage>,
    /// Messages received and not yet read by this user
    #[serde(default)]
    pub unread_count: u32,
}

/// A full message inside a conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
