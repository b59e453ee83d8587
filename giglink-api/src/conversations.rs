//! Conversation endpoints

use serde::Serialize;

use giglink_core::models::{ConversationSummary, Message};

use crate::client::ApiClient;
use crate::error::ApiResult;

/// Conversation resource surface
pub struct ConversationsApi<'a> {
    client: &'a ApiClient,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest<'a> {
    content: &'a str,
}

impl<'a> ConversationsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch the full, authoritative conversation list (the snapshot)
    pub async fn list(&self) -> ApiResult<Vec<ConversationSummary>> {
        self.client.get("/conversations").await
    }

    /// Fetch the messages of one conversation, oldest first
    pub async fn messages(&self, conversation_id: &str) -> ApiResult<Vec<Message>> {
        self.client
            .get(&format!("/conversations/{}/messages", conversation_id))
            .await
    }

    /// Send a message into a conversation
    pub async fn send(&self, conversation_id: &str, content: &str) -> ApiResult<Message> {
        self.client
            .post(
                &format!("/conversations/{}/messages", conversation_id),
                &SendMessageRequest { content },
            )
            .await
    }

    /// Mark a conversation as read, resetting its unread counter
    /// server-side; the local list picks the reset up with the next
    /// snapshot.
    pub async fn mark_read(&self, conversation_id: &str) -> ApiResult<()> {
        self.client
            .post_action(&format!("/conversations/{}/read", conversation_id))
            .await
    }
}
