//! Inbox service
//!
//! Single consumer of the push event stream: events are processed one at
//! a time, in arrival order, against the conversation list. A snapshot
//! fetched for any reason fully replaces local state.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use giglink_api::{ApiClient, ApiResult};
use giglink_core::bus::{EventBus, PushEvent};
use giglink_core::models::ConversationSummary;

use crate::reconciler::{ConversationList, EventOutcome};

/// Source of authoritative conversation snapshots
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> ApiResult<Vec<ConversationSummary>>;
}

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch(&self) -> ApiResult<Vec<ConversationSummary>> {
        self.conversations().list().await
    }
}

/// Why the list changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateReason {
    /// Initial snapshot applied
    Loaded,
    /// An inbound message was merged into an existing entry
    MessageApplied { conversation_id: String },
    /// A resync replaced the list after an unknown-conversation event
    Resynced,
}

/// Published to observers on every list change
#[derive(Debug, Clone)]
pub struct InboxUpdate {
    pub reason: UpdateReason,
    pub conversations: Vec<ConversationSummary>,
}

/// Drives the conversation list from snapshots and push events
pub struct InboxService {
    source: Arc<dyn SnapshotSource>,
    list: Arc<RwLock<ConversationList>>,
    updates: EventBus<InboxUpdate>,
}

impl InboxService {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            list: Arc::new(RwLock::new(ConversationList::new())),
            updates: EventBus::new(),
        }
    }

    /// Bus carrying an [`InboxUpdate`] for every list change
    pub fn updates(&self) -> &EventBus<InboxUpdate> {
        &self.updates
    }

    /// Initial snapshot load
    ///
    /// Errors propagate to the caller: on a failed first load the list
    /// stays empty and the error is user-visible. Returns the number of
    /// conversations loaded.
    pub async fn load(&self) -> ApiResult<usize> {
        let snapshot = self.source.fetch().await?;
        let count = {
            let mut list = self.list.write().await;
            list.replace(snapshot);
            list.len()
        };
        info!("Loaded {} conversations", count);
        self.publish(UpdateReason::Loaded).await;
        Ok(count)
    }

    /// Apply one push event
    ///
    /// Message events for known conversations merge directly. An unknown
    /// conversation triggers a best-effort resync: the event is
    /// discarded (the refreshed snapshot reflects it), and a failed
    /// resync keeps the stale list rather than surfacing an error.
    pub async fn handle_event(&self, event: PushEvent) {
        match event {
            PushEvent::Message(ev) => {
                let outcome = {
                    let mut list = self.list.write().await;
                    list.apply_event(&ev)
                };
                match outcome {
                    EventOutcome::Applied => {
                        debug!(conversation_id = %ev.conversation_id, "Merged inbound message");
                        self.publish(UpdateReason::MessageApplied {
                            conversation_id: ev.conversation_id,
                        })
                        .await;
                    }
                    EventOutcome::ResyncRequired => {
                        debug!(
                            conversation_id = %ev.conversation_id,
                            "Unknown conversation, resyncing"
                        );
                        self.resync().await;
                    }
                }
            }
            PushEvent::Status { status } => {
                debug!("Push channel status: {}", status);
            }
            PushEvent::Error { message } => {
                warn!("Push channel reported error: {}", message);
            }
        }
    }

    /// Consume events until the sender closes or shutdown fires
    ///
    /// This is the single consumer: processing order matches arrival
    /// order by construction.
    pub async fn run(&self, mut events: mpsc::Receiver<PushEvent>, mut shutdown: mpsc::Receiver<()>) {
        info!("Inbox service running");
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            debug!("Event stream closed");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    info!("Inbox service shutting down");
                    break;
                }
            }
        }
    }

    /// Current list contents, most recently active first
    pub async fn snapshot(&self) -> Vec<ConversationSummary> {
        self.list.read().await.entries().to_vec()
    }

    pub async fn total_unread(&self) -> u64 {
        self.list.read().await.total_unread()
    }

    async fn resync(&self) {
        match self.source.fetch().await {
            Ok(snapshot) => {
                let count = {
                    let mut list = self.list.write().await;
                    list.replace(snapshot);
                    list.len()
                };
                info!("Resynced conversation list ({} entries)", count);
                self.publish(UpdateReason::Resynced).await;
            }
            Err(e) => {
                // Stale-but-present beats empty: keep the old list.
                warn!("Resync failed, keeping stale list: {}", e);
            }
        }
    }

    async fn publish(&self, reason: UpdateReason) {
        let conversations = self.snapshot().await;
        self.updates.publish(&InboxUpdate {
            reason,
            conversations,
        });
    }
}
