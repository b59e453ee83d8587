//! Push channel transport
//!
//! Maintains the WebSocket connection to the marketplace notification
//! channel and forwards typed events, in arrival order, into an mpsc
//! channel consumed by the inbox service. Reconnects with a fixed delay
//! when the connection drops.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

use giglink_core::bus::PushEvent;
use giglink_core::config::schema::PushConfig;
use giglink_core::session::AuthSession;
use giglink_core::utils::truncate;
use giglink_core::{Error, Result};

/// Handle to the push channel connection
pub struct PushChannel {
    url: String,
    reconnect_delay: Duration,
    running: bool,
    event_tx: Option<mpsc::Sender<PushEvent>>,
    connected: Arc<RwLock<bool>>,
    task_handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl PushChannel {
    /// Create a channel for one authenticated session
    pub fn new(config: &PushConfig, session: Arc<AuthSession>) -> Self {
        let separator = if config.url.contains('?') { '&' } else { '?' };
        let url = format!("{}{}token={}", config.url, separator, session.token());
        Self {
            url,
            reconnect_delay: Duration::from_secs(config.reconnect_secs),
            running: false,
            event_tx: None,
            connected: Arc::new(RwLock::new(false)),
            task_handle: None,
            shutdown_tx: None,
        }
    }

    /// Set the sender that receives parsed events
    pub fn set_event_sender(&mut self, tx: mpsc::Sender<PushEvent>) {
        self.event_tx = Some(tx);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Start the background connection loop
    pub async fn start(&mut self) -> Result<()> {
        if self.running {
            return Ok(());
        }
        let event_tx = self
            .event_tx
            .clone()
            .ok_or_else(|| Error::Channel("event sender not set".to_string()))?;

        info!("Starting push channel...");

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        self.shutdown_tx = Some(shutdown_tx);

        let url = self.url.clone();
        let delay = self.reconnect_delay;
        let connected = self.connected.clone();

        let handle = tokio::spawn(async move {
            Self::connection_loop(url, delay, connected, event_tx, shutdown_rx).await;
        });

        self.task_handle = Some(handle);
        self.running = true;

        info!("Push channel started");
        Ok(())
    }

    /// Stop the connection loop and close the socket
    pub async fn stop(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }

        info!("Stopping push channel...");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
        {
            let mut conn = self.connected.write().await;
            *conn = false;
        }

        self.running = false;
        info!("Push channel stopped");
        Ok(())
    }

    /// Parse one text frame into a typed event
    ///
    /// Malformed frames (invalid JSON, unknown tags, missing fields) are
    /// dropped with a warning; they are not actionable by this layer.
    fn parse_frame(raw: &str) -> Option<PushEvent> {
        match serde_json::from_str::<PushEvent>(raw) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Dropping malformed push frame: {} (raw: {})", e, truncate(raw, 100));
                None
            }
        }
    }

    async fn connection_loop(
        url: String,
        reconnect_delay: Duration,
        connected: Arc<RwLock<bool>>,
        event_tx: mpsc::Sender<PushEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut running = true;

        while running {
            info!("Connecting to push channel...");

            match connect_async(&url).await {
                Ok((ws_stream, _)) => {
                    info!("Connected to push channel");
                    let (_, mut read) = ws_stream.split();

                    {
                        let mut conn = connected.write().await;
                        *conn = true;
                    }

                    loop {
                        tokio::select! {
                            msg = read.next() => {
                                match msg {
                                    Some(Ok(WsMessage::Text(text))) => {
                                        if let Some(event) = Self::parse_frame(&text) {
                                            if let Err(e) = event_tx.send(event).await {
                                                error!("Failed to forward push event: {}", e);
                                                running = false;
                                                break;
                                            }
                                        }
                                    }
                                    Some(Ok(WsMessage::Close(_))) => {
                                        info!("Push channel closed by server");
                                        break;
                                    }
                                    Some(Err(e)) => {
                                        error!("Push channel error: {}", e);
                                        break;
                                    }
                                    None => {
                                        debug!("Push channel stream ended");
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                            _ = shutdown_rx.recv() => {
                                info!("Shutdown signal received");
                                running = false;
                                break;
                            }
                        }
                    }

                    {
                        let mut conn = connected.write().await;
                        *conn = false;
                    }
                }
                Err(e) => {
                    error!("Failed to connect to push channel: {}", e);
                }
            }

            if running {
                info!("Reconnecting in {:?}...", reconnect_delay);
                tokio::select! {
                    _ = tokio::time::sleep(reconnect_delay) => {}
                    _ = shutdown_rx.recv() => {
                        running = false;
                    }
                }
            }
        }

        info!("Push channel connection loop ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frame_accepts_message_events() {
        let raw = r#"{"type":"message","conversationId":"c-1","message":{"content":"hey","createdAt":"2025-11-02T12:00:00Z"}}"#;
        let event = PushChannel::parse_frame(raw).unwrap();
        assert!(matches!(event, PushEvent::Message(_)));
    }

    #[test]
    fn test_parse_frame_drops_malformed_payloads() {
        assert!(PushChannel::parse_frame("not json").is_none());
        assert!(PushChannel::parse_frame(r#"{"type":"message"}"#).is_none());
        assert!(PushChannel::parse_frame(r#"{"type":"presence","user":"u-1"}"#).is_none());
    }

    #[tokio::test]
    async fn test_start_requires_event_sender() {
        let config = PushConfig::default();
        let session = Arc::new(AuthSession::new("tok", "u-1", Default::default()));
        let mut channel = PushChannel::new(&config, session);
        assert!(channel.start().await.is_err());
        assert!(!channel.is_running());
    }
}
