use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Duration};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use giglink_api::ApiClient;
use giglink_core::config::schema::{ApiConfig, PushConfig};
use giglink_core::models::Role;
use giglink_core::session::AuthSession;
use giglink_inbox::{InboxService, PushChannel};

struct PushSession {
    frames: Vec<Value>,
    close_after_send: bool,
}

/// Local stand-in for the marketplace push endpoint
struct MockPush {
    url: String,
    connection_count: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MockPush {
    async fn spawn(sessions: Vec<PushSession>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock push listener");
        let addr = listener.local_addr().expect("get mock push address");
        let url = format!("ws://{}", addr);

        let connection_count = Arc::new(AtomicUsize::new(0));
        let conn_count_ref = Arc::clone(&connection_count);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            for session in sessions {
                let accept_fut = listener.accept();
                let (stream, _) = tokio::select! {
                    _ = &mut shutdown_rx => return,
                    accepted = accept_fut => match accepted {
                        Ok(v) => v,
                        Err(_) => return,
                    }
                };

                conn_count_ref.fetch_add(1, Ordering::SeqCst);

                let ws = match accept_async(stream).await {
                    Ok(ws) => ws,
                    Err(_) => return,
                };
                let (mut write, mut read) = ws.split();

                for frame in session.frames {
                    if write.send(WsMessage::Text(frame.to_string())).await.is_err() {
                        return;
                    }
                }

                if session.close_after_send {
                    let _ = write.send(WsMessage::Close(None)).await;
                    continue;
                }

                // Hold the connection open until shutdown
                loop {
                    tokio::select! {
                        _ = &mut shutdown_rx => {
                            let _ = write.send(WsMessage::Close(None)).await;
                            return;
                        }
                        ws_msg = read.next() => {
                            match ws_msg {
                                Some(Ok(WsMessage::Close(_))) | None => break,
                                Some(Err(_)) => break,
                                _ => {}
                            }
                        }
                    }
                }
            }
        });

        Self {
            url,
            connection_count,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    fn connection_count(&self) -> usize {
        self.connection_count.load(Ordering::SeqCst)
    }

    async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = timeout(Duration::from_secs(2), task).await;
        }
    }
}

fn message_frame(conversation_id: &str, content: &str) -> Value {
    json!({
        "type": "message",
        "conversationId": conversation_id,
        "message": {"content": content, "createdAt": "2025-11-02T12:00:00Z"}
    })
}

fn conversation_json(id: &str, title: &str, unread: u32) -> Value {
    json!({
        "id": id,
        "orderTitle": title,
        "otherUser": {"displayName": "Mara"},
        "unreadCount": unread
    })
}

fn api_client(server: &MockServer) -> Arc<ApiClient> {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    let session = Arc::new(AuthSession::new("tok-test", "u-1", Role::Client));
    Arc::new(ApiClient::new(&config, session))
}

fn push_channel(url: &str) -> PushChannel {
    let config = PushConfig {
        url: url.to_string(),
        reconnect_secs: 1,
    };
    let session = Arc::new(AuthSession::new("tok-test", "u-1", Role::Client));
    PushChannel::new(&config, session)
}

async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = Duration::from_secs(5);
    let check = async {
        loop {
            if condition().await {
                return;
            }
            sleep(Duration::from_millis(50)).await;
        }
    };
    timeout(deadline, check).await.expect("condition not reached in time");
}

#[tokio::test]
async fn push_events_flow_through_service_and_unknown_ids_resync() {
    let api_server = MockServer::start().await;
    // First snapshot: two conversations. Later fetches include the new one.
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            conversation_json("a", "Logo Design", 0),
            conversation_json("b", "Copywriting", 0),
        ])))
        .up_to_n_times(1)
        .mount(&api_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            conversation_json("z", "Brand Kit", 1),
            conversation_json("a", "Logo Design", 0),
            conversation_json("b", "Copywriting", 1),
        ])))
        .mount(&api_server)
        .await;

    let push = MockPush::spawn(vec![PushSession {
        frames: vec![
            json!({"type": "status", "status": "connected"}),
            message_frame("b", "hi there"),
            json!({"type": "presence", "user": "u-2"}),
            message_frame("z", "first contact"),
        ],
        close_after_send: false,
    }])
    .await;

    let service = Arc::new(InboxService::new(api_client(&api_server)));
    service.load().await.expect("initial snapshot");

    let (event_tx, event_rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let mut channel = push_channel(&push.url);
    channel.set_event_sender(event_tx);
    channel.start().await.expect("start push channel");

    let runner = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.run(event_rx, shutdown_rx).await;
        })
    };

    // The unknown-id event must end in a resync that brings "z" in front.
    {
        let service = Arc::clone(&service);
        wait_until(move || {
            let service = Arc::clone(&service);
            async move {
                service
                    .snapshot()
                    .await
                    .first()
                    .map(|c| c.id == "z")
                    .unwrap_or(false)
            }
        })
        .await;
    }

    let list = service.snapshot().await;
    let ids: Vec<&str> = list.iter().map(|c| c.id.as_str()).collect();
    // The refreshed snapshot is authoritative, replacing the local order.
    assert_eq!(ids, vec!["z", "a", "b"]);
    assert_eq!(list[0].unread_count, 1);
    assert_eq!(list[2].unread_count, 1);

    channel.stop().await.expect("stop push channel");
    runner.abort();
    push.shutdown().await;
}

#[tokio::test]
async fn push_channel_reconnects_and_keeps_delivering() {
    let api_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            conversation_json("a", "Logo Design", 0),
            conversation_json("b", "Copywriting", 0),
        ])))
        .mount(&api_server)
        .await;

    let push = MockPush::spawn(vec![
        PushSession {
            frames: vec![message_frame("a", "before reconnect")],
            close_after_send: true,
        },
        PushSession {
            frames: vec![message_frame("b", "after reconnect")],
            close_after_send: false,
        },
    ])
    .await;

    let service = Arc::new(InboxService::new(api_client(&api_server)));
    service.load().await.expect("initial snapshot");

    let (event_tx, event_rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = mpsc::channel(1);

    let mut channel = push_channel(&push.url);
    channel.set_event_sender(event_tx);
    channel.start().await.expect("start push channel");

    let runner = {
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            service.run(event_rx, shutdown_rx).await;
        })
    };

    {
        let service = Arc::clone(&service);
        wait_until(move || {
            let service = Arc::clone(&service);
            async move {
                service
                    .snapshot()
                    .await
                    .first()
                    .and_then(|c| c.last_message.as_ref())
                    .map(|m| m.content == "after reconnect")
                    .unwrap_or(false)
            }
        })
        .await;
    }

    assert!(push.connection_count() >= 2, "expected a reconnect");
    assert!(channel.is_connected().await);
    let list = service.snapshot().await;
    assert_eq!(list[0].id, "b");
    assert_eq!(list[1].id, "a");
    assert_eq!(
        list[1].last_message.as_ref().map(|m| m.content.as_str()),
        Some("before reconnect")
    );

    channel.stop().await.expect("stop push channel");
    runner.abort();
    push.shutdown().await;
}
