//! Stream-layer tests — connection lifecycle against an in-process
//! WebSocket server: frame delivery, malformed-frame tolerance, and the
//! fixed-delay reconnect loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use bellbox_protocol::{Notification, NotificationKind, PushFrame};
use bellbox_stream::{ConnectionState, StreamConfig, StreamConnection, StreamHandler};
use chrono::Utc;
use parking_lot::Mutex;
use secrecy::SecretString;
use tokio::sync::broadcast;

// ─────────────────────────────────────────────────────────────────────────
// Test server and handler
// ─────────────────────────────────────────────────────────────────────────

/// Commands the test pushes down every connected socket.
#[derive(Debug, Clone)]
enum ServerCmd {
    Frame(String),
    Close,
}

async fn start_push_server() -> (u16, broadcast::Sender<ServerCmd>) {
    let (cmd_tx, _) = broadcast::channel::<ServerCmd>(64);

    let app = Router::new()
        .route("/stream", get(ws_handler))
        .with_state(cmd_tx.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (port, cmd_tx)
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(cmd_tx): State<broadcast::Sender<ServerCmd>>,
) -> impl IntoResponse {
    let mut cmd_rx = cmd_tx.subscribe();
    ws.on_upgrade(move |mut socket: WebSocket| async move {
        loop {
            match cmd_rx.recv().await {
                Ok(ServerCmd::Frame(text)) => {
                    if socket.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Ok(ServerCmd::Close) => {
                    let _ = socket.send(Message::Close(None)).await;
                    break;
                }
                Err(_) => break,
            }
        }
    })
}

/// Records everything the stream hands over.
#[derive(Default)]
struct RecordingHandler {
    notifications: Mutex<Vec<Notification>>,
    refreshes: AtomicUsize,
}

impl StreamHandler for RecordingHandler {
    async fn on_notification(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }

    async fn on_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }
}

fn push_frame(id: &str) -> String {
    let data = Notification {
        id: id.into(),
        kind: NotificationKind::Generic,
        title: format!("judul {id}"),
        message: String::new(),
        is_read: false,
        created_at: Utc::now(),
        outcome: None,
        context: None,
    };
    serde_json::to_string(&PushFrame::NewNotification { data }).unwrap()
}

fn test_config(port: u16) -> StreamConfig {
    let mut config = StreamConfig::new(format!("ws://127.0.0.1:{port}/stream"));
    config.retry_delay = Duration::from_millis(100);
    config
}

async fn wait_for_state(conn: &StreamConnection, wanted: ConnectionState) {
    let mut watch = conn.state_watch();
    tokio::time::timeout(Duration::from_secs(5), async {
        while *watch.borrow() != wanted {
            watch.changed().await.unwrap();
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {wanted:?}"));
}

async fn wait_until(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// ─────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn frames_reach_the_handler() {
    let (port, cmd_tx) = start_push_server().await;
    let handler = Arc::new(RecordingHandler::default());

    let conn = StreamConnection::connect(
        test_config(port),
        SecretString::from("token"),
        handler.clone(),
    )
    .unwrap();
    wait_for_state(&conn, ConnectionState::Open).await;

    cmd_tx.send(ServerCmd::Frame(push_frame("a"))).unwrap();
    cmd_tx
        .send(ServerCmd::Frame(r#"{"type":"NEW_ALERTS"}"#.into()))
        .unwrap();

    wait_until(|| handler.notifications.lock().len() == 1).await;
    wait_until(|| handler.refreshes.load(Ordering::SeqCst) == 1).await;
    assert_eq!(handler.notifications.lock()[0].id, "a");

    conn.disconnect().await;
}

#[tokio::test]
async fn malformed_frame_is_dropped_without_retry() {
    let (port, cmd_tx) = start_push_server().await;
    let handler = Arc::new(RecordingHandler::default());

    let conn = StreamConnection::connect(
        test_config(port),
        SecretString::from("token"),
        handler.clone(),
    )
    .unwrap();
    wait_for_state(&conn, ConnectionState::Open).await;

    // Garbage, an unknown discriminator, then a valid frame.
    cmd_tx.send(ServerCmd::Frame("{not json".into())).unwrap();
    cmd_tx
        .send(ServerCmd::Frame(r#"{"type":"SOMETHING_ELSE"}"#.into()))
        .unwrap();
    cmd_tx.send(ServerCmd::Frame(push_frame("ok"))).unwrap();

    // The valid frame still arrives on the same connection.
    wait_until(|| handler.notifications.lock().len() == 1).await;
    assert_eq!(handler.notifications.lock()[0].id, "ok");
    assert_eq!(conn.state(), ConnectionState::Open);
    assert_eq!(handler.refreshes.load(Ordering::SeqCst), 0);

    conn.disconnect().await;
}

#[tokio::test]
async fn reconnects_after_server_close() {
    let (port, cmd_tx) = start_push_server().await;
    let handler = Arc::new(RecordingHandler::default());

    let conn = StreamConnection::connect(
        test_config(port),
        SecretString::from("token"),
        handler.clone(),
    )
    .unwrap();
    wait_for_state(&conn, ConnectionState::Open).await;

    cmd_tx.send(ServerCmd::Close).unwrap();
    wait_for_state(&conn, ConnectionState::ClosedRetrying).await;

    // The fixed-delay retry brings the channel back on its own.
    wait_for_state(&conn, ConnectionState::Open).await;
    cmd_tx.send(ServerCmd::Frame(push_frame("after"))).unwrap();
    wait_until(|| handler.notifications.lock().len() == 1).await;
    assert_eq!(handler.notifications.lock()[0].id, "after");

    conn.disconnect().await;
}
