//! WebSocket push-channel client.
//!
//! One background task owns the socket for the life of the session:
//! connect, read frames, and on any drop tear the socket down and try again
//! after a fixed delay. The retry is indefinite with no backoff growth and
//! no cap — the channel is expected to be available whenever the session
//! credential is valid, so a single bell widget gains nothing from giving
//! up or slowing down.

use std::sync::Arc;
use std::time::Duration;

use bellbox_protocol::{BellboxError, Notification, PushFrame};
use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Delay between reconnect attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Push-channel configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// WebSocket endpoint, e.g. `ws://host:port/stream`.
    pub url: String,
    /// Fixed delay between reconnect attempts.
    pub retry_delay: Duration,
}

impl StreamConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Channel lifecycle state, for the unobtrusive live/offline indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    ClosedRetrying,
}

impl ConnectionState {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Trait implemented by the inbox side to receive push events.
/// The stream layer calls this for every well-formed frame.
pub trait StreamHandler: Send + Sync + 'static {
    /// A freshly pushed notification (insert + alert path).
    fn on_notification(
        &self,
        notification: Notification,
    ) -> impl std::future::Future<Output = ()> + Send;

    /// A "re-pull now" poke — a best-effort refresh that must not re-alert
    /// for entries the user has already seen.
    fn on_refresh(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// Handle to the live push channel.
///
/// Dropping the handle does not stop the background task; call
/// [`StreamConnection::disconnect`] at logout/unmount.
pub struct StreamConnection {
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: mpsc::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl StreamConnection {
    /// Open the push channel and start the reconnect loop.
    ///
    /// The credential is an explicit parameter — it is read once here and
    /// never refreshed mid-connection; if the server later invalidates it,
    /// the resulting close is handled like any other drop. An empty
    /// credential means the caller has not gated on authentication state:
    /// no connection is attempted and `None` is returned.
    pub fn connect<H: StreamHandler>(
        config: StreamConfig,
        credential: SecretString,
        handler: Arc<H>,
    ) -> Option<Self> {
        if credential.expose_secret().trim().is_empty() {
            debug!("no session credential available, push channel not started");
            return None;
        }

        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let handle = tokio::spawn(run_channel(config, credential, handler, state_tx, shutdown_rx));

        Some(Self {
            state_rx,
            shutdown_tx,
            handle,
        })
    }

    /// Current channel state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch channel for state transitions (live/offline indicator).
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Explicit teardown, used only at logout/unmount. Cancels any pending
    /// retry and does not reconnect.
    pub async fn disconnect(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
        info!("push channel disconnected");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection loop
// ─────────────────────────────────────────────────────────────────────────────

enum ReadOutcome {
    /// Transport error or server-side close — retry after the fixed delay.
    Dropped,
    /// Explicit disconnect — stop for good.
    Shutdown,
}

async fn run_channel<H: StreamHandler>(
    config: StreamConfig,
    credential: SecretString,
    handler: Arc<H>,
    state_tx: watch::Sender<ConnectionState>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    loop {
        let _ = state_tx.send(ConnectionState::Connecting);

        match open_socket(&config.url, &credential).await {
            Ok(socket) => {
                let _ = state_tx.send(ConnectionState::Open);
                info!("push channel connected to {}", config.url);

                if let ReadOutcome::Shutdown =
                    read_frames(socket, &handler, &mut shutdown_rx).await
                {
                    return;
                }
            }
            Err(e) => warn!("push channel connect failed: {e}"),
        }

        let _ = state_tx.send(ConnectionState::ClosedRetrying);

        tokio::select! {
            _ = tokio::time::sleep(config.retry_delay) => {}
            _ = shutdown_rx.recv() => {
                debug!("pending reconnect cancelled");
                return;
            }
        }
    }
}

async fn open_socket(url: &str, credential: &SecretString) -> Result<Socket, BellboxError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| BellboxError::Transport(e.to_string()))?;

    let bearer = format!("Bearer {}", credential.expose_secret());
    let value =
        HeaderValue::from_str(&bearer).map_err(|e| BellboxError::Transport(e.to_string()))?;
    request.headers_mut().insert(header::AUTHORIZATION, value);

    let (socket, _response) = connect_async(request)
        .await
        .map_err(|e| BellboxError::Transport(e.to_string()))?;
    Ok(socket)
}

async fn read_frames<H: StreamHandler>(
    mut socket: Socket,
    handler: &Arc<H>,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> ReadOutcome {
    loop {
        tokio::select! {
            frame = socket.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        // Malformed frames are logged and dropped; they do
                        // not tear down the connection.
                        match PushFrame::parse(text.as_str()) {
                            Ok(PushFrame::NewNotification { data }) => {
                                debug!(id = %data.id, "push notification received");
                                handler.on_notification(data).await;
                            }
                            Ok(PushFrame::NewAlerts) => {
                                debug!("refresh poke received");
                                handler.on_refresh().await;
                            }
                            Err(e) => warn!("dropping malformed frame: {e}"),
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = socket.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("push channel closed by server");
                        return ReadOutcome::Dropped;
                    }
                    Some(Err(e)) => {
                        warn!("push channel transport error: {e}");
                        return ReadOutcome::Dropped;
                    }
                    _ => {}
                }
            }

            _ = shutdown_rx.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                return ReadOutcome::Shutdown;
            }
        }
    }
}
