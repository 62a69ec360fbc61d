//! Inbox controller — the façade the presentation layer calls.
//!
//! Owns the store, the pull lifecycle, the alert channel, and the view
//! state (inbox visibility + detail dialog). User-initiated mutations go
//! server-first: the local store changes only after the server has
//! acknowledged, and a failed request leaves local state untouched with a
//! log line — the bell stays usable, nothing blocks.
//!
//! The controller is also the push-channel handler: stream inserts and
//! pull replacements interleave arbitrarily, which is safe because
//! `replace_all` is idempotent and authoritative.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bellbox_protocol::Notification;
use bellbox_stream::{ConnectionState, StreamHandler};
use parking_lot::RwLock;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::alerts::{Alert, AlertDispatcher};
use crate::api::NotificationApi;
use crate::store::NotificationStore;

/// Capacity of the alert channel. Alerts are ephemeral; when the consumer
/// falls this far behind, dropping is better than blocking the stream path.
const ALERT_CHANNEL_CAPACITY: usize = 16;

/// Read-only view model consumed by the presentation layer.
#[derive(Debug, Clone)]
pub struct InboxView {
    /// Current sequence, most-recent-first.
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    /// Inbox dropdown visibility.
    pub visible: bool,
    /// Detail dialog contents; only ever set while the inbox is visible.
    pub detail: Option<Notification>,
    /// Push-channel state for the live/offline indicator; `None` when no
    /// stream is attached (e.g. logged out).
    pub connection: Option<ConnectionState>,
}

struct ViewState {
    visible: bool,
    detail: Option<Notification>,
}

pub struct InboxController<A: NotificationApi> {
    store: NotificationStore,
    api: A,
    alert_tx: mpsc::Sender<Alert>,
    view: RwLock<ViewState>,
    /// Monotonically increasing pull token: only the response matching the
    /// latest issued token is applied, so a slow stale pull can never
    /// overwrite a newer one.
    pull_token: AtomicU64,
    connection: RwLock<Option<watch::Receiver<ConnectionState>>>,
}

impl<A: NotificationApi> InboxController<A> {
    /// Build a controller around a pull API client. Returns the receiving
    /// end of the alert channel for the ephemeral toast surface.
    pub fn new(api: A) -> (Arc<Self>, mpsc::Receiver<Alert>) {
        let (alert_tx, alert_rx) = mpsc::channel(ALERT_CHANNEL_CAPACITY);
        let controller = Arc::new(Self {
            store: NotificationStore::new(),
            api,
            alert_tx,
            view: RwLock::new(ViewState {
                visible: false,
                detail: None,
            }),
            pull_token: AtomicU64::new(0),
            connection: RwLock::new(None),
        });
        (controller, alert_rx)
    }

    /// Attach the push-channel state watch for the live/offline indicator.
    pub fn attach_connection(&self, state: watch::Receiver<ConnectionState>) {
        *self.connection.write() = Some(state);
    }

    /// Detach the indicator (stream torn down at logout).
    pub fn detach_connection(&self) {
        *self.connection.write() = None;
    }

    /// Toggle inbox visibility. The closed→open transition triggers a full
    /// pull; closing has no side effect beyond dismissing the detail dialog.
    pub async fn open(&self) {
        let now_visible = {
            let mut view = self.view.write();
            view.visible = !view.visible;
            if !view.visible {
                view.detail = None;
            }
            view.visible
        };

        if now_visible {
            self.refresh().await;
        }
    }

    /// Explicit re-pull, valid regardless of visibility.
    ///
    /// In-flight pulls are not cancelled; instead each pull takes a token
    /// and only the latest one may apply its response.
    pub async fn refresh(&self) {
        let token = self.pull_token.fetch_add(1, Ordering::SeqCst) + 1;

        match self.api.fetch_all().await {
            Ok(notifications) => {
                if self.pull_token.load(Ordering::SeqCst) == token {
                    self.store.replace_all(notifications);
                } else {
                    debug!("discarding stale pull response");
                }
            }
            Err(e) => warn!("notification pull failed: {e}"),
        }
    }

    /// Mark one notification read, server-first.
    pub async fn mark_read(&self, id: &str) {
        match self.api.mark_read(id).await {
            Ok(()) => {
                self.store.mark_read(id);
            }
            Err(e) => warn!(id, "mark-read failed, local state unchanged: {e}"),
        }
    }

    /// Mark everything read, server-first.
    pub async fn mark_all_read(&self) {
        match self.api.mark_all_read().await {
            Ok(()) => self.store.mark_all_read(),
            Err(e) => warn!("mark-all-read failed, local state unchanged: {e}"),
        }
    }

    /// Delete one notification, server-first.
    pub async fn delete(&self, id: &str) {
        match self.api.delete(id).await {
            Ok(()) => {
                self.store.remove(id);
            }
            Err(e) => warn!(id, "delete failed, local state unchanged: {e}"),
        }
    }

    /// Open the detail dialog. A pure view-state toggle; only allowed while
    /// the inbox itself is open.
    pub fn open_detail(&self, notification: Notification) {
        let mut view = self.view.write();
        if view.visible {
            view.detail = Some(notification);
        }
    }

    pub fn close_detail(&self) {
        self.view.write().detail = None;
    }

    /// One consistent snapshot for rendering. Presentation never reaches
    /// into the store directly.
    pub fn view(&self) -> InboxView {
        let view = self.view.read();
        let connection = self.connection.read().as_ref().map(|rx| *rx.borrow());
        InboxView {
            notifications: self.store.snapshot(),
            unread_count: self.store.unread_count(),
            visible: view.visible,
            detail: view.detail.clone(),
            connection,
        }
    }

    /// Direct store access for the host application (read-mostly; all
    /// mutations should go through the controller).
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }
}

impl<A: NotificationApi> StreamHandler for InboxController<A> {
    /// Push path: insert, and raise a toast only when the insert was new —
    /// duplicate delivery from overlapping push/pull must not re-alert.
    async fn on_notification(&self, notification: Notification) {
        let alert = AlertDispatcher::evaluate(&notification);
        if !self.store.insert(notification) {
            return;
        }

        if let Some(alert) = alert {
            if let Err(e) = self.alert_tx.try_send(alert) {
                debug!("alert dropped: {e}");
            }
        }
    }

    /// Refresh poke: a best-effort reconciliation pull, never an alert.
    async fn on_refresh(&self) {
        self.refresh().await;
    }
}
