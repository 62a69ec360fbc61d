//! Bellbox Engine
//!
//! The client-owned half of the notification system: the reconciled
//! in-memory store, the alert decision table, the pull API seam, and the
//! inbox controller that ties them together. The presentation layer talks
//! to [`InboxController`] only; nothing here performs rendering, and no
//! failure in here is allowed to break the host application.

pub mod alerts;
pub mod api;
pub mod controller;
pub mod store;

pub use alerts::{Alert, AlertDispatcher, AlertSeverity};
pub use api::{HttpNotificationApi, NotificationApi};
pub use controller::{InboxController, InboxView};
pub use store::NotificationStore;
