//! The notification record as issued by the server.
//!
//! Notifications are immutable except for `is_read`, which only ever
//! transitions false→true on the client. Deletion is terminal and always
//! server-acknowledged before it is applied locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages longer than this get a detail-view affordance in the inbox
/// dropdown instead of being rendered inline.
pub const LONG_MESSAGE_THRESHOLD: usize = 200;

/// Enumerated notification kind, as sent in the wire `type` field.
///
/// Unrecognized kinds deserialize to [`NotificationKind::Generic`] so a
/// server that starts emitting new kinds never breaks the inbox — unknown
/// entries are stored and listed, they just never raise alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    #[serde(rename = "stock-threshold")]
    StockThreshold,
    #[serde(rename = "bulk-operation-complete")]
    BulkOperationComplete,
    #[serde(rename = "duplicate-detected")]
    DuplicateDetected,
    #[serde(rename = "generic", other)]
    Generic,
}

/// Structured outcome of a bulk operation.
///
/// This is the primary contract for alert severity on
/// `bulk-operation-complete` notifications. Older servers omit it, in which
/// case the dispatcher falls back to a title-substring check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkOutcome {
    Success,
    Partial,
    Failure,
}

/// A server-issued notification record, uniquely identified by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Opaque server-assigned identifier.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    /// Structured bulk-operation outcome (absent on older servers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BulkOutcome>,
    /// Kind-dependent payload. Kept as raw JSON so a malformed context never
    /// fails deserialization of the whole record; typed accessors parse it
    /// on demand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl Notification {
    /// Whether the message is long enough to warrant the detail dialog.
    pub fn needs_detail_view(&self) -> bool {
        self.message.chars().count() > LONG_MESSAGE_THRESHOLD
    }

    /// Parse the context payload as an inventory snapshot.
    ///
    /// Only meaningful for `stock-threshold` notifications; returns `None`
    /// for other kinds or when the payload does not conform.
    pub fn stock_context(&self) -> Option<StockSnapshot> {
        if self.kind != NotificationKind::StockThreshold {
            return None;
        }
        self.context
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Inventory snapshot attached to `stock-threshold` notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub product_id: String,
    pub product_name: String,
    pub current_quantity: i64,
    pub threshold: i64,
}
