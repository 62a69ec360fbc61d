//! Alert decision table.
//!
//! Decides whether a push-delivered notification warrants an ephemeral,
//! dismissible toast, and at what severity. Evaluated only on the push
//! path — pull-reconciled entries never re-alert, otherwise every refresh
//! would replay toasts the user has already seen.

use std::time::Duration;

use bellbox_protocol::{BulkOutcome, Notification, NotificationKind};

/// Title substring marking a failed bulk operation ("gagal" = failed).
///
/// Compatibility shim for servers that do not yet send the structured
/// `outcome` field; it is consulted only when `outcome` is absent.
pub const FAILURE_TITLE_MARKER: &str = "gagal";

/// Auto-dismiss delay for success toasts.
pub const SUCCESS_DISMISS: Duration = Duration::from_secs(5);
/// Auto-dismiss delay for warning toasts.
pub const WARNING_DISMISS: Duration = Duration::from_secs(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Success,
    Warning,
}

/// A transient, auto-dismissing user notice — distinct from the persisted
/// notification entry it was derived from. Clicking it opens the inbox;
/// it never marks anything read.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub auto_dismiss: Duration,
    pub title: String,
    pub message: String,
    /// Id of the notification this alert was raised for.
    pub notification_id: String,
}

/// The rule table, as a pure decision function.
pub struct AlertDispatcher;

impl AlertDispatcher {
    /// Evaluate one push-delivered notification against the rule table.
    ///
    /// | kind | condition | severity | dismiss |
    /// |---|---|---|---|
    /// | bulk-operation-complete | failed or partial | warning | 8 s |
    /// | bulk-operation-complete | otherwise | success | 5 s |
    /// | duplicate-detected | always | warning | 8 s |
    /// | anything else | — | no alert | — |
    pub fn evaluate(notification: &Notification) -> Option<Alert> {
        let severity = match notification.kind {
            NotificationKind::BulkOperationComplete => {
                if bulk_failed(notification) {
                    AlertSeverity::Warning
                } else {
                    AlertSeverity::Success
                }
            }
            NotificationKind::DuplicateDetected => AlertSeverity::Warning,
            _ => return None,
        };

        let auto_dismiss = match severity {
            AlertSeverity::Success => SUCCESS_DISMISS,
            AlertSeverity::Warning => WARNING_DISMISS,
        };

        Some(Alert {
            severity,
            auto_dismiss,
            title: notification.title.clone(),
            message: notification.message.clone(),
            notification_id: notification.id.clone(),
        })
    }
}

/// Whether a bulk operation should alert at warning severity.
///
/// The structured outcome is the primary contract; the title substring is
/// consulted only for servers that omit it.
fn bulk_failed(notification: &Notification) -> bool {
    match notification.outcome {
        Some(BulkOutcome::Success) => false,
        Some(BulkOutcome::Partial) | Some(BulkOutcome::Failure) => true,
        None => notification.title.contains(FAILURE_TITLE_MARKER),
    }
}
