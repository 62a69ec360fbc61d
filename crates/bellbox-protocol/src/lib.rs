//! Bellbox - Protocol Types
//!
//! Wire types for the notification inbox engine. This crate is the single
//! source of truth for the notification record, the push-channel envelope,
//! the pull API response schemas, and the engine error type. Everything the
//! server and client exchange is defined here; nothing else in the workspace
//! hand-rolls a wire shape.

pub mod api;
pub mod envelope;
pub mod error;
pub mod model;

pub use api::{Endpoints, NotificationListResponse};
pub use envelope::PushFrame;
pub use error::BellboxError;
pub use model::{
    BulkOutcome, Notification, NotificationKind, StockSnapshot, LONG_MESSAGE_THRESHOLD,
};
