//! Engine error type.
//!
//! Nothing in this taxonomy is fatal: transport errors are retried,
//! malformed frames are dropped, and pull/mutation failures leave local
//! state untouched. Errors exist to carry context into log lines, not to
//! propagate upward into the host application.

/// Failures the notification engine can encounter.
#[derive(Debug, thiserror::Error)]
pub enum BellboxError {
    /// WebSocket-level failure — connect, read, or unexpected close.
    #[error("stream transport error: {0}")]
    Transport(String),

    /// A push frame that does not conform to the envelope schema.
    #[error("malformed push frame: {reason}")]
    MalformedFrame { reason: String },

    /// A pull API request that never produced a response.
    #[error("api request failed: {0}")]
    Request(String),

    /// A pull API response with a non-success status.
    #[error("api returned status {status}")]
    Status { status: u16 },
}
