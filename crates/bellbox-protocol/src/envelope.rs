//! Push-channel envelope — the discriminated wrapper around every frame the
//! server sends down the stream.
//!
//! Exactly one schema is accepted. Frames that do not conform (bad JSON,
//! unknown discriminator, missing payload) are rejected with
//! [`BellboxError::MalformedFrame`] so the stream layer can log and drop
//! them without guessing at alternate field names.

use serde::{Deserialize, Serialize};

use crate::error::BellboxError;
use crate::model::Notification;

/// A frame received on the push channel, discriminated by the top-level
/// `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PushFrame {
    /// One freshly created notification, payload under `data`.
    #[serde(rename = "NEW_NOTIFICATION")]
    NewNotification { data: Notification },
    /// No payload — a cheap "re-pull now" poke. The next pull is the
    /// recovery mechanism for anything a dropped connection missed.
    #[serde(rename = "NEW_ALERTS")]
    NewAlerts,
}

impl PushFrame {
    /// Parse a raw text frame into an envelope.
    pub fn parse(raw: &str) -> Result<Self, BellboxError> {
        serde_json::from_str(raw).map_err(|e| BellboxError::MalformedFrame {
            reason: e.to_string(),
        })
    }
}
