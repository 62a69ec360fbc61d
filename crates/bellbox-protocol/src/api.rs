//! Pull API wire shapes and endpoint paths.
//!
//! The pull API is an external collaborator; only the request/response
//! contracts consumed by the engine are specified here.

use serde::{Deserialize, Serialize};

use crate::model::Notification;

/// Response body of `GET /notifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub data: Vec<Notification>,
}

/// Pull API endpoint paths, relative to the API base URL.
pub struct Endpoints;

impl Endpoints {
    pub const LIST: &str = "/notifications";
    pub const READ_ALL: &str = "/notifications/read-all";

    pub fn read(id: &str) -> String {
        format!("/notifications/{id}/read")
    }

    pub fn delete(id: &str) -> String {
        format!("/notifications/{id}")
    }
}
