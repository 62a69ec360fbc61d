//! Pull API seam.
//!
//! The controller talks to the server through [`NotificationApi`] so tests
//! can substitute in-memory fakes. [`HttpNotificationApi`] is the real
//! implementation: one explicit response schema, bearer auth, and nothing
//! clever — anything that does not conform is an error for the caller to
//! log, not a shape to be guessed at.

use bellbox_protocol::{BellboxError, Endpoints, Notification, NotificationListResponse};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

/// Server-side operations the inbox needs.
///
/// Every mutation is acknowledged by the server before the local store is
/// touched, so implementations must only return `Ok` on a success status.
pub trait NotificationApi: Send + Sync + 'static {
    /// `GET /notifications` — the full current list, server-ordered.
    fn fetch_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Notification>, BellboxError>> + Send;

    /// `PATCH /notifications/{id}/read`.
    fn mark_read(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<(), BellboxError>> + Send;

    /// `PATCH /notifications/read-all`.
    fn mark_all_read(&self) -> impl std::future::Future<Output = Result<(), BellboxError>> + Send;

    /// `DELETE /notifications/{id}`.
    fn delete(&self, id: &str)
    -> impl std::future::Future<Output = Result<(), BellboxError>> + Send;
}

/// HTTP implementation of the pull API.
pub struct HttpNotificationApi {
    client: reqwest::Client,
    base_url: String,
    credential: SecretString,
}

impl HttpNotificationApi {
    pub fn new(base_url: impl Into<String>, credential: SecretString) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, credential)
    }

    /// Use a pre-configured client (timeouts are the caller's concern, not
    /// an engine contract).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        credential: SecretString,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credential,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.credential.expose_secret())
    }

    async fn send_ack(&self, request: reqwest::RequestBuilder) -> Result<(), BellboxError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| BellboxError::Request(e.to_string()))?;
        check_status(&response)?;
        Ok(())
    }
}

fn check_status(response: &reqwest::Response) -> Result<(), BellboxError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(BellboxError::Status {
            status: status.as_u16(),
        })
    }
}

impl NotificationApi for HttpNotificationApi {
    async fn fetch_all(&self) -> Result<Vec<Notification>, BellboxError> {
        let response = self
            .authorize(self.client.get(self.url(Endpoints::LIST)))
            .send()
            .await
            .map_err(|e| BellboxError::Request(e.to_string()))?;
        check_status(&response)?;

        let body: NotificationListResponse = response
            .json()
            .await
            .map_err(|e| BellboxError::Request(e.to_string()))?;
        debug!(count = body.data.len(), "notification list pulled");
        Ok(body.data)
    }

    async fn mark_read(&self, id: &str) -> Result<(), BellboxError> {
        self.send_ack(self.client.patch(self.url(&Endpoints::read(id))))
            .await
    }

    async fn mark_all_read(&self) -> Result<(), BellboxError> {
        self.send_ack(self.client.patch(self.url(Endpoints::READ_ALL)))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), BellboxError> {
        self.send_ack(self.client.delete(self.url(&Endpoints::delete(id))))
            .await
    }
}
