//! Account status check performed before a model call.
//!
//! A separate service decides whether the caller may use the requested
//! model (usage caps, subscription state). The edge forwards the caller's
//! `Authorization` header and relays a refusal verbatim.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::model::ModelKind;

/// Outcome of a status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusVerdict {
    /// The request may proceed.
    Allowed,
    /// The request is refused; the text is shown to the user as-is.
    Denied(String),
}

/// Decides whether a caller may use a model.
#[async_trait]
pub trait AccountStatus: Send + Sync {
    /// Check `auth` (the caller's raw `Authorization` header) for `model`.
    ///
    /// # Errors
    ///
    /// Transport failures talking to the status service.
    async fn check(&self, auth: Option<&str>, model: ModelKind) -> Result<StatusVerdict>;
}

/// Status service reached over HTTP.
///
/// Sends `POST <url>` with `{"model": "<id>"}`; any 2xx allows the
/// request, anything else denies it with the response body.
#[derive(Debug, Clone)]
pub struct HttpAccountStatus {
    url: String,
    http: reqwest::Client,
}

impl HttpAccountStatus {
    /// Create a checker for `url`.
    pub fn new(url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }
}

#[async_trait]
impl AccountStatus for HttpAccountStatus {
    async fn check(&self, auth: Option<&str>, model: ModelKind) -> Result<StatusVerdict> {
        let mut req = self
            .http
            .post(&self.url)
            .json(&serde_json::json!({ "model": model.id() }));
        if let Some(auth) = auth {
            req = req.header("Authorization", auth);
        }

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(StatusVerdict::Allowed);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(%status, model = %model, "account status check refused request");
        Ok(StatusVerdict::Denied(body))
    }
}
