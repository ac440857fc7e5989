//! Model backend error types for edgechat-llm.
//!
//! Backend operations return [`Result<T>`] which uses [`ProviderError`]
//! as the error type. Truncation and routing have their own enums in
//! [`truncate`](crate::truncate) and [`router`](crate::router).
//!
//! The edge only needs to tell the caller whether the model service
//! failed or the edge did, so the variants split along that line.

use thiserror::Error;

/// Errors that can occur when talking to a model backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No API key is configured; nothing was sent.
    #[error("model backend not configured: {0}")]
    NotConfigured(&'static str),

    /// Client setup failed or the request never got an HTTP answer.
    #[error("model backend transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The model service answered with a non-success status.
    #[error("model backend rejected request with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The model service answered, but the payload was not a completion.
    #[error("model backend sent an unreadable {what}: {detail}")]
    Malformed { what: &'static str, detail: String },

    /// The streamed body broke off before `[DONE]`.
    #[error("model stream interrupted: {0}")]
    Interrupted(String),
}

impl ProviderError {
    /// True when the model service itself produced the failure.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Rejected { .. } | Self::Malformed { .. } | Self::Interrupted(_)
        )
    }

    /// HTTP status returned by the model service, if it answered with one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A convenience type alias for backend operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
