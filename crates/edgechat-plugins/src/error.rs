//! Plugin error types.

use thiserror::Error;

/// Errors from a plugin backend call.
///
/// Everything except [`ToolFailed`](PluginError::ToolFailed) is a
/// transport failure and is shown to the user as `🚨 Error: <message>`.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Network failure or timeout.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The backend body was not the expected JSON.
    #[error("invalid plugin response: {0}")]
    Json(#[from] serde_json::Error),

    /// Required backend settings are missing.
    #[error("plugin backend not configured: {0}")]
    NotConfigured(String),

    /// The tool ran but reported a failure in its output.
    #[error("{tool} reported a failure")]
    ToolFailed {
        /// Tool name, e.g. `naabu`.
        tool: &'static str,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, PluginError>;
