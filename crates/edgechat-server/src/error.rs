//! Server error types.

use thiserror::Error;

use edgechat_llm::error::ProviderError;
use edgechat_llm::tokenizer::TokenizerError;
use edgechat_plugins::PluginError;

/// Errors raised while building or running the edge server.
///
/// Request-level failures never surface here; handlers turn them into
/// responses.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The tokenizer tables could not be loaded.
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// The model backend could not be constructed.
    #[error("model backend: {0}")]
    Provider(#[from] ProviderError),

    /// The plugin backend could not be constructed.
    #[error("plugin backend: {0}")]
    Plugin(#[from] PluginError),

    /// An HTTP client could not be built.
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),

    /// The listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error while serving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_address() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:1".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "failed to bind 0.0.0.0:1: denied");
    }

    #[test]
    fn plugin_error_is_wrapped() {
        let err: ServerError = PluginError::NotConfigured("base_url is empty".into()).into();
        assert_eq!(
            err.to_string(),
            "plugin backend: plugin backend not configured: base_url is empty"
        );
    }
}
