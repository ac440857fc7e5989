//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or loading an [`EdgeConfig`](crate::EdgeConfig).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EdgeError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The config file exists but could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for the schema.
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A value (from file or environment) is semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the value.
        reason: String,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, EdgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = EdgeError::ConfigNotFound {
            path: PathBuf::from("/etc/edgechat.json"),
        };
        assert_eq!(err.to_string(), "config file not found: /etc/edgechat.json");
    }

    #[test]
    fn display_invalid() {
        let err = EdgeError::ConfigInvalid {
            reason: "EDGECHAT_TEMPERATURE is not a number".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config: EDGECHAT_TEMPERATURE is not a number"
        );
    }
}
