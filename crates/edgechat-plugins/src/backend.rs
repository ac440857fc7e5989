//! Plugin backend capability and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use edgechat_types::SecretString;
use edgechat_types::config::PluginsConfig;
use serde::Deserialize;
use tracing::debug;

use crate::error::{PluginError, Result};

/// Body returned by the plugin backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PluginOutput {
    /// Raw tool output; absent or `null` when the tool printed nothing.
    #[serde(default)]
    pub output: Option<String>,
}

/// Runs a tool on the plugin backend and waits for its output.
#[async_trait]
pub trait PluginBackend: Send + Sync {
    /// Invoke `tool` with `query` and return its output.
    ///
    /// Blocks for the whole scan; callers keep the client alive with
    /// heartbeats meanwhile.
    async fn fetch(&self, tool: &str, query: &[(&'static str, String)]) -> Result<PluginOutput>;
}

/// Plugin backend reached over HTTP.
///
/// Sends `GET <base_url>/api/chat/plugins/<tool>?<query>` with the shared
/// secret in `Authorization` and an optional `Host` override.
pub struct HttpPluginBackend {
    base_url: String,
    auth_token: SecretString,
    host_header: Option<String>,
    http: reqwest::Client,
}

impl HttpPluginBackend {
    /// Create a backend with an explicit client.
    pub fn new(
        base_url: impl Into<String>,
        auth_token: SecretString,
        host_header: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token,
            host_header,
            http,
        }
    }

    /// Create a backend from the plugins section of the config.
    pub fn from_config(config: &PluginsConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(PluginError::NotConfigured(
                "set EDGECHAT_PLUGINS_URL or plugins.base_url".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(
            config.base_url.clone(),
            config.auth_token.clone(),
            config.host_header.clone(),
            http,
        ))
    }

    fn tool_url(&self, tool: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/api/chat/plugins/{tool}")
    }
}

#[async_trait]
impl PluginBackend for HttpPluginBackend {
    async fn fetch(&self, tool: &str, query: &[(&'static str, String)]) -> Result<PluginOutput> {
        let url = self.tool_url(tool);
        debug!(tool, url = %url, pairs = query.len(), "calling plugin backend");

        let mut req = self.http.get(&url).query(query);
        if let Some(token) = self.auth_token.non_empty() {
            req = req.header("Authorization", token);
        }
        if let Some(host) = &self.host_header {
            req = req.header("Host", host);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(tool, %status, "plugin backend returned error status");
            return Err(PluginError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl std::fmt::Debug for HttpPluginBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPluginBackend")
            .field("base_url", &self.base_url)
            .field("auth_token", &self.auth_token)
            .field("host_header", &self.host_header)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_url_joins_path() {
        let b = HttpPluginBackend::new("http://plugins:8080/", "s".into(), None, reqwest::Client::new());
        assert_eq!(b.tool_url("naabu"), "http://plugins:8080/api/chat/plugins/naabu");
    }

    #[test]
    fn empty_base_url_is_not_configured() {
        let config = PluginsConfig {
            base_url: "  ".into(),
            ..PluginsConfig::default()
        };
        assert!(matches!(
            HttpPluginBackend::from_config(&config),
            Err(PluginError::NotConfigured(_))
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let b = HttpPluginBackend::new("http://x", "hunter2".into(), None, reqwest::Client::new());
        let dbg = format!("{b:?}");
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn output_body_shapes() {
        let full: PluginOutput = serde_json::from_str(r#"{"output":"a:80\n"}"#).unwrap();
        assert_eq!(full.output.as_deref(), Some("a:80\n"));
        let null: PluginOutput = serde_json::from_str(r#"{"output":null}"#).unwrap();
        assert_eq!(null.output, None);
        let missing: PluginOutput = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.output, None);
    }
}
