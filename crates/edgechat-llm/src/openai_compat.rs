//! OpenAI-compatible model backend.
//!
//! [`OpenAiCompatBackend`] posts to `<base_url>/chat/completions` and
//! relays the answer as text. Streaming answers are decoded from SSE on a
//! background task and forwarded through a bounded channel.

use std::time::Duration;

use async_trait::async_trait;
use edgechat_types::SecretString;
use edgechat_types::config::CompletionConfig;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::error::{ProviderError, Result};
use crate::provider::{ModelBackend, TextStream};
use crate::sse::{LineBuffer, SseEvent, parse_sse_line};
use crate::types::{ChatRequest, ChatResponse};

/// Text fragments buffered between the SSE reader and the client.
const RELAY_BUFFER: usize = 32;

/// A model backend speaking the OpenAI chat completion API.
pub struct OpenAiCompatBackend {
    name: String,
    base_url: String,
    api_key: SecretString,
    http: reqwest::Client,
}

impl OpenAiCompatBackend {
    /// Create a backend with an explicit client.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: SecretString,
        http: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key,
            http,
        }
    }

    /// Create a backend from the completion section of the config.
    pub fn from_config(config: &CompletionConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::new(
            "openai-compat",
            config.base_url.clone(),
            config.api_key.clone(),
            http,
        ))
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let api_key = self.api_key.non_empty().ok_or_else(|| {
            ProviderError::NotConfigured("set EDGECHAT_MODEL_API_KEY or completion.api_key")
        })?;

        debug!(
            backend = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            stream = request.stream,
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(request);
        if request.stream {
            req = req.header("Accept", "text/event-stream");
        }

        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(backend = %self.name, %status, model = %request.model, "model backend rejected request");
        Err(ProviderError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ModelBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream(&self, request: &ChatRequest) -> Result<TextStream> {
        let response = self.send(request).await?;

        if !request.stream {
            let parsed: ChatResponse = response.json().await.map_err(|e| {
                ProviderError::Malformed {
                    what: "completion",
                    detail: e.to_string(),
                }
            })?;
            let text = parsed.first_text().to_owned();
            return Ok(Box::pin(futures_util::stream::once(async move { Ok(text) })));
        }

        let (tx, rx) = mpsc::channel(RELAY_BUFFER);
        let backend = self.name.clone();
        tokio::spawn(relay_sse(backend, response, tx));

        Ok(Box::pin(futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })))
    }
}

/// Decode an SSE response body and forward its text deltas.
async fn relay_sse(backend: String, response: reqwest::Response, tx: mpsc::Sender<Result<String>>) {
    let mut bytes = response.bytes_stream();
    let mut lines = LineBuffer::default();

    while let Some(chunk) = bytes.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                let _ = tx
                    .send(Err(ProviderError::Interrupted(e.to_string())))
                    .await;
                return;
            }
        };

        for line in lines.push(&chunk) {
            match parse_sse_line(&line) {
                Ok(Some(SseEvent::Text(text))) => {
                    trace!(backend = %backend, len = text.len(), "streaming delta");
                    if tx.send(Ok(text)).await.is_err() {
                        debug!(backend = %backend, "client went away, stopping relay");
                        return;
                    }
                }
                Ok(Some(SseEvent::Done)) => {
                    debug!(backend = %backend, "streaming complete");
                    return;
                }
                Ok(None) => {}
                Err(e) => warn!(backend = %backend, error = %e, "SSE parse error, skipping line"),
            }
        }
    }

    if let Some(tail) = lines.finish()
        && let Ok(Some(SseEvent::Text(text))) = parse_sse_line(&tail)
    {
        let _ = tx.send(Ok(text)).await;
    }
    debug!(backend = %backend, "upstream closed");
}

impl std::fmt::Debug for OpenAiCompatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatBackend")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> OpenAiCompatBackend {
        OpenAiCompatBackend::new("test", base, "sk-test".into(), reqwest::Client::new())
    }

    #[test]
    fn completions_url_trims_trailing_slash() {
        assert_eq!(
            backend("https://api.example.com/v1/").completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            backend("https://api.example.com/v1").completions_url(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let dbg = format!("{:?}", backend("https://x"));
        assert!(!dbg.contains("sk-test"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn from_config_uses_base_url() {
        let config = CompletionConfig {
            base_url: "http://localhost:11434/v1".into(),
            ..CompletionConfig::default()
        };
        let b = OpenAiCompatBackend::from_config(&config).unwrap();
        assert_eq!(b.completions_url(), "http://localhost:11434/v1/chat/completions");
        assert_eq!(b.name(), "openai-compat");
    }
}
