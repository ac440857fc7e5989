//! Completion request routing: validate, budget, authorize, dispatch.
//!
//! [`CompletionRouter`] is deliberately thin. It has no state of its own
//! beyond the collaborators it was built with, and every request flows
//! through the same four steps:
//!
//! 1. resolve the model id against [`ModelKind`] (unknown → 400);
//! 2. fit the history into the model's token budget;
//! 3. ask the [`AccountStatus`] service, unless that check is disabled;
//! 4. forward to the [`ModelBackend`] and hand back its stream untouched.

use std::sync::Arc;

use edgechat_types::config::CompletionConfig;
use edgechat_types::{Message, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::ProviderError;
use crate::history::alternate_turns;
use crate::model::ModelKind;
use crate::provider::{ModelBackend, TextStream};
use crate::status::{AccountStatus, StatusVerdict};
use crate::tokenizer::Tokenizer;
use crate::truncate::{TokenBudgetTruncator, TruncateError};
use crate::types::{ChatBody, ChatRequest};

/// Why a completion request was not dispatched (or failed upstream).
#[derive(Error, Debug)]
pub enum RouterError {
    /// `model` is not in the supported set.
    #[error("Error: Model not found")]
    UnsupportedModel(String),

    /// The newest message does not fit the model's budget.
    #[error(transparent)]
    Budget(#[from] TruncateError),

    /// The account status service refused the request.
    #[error("{0}")]
    StatusDenied(String),

    /// The model backend or status service failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Per-deployment knobs for [`CompletionRouter`].
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    /// Upstream model name for [`ModelKind::HackerGpt`].
    pub upstream_model: String,
    /// Fixed system prompt, empty for none.
    pub system_prompt: SecretString,
    /// Used when the body has no `temperature`.
    pub default_temperature: f64,
    /// Used when the body has no `max_tokens`.
    pub default_max_tokens: u32,
    /// Tokens held back for the answer.
    pub reserved_tokens: usize,
    /// Apply [`alternate_turns`] before budgeting.
    pub alternate_turns: bool,
}

impl From<&CompletionConfig> for CompletionSettings {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            upstream_model: config.upstream_model.clone(),
            system_prompt: config.system_prompt.clone(),
            default_temperature: config.default_temperature,
            default_max_tokens: config.default_max_tokens,
            reserved_tokens: config.reserved_tokens,
            alternate_turns: config.alternate_turns,
        }
    }
}

/// Top-level handler for model completions.
pub struct CompletionRouter {
    backend: Arc<dyn ModelBackend>,
    tokenizer: Arc<dyn Tokenizer>,
    status: Option<Arc<dyn AccountStatus>>,
    settings: CompletionSettings,
}

impl CompletionRouter {
    /// Create a router without an account status check.
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        tokenizer: Arc<dyn Tokenizer>,
        settings: CompletionSettings,
    ) -> Self {
        Self {
            backend,
            tokenizer,
            status: None,
            settings,
        }
    }

    /// Require an account status check before every dispatch.
    pub fn with_status_check(mut self, status: Arc<dyn AccountStatus>) -> Self {
        self.status = Some(status);
        self
    }

    /// Validate the model and build the upstream request.
    ///
    /// Runs steps 1 and 2 only; no I/O.
    pub fn prepare(&self, body: &ChatBody) -> Result<(ModelKind, ChatRequest), RouterError> {
        let model: ModelKind = body
            .model
            .parse()
            .map_err(|_| RouterError::UnsupportedModel(body.model.clone()))?;

        let history = if self.settings.alternate_turns {
            alternate_turns(&body.messages)
        } else {
            body.messages.clone()
        };

        let prompt = self.settings.system_prompt.expose();
        let truncation = TokenBudgetTruncator::new(self.tokenizer.as_ref()).truncate(
            &history,
            prompt,
            model.token_limit(),
            self.settings.reserved_tokens,
        )?;

        let mut messages = Vec::with_capacity(truncation.messages.len() + 1);
        if !prompt.is_empty() {
            messages.push(Message::system(prompt));
        }
        messages.extend(truncation.messages);

        debug!(
            model = %model,
            used_tokens = truncation.used_tokens,
            limit = model.token_limit(),
            sent = messages.len(),
            "completion request prepared"
        );

        let request = ChatRequest {
            model: self.settings.upstream_model.clone(),
            messages,
            max_tokens: body.max_tokens.unwrap_or(self.settings.default_max_tokens),
            temperature: body.temperature.unwrap_or(self.settings.default_temperature),
            stream: body.stream.unwrap_or(false),
        };
        Ok((model, request))
    }

    /// Run the full pipeline and return the backend's stream.
    ///
    /// `auth` is the caller's `Authorization` header, forwarded to the
    /// status check.
    pub async fn complete(
        &self,
        body: &ChatBody,
        auth: Option<&str>,
    ) -> Result<TextStream, RouterError> {
        let (model, request) = self.prepare(body)?;

        if let Some(status) = &self.status
            && let StatusVerdict::Denied(reason) = status.check(auth, model).await?
        {
            info!(model = %model, "request refused by account status check");
            return Err(RouterError::StatusDenied(reason));
        }

        info!(
            backend = self.backend.name(),
            model = %model,
            upstream = %request.model,
            "dispatching completion"
        );
        Ok(self.backend.stream(&request).await?)
    }
}
