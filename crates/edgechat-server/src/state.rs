//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use edgechat_llm::{
    CompletionRouter, CompletionSettings, HttpAccountStatus, OpenAiCompatBackend,
    TiktokenTokenizer,
};
use edgechat_plugins::PluginDispatcher;
use edgechat_types::EdgeConfig;
use tracing::{info, warn};

use crate::error::Result;

/// Everything a request handler needs. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub completions: Arc<CompletionRouter>,
    pub plugins: Arc<PluginDispatcher>,
}

impl AppState {
    pub fn new(completions: CompletionRouter, plugins: PluginDispatcher) -> Self {
        Self {
            completions: Arc::new(completions),
            plugins: Arc::new(plugins),
        }
    }

    /// Wire up the production collaborators described by `config`.
    pub fn from_config(config: &EdgeConfig) -> Result<Self> {
        let completion = &config.completion;

        let tokenizer = TiktokenTokenizer::cl100k()?;
        let backend = OpenAiCompatBackend::from_config(completion)?;
        let mut router = CompletionRouter::new(
            Arc::new(backend),
            Arc::new(tokenizer),
            CompletionSettings::from(completion),
        );

        if completion.skip_status_check {
            info!("account status check disabled");
        } else if let Some(url) = &completion.status_check_url {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_secs(completion.timeout_secs))
                .build()?;
            router = router.with_status_check(Arc::new(HttpAccountStatus::new(url.clone(), http)));
        } else {
            warn!("no completion.status_check_url configured, status check skipped");
        }

        let plugins = PluginDispatcher::from_config(config)?;
        Ok(Self::new(router, plugins))
    }
}
