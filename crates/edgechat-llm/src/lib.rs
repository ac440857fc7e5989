//! Token budgeting and model completion routing for edgechat.
//!
//! # Architecture
//!
//! - [`Tokenizer`] counts tokens; [`TiktokenTokenizer`] is the production
//!   implementation
//! - [`TokenBudgetTruncator`] keeps the newest history that fits a budget
//! - [`ModelKind`] is the closed set of accepted model ids and their limits
//! - [`ModelBackend`] is the "send messages, receive a text stream"
//!   capability; [`OpenAiCompatBackend`] implements it over HTTP
//! - [`AccountStatus`] approves a request before dispatch
//! - [`CompletionRouter`] ties the above together per request
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use edgechat_llm::{CompletionRouter, OpenAiCompatBackend, TiktokenTokenizer};
//!
//! let backend = Arc::new(OpenAiCompatBackend::from_config(&config.completion)?);
//! let tokenizer = Arc::new(TiktokenTokenizer::cl100k()?);
//! let router = CompletionRouter::new(backend, tokenizer, (&config.completion).into());
//!
//! let stream = router.complete(&body, auth_header).await?;
//! ```

pub mod error;
pub mod history;
pub mod model;
pub mod openai_compat;
pub mod provider;
pub mod router;
pub mod sse;
pub mod status;
pub mod tokenizer;
pub mod truncate;
pub mod types;

pub use error::{ProviderError, Result};
pub use model::ModelKind;
pub use openai_compat::OpenAiCompatBackend;
pub use provider::{ModelBackend, TextStream};
pub use router::{CompletionRouter, CompletionSettings, RouterError};
pub use status::{AccountStatus, HttpAccountStatus, StatusVerdict};
pub use tokenizer::{CharEstimateTokenizer, TiktokenTokenizer, Tokenizer};
pub use truncate::{TokenBudgetTruncator, TruncateError, Truncation};
pub use types::{ChatBody, ChatRequest};
