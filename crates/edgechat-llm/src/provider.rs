//! The [`ModelBackend`] trait: "send messages, receive a text stream".

use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::error::Result;
use crate::types::ChatRequest;

/// Incremental text relayed to the chat client.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A model backend that answers chat requests as a stream of text.
///
/// Non-streaming requests (`stream: false`) still produce a [`TextStream`];
/// it just yields the whole answer as one item. The main implementation is
/// [`OpenAiCompatBackend`](crate::openai_compat::OpenAiCompatBackend).
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Send `request` and return the answer stream.
    ///
    /// # Errors
    ///
    /// Fails before the stream starts on transport, authentication or
    /// status errors. Errors after that point arrive as stream items.
    async fn stream(&self, request: &ChatRequest) -> Result<TextStream>;
}
