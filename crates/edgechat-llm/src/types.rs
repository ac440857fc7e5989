//! Request and response types for the completion path.
//!
//! [`ChatBody`] is what the chat client posts to the edge. [`ChatRequest`]
//! is what the edge forwards to an OpenAI-compatible backend after
//! defaults and truncation have been applied.

use edgechat_types::Message;
use serde::{Deserialize, Serialize};

/// The JSON body accepted by the completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatBody {
    /// Full conversation so far, oldest first.
    pub messages: Vec<Message>,

    /// Model id; must name a [`ModelKind`](crate::model::ModelKind).
    pub model: String,

    /// Maximum tokens to generate.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f64>,

    /// Whether the backend should stream its answer.
    #[serde(default)]
    pub stream: Option<bool>,
}

/// A chat completion request sent to a model backend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatRequest {
    /// Upstream model name.
    pub model: String,

    /// Messages after truncation, system prompt first when configured.
    pub messages: Vec<Message>,

    /// Maximum number of tokens to generate.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f64,

    /// Whether to stream the response.
    pub stream: bool,
}

/// A non-streaming completion response (OpenAI format, fields we read).
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Completion choices; the first one is relayed.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChoiceMessage,
}

/// The message inside a [`Choice`].
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text, absent for tool-only answers.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, or empty when the backend sent none.
    pub fn first_text(&self) -> &str {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .unwrap_or_default()
    }
}

// ── Streaming wire format ───────────────────────────────────────────────

/// One `chat.completion.chunk` object from an SSE `data:` line.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StreamDelta {
    #[serde(default)]
    pub choices: Vec<StreamDeltaChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StreamDeltaChoice {
    #[serde(default)]
    pub delta: StreamDeltaContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct StreamDeltaContent {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_optional_fields_default_to_none() {
        let body: ChatBody = serde_json::from_str(
            r#"{"model":"hackergpt","messages":[{"role":"user","content":"hi"}]}"#,
        )
        .unwrap();
        assert_eq!(body.model, "hackergpt");
        assert!(body.max_tokens.is_none());
        assert!(body.temperature.is_none());
        assert!(body.stream.is_none());
    }

    #[test]
    fn chat_request_serializes_openai_shape() {
        let req = ChatRequest {
            model: "gpt-3.5-turbo".into(),
            messages: vec![Message::user("hi")],
            max_tokens: 1000,
            temperature: 0.6,
            stream: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["stream"], true);
    }

    #[test]
    fn first_text_handles_missing_content() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(resp.first_text(), "");

        let resp: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(resp.first_text(), "");
    }
}
