//! SSE (Server-Sent Events) decoding for OpenAI-compatible streams.
//!
//! The backend sends lines like:
//!
//! ```text
//! data: {"id":"...","choices":[{"delta":{"content":"Hello"}}]}
//!
//! data: [DONE]
//! ```
//!
//! The edge relays only the text deltas to the chat client, so decoding
//! reduces every line to an [`SseEvent`].

use crate::error::{ProviderError, Result};
use crate::types::StreamDelta;

const DONE_SENTINEL: &str = "[DONE]";

/// What a single SSE line contributes to the relayed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A non-empty text fragment.
    Text(String),
    /// The `[DONE]` sentinel.
    Done,
}

/// Parse one SSE line.
///
/// Returns `Ok(None)` for blank lines, comments, non-`data:` fields, empty
/// payloads and deltas without text.
///
/// # Errors
///
/// Returns [`ProviderError::Malformed`] when a `data:` payload is
/// not a valid streaming delta.
pub fn parse_sse_line(line: &str) -> Result<Option<SseEvent>> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with(':') {
        return Ok(None);
    }

    let Some(payload) = line.strip_prefix("data:").map(str::trim_start) else {
        return Ok(None);
    };
    if payload.is_empty() {
        return Ok(None);
    }
    if payload == DONE_SENTINEL {
        return Ok(Some(SseEvent::Done));
    }

    let delta: StreamDelta = serde_json::from_str(payload)
        .map_err(|e| ProviderError::Malformed {
            what: "stream delta",
            detail: e.to_string(),
        })?;

    Ok(delta
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
        .map(SseEvent::Text))
}

/// Splits a byte stream into complete lines.
///
/// Network chunks respect neither line nor UTF-8 boundaries, so the tail
/// stays as raw bytes until its newline arrives and only whole lines are
/// decoded.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);
        complete[..last_newline]
            .split(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect()
    }

    /// Whatever remains once the stream has ended.
    pub fn finish(self) -> Option<String> {
        let tail = String::from_utf8_lossy(&self.pending);
        (!tail.trim().is_empty()).then(|| tail.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_lines_yield_nothing() {
        for line in ["", "   ", ": keep-alive", "event: message", "id: 7", "data:", "data: "] {
            assert_eq!(parse_sse_line(line).unwrap(), None, "line {line:?}");
        }
    }

    #[test]
    fn done_sentinel() {
        assert_eq!(parse_sse_line("data: [DONE]").unwrap(), Some(SseEvent::Done));
        assert_eq!(parse_sse_line("data:[DONE]").unwrap(), Some(SseEvent::Done));
    }

    #[test]
    fn text_delta() {
        let line = r#"data: {"id":"c1","choices":[{"index":0,"delta":{"content":"Hello"},"finish_reason":null}]}"#;
        assert_eq!(
            parse_sse_line(line).unwrap(),
            Some(SseEvent::Text("Hello".into()))
        );
    }

    #[test]
    fn role_only_delta_is_skipped() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_sse_line(line).unwrap(), None);
    }

    #[test]
    fn malformed_json_is_error() {
        let err = parse_sse_line("data: {broken").unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { what: "stream delta", .. }));
    }

    #[test]
    fn line_buffer_joins_split_chunks() {
        let mut buf = LineBuffer::default();
        assert!(buf.push(b"data: {\"a\"").is_empty());
        let lines = buf.push(b":1}\n\ndata: [DO");
        assert_eq!(lines, vec!["data: {\"a\":1}".to_string(), String::new()]);
        assert!(buf.push(b"NE]").is_empty());
        assert_eq!(buf.finish().as_deref(), Some("data: [DONE]"));
    }

    #[test]
    fn line_buffer_finish_ignores_whitespace_tail() {
        let mut buf = LineBuffer::default();
        buf.push(b"data: x\n  ");
        assert!(buf.finish().is_none());
    }

    #[test]
    fn line_buffer_keeps_split_multibyte_char() {
        let line = "data: {\"content\":\"é 🚀\"}\n".as_bytes();
        let e_start = line.iter().position(|&b| b == 0xC3).unwrap();
        let mut buf = LineBuffer::default();
        assert!(buf.push(&line[..e_start + 1]).is_empty());
        let rocket_mid = line.len() - 5;
        assert!(buf.push(&line[e_start + 1..rocket_mid]).is_empty());
        let lines = buf.push(&line[rocket_mid..]);
        assert_eq!(lines, vec!["data: {\"content\":\"é 🚀\"}".to_string()]);
        assert!(!lines[0].contains('\u{FFFD}'));
    }

    #[test]
    fn line_buffer_emits_every_line_in_one_chunk() {
        let mut buf = LineBuffer::default();
        let lines = buf.push(b"a\nb\n\nc");
        assert_eq!(lines, vec!["a".to_string(), "b".into(), String::new()]);
        assert_eq!(buf.finish().as_deref(), Some("c"));
    }
}
