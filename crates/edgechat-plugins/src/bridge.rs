//! Bridges one blocking plugin backend call to an incremental client stream.
//!
//! Every session follows the same shape:
//!
//! ```text
//! Started ──► Waiting ──► Completed   (processing notice + report)
//!                     └─► Failed      (single error / no-results notice)
//! ```
//!
//! A start frame is queued before the backend is called. While the call
//! is in flight a [`Heartbeat`] task keeps the client connection alive.
//! The heartbeat is cancelled *and joined* before any terminal frame is
//! queued, so no heartbeat can follow the terminal frame.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use edgechat_types::config::EdgeConfig;
use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{PluginBackend, PluginOutput};
use crate::error::{PluginError, Result};
use crate::heartbeat::Heartbeat;
use crate::job::PluginJob;
use crate::report::{ReportClock, result_lines};

pub const START_NOTICE: &str = "🚀 Starting the scan. It might take a minute.";
pub const HEARTBEAT_NOTICE: &str = "⏳ Still working on it, please hold on...";
pub const PROCESSING_NOTICE: &str = "✅ Scan done! Now processing the results...";
pub const TOOL_FAILED_NOTICE: &str =
    "🚨 An error occurred while running your query. Please try again or check your input.";

/// What a frame means to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Started,
    Heartbeat,
    Processing,
    Report,
    NoResults,
    Error,
}

impl FrameKind {
    /// Whether this frame ends the stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, FrameKind::Report | FrameKind::NoResults | FrameKind::Error)
    }
}

/// One chunk of the client stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub kind: FrameKind,
    pub text: String,
}

impl StreamFrame {
    pub fn new(kind: FrameKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn started() -> Self {
        Self::new(FrameKind::Started, START_NOTICE)
    }

    pub fn heartbeat() -> Self {
        Self::new(FrameKind::Heartbeat, HEARTBEAT_NOTICE)
    }

    /// Wire form: the text followed by a blank line.
    pub fn into_chunk(self) -> String {
        let mut chunk = self.text;
        chunk.push_str("\n\n");
        chunk
    }
}

/// Lifecycle of one stream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Started,
    Waiting,
    Completed,
    Failed,
}

/// Knobs shared by every session.
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    pub heartbeat_interval: Duration,
    /// Frames queued towards the client before heartbeats are dropped.
    pub buffer: usize,
    pub clock: ReportClock,
}

impl BridgeSettings {
    pub fn from_config(config: &EdgeConfig) -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(config.plugins.heartbeat_interval_secs.max(1)),
            buffer: config.plugins.stream_buffer,
            clock: ReportClock::from_config(&config.report),
        }
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from_config(&EdgeConfig::default())
    }
}

/// The client side of a session: a stream of [`StreamFrame`]s that ends
/// after the terminal frame.
#[derive(Debug)]
pub struct PluginStream {
    rx: mpsc::Receiver<StreamFrame>,
}

impl Stream for PluginStream {
    type Item = StreamFrame;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Starts stream sessions against one plugin backend.
#[derive(Clone)]
pub struct PluginStreamBridge {
    backend: Arc<dyn PluginBackend>,
    settings: BridgeSettings,
}

impl PluginStreamBridge {
    pub fn new(backend: Arc<dyn PluginBackend>, settings: BridgeSettings) -> Self {
        Self { backend, settings }
    }

    /// Start a session for `job` and return its stream.
    ///
    /// Must be called inside a tokio runtime. The session runs on its own
    /// task; dropping the stream ends it early.
    pub fn run<J: PluginJob>(&self, job: J) -> PluginStream {
        let (tx, rx) = mpsc::channel(self.settings.buffer.max(1));
        let session = Session {
            id: Uuid::new_v4(),
            job,
            backend: Arc::clone(&self.backend),
            settings: self.settings.clone(),
            state: SessionState::Started,
        };
        tokio::spawn(session.drive(tx));
        PluginStream { rx }
    }
}

struct Session<J> {
    id: Uuid,
    job: J,
    backend: Arc<dyn PluginBackend>,
    settings: BridgeSettings,
    state: SessionState,
}

impl<J: PluginJob> Session<J> {
    async fn drive(mut self, tx: mpsc::Sender<StreamFrame>) {
        let tool = self.job.tool();
        info!(session = %self.id, tool, "plugin session started");

        if tx.send(StreamFrame::started()).await.is_err() {
            debug!(session = %self.id, "client gone before start");
            return;
        }

        let cancel = CancellationToken::new();
        let heartbeat =
            Heartbeat::new(self.settings.heartbeat_interval).spawn(tx.clone(), cancel.clone());
        self.state = SessionState::Waiting;

        let query = self.job.query();
        let fetched = tokio::select! {
            result = self.backend.fetch(tool, &query) => Some(result),
            _ = tx.closed() => None,
        };

        cancel.cancel();
        match heartbeat.await {
            Ok(stats) => debug!(session = %self.id, sent = stats.sent, dropped = stats.dropped, "heartbeat joined"),
            Err(e) => warn!(session = %self.id, error = %e, "heartbeat task failed"),
        }

        let Some(result) = fetched else {
            info!(session = %self.id, tool, "client disconnected, session abandoned");
            return;
        };

        let (state, frames) = conclude(&self.job, result, &self.settings.clock.stamp_now());
        self.state = state;
        info!(session = %self.id, tool, state = ?self.state, "plugin session finished");

        for frame in frames {
            if tx.send(frame).await.is_err() {
                debug!(session = %self.id, "client gone before terminal frame");
                return;
            }
        }
    }
}

/// Terminal state and frames for a finished backend call.
pub fn conclude<J: PluginJob>(
    job: &J,
    result: Result<PluginOutput>,
    scanned_at: &str,
) -> (SessionState, Vec<StreamFrame>) {
    let output = match result.and_then(|out| check_output(job, out)) {
        Ok(output) => output,
        Err(PluginError::ToolFailed { tool }) => {
            debug!(tool, "tool reported failure");
            return (
                SessionState::Failed,
                vec![StreamFrame::new(FrameKind::Error, TOOL_FAILED_NOTICE)],
            );
        }
        Err(e) => {
            warn!(tool = job.tool(), error = %e, "plugin backend call failed");
            return (
                SessionState::Failed,
                vec![StreamFrame::new(FrameKind::Error, format!("🚨 Error: {e}"))],
            );
        }
    };

    let lines = result_lines(&output);
    if lines.is_empty() {
        return (
            SessionState::Failed,
            vec![StreamFrame::new(FrameKind::NoResults, job.no_results_notice())],
        );
    }

    (
        SessionState::Completed,
        vec![
            StreamFrame::new(FrameKind::Processing, PROCESSING_NOTICE),
            StreamFrame::new(FrameKind::Report, job.render_report(&lines, scanned_at)),
        ],
    )
}

fn check_output<J: PluginJob>(job: &J, out: PluginOutput) -> Result<String> {
    let output = out.output.unwrap_or_default();
    if output.contains(job.failure_marker()) {
        return Err(PluginError::ToolFailed { tool: job.tool() });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naabu;

    fn job() -> naabu::NaabuParams {
        naabu::parse("-host a.com").unwrap()
    }

    fn out(text: Option<&str>) -> Result<PluginOutput> {
        Ok(PluginOutput {
            output: text.map(str::to_owned),
        })
    }

    #[test]
    fn success_yields_processing_then_report() {
        let (state, frames) = conclude(&job(), out(Some("a.com:80\n\na.com:443\n")), "now");
        assert_eq!(state, SessionState::Completed);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0], StreamFrame::new(FrameKind::Processing, PROCESSING_NOTICE));
        assert_eq!(frames[1].kind, FrameKind::Report);
        assert!(frames[1].text.contains("```\na.com:80\na.com:443\n```"));
    }

    #[test]
    fn failure_marker_is_a_soft_failure() {
        let (state, frames) = conclude(
            &job(),
            out(Some("scanning...\nNaabu process exited with code 1\n")),
            "now",
        );
        assert_eq!(state, SessionState::Failed);
        assert_eq!(frames, vec![StreamFrame::new(FrameKind::Error, TOOL_FAILED_NOTICE)]);
    }

    #[test]
    fn empty_output_is_no_results() {
        for body in [None, Some(""), Some("\n  \n")] {
            let (state, frames) = conclude(&job(), out(body), "now");
            assert_eq!(state, SessionState::Failed);
            assert_eq!(
                frames,
                vec![StreamFrame::new(
                    FrameKind::NoResults,
                    "🔍 Didn't find any valid ports for a.com."
                )]
            );
        }
    }

    #[test]
    fn transport_error_is_reported() {
        let (state, frames) = conclude(&job(), Err(PluginError::Status(502)), "now");
        assert_eq!(state, SessionState::Failed);
        assert_eq!(
            frames,
            vec![StreamFrame::new(FrameKind::Error, "🚨 Error: HTTP error! status: 502")]
        );
    }

    #[test]
    fn chunks_end_with_blank_line() {
        assert_eq!(StreamFrame::started().into_chunk(), format!("{START_NOTICE}\n\n"));
    }

    #[test]
    fn terminal_kinds() {
        assert!(FrameKind::Report.is_terminal());
        assert!(FrameKind::Error.is_terminal());
        assert!(FrameKind::NoResults.is_terminal());
        assert!(!FrameKind::Heartbeat.is_terminal());
        assert!(!FrameKind::Processing.is_terminal());
    }
}
