//! What the stream bridge needs to know about a validated plugin run.

/// A plugin invocation whose parameters have been accepted.
///
/// The bridge owns the job for the lifetime of one stream and asks it for
/// the request to send and for the user-facing text of each outcome.
pub trait PluginJob: Send + Sync + 'static {
    /// Tool name used in the backend path (`/api/chat/plugins/<tool>`).
    fn tool(&self) -> &'static str;

    /// Query pairs for the backend call, defaults already omitted.
    fn query(&self) -> Vec<(&'static str, String)>;

    /// Text in the tool output that marks a failed run.
    fn failure_marker(&self) -> &'static str;

    /// Notice for a run that produced no output.
    fn no_results_notice(&self) -> String;

    /// Markdown report for the non-blank output `lines`.
    ///
    /// `scanned_at` is already formatted, offset label included.
    fn render_report(&self, lines: &[&str], scanned_at: &str) -> String;
}
