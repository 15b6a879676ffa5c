//! Operator-facing output.

use std::io::Write;

/// Prefix the sink puts in front of every operator line.
pub const PROMPT_PREFIX: &str = "> ";

/// Destination for operator narration.
///
/// Takes `&self` so endpoint background tasks can narrate through the same
/// sink as the console thread.
pub trait DisplaySink: Send + Sync {
    /// Show one line of text to the operator.
    fn show(&self, text: &str);
}

/// Sink that prints `> text` lines to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDisplay;

impl DisplaySink for StdoutDisplay {
    fn show(&self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout leaves nothing useful to report to.
        let _ = writeln!(out, "{}", format_line(text));
        let _ = out.flush();
    }
}

/// Format a line the way [`StdoutDisplay`] prints it.
pub fn format_line(text: &str) -> String {
    format!("{PROMPT_PREFIX}{text}")
}
