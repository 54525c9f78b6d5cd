//! Display side of the client.

use std::io::Write;
use tracing::debug;

use super::ChatEvent;

/// Somewhere to show chat lines.
pub trait ChatView {
    /// Show one line attributed to `sender`.
    fn show(&mut self, sender: &str, text: &str);

    /// Show a classified event.
    fn show_event(&mut self, event: &ChatEvent) {
        self.show(event.sender(), &event.text());
    }
}

/// Writes `[sender]: text` lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleView;

impl ChatView for ConsoleView {
    fn show(&mut self, sender: &str, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", format_line(sender, text)) {
            debug!(error = %e, "Dropping chat line");
        }
    }
}

pub(super) fn format_line(sender: &str, text: &str) -> String {
    format!("[{sender}]: {text}")
}
