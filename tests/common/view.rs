//! Chat views that record what the client would have shown.

use relayd::client::ChatView;
use tokio::sync::mpsc;

#[allow(dead_code)]
/// Keeps every `(sender, text)` line in order.
#[derive(Debug, Default)]
pub struct Transcript(pub Vec<(String, String)>);

impl ChatView for Transcript {
    fn show(&mut self, sender: &str, text: &str) {
        self.0.push((sender.to_string(), text.to_string()));
    }
}

#[allow(dead_code)]
/// Hands every `(sender, text)` line to a test running alongside the view.
#[derive(Debug)]
pub struct ChannelView(pub mpsc::UnboundedSender<(String, String)>);

impl ChatView for ChannelView {
    fn show(&mut self, sender: &str, text: &str) {
        let _ = self.0.send((sender.to_string(), text.to_string()));
    }
}
