//! User-visible notices.
//!
//! Actions never fail loudly; they hand a [`Toast`] to the sink and leave
//! state untouched. What a sink does with it (render, log, collect) is up to
//! the embedding application.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    /// CSS modifier used by the web frontend.
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Info => "is-info",
            Severity::Success => "is-success",
            Severity::Warning => "is-warning",
            Severity::Danger => "is-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub text: String,
    pub severity: Severity,
}

impl Toast {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Danger)
    }
}

/// Fire-and-forget receiver of toasts.
pub trait ToastSink: Send + Sync + 'static {
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log. Used by headless callers such as the CLI.
pub struct LogSink;

impl ToastSink for LogSink {
    fn notify(&self, toast: Toast) {
        match toast.severity {
            Severity::Warning | Severity::Danger => warn!(severity = ?toast.severity, "{}", toast.text),
            Severity::Info | Severity::Success => info!(severity = ?toast.severity, "{}", toast.text),
        }
    }
}

/// Forwards toasts over an unbounded channel.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ToastSink for ChannelSink {
    fn notify(&self, toast: Toast) {
        // A closed receiver means nobody is displaying toasts any more.
        let _ = self.tx.send(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.notify(Toast::danger("first"));
        sink.notify(Toast::new("second", Severity::Success));
        assert_eq!(rx.try_recv().unwrap(), Toast::danger("first"));
        assert_eq!(rx.try_recv().unwrap().severity, Severity::Success);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.notify(Toast::danger("nobody listening"));
    }

    #[test]
    fn css_classes() {
        assert_eq!(Severity::Danger.css_class(), "is-danger");
        assert_eq!(Severity::Info.css_class(), "is-info");
    }
}
