//! Success/error notifications raised by the dialog and the page.

use tokio::sync::broadcast;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// Fire-and-forget notification sink. Implementations must not block.
pub trait ToastReporter: Send + Sync {
    fn report_success(&self, message: &str);
    fn report_error(&self, message: &str);
}

/// Writes toasts to the log. Used when no front end is listening.
pub struct TracingToastReporter;

impl ToastReporter for TracingToastReporter {
    fn report_success(&self, message: &str) {
        info!(toast = "success", "{message}");
    }

    fn report_error(&self, message: &str) {
        error!(toast = "error", "{message}");
    }
}

/// Fans toasts out to any number of front-end subscribers.
pub struct BroadcastToastReporter {
    events: broadcast::Sender<Toast>,
}

impl BroadcastToastReporter {
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self { events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.events.subscribe()
    }

    fn emit(&self, kind: ToastKind, message: &str) {
        // No subscribers is fine: toasts are not replayed.
        let _ = self.events.send(Toast {
            kind,
            message: message.to_string(),
        });
    }
}

impl Default for BroadcastToastReporter {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ToastReporter for BroadcastToastReporter {
    fn report_success(&self, message: &str) {
        self.emit(ToastKind::Success, message);
    }

    fn report_error(&self, message: &str) {
        self.emit(ToastKind::Error, message);
    }
}

#[cfg(test)]
#[path = "tests/toast_tests.rs"]
mod tests;
