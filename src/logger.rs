use crate::event::{DebuggerEvent, EventKind};
use crate::eventbus::EventListener;

/// A listener that forwards every debugger event to `tracing`.
///
/// Rejections and the unsupported-host notice are logged at `warn`, everything
/// else at `info`. Install a subscriber in the host to see the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Logger;

impl Logger {
    pub fn new() -> Self {
        Logger
    }
}

impl EventListener for Logger {
    fn on_event(&mut self, event: &DebuggerEvent) {
        match event.kind() {
            EventKind::Notice => tracing::warn!(kind = ?event.kind(), "{event}"),
            kind => tracing::info!(?kind, "{event}"),
        }
    }
}
