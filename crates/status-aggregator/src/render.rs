//! Render Collaborators

use std::sync::{Arc, Mutex, PoisonError};
use telemetry::{ChannelId, StatusMessage};
use tracing::info;

/// Side-effect-only sink for drained status messages
///
/// Invoked once per informational item. Implementations must not touch
/// the shared status record or the channels, and should return quickly;
/// the aggregator calls this while holding the status lock.
pub trait StatusRenderer: Send {
    fn render(&mut self, origin: ChannelId, message: &StatusMessage);
}

/// Default renderer writing one log line per message
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer;

impl StatusRenderer for LogRenderer {
    fn render(&mut self, origin: ChannelId, message: &StatusMessage) {
        info!("[{}] {}", origin, message);
    }
}

/// Renderer capturing everything it is handed, for tests and diagnostics
///
/// Clones share the same capture buffer, so a test can keep one handle
/// while the aggregator owns the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    rendered: Arc<Mutex<Vec<(ChannelId, StatusMessage)>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything rendered so far, in render order
    pub fn rendered(&self) -> Vec<(ChannelId, StatusMessage)> {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusRenderer for RecordingRenderer {
    fn render(&mut self, origin: ChannelId, message: &StatusMessage) {
        self.rendered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((origin, message.clone()));
    }
}
