//! Render targets
//!
//! A `WindowSink` receives every frame the presenter displays. `display` is
//! called with the window lock held and must not block.

use std::sync::Arc;
use tokio::sync::watch;

use super::window::WindowFrame;

/// Anything that can show a window frame
pub trait WindowSink: Send + Sync {
    fn display(&self, frame: &WindowFrame);
}

impl<S: WindowSink + ?Sized> WindowSink for Arc<S> {
    fn display(&self, frame: &WindowFrame) {
        (**self).display(frame)
    }
}

/// Writes frames to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WindowSink for LogSink {
    fn display(&self, frame: &WindowFrame) {
        match frame {
            WindowFrame::Showing {
                cursor,
                total,
                entries,
            } => {
                let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
                tracing::debug!(cursor, total, attendees = ?names, "Attendee window");
            }
            WindowFrame::Empty { .. } => {
                tracing::debug!("Attendee window empty");
            }
        }
    }
}

/// Remembers the most recently displayed frame
///
/// Cloning shares the same slot.
#[derive(Debug, Clone)]
pub struct LatestFrame {
    slot: Arc<watch::Sender<WindowFrame>>,
}

impl LatestFrame {
    pub fn new() -> Self {
        let (slot, _) = watch::channel(WindowFrame::empty());
        Self {
            slot: Arc::new(slot),
        }
    }

    /// Frame currently on display
    pub fn current(&self) -> WindowFrame {
        self.slot.borrow().clone()
    }

    /// Receiver notified on every displayed frame
    pub fn watch(&self) -> watch::Receiver<WindowFrame> {
        self.slot.subscribe()
    }
}

impl Default for LatestFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowSink for LatestFrame {
    fn display(&self, frame: &WindowFrame) {
        self.slot.send_replace(frame.clone());
    }
}

/// Fans a frame out to several sinks, in insertion order
#[derive(Clone, Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn WindowSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: add a sink
    pub fn with(mut self, sink: Arc<dyn WindowSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl WindowSink for SinkSet {
    fn display(&self, frame: &WindowFrame) {
        for sink in &self.sinks {
            sink.display(frame);
        }
    }
}
