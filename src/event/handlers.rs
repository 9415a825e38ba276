use crate::event::{CanvasEvent, EventHandler};

/// Writes every canvas event to the `log` facade at debug level
#[derive(Debug, Default)]
pub struct LoggingHandler {
    /// Strokes seen finishing since this handler was registered
    finished: usize,
}

impl LoggingHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for LoggingHandler {
    fn handle_event(&mut self, event: &CanvasEvent) {
        match event {
            CanvasEvent::StrokeWillBegin { mode } => {
                log::debug!("stroke begins ({:?})", mode);
            }
            CanvasEvent::StrokeDidFinish { can_undo, can_redo } => {
                self.finished += 1;
                log::debug!(
                    "stroke #{} finished (undo: {}, redo: {})",
                    self.finished,
                    can_undo,
                    can_redo
                );
            }
        }
    }
}
