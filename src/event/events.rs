use crate::stroke::BrushMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// A stroke is about to start; no segment has been recorded yet
    StrokeWillBegin {
        mode: BrushMode,
    },
    /// A stroke was committed to history, by a normal end or a cancel.
    /// Carries the undo/redo availability after the commit.
    StrokeDidFinish {
        can_undo: bool,
        can_redo: bool,
    },
}
