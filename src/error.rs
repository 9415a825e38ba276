use thiserror::Error;

/// Reasons a canvas operation was rejected.
///
/// A rejected operation never changes canvas state, so callers that only care
/// about the no-op behaviour can drop the result.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CanvasError {
    /// A stroke is in progress; only the active-stroke protocol is accepted
    #[error("a stroke is in progress")]
    Busy,
    /// `extend_stroke`/`end_stroke` without a preceding `begin_stroke`
    #[error("no stroke is in progress")]
    NotDrawing,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("nothing to redo")]
    NothingToRedo,
    #[error("brush width must be finite and positive, got {0}")]
    InvalidBrushWidth(f32),
    /// The view has no pixels to rasterize into yet
    #[error("surface of {0}x{1} pixels cannot hold a snapshot")]
    EmptySurface(u32, u32),
}

pub type CanvasResult = Result<(), CanvasError>;
