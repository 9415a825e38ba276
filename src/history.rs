use crate::stroke::Stroke;

/// Linear undo/redo history of committed strokes
#[derive(Debug, Default, Clone)]
pub struct StrokeHistory {
    /// Strokes on the canvas, oldest first
    committed: Vec<Stroke>,
    /// Strokes removed by undo, most recently undone last
    undone: Vec<Stroke>,
}

impl StrokeHistory {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished stroke on top of the history
    pub fn commit(&mut self, stroke: Stroke) {
        self.committed.push(stroke);
        self.undone.clear();
    }

    /// Drop the redo branch; new work has started
    pub fn discard_redo(&mut self) {
        self.undone.clear();
    }

    /// Move the newest stroke onto the redo stack
    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(stroke) => {
                self.undone.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Move the most recently undone stroke back onto the canvas
    pub fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(stroke) => {
                self.committed.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn undone_len(&self) -> usize {
        self.undone.len()
    }

    /// Forget every stroke, undone ones included
    pub fn clear(&mut self) {
        self.committed.clear();
        self.undone.clear();
    }
}
