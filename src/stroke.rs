use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

/// Whether a stroke deposits color or clears what is underneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushMode {
    #[default]
    Paint,
    Eraser,
}

/// One drawing primitive within a stroke.
///
/// Each smoothing step appends exactly one segment, so a stroke built from
/// `n` samples after the initial contact holds `n + 1` segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    /// Starting point; draws nothing
    Move(Pos2),
    /// Quadratic curve from the previous end point
    Quad { control: Pos2, to: Pos2 },
    /// Straight line to `via`, then straight line to `to`
    Lines { via: Pos2, to: Pos2 },
}

impl Segment {
    /// The point the pen rests on after this segment
    pub fn end(&self) -> Pos2 {
        match *self {
            Segment::Move(to) | Segment::Quad { to, .. } | Segment::Lines { to, .. } => to,
        }
    }

    /// Every point that shapes this segment, control points included
    pub fn points(&self) -> impl Iterator<Item = Pos2> {
        let (a, b) = match *self {
            Segment::Move(to) => (None, to),
            Segment::Quad { control, to } => (Some(control), to),
            Segment::Lines { via, to } => (Some(via), to),
        };
        a.into_iter().chain(std::iter::once(b))
    }
}

/// A continuous paint or eraser gesture
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    segments: Vec<Segment>,
    color: Color32,
    width: f32,
    eraser: bool,
}

impl Stroke {
    /// Start a stroke at `start` with the given paint attributes
    pub fn new(start: Pos2, color: Color32, width: f32, mode: BrushMode) -> Self {
        Self {
            segments: vec![Segment::Move(start)],
            color,
            width,
            eraser: mode == BrushMode::Eraser,
        }
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    /// Where the next segment starts
    pub fn terminal_point(&self) -> Pos2 {
        // segments is never empty: `new` seeds it with the move
        self.segments.last().map_or(Pos2::ZERO, Segment::end)
    }

    /// True for a stroke that never left its starting point's move
    pub fn is_degenerate(&self) -> bool {
        self.segments.len() < 2
    }

    /// Bounding box of all points and control points, padded for line width
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect::NOTHING;
        for point in self.segments.iter().flat_map(Segment::points) {
            rect.extend_with(point);
        }
        rect.expand(self.width / 2.0)
    }
}
