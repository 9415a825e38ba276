//! The stroke canvas: drawing state machine, undo/redo history and the
//! rasterized snapshot of committed strokes.

use egui::{Color32, Pos2, Rect, Vec2};
use log::{debug, trace};
use tiny_skia::Pixmap;

use crate::error::{CanvasError, CanvasResult};
use crate::event::{CanvasEvent, EventBus, EventHandler};
use crate::history::StrokeHistory;
use crate::input::ContactEvent;
use crate::raster::{Rasterizer, SoftwareRasterizer};
use crate::settings::BrushSettings;
use crate::smoother::smooth_segment;
use crate::stroke::{BrushMode, Stroke};

/// Whether a stroke is being drawn. The active stroke lives here, so it
/// exists exactly while drawing.
#[derive(Debug, Clone, Default)]
pub enum DrawingStatus {
    #[default]
    Normal,
    Drawing(Stroke),
}

/// A pending request to repaint part or all of the visible surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repaint {
    Full,
    Region(Rect),
}

impl Repaint {
    /// Coalesce two requests into one that covers both
    pub fn union(self, other: Repaint) -> Repaint {
        match (self, other) {
            (Repaint::Region(a), Repaint::Region(b)) => Repaint::Region(a.union(b)),
            _ => Repaint::Full,
        }
    }

    /// `None` for a full repaint
    pub fn region(&self) -> Option<Rect> {
        match self {
            Repaint::Full => None,
            Repaint::Region(rect) => Some(*rect),
        }
    }
}

pub struct StrokeCanvas<R: Rasterizer = SoftwareRasterizer> {
    history: StrokeHistory,
    status: DrawingStatus,
    brush: BrushSettings,
    /// Rasterization of exactly `history.committed()`
    snapshot: Option<Pixmap>,
    /// Surface size in points
    view_size: Vec2,
    /// Pixels per point for the snapshot
    scale: f32,
    rasterizer: R,
    events: EventBus,
    repaint: Option<Repaint>,
}

impl<R: Rasterizer> std::fmt::Debug for StrokeCanvas<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeCanvas")
            .field("committed", &self.history.committed().len())
            .field("undone", &self.history.undone_len())
            .field("drawing", &self.is_drawing())
            .field("brush", &self.brush)
            .field("snapshot_cached", &self.snapshot.is_some())
            .field("view_size", &self.view_size)
            .field("scale", &self.scale)
            .finish()
    }
}

impl Default for StrokeCanvas<SoftwareRasterizer> {
    /// An empty surface; the view sizes it on first layout
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0)
    }
}

impl StrokeCanvas<SoftwareRasterizer> {
    /// A canvas of `view_size` points rendered at `scale` pixels per point
    pub fn new(view_size: Vec2, scale: f32) -> Self {
        Self::with_rasterizer(view_size, scale, SoftwareRasterizer::default())
    }
}

impl<R: Rasterizer> StrokeCanvas<R> {
    pub fn with_rasterizer(view_size: Vec2, scale: f32, rasterizer: R) -> Self {
        Self {
            history: StrokeHistory::new(),
            status: DrawingStatus::Normal,
            brush: BrushSettings::default(),
            snapshot: None,
            view_size,
            scale: sanitize_scale(scale),
            rasterizer,
            events: EventBus::new(),
            repaint: None,
        }
    }

    // ---------------------------------------------------------------------
    // Active-stroke protocol

    /// Start a stroke at `point` with the current brush
    pub fn begin_stroke(&mut self, point: Pos2) -> CanvasResult {
        self.ensure_normal()?;

        self.events.emit(CanvasEvent::StrokeWillBegin { mode: self.brush.mode });

        self.history.discard_redo();
        self.ensure_snapshot();
        self.status = DrawingStatus::Drawing(Stroke::new(
            point,
            self.brush.color,
            self.brush.width,
            self.brush.mode,
        ));
        debug!("begin stroke at {:?} ({:?}, width {})", point, self.brush.mode, self.brush.width);

        self.request_repaint(Repaint::Full);
        Ok(())
    }

    /// Add a sample; the curve ends halfway between `prev` and `current`
    pub fn extend_stroke(&mut self, prev: Pos2, current: Pos2) -> CanvasResult {
        self.append_sample(prev.lerp(current, 0.5), prev)
    }

    /// Add the final sample, landing exactly on `current`, and commit the stroke
    pub fn end_stroke(&mut self, prev: Pos2, current: Pos2) -> CanvasResult {
        self.append_sample(current, prev)?;

        let DrawingStatus::Drawing(stroke) = std::mem::take(&mut self.status) else {
            return Err(CanvasError::NotDrawing);
        };
        self.flatten_into_snapshot(&stroke);
        debug!("end stroke with {} segments", stroke.segments().len());
        self.history.commit(stroke);

        self.events.emit(CanvasEvent::StrokeDidFinish {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        });
        Ok(())
    }

    /// An interrupted contact finishes the stroke exactly like a normal end
    pub fn cancel_stroke(&mut self, prev: Pos2, current: Pos2) -> CanvasResult {
        self.end_stroke(prev, current)
    }

    /// Route a contact sample to the matching stroke operation
    pub fn handle_contact(&mut self, event: ContactEvent) -> CanvasResult {
        match event {
            ContactEvent::Began { location } => self.begin_stroke(location),
            ContactEvent::Moved { location, previous } => self.extend_stroke(previous, location),
            ContactEvent::Ended { location, previous } => self.end_stroke(previous, location),
            ContactEvent::Cancelled { location, previous } => self.cancel_stroke(previous, location),
        }
    }

    fn append_sample(&mut self, raw_end: Pos2, raw_control: Pos2) -> CanvasResult {
        let DrawingStatus::Drawing(stroke) = &mut self.status else {
            trace!("sample ignored: no stroke in progress");
            return Err(CanvasError::NotDrawing);
        };

        let smoothed = smooth_segment(stroke.terminal_point(), raw_end, raw_control, stroke.width());
        stroke.push(smoothed.segment);
        self.request_repaint(Repaint::Region(smoothed.dirty_rect));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // History

    pub fn undo(&mut self) -> CanvasResult {
        self.ensure_normal()?;
        if !self.history.undo() {
            return Err(CanvasError::NothingToUndo);
        }
        debug!("undo ({} strokes left)", self.history.committed().len());
        self.invalidate_snapshot();
        self.request_repaint(Repaint::Full);
        Ok(())
    }

    pub fn redo(&mut self) -> CanvasResult {
        self.ensure_normal()?;
        if !self.history.redo() {
            return Err(CanvasError::NothingToRedo);
        }
        debug!("redo ({} strokes)", self.history.committed().len());
        self.invalidate_snapshot();
        self.request_repaint(Repaint::Full);
        Ok(())
    }

    /// Erase everything, including the redo branch
    pub fn cleanup(&mut self) -> CanvasResult {
        self.ensure_normal()?;
        self.history.clear();
        self.invalidate_snapshot();
        debug!("canvas cleared");
        self.request_repaint(Repaint::Full);
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        !self.is_drawing() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_drawing() && self.history.can_redo()
    }

    // ---------------------------------------------------------------------
    // Brush configuration

    pub fn set_brush_width(&mut self, width: f32) -> CanvasResult {
        self.ensure_normal()?;
        if !BrushSettings::is_valid_width(width) {
            trace!("rejected brush width {}", width);
            return Err(CanvasError::InvalidBrushWidth(width));
        }
        self.brush.width = width;
        Ok(())
    }

    pub fn set_brush_color(&mut self, color: Color32) -> CanvasResult {
        self.ensure_normal()?;
        self.brush.color = color;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: BrushMode) -> CanvasResult {
        self.ensure_normal()?;
        self.brush.mode = mode;
        Ok(())
    }

    /// Replace all brush attributes at once
    pub fn apply_settings(&mut self, settings: BrushSettings) -> CanvasResult {
        self.ensure_normal()?;
        if !BrushSettings::is_valid_width(settings.width) {
            return Err(CanvasError::InvalidBrushWidth(settings.width));
        }
        self.brush = settings;
        Ok(())
    }

    pub fn current_mode(&self) -> BrushMode {
        self.brush.mode
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    // ---------------------------------------------------------------------
    // Snapshot

    /// Image of every committed stroke, rasterized on demand.
    ///
    /// Not available while a stroke is in progress, nor before the view has
    /// a non-empty size.
    pub fn snapshot(&mut self) -> Result<&Pixmap, CanvasError> {
        self.ensure_normal()?;
        self.ensure_snapshot();
        let [width, height] = self.pixel_size();
        self.snapshot.as_ref().ok_or(CanvasError::EmptySurface(width, height))
    }

    /// The cached snapshot if one is currently valid, without building it
    pub fn cached_snapshot(&self) -> Option<&Pixmap> {
        self.snapshot.as_ref()
    }

    /// Pixel dimensions of the snapshot for the current view size and scale
    pub fn pixel_size(&self) -> [u32; 2] {
        let to_px = |v: f32| (v * self.scale).round().max(0.0) as u32;
        [to_px(self.view_size.x), to_px(self.view_size.y)]
    }

    fn ensure_snapshot(&mut self) {
        if self.snapshot.is_none() {
            trace!("rasterizing {} strokes into snapshot", self.history.committed().len());
            self.snapshot = self.rasterizer.rasterize_all(
                self.history.committed(),
                self.pixel_size(),
                self.scale,
            );
        }
    }

    /// Add a finished stroke to the snapshot, or rebuild it if it was dropped
    fn flatten_into_snapshot(&mut self, stroke: &Stroke) {
        // `stroke` is not committed yet, so a rebuild leaves it out
        self.ensure_snapshot();
        if let Some(pixmap) = &mut self.snapshot {
            self.rasterizer.stroke(pixmap, stroke, self.scale, None);
        }
    }

    fn invalidate_snapshot(&mut self) {
        self.snapshot = None;
    }

    // ---------------------------------------------------------------------
    // Surface geometry

    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    pub fn display_scale(&self) -> f32 {
        self.scale
    }

    pub fn set_view_size(&mut self, size: Vec2) {
        if size != self.view_size {
            self.view_size = size;
            self.surface_changed();
        }
    }

    pub fn set_display_scale(&mut self, scale: f32) {
        let scale = sanitize_scale(scale);
        if scale != self.scale {
            self.scale = scale;
            self.surface_changed();
        }
    }

    fn surface_changed(&mut self) {
        self.invalidate_snapshot();
        // Drawing composites over the snapshot, so it must exist right away
        if self.is_drawing() {
            self.ensure_snapshot();
        }
        self.request_repaint(Repaint::Full);
    }

    // ---------------------------------------------------------------------
    // State queries

    pub fn is_drawing(&self) -> bool {
        matches!(self.status, DrawingStatus::Drawing(_))
    }

    pub fn status(&self) -> &DrawingStatus {
        &self.status
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        match &self.status {
            DrawingStatus::Drawing(stroke) => Some(stroke),
            DrawingStatus::Normal => None,
        }
    }

    /// Committed strokes, oldest first
    pub fn strokes(&self) -> &[Stroke] {
        self.history.committed()
    }

    pub fn undone_len(&self) -> usize {
        self.history.undone_len()
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    // ---------------------------------------------------------------------
    // Collaborator plumbing

    /// Register a hook for stroke lifecycle notifications
    pub fn subscribe(&mut self, handler: impl EventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    /// Drain the coalesced repaint request, if any
    pub fn take_repaint(&mut self) -> Option<Repaint> {
        self.repaint.take()
    }

    fn request_repaint(&mut self, repaint: Repaint) {
        self.repaint = Some(match self.repaint {
            Some(pending) => pending.union(repaint),
            None => repaint,
        });
    }

    fn ensure_normal(&self) -> CanvasResult {
        if self.is_drawing() {
            trace!("rejected: stroke in progress");
            return Err(CanvasError::Busy);
        }
        Ok(())
    }
}

fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}
