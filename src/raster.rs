//! Stroke rasterization on top of tiny-skia.
//!
//! Paint strokes are composited source-over; eraser strokes use the clear
//! blend so they punch transparent holes instead of painting a color.

use egui::Rect;
use tiny_skia::{
    BlendMode, FillRule, IntRect, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint,
    Rect as SkiaRect, Stroke as SkiaStroke, Transform,
};

use crate::stroke::{Segment, Stroke};

/// Paints strokes into a pixmap.
///
/// `scale` maps stroke coordinates (points) to pixels. `clip` is in points and
/// limits the pixels that may be touched.
pub trait Rasterizer {
    fn stroke(&self, target: &mut Pixmap, stroke: &Stroke, scale: f32, clip: Option<Rect>);

    /// Rasterize `strokes` in order onto a fresh transparent pixmap.
    ///
    /// `None` when the size cannot back a pixmap.
    fn rasterize_all(&self, strokes: &[Stroke], size: [u32; 2], scale: f32) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(size[0], size[1])?;
        for stroke in strokes {
            self.stroke(&mut pixmap, stroke, scale, None);
        }
        Some(pixmap)
    }
}

/// Anti-aliased stroker with round caps and joins
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftwareRasterizer;

impl Rasterizer for SoftwareRasterizer {
    fn stroke(&self, target: &mut Pixmap, stroke: &Stroke, scale: f32, clip: Option<Rect>) {
        let Some(path) = build_path(stroke) else {
            // Only the initial move: nothing to draw
            return;
        };

        let mask = match clip {
            Some(clip) => {
                if !stroke.bounds().intersects(clip) {
                    return;
                }
                let Some(region) = pixel_region(target, clip, scale) else {
                    return;
                };
                region_mask(target, region)
            }
            None => None,
        };

        let mut paint = Paint {
            anti_alias: true,
            blend_mode: if stroke.is_eraser() { BlendMode::Clear } else { BlendMode::SourceOver },
            ..Default::default()
        };
        if !stroke.is_eraser() {
            let [r, g, b, a] = stroke.color().to_srgba_unmultiplied();
            paint.set_color_rgba8(r, g, b, a);
        }

        let pen = SkiaStroke {
            width: stroke.width(),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };

        target.stroke_path(&path, &paint, &pen, Transform::from_scale(scale, scale), mask.as_ref());
    }
}

/// The stroke's segments as a tiny-skia path
fn build_path(stroke: &Stroke) -> Option<tiny_skia::Path> {
    if stroke.is_degenerate() {
        return None;
    }

    let mut pb = PathBuilder::new();
    for segment in stroke.segments() {
        match *segment {
            Segment::Move(to) => pb.move_to(to.x, to.y),
            Segment::Quad { control, to } => pb.quad_to(control.x, control.y, to.x, to.y),
            Segment::Lines { via, to } => {
                pb.line_to(via.x, via.y);
                pb.line_to(to.x, to.y);
            }
        }
    }
    pb.finish()
}

/// Integer pixel bounds `[x0, x1) x [y0, y1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRegion {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    fn to_int_rect(self) -> Option<IntRect> {
        IntRect::from_xywh(self.x0 as i32, self.y0 as i32, self.width(), self.height())
    }
}

/// Whole pixels of `target` touched by `rect` (in points)
pub fn pixel_region(target: &Pixmap, rect: Rect, scale: f32) -> Option<PixelRegion> {
    if !rect.is_positive() {
        return None;
    }

    let to_px = |v: f32, max: u32| (v * scale).clamp(0.0, max as f32);
    let x0 = to_px(rect.min.x, target.width()).floor() as u32;
    let y0 = to_px(rect.min.y, target.height()).floor() as u32;
    let x1 = to_px(rect.max.x, target.width()).ceil() as u32;
    let y1 = to_px(rect.max.y, target.height()).ceil() as u32;
    (x1 > x0 && y1 > y0).then_some(PixelRegion { x0, y0, x1, y1 })
}

/// A hard-edged mask covering exactly the pixels of `region`
fn region_mask(target: &Pixmap, region: PixelRegion) -> Option<Mask> {
    let mut mask = Mask::new(target.width(), target.height())?;
    let rect = SkiaRect::from_xywh(
        region.x0 as f32,
        region.y0 as f32,
        region.width() as f32,
        region.height() as f32,
    )?;
    mask.fill_path(&PathBuilder::from_rect(rect), FillRule::Winding, false, Transform::identity());
    Some(mask)
}

/// Make every pixel in `rect` (points) transparent; everything for `None`
pub fn clear_region(target: &mut Pixmap, rect: Option<Rect>, scale: f32) {
    let Some(rect) = rect else {
        target.fill(tiny_skia::Color::TRANSPARENT);
        return;
    };
    let Some(region) = pixel_region(target, rect, scale) else {
        return;
    };
    let Some(rect) = region.to_int_rect().map(|r| r.to_rect()) else {
        return;
    };

    let paint = Paint {
        anti_alias: false,
        blend_mode: BlendMode::Clear,
        ..Default::default()
    };
    target.fill_rect(rect, &paint, Transform::identity(), None);
}

/// Copy the pixels of `rect` (points) from `source` into `target`; everything for `None`.
///
/// Both pixmaps are expected to share dimensions.
pub fn copy_region(target: &mut Pixmap, source: &Pixmap, rect: Option<Rect>, scale: f32) {
    let source_paint = PixmapPaint {
        blend_mode: BlendMode::Source,
        ..Default::default()
    };

    let Some(rect) = rect else {
        target.draw_pixmap(0, 0, source.as_ref(), &source_paint, Transform::identity(), None);
        return;
    };
    let Some(region) = pixel_region(target, rect, scale) else {
        return;
    };
    let Some(patch) = region.to_int_rect().and_then(|r| source.clone_rect(r)) else {
        return;
    };
    target.draw_pixmap(
        region.x0 as i32,
        region.y0 as i32,
        patch.as_ref(),
        &source_paint,
        Transform::identity(),
        None,
    );
}

/// Pixels of `region` as their own pixmap, for partial uploads
pub fn crop(source: &Pixmap, region: PixelRegion) -> Option<Pixmap> {
    source.clone_rect(region.to_int_rect()?)
}
