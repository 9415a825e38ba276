//! egui widget that feeds pointer input to a [`StrokeCanvas`] and shows it.
//!
//! The widget keeps its own composited frame buffer and uploads only the
//! region the canvas asked to repaint.

use egui::{Color32, ColorImage, Rect, Response, Sense, TextureHandle, TextureOptions, Ui, pos2};
use tiny_skia::Pixmap;

use crate::canvas::{DrawingStatus, Repaint, StrokeCanvas};
use crate::input::InputHandler;
use crate::raster::{self, Rasterizer};

const TEXTURE_NAME: &str = "paint_view_canvas";

#[derive(Default)]
pub struct CanvasView {
    input: InputHandler,
    frame: Option<Pixmap>,
    texture: Option<TextureHandle>,
}

impl std::fmt::Debug for CanvasView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasView")
            .field("input", &self.input)
            .field("frame", &self.frame.as_ref().map(|f| (f.width(), f.height())))
            .field("has_texture", &self.texture.is_some())
            .finish()
    }
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out the canvas over all remaining space and process this frame's input
    pub fn show<R: Rasterizer>(&mut self, ui: &mut Ui, canvas: &mut StrokeCanvas<R>) -> Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());

        canvas.set_view_size(response.rect.size());
        canvas.set_display_scale(ui.ctx().pixels_per_point());

        for event in self.input.process(&response) {
            if let Err(err) = canvas.handle_contact(event) {
                log::trace!("contact {:?} ignored: {}", event, err);
            }
        }

        if let Some(repaint) = canvas.take_repaint() {
            self.repaint(ui.ctx(), canvas, repaint);
        }

        if let Some(texture) = &self.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            painter.image(texture.id(), response.rect, uv, Color32::WHITE);
        }

        response
    }

    fn repaint<R: Rasterizer>(&mut self, ctx: &egui::Context, canvas: &StrokeCanvas<R>, repaint: Repaint) {
        let [width, height] = canvas.pixel_size();
        if width == 0 || height == 0 {
            return;
        }
        let resized = self
            .frame
            .as_ref()
            .is_none_or(|frame| (frame.width(), frame.height()) != (width, height));
        let repaint = if resized {
            self.frame = Pixmap::new(width, height);
            Repaint::Full
        } else {
            repaint
        };
        let Some(frame) = &mut self.frame else {
            return;
        };

        compose(frame, canvas, repaint.region());
        self.upload(ctx, repaint, canvas.display_scale());
    }

    fn upload(&mut self, ctx: &egui::Context, repaint: Repaint, scale: f32) {
        let Some(frame) = &self.frame else {
            return;
        };

        if let (Some(texture), Repaint::Region(rect)) = (&mut self.texture, repaint) {
            let Some(region) = raster::pixel_region(frame, rect, scale) else {
                return;
            };
            let Some(patch) = raster::crop(frame, region) else {
                return;
            };
            texture.set_partial(
                [region.x0 as usize, region.y0 as usize],
                to_color_image(&patch),
                TextureOptions::LINEAR,
            );
            return;
        }

        let image = to_color_image(frame);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => self.texture = Some(ctx.load_texture(TEXTURE_NAME, image, TextureOptions::LINEAR)),
        }
    }
}

/// Redraw `region` of `frame` (everything for `None`).
///
/// While drawing, the cached snapshot is copied and only the active stroke is
/// rasterized on top; otherwise every committed stroke is replayed in order.
pub fn compose<R: Rasterizer>(frame: &mut Pixmap, canvas: &StrokeCanvas<R>, region: Option<Rect>) {
    let scale = canvas.display_scale();
    let rasterizer = canvas.rasterizer();

    match canvas.status() {
        DrawingStatus::Drawing(stroke) => {
            match canvas.cached_snapshot() {
                Some(snapshot) => raster::copy_region(frame, snapshot, region, scale),
                None => raster::clear_region(frame, region, scale),
            }
            rasterizer.stroke(frame, stroke, scale, region);
        }
        DrawingStatus::Normal => {
            raster::clear_region(frame, region, scale);
            for stroke in canvas.strokes() {
                rasterizer.stroke(frame, stroke, scale, region);
            }
        }
    }
}

fn to_color_image(pixmap: &Pixmap) -> ColorImage {
    let size = [pixmap.width() as usize, pixmap.height() as usize];
    // tiny-skia stores premultiplied RGBA, which is what egui textures hold
    ColorImage::from_rgba_premultiplied(size, pixmap.data())
}
