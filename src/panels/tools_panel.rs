use egui::Color32;

use crate::PaintApp;
use crate::stroke::BrushMode;

const BIG_BRUSH: f32 = 20.0;
const SMALL_BRUSH: f32 = 10.0;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let canvas = app.canvas_mut();
            let brush = canvas.brush();

            if ui
                .selectable_label(brush.mode == BrushMode::Eraser, "⌫ Eraser")
                .clicked()
            {
                let _ = canvas.set_mode(BrushMode::Eraser);
            }
            for (label, color) in [("Red", Color32::RED), ("Green", Color32::GREEN)] {
                let selected = brush.mode == BrushMode::Paint && brush.color == color;
                if ui.selectable_label(selected, label).clicked() {
                    let _ = canvas.set_mode(BrushMode::Paint);
                    let _ = canvas.set_brush_color(color);
                }
            }

            ui.separator();

            for (label, width) in [("Big brush", BIG_BRUSH), ("Small brush", SMALL_BRUSH)] {
                if ui.selectable_label(brush.width == width, label).clicked() {
                    let _ = canvas.set_brush_width(width);
                }
            }

            ui.separator();

            if ui.add_enabled(canvas.can_undo(), egui::Button::new("Undo")).clicked() {
                let _ = canvas.undo();
            }
            if ui.add_enabled(canvas.can_redo(), egui::Button::new("Redo")).clicked() {
                let _ = canvas.redo();
            }
            if ui
                .add_enabled(!canvas.is_drawing(), egui::Button::new("Cleanup"))
                .clicked()
            {
                let _ = canvas.cleanup();
            }

            ui.separator();
            ui.label(format!(
                "Strokes: {}  Undone: {}",
                canvas.strokes().len(),
                canvas.undone_len()
            ));
        });
    });
}
