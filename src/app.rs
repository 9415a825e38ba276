use egui::Color32;

use crate::canvas::StrokeCanvas;
use crate::event::LoggingHandler;
use crate::panels::{central_panel, tools_panel};
use crate::settings::BrushSettings;
use crate::stroke::BrushMode;
use crate::view::CanvasView;

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PaintApp {
    brush: BrushSettings,
    // The drawing itself is not persisted
    #[serde(skip)]
    canvas: StrokeCanvas,
    #[serde(skip)]
    view: CanvasView,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self {
            brush: BrushSettings {
                width: 10.0,
                color: Color32::RED,
                mode: BrushMode::Paint,
            },
            canvas: StrokeCanvas::default(),
            view: CanvasView::new(),
        }
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.canvas.set_display_scale(cc.egui_ctx.pixels_per_point());
        if let Err(err) = app.canvas.apply_settings(app.brush) {
            log::warn!("stored brush settings rejected: {}", err);
        }
        app.canvas.subscribe(LoggingHandler::new());
        app
    }

    pub fn canvas(&self) -> &StrokeCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut StrokeCanvas {
        &mut self.canvas
    }

    pub(crate) fn view_and_canvas(&mut self) -> (&mut CanvasView, &mut StrokeCanvas) {
        (&mut self.view, &mut self.canvas)
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.brush = self.canvas.brush();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
