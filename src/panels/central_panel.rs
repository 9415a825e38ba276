use crate::PaintApp;

/// Backdrop shown through transparent (never painted or erased) pixels
const PAPER: egui::Color32 = egui::Color32::WHITE;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(PAPER))
        .show(ctx, |ui| {
            let (view, canvas) = app.view_and_canvas();
            let response = view.show(ui, canvas);
            if response.dragged() {
                // Keep frames coming while the pointer is down
                ctx.request_repaint();
            }
        });
}
