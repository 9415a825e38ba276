mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::CanvasEvent;
pub use handlers::LoggingHandler;

/// Receives canvas notifications synchronously, on the thread that drives the canvas
pub trait EventHandler {
    fn handle_event(&mut self, event: &CanvasEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&CanvasEvent),
{
    fn handle_event(&mut self, event: &CanvasEvent) {
        self(event)
    }
}
