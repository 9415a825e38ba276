use crate::event::{CanvasEvent, EventHandler};

/// Broadcasts canvas events to registered handlers, in registration order
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<Box<dyn EventHandler>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

impl EventBus {
    /// Creates a new event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&mut self, handler: Box<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    /// Emit an event to all registered handlers
    pub fn emit(&mut self, event: CanvasEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(&event);
        }
    }
}
