use egui::{Pos2, Rect, Response};

/// A single-contact pointer sample in canvas-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactEvent {
    /// Contact started
    Began { location: Pos2 },
    /// Contact moved from `previous` to `location`
    Moved { location: Pos2, previous: Pos2 },
    /// Contact lifted
    Ended { location: Pos2, previous: Pos2 },
    /// Contact was interrupted by the system; handled like `Ended`
    Cancelled { location: Pos2, previous: Pos2 },
}

/// Converts egui drag interaction on the canvas widget into contact events
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Last local position of an ongoing contact
    last_location: Option<Pos2>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_contact(&self) -> bool {
        self.last_location.is_some()
    }

    /// Translate this frame's pointer interaction on `response`
    pub fn process(&mut self, response: &Response) -> Vec<ContactEvent> {
        let local = response.interact_pointer_pos().map(|pos| to_local(response.rect, pos));
        self.step(
            response.drag_started(),
            response.dragged(),
            response.drag_stopped(),
            local,
        )
    }

    /// Pointer-state transitions, split from `process` so they don't need a live UI
    pub fn step(
        &mut self,
        started: bool,
        dragging: bool,
        stopped: bool,
        location: Option<Pos2>,
    ) -> Vec<ContactEvent> {
        let mut events = Vec::new();

        if started {
            if let Some(location) = location {
                // A begin without an end means we missed the release
                if let Some(previous) = self.last_location.take() {
                    events.push(ContactEvent::Cancelled { location: previous, previous });
                }
                events.push(ContactEvent::Began { location });
                self.last_location = Some(location);
            }
        } else if dragging {
            if let (Some(previous), Some(location)) = (self.last_location, location) {
                if previous != location {
                    events.push(ContactEvent::Moved { location, previous });
                    self.last_location = Some(location);
                }
            }
        }

        if stopped {
            if let Some(previous) = self.last_location.take() {
                let location = location.unwrap_or(previous);
                events.push(ContactEvent::Ended { location, previous });
            }
        } else if !started && !dragging {
            // Lost the pointer mid-contact (focus change, widget hidden)
            if let Some(previous) = self.last_location.take() {
                events.push(ContactEvent::Cancelled { location: previous, previous });
            }
        }

        events
    }
}

fn to_local(rect: Rect, pos: Pos2) -> Pos2 {
    (pos - rect.min).to_pos2()
}
