use std::cell::RefCell;

use crate::event::{PaintEvent, PaintListener};

/// A simple event bus for broadcasting paint events to registered listeners
pub struct EventBus {
    listeners: RefCell<Vec<Box<dyn PaintListener>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "listeners",
                &format!("<{} listeners>", self.listeners.borrow().len()),
            )
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a listener to receive every event.
    pub fn subscribe(&self, listener: Box<dyn PaintListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Emit an event to all registered listeners, in registration order.
    pub fn emit(&self, event: PaintEvent) {
        for listener in &mut *self.listeners.borrow_mut() {
            listener.on_event(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn listeners_run_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Arc::clone(&order);
            bus.subscribe(Box::new(move |_: &PaintEvent| {
                order.lock().unwrap().push(tag);
            }));
        }

        bus.emit(PaintEvent::ColorEnd);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn every_listener_sees_every_event() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0u32));

        for _ in 0..3 {
            let count = Arc::clone(&count);
            bus.subscribe(Box::new(move |_: &PaintEvent| {
                *count.lock().unwrap() += 1;
            }));
        }

        bus.emit(PaintEvent::ColorEnd);
        bus.emit(PaintEvent::Undo { at_boundary: true });
        assert_eq!(*count.lock().unwrap(), 6);
    }
}
