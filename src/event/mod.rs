mod bus;
mod events;

pub use bus::EventBus;
pub use events::{ChangedColors, PaintEvent};

/// A paint-event subscriber (tally recalculation, plan persistence, UI
/// refresh, ...). Closures work too: any `FnMut(&PaintEvent)` is a
/// listener.
pub trait PaintListener: Send {
    fn on_event(&mut self, event: &PaintEvent);
}

impl<F> PaintListener for F
where
    F: FnMut(&PaintEvent) + Send,
{
    fn on_event(&mut self, event: &PaintEvent) {
        self(event)
    }
}
