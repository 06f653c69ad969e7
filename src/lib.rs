#![warn(clippy::all, rust_2018_idioms)]

pub mod brush;
pub mod event;
pub mod feature;
pub mod history;
pub mod input;
pub mod selection;
pub mod store;

pub use brush::{Brush, BrushMode};
pub use event::{ChangedColors, EventBus, PaintEvent, PaintListener};
pub use feature::{DistrictColor, Feature, FeatureId, FeatureState, Properties, StatePatch};
pub use history::{Stroke, StrokeEntry, StrokeLog, MAX_STROKES};
pub use input::{Gesture, MapControl, PointerEvent};
pub use selection::{HoverHighlighter, SelectionProvider};
pub use store::{ExportError, ExportResult, FeatureStore, MemoryStore};
