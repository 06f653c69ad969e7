use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::event::{ChangedColors, EventBus, PaintEvent, PaintListener};
use crate::feature::{DistrictColor, Feature, FeatureId, StatePatch};
use crate::history::StrokeLog;
use crate::input::{Gesture, MapControl, PointerEvent};
use crate::selection::SelectionProvider;
use crate::store::FeatureStore;

/// What painting over a feature does with the brush color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushMode {
    /// Apply the brush color.
    Painting,
    /// Apply "unassigned"; the pre-erase color is restored on
    /// [`Brush::stop_erasing`].
    Erasing,
}

/// The paint engine: turns candidate feature sets into district
/// assignments, one undoable stroke per pointer gesture.
///
/// All mutation is synchronous inside a single call; subscribers see
/// `ColorFeature` per feature, `ColorEnd` per pass, `ColorOp` per completed
/// stroke/undo/redo, in that order.
pub struct Brush<L: FeatureStore> {
    id: Uuid,
    layer: L,
    selection: Box<dyn SelectionProvider>,
    map: Box<dyn MapControl>,
    color: DistrictColor,
    previous_color: DistrictColor,
    mode: BrushMode,
    locked: bool,
    coloring: bool,
    active: bool,
    hovered: Vec<Feature>,
    changed_colors: ChangedColors,
    log: StrokeLog,
    bus: EventBus,
}

impl<L: FeatureStore> Brush<L> {
    pub fn new(
        layer: L,
        selection: Box<dyn SelectionProvider>,
        map: Box<dyn MapControl>,
        color: DistrictColor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            layer,
            selection,
            map,
            color,
            previous_color: None,
            mode: BrushMode::Painting,
            locked: false,
            coloring: false,
            active: false,
            hovered: Vec::new(),
            changed_colors: ChangedColors::new(),
            log: StrokeLog::new(color),
            bus: EventBus::new(),
        }
    }

    /// Register a subscriber for all paint events.
    pub fn subscribe(&mut self, listener: Box<dyn PaintListener>) {
        self.bus.subscribe(listener);
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn color(&self) -> DistrictColor {
        self.color
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Restrict painting to currently-unassigned features (erasing is
    /// exempt).
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// A stroke is currently open.
    pub fn is_coloring(&self) -> bool {
        self.coloring
    }

    pub fn layer(&self) -> &L {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Read-only view of the undo/redo log.
    pub fn history(&self) -> &StrokeLog {
        &self.log
    }

    /// Colors touched by the most recent stroke, undo, or redo.
    pub fn changed_colors(&self) -> &ChangedColors {
        &self.changed_colors
    }

    pub fn set_color(&mut self, color: DistrictColor) {
        self.color = color;
    }

    /// Coerce raw UI input ("3", "12px", ...) to a district color. Anything
    /// without a leading integer paints "unassigned"; legality of the
    /// district index is the caller's concern.
    pub fn set_color_text(&mut self, raw: &str) {
        self.color = parse_color_text(raw);
    }

    /// Switch to erasing, remembering the active color.
    pub fn start_erasing(&mut self) {
        if self.mode == BrushMode::Erasing {
            return;
        }
        self.previous_color = self.color;
        self.color = None;
        self.mode = BrushMode::Erasing;
        debug!("brush {} erasing", self.id);
    }

    /// Return to painting with the color active before the erase session.
    pub fn stop_erasing(&mut self) {
        if self.mode == BrushMode::Painting {
            return;
        }
        self.color = self.previous_color;
        self.mode = BrushMode::Painting;
        debug!("brush {} painting with {:?}", self.id, self.color);
    }

    /// Drop all undo history, as on plan load or import.
    pub fn reset_history(&mut self) {
        self.log.reset(self.color);
    }

    /// Take over pointer input: show the brush cursor, start the selection
    /// provider, and disable every competing map gesture. Idempotent.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        info!("brush {} activated", self.id);
        self.map.set_brush_cursor(true);
        self.selection.activate();
        for gesture in Gesture::ALL {
            self.map.set_gesture_enabled(gesture, false);
        }
    }

    /// Release pointer input and restore map gestures. An open stroke is
    /// closed first so its `ColorOp` is never lost. Idempotent.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        if self.coloring {
            self.close_stroke();
        }
        self.active = false;
        info!("brush {} deactivated", self.id);
        self.map.set_brush_cursor(false);
        self.selection.deactivate(&mut self.layer);
        for gesture in Gesture::ALL {
            self.map.set_gesture_enabled(gesture, true);
        }
    }

    /// Drive the stroke state machine. Returns `true` when the engine
    /// consumed the event and the host must suppress the default map
    /// behavior for it.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.active {
            return false;
        }
        match event {
            PointerEvent::Down => {
                self.open_stroke();
                true
            }
            PointerEvent::TouchStart { touches } => {
                if touches > 1 {
                    debug!("ignoring {touches}-point touch start");
                    return false;
                }
                self.open_stroke();
                true
            }
            PointerEvent::Up | PointerEvent::Cancel => {
                if !self.coloring {
                    return false;
                }
                self.close_stroke();
                true
            }
            PointerEvent::Click => {
                self.open_stroke();
                self.color_features();
                self.close_stroke();
                true
            }
        }
    }

    /// A new candidate set arrived from the pointer. While a stroke is open
    /// the set is painted immediately; otherwise it is handed to the
    /// selection provider's hover highlight.
    pub fn hover_on(&mut self, features: Vec<Feature>) {
        self.hovered = features;
        if !self.active {
            return;
        }
        if self.coloring {
            self.color_features();
        } else {
            self.selection.hover_on(&mut self.layer, &self.hovered);
        }
    }

    fn open_stroke(&mut self) {
        if self.coloring {
            return;
        }
        self.coloring = true;
        self.changed_colors.clear();
        self.log.open(self.color);
        debug!(
            "stroke open at cursor {} ({} retained)",
            self.log.cursor(),
            self.log.depth()
        );
    }

    fn close_stroke(&mut self) {
        self.coloring = false;
        debug!(
            "stroke closed, {} features recorded",
            self.log.current().entries().len()
        );
        self.bus.emit(PaintEvent::ColorOp {
            undo_redo: false,
            changed: self.changed_colors.clone(),
        });
    }

    /// Paint the current candidate set with the mode-dependent filter:
    /// locked brushes only fill unassigned territory, everything else skips
    /// features already at the brush color.
    fn color_features(&mut self) {
        if self.locked && self.mode != BrushMode::Erasing {
            self.paint_hovered(|current| current.is_none());
        } else {
            let brush = self.color;
            self.paint_hovered(move |current| current != brush);
        }
    }

    fn paint_hovered(&mut self, eligible: impl Fn(DistrictColor) -> bool) {
        let mut seen: HashSet<FeatureId> = HashSet::new();
        if self.color.is_some() {
            self.changed_colors.insert(self.color);
        }
        let hovered = self.hovered.clone();
        for feature in &hovered {
            let state = self.layer.feature_state(feature.id());
            if eligible(state.color) {
                // candidate sets can repeat an id (one feature, many tiles);
                // listeners hear about it once per pass
                if seen.insert(feature.id().clone()) {
                    self.bus.emit(PaintEvent::ColorFeature {
                        feature: feature.clone(),
                        prior: state.color,
                        color: self.color,
                    });
                }
                self.log.current_mut().record_first_touch(
                    feature.id(),
                    feature.properties(),
                    state.color,
                );
                if state.color.is_some() {
                    self.changed_colors.insert(state.color);
                }
                self.layer.set_feature_state(
                    feature.id(),
                    StatePatch::color(self.color).with_hover(true),
                );
            } else {
                // the highlight still follows the pointer over features the
                // filter skips
                self.layer
                    .set_feature_state(feature.id(), StatePatch::hover(true));
            }
        }
        self.bus.emit(PaintEvent::ColorEnd);
    }

    /// Reverse the stroke at the cursor: every recorded feature goes back
    /// to its pre-stroke assignment. At the boundary this re-applies stroke
    /// 0, which for the sentinel changes nothing.
    pub fn undo(&mut self) {
        self.changed_colors.clear();
        let stroke = self.log.current().clone();
        let brushed = stroke.brush_color();
        if brushed.is_some() {
            self.changed_colors.insert(brushed);
        }
        for entry in stroke.entries() {
            let restore = entry.prior_color;
            self.changed_colors.insert(restore);
            self.layer
                .set_feature_state(&entry.id, StatePatch::color(restore));
            self.bus.emit(PaintEvent::ColorFeature {
                feature: Feature::with_properties(entry.id.clone(), Arc::clone(&entry.properties)),
                prior: brushed,
                color: restore,
            });
        }
        self.log.retreat();
        debug!("undo to cursor {}", self.log.cursor());
        self.bus.emit(PaintEvent::ColorEnd);
        self.bus.emit(PaintEvent::ColorOp {
            undo_redo: true,
            changed: self.changed_colors.clone(),
        });
        self.bus.emit(PaintEvent::Undo {
            at_boundary: self.log.at_undo_boundary(),
        });
    }

    /// Re-apply the stroke after the cursor. At the boundary nothing moves
    /// and only the boundary event fires.
    pub fn redo(&mut self) {
        self.changed_colors.clear();
        if !self.log.advance() {
            self.bus.emit(PaintEvent::Redo { at_boundary: true });
            return;
        }
        let stroke = self.log.current().clone();
        let brushed = stroke.brush_color();
        if brushed.is_some() {
            self.changed_colors.insert(brushed);
        }
        for entry in stroke.entries() {
            let restore = entry.prior_color;
            self.changed_colors.insert(restore);
            self.layer
                .set_feature_state(&entry.id, StatePatch::color(brushed));
            self.bus.emit(PaintEvent::ColorFeature {
                feature: Feature::with_properties(entry.id.clone(), Arc::clone(&entry.properties)),
                prior: restore,
                color: brushed,
            });
        }
        debug!("redo to cursor {}", self.log.cursor());
        self.bus.emit(PaintEvent::ColorEnd);
        self.bus.emit(PaintEvent::ColorOp {
            undo_redo: true,
            changed: self.changed_colors.clone(),
        });
        self.bus.emit(PaintEvent::Redo {
            at_boundary: self.log.at_redo_boundary(),
        });
    }
}

fn parse_color_text(raw: &str) -> DistrictColor {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<u32>() {
        Ok(color) => Some(color),
        Err(_) => {
            warn!("unusable district color {raw:?}, treating as unassigned");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_text_takes_the_leading_integer() {
        assert_eq!(parse_color_text("3"), Some(3));
        assert_eq!(parse_color_text("  12 "), Some(12));
        assert_eq!(parse_color_text("0"), Some(0));
        assert_eq!(parse_color_text("7px"), Some(7));
    }

    #[test]
    fn color_text_without_digits_means_unassigned() {
        assert_eq!(parse_color_text(""), None);
        assert_eq!(parse_color_text("blue"), None);
        assert_eq!(parse_color_text("-1"), None);
    }
}
