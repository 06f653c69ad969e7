use std::collections::HashSet;
use std::sync::Arc;

use crate::feature::{DistrictColor, FeatureId, Properties};

/// Most strokes the log retains; opening a stroke beyond this evicts the
/// oldest one.
pub const MAX_STROKES: usize = 9;

/// First-touch snapshot of one feature inside a stroke: the assignment it
/// held before the stroke reached it, plus the properties bag tally
/// subscribers need to un-count it on undo.
#[derive(Debug, Clone)]
pub struct StrokeEntry {
    pub id: FeatureId,
    pub properties: Properties,
    pub prior_color: DistrictColor,
}

/// One undoable unit of work: every feature first touched between
/// stroke-open and stroke-close, plus the brush color the stroke was
/// painted with. Frozen once the stroke closes.
#[derive(Debug, Clone)]
pub struct Stroke {
    brush_color: DistrictColor,
    entries: Vec<StrokeEntry>,
    recorded: HashSet<FeatureId>,
}

impl Stroke {
    fn new(brush_color: DistrictColor) -> Self {
        Self {
            brush_color,
            entries: Vec::new(),
            recorded: HashSet::new(),
        }
    }

    pub fn brush_color(&self) -> DistrictColor {
        self.brush_color
    }

    /// Entries in first-touch order.
    pub fn entries(&self) -> &[StrokeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record the feature's pre-stroke state unless it was already recorded
    /// by an earlier paint pass of the same stroke; the first observed
    /// prior color is what undo restores. Returns whether a record was
    /// written.
    pub(crate) fn record_first_touch(
        &mut self,
        id: &FeatureId,
        properties: &Properties,
        prior_color: DistrictColor,
    ) -> bool {
        if self.recorded.contains(id) {
            return false;
        }
        self.recorded.insert(id.clone());
        self.entries.push(StrokeEntry {
            id: id.clone(),
            properties: Arc::clone(properties),
            prior_color,
        });
        true
    }
}

/// The bounded undo/redo log: a sequence of strokes and a cursor at the
/// most recently applied one. Seeded with a sentinel stroke (the brush
/// color, no entries) so cursor 0 is always safe to re-apply; the sentinel
/// is evicted like any other stroke once the log fills.
#[derive(Debug)]
pub struct StrokeLog {
    strokes: Vec<Stroke>,
    cursor: usize,
}

impl StrokeLog {
    pub fn new(initial_color: DistrictColor) -> Self {
        Self {
            strokes: vec![Stroke::new(initial_color)],
            cursor: 0,
        }
    }

    /// Drop all history and re-seed the sentinel, as on plan load.
    pub fn reset(&mut self, color: DistrictColor) {
        self.strokes = vec![Stroke::new(color)];
        self.cursor = 0;
    }

    /// Start a new stroke tagged with the current brush color. Any redo
    /// branch beyond the cursor is discarded, and the oldest stroke is
    /// evicted if the log is at capacity.
    pub(crate) fn open(&mut self, brush_color: DistrictColor) {
        if self.cursor + 1 < self.strokes.len() {
            self.strokes.truncate(self.cursor + 1);
        }
        if self.strokes.len() >= MAX_STROKES {
            self.strokes.remove(0);
        }
        self.strokes.push(Stroke::new(brush_color));
        self.cursor = self.strokes.len() - 1;
    }

    /// The stroke at the cursor.
    pub fn current(&self) -> &Stroke {
        &self.strokes[self.cursor]
    }

    pub(crate) fn current_mut(&mut self) -> &mut Stroke {
        &mut self.strokes[self.cursor]
    }

    /// Move the cursor one stroke back, stopping at 0.
    pub(crate) fn retreat(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one stroke forward if a redo target exists.
    pub(crate) fn advance(&mut self) -> bool {
        if self.at_redo_boundary() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Nothing further to undo.
    pub fn at_undo_boundary(&self) -> bool {
        self.cursor == 0
    }

    /// Nothing to redo.
    pub fn at_redo_boundary(&self) -> bool {
        self.cursor + 1 >= self.strokes.len()
    }

    /// Number of strokes currently retained, sentinel included.
    pub fn depth(&self) -> usize {
        self.strokes.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Properties {
        Arc::new(serde_json::Map::new())
    }

    #[test]
    fn first_touch_wins_within_a_stroke() {
        let mut log = StrokeLog::new(Some(3));
        log.open(Some(3));

        let id = FeatureId::new("a");
        assert!(log.current_mut().record_first_touch(&id, &props(), Some(1)));
        assert!(!log.current_mut().record_first_touch(&id, &props(), Some(3)));

        let entries = log.current().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].prior_color, Some(1));
    }

    #[test]
    fn log_never_exceeds_capacity() {
        let mut log = StrokeLog::new(None);
        for _ in 0..25 {
            log.open(Some(1));
        }
        assert_eq!(log.depth(), MAX_STROKES);
        assert_eq!(log.cursor(), MAX_STROKES - 1);
    }

    #[test]
    fn eviction_drops_the_oldest_stroke() {
        let mut log = StrokeLog::new(None);
        for color in 0..=MAX_STROKES as u32 {
            log.open(Some(color));
        }
        // both the sentinel and the first real stroke have been evicted
        assert_eq!(log.depth(), MAX_STROKES);
        assert_eq!(log.strokes[0].brush_color(), Some(1));
    }

    #[test]
    fn opening_behind_the_cursor_discards_the_redo_branch() {
        let mut log = StrokeLog::new(None);
        log.open(Some(1));
        log.open(Some(2));
        log.open(Some(3));
        log.retreat();
        log.retreat();
        assert_eq!(log.cursor(), 1);

        log.open(Some(4));
        assert_eq!(log.depth(), 3); // sentinel, stroke 1, stroke 4
        assert!(log.at_redo_boundary());
        assert_eq!(log.current().brush_color(), Some(4));
    }

    #[test]
    fn cursor_floors_at_the_sentinel() {
        let mut log = StrokeLog::new(Some(5));
        log.open(Some(5));
        log.retreat();
        log.retreat();
        log.retreat();
        assert_eq!(log.cursor(), 0);
        assert!(log.at_undo_boundary());
        assert!(log.current().is_empty());
        assert_eq!(log.current().brush_color(), Some(5));
    }

    #[test]
    fn advance_refuses_past_the_end() {
        let mut log = StrokeLog::new(None);
        log.open(Some(1));
        assert!(!log.advance());
        log.retreat();
        assert!(log.advance());
        assert_eq!(log.cursor(), 1);
    }

    #[test]
    fn reset_reseeds_the_sentinel() {
        let mut log = StrokeLog::new(Some(1));
        log.open(Some(1));
        log.open(Some(2));
        log.reset(Some(7));
        assert_eq!(log.depth(), 1);
        assert_eq!(log.cursor(), 0);
        assert_eq!(log.current().brush_color(), Some(7));
    }
}
