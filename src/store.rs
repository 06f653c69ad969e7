use std::collections::BTreeMap;
use thiserror::Error;

use crate::feature::{DistrictColor, FeatureId, FeatureState, StatePatch};

/// Errors that can occur when exporting the assignment map
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to serialize assignment: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// The feature store seam: whoever owns the rendered units (in production,
/// the map layer) exposes per-feature state reads and merge-style writes.
///
/// Reads of unknown ids yield the default (unassigned, not hovered) state
/// rather than failing; a candidate set can momentarily reference features
/// the store has not seen.
pub trait FeatureStore {
    fn feature_state(&self, id: &FeatureId) -> FeatureState;

    /// Merge `patch` into the feature's state, creating the feature's state
    /// record if this is the first write.
    fn set_feature_state(&mut self, id: &FeatureId, patch: StatePatch);
}

/// In-memory feature store used for headless embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: BTreeMap<FeatureId, FeatureState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current district assignment for every feature the store has seen, in
    /// id order. Unassigned features appear with `None`.
    pub fn assignments(&self) -> BTreeMap<FeatureId, DistrictColor> {
        self.states
            .iter()
            .map(|(id, state)| (id.clone(), state.color))
            .collect()
    }

    /// JSON rendering of [`assignments`](Self::assignments), the shape a
    /// plan exporter persists.
    pub fn assignment_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string(&self.assignments())?)
    }

    /// Ids currently carrying the hover highlight, in id order.
    pub fn hovered(&self) -> Vec<FeatureId> {
        self.states
            .iter()
            .filter(|(_, state)| state.hover)
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl FeatureStore for MemoryStore {
    fn feature_state(&self, id: &FeatureId) -> FeatureState {
        self.states.get(id).copied().unwrap_or_default()
    }

    fn set_feature_state(&mut self, id: &FeatureId, patch: StatePatch) {
        patch.apply(self.states.entry(id.clone()).or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_features_read_as_unassigned() {
        let store = MemoryStore::new();
        let state = store.feature_state(&"nowhere".into());
        assert_eq!(state.color, None);
        assert!(!state.hover);
    }

    #[test]
    fn writes_merge_into_existing_state() {
        let mut store = MemoryStore::new();
        let id = FeatureId::new("a");

        store.set_feature_state(&id, StatePatch::color(Some(4)));
        store.set_feature_state(&id, StatePatch::hover(true));

        let state = store.feature_state(&id);
        assert_eq!(state.color, Some(4));
        assert!(state.hover);
    }

    #[test]
    fn assignment_json_is_keyed_by_feature_id() {
        let mut store = MemoryStore::new();
        store.set_feature_state(&"b".into(), StatePatch::color(Some(0)));
        store.set_feature_state(&"a".into(), StatePatch::color(None));

        let json = store.assignment_json().unwrap();
        assert_eq!(json, r#"{"a":null,"b":0}"#);
    }

    #[test]
    fn hovered_reports_only_highlighted_features() {
        let mut store = MemoryStore::new();
        store.set_feature_state(&"a".into(), StatePatch::hover(true));
        store.set_feature_state(&"b".into(), StatePatch::color(Some(1)));
        store.set_feature_state(&"c".into(), StatePatch::hover(true));
        store.set_feature_state(&"c".into(), StatePatch::hover(false));

        assert_eq!(store.hovered(), vec![FeatureId::new("a")]);
    }
}
