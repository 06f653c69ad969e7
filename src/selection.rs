use std::collections::HashSet;

use crate::feature::{Feature, FeatureId, StatePatch};
use crate::store::FeatureStore;

/// The hover/selection collaborator. The host's hover-with-radius machinery
/// computes candidate sets from the pointer position; the engine composes
/// with one of these rather than inheriting its behavior, and only invokes
/// `hover_on` when no stroke is open (while painting, candidates are
/// consumed by the brush instead).
pub trait SelectionProvider {
    fn activate(&mut self);

    /// Tear down any highlight state this provider has written.
    fn deactivate(&mut self, layer: &mut dyn FeatureStore);

    /// The pointer moved while no stroke is open; show the candidate set.
    fn hover_on(&mut self, layer: &mut dyn FeatureStore, features: &[Feature]);
}

/// Default hover strategy: highlight the current candidate set and clear
/// the highlight from features the pointer has left.
#[derive(Debug, Default)]
pub struct HoverHighlighter {
    current: HashSet<FeatureId>,
}

impl HoverHighlighter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionProvider for HoverHighlighter {
    fn activate(&mut self) {}

    fn deactivate(&mut self, layer: &mut dyn FeatureStore) {
        for id in self.current.drain() {
            layer.set_feature_state(&id, StatePatch::hover(false));
        }
    }

    fn hover_on(&mut self, layer: &mut dyn FeatureStore, features: &[Feature]) {
        let next: HashSet<FeatureId> = features.iter().map(|f| f.id().clone()).collect();

        for id in self.current.difference(&next) {
            layer.set_feature_state(id, StatePatch::hover(false));
        }
        for id in &next {
            layer.set_feature_state(id, StatePatch::hover(true));
        }

        self.current = next;
    }
}
