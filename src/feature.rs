use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// District assignment for a single feature. `None` means unassigned;
/// `Some(0)` is a real district and must never collapse into `None`.
pub type DistrictColor = Option<u32>;

/// Immutable attribute bag carried by a feature (population counts, VAP
/// columns, ...). The engine never reads it; it is passed through to tally
/// subscribers so painted-over values can be un-counted.
pub type Properties = Arc<serde_json::Map<String, serde_json::Value>>;

/// Opaque, stable feature key (GEOID-style in real deployments).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FeatureId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for FeatureId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatureId({})", self.0)
    }
}

/// A geographic unit as delivered by the selection provider: identity plus
/// the static properties snapshot. Mutable display state (color, hover)
/// lives in the feature store, not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    id: FeatureId,
    properties: Properties,
}

impl Feature {
    /// A feature with an empty property bag.
    pub fn new(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            properties: Arc::new(serde_json::Map::new()),
        }
    }

    pub fn with_properties(id: impl Into<FeatureId>, properties: Properties) -> Self {
        Self {
            id: id.into(),
            properties,
        }
    }

    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

/// Mutable per-feature display state held by the feature store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureState {
    /// Current district assignment.
    pub color: DistrictColor,
    /// Display-only hover highlight flag.
    pub hover: bool,
}

/// Partial state write, merged into the existing `FeatureState` the way the
/// map library's `setFeatureState(id, partial)` merges. Absent fields are
/// left untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub color: Option<DistrictColor>,
    pub hover: Option<bool>,
}

impl StatePatch {
    /// Patch that overwrites the color (including overwriting to `None`).
    pub fn color(color: DistrictColor) -> Self {
        Self {
            color: Some(color),
            hover: None,
        }
    }

    /// Patch that only touches the hover flag.
    pub fn hover(hover: bool) -> Self {
        Self {
            color: None,
            hover: Some(hover),
        }
    }

    pub fn with_hover(mut self, hover: bool) -> Self {
        self.hover = Some(hover);
        self
    }

    pub fn apply(self, state: &mut FeatureState) {
        if let Some(color) = self.color {
            state.color = color;
        }
        if let Some(hover) = self.hover {
            state.hover = hover;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_present_fields() {
        let mut state = FeatureState {
            color: Some(2),
            hover: false,
        };

        StatePatch::hover(true).apply(&mut state);
        assert_eq!(state.color, Some(2));
        assert!(state.hover);

        StatePatch::color(None).apply(&mut state);
        assert_eq!(state.color, None);
        assert!(state.hover);
    }

    #[test]
    fn color_patch_can_carry_hover() {
        let mut state = FeatureState::default();
        StatePatch::color(Some(0)).with_hover(true).apply(&mut state);
        assert_eq!(state.color, Some(0));
        assert!(state.hover);
    }

    #[test]
    fn feature_id_round_trips_through_json_as_a_string() {
        let id = FeatureId::new("26163-0042");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"26163-0042\"");
        let back: FeatureId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
