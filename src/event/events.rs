use std::collections::BTreeSet;

use crate::feature::{DistrictColor, Feature};

/// Distinct district colors touched by the operation in flight (stroke,
/// undo, or redo). Purely informational: subscribers use it to narrow which
/// district totals to refresh. `None` marks a transition involving
/// unassigned territory; live painting records only concrete colors, while
/// undo/redo record restores to unassigned as well.
pub type ChangedColors = BTreeSet<DistrictColor>;

/// Everything the paint engine reports to subscribers. Dispatch is
/// synchronous and ordered: `ColorFeature` per affected feature, then one
/// `ColorEnd` per pass, then `ColorOp` when a stroke/undo/redo completes,
/// then the boundary event for undo/redo calls.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintEvent {
    /// A feature is about to change color. Emitted before the store write,
    /// so `prior` is the feature's pre-mutation assignment; tally
    /// subscribers move the feature's counts from `prior` to `color`.
    ColorFeature {
        feature: Feature,
        prior: DistrictColor,
        color: DistrictColor,
    },
    /// All feature mutations for the current pass are done.
    ColorEnd,
    /// A discrete user action completed; downstream state (e.g. the
    /// persisted plan) should be saved now.
    ColorOp {
        undo_redo: bool,
        changed: ChangedColors,
    },
    /// An `undo()` call finished. `at_boundary` means there is nothing
    /// further to undo, so the control can be disabled.
    Undo { at_boundary: bool },
    /// A `redo()` call finished (or was a boundary no-op).
    Redo { at_boundary: bool },
}
