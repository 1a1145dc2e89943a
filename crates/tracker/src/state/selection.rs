//! Group selection gestures
//!
//! Every "select a group" affordance (part click, history day/month, vehicle
//! group, statistics rows) goes through [`merge`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::PartId;

/// How a click combines its target group with the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    /// Plain click: select exactly the group, or clear if it already is the selection
    #[default]
    Replace,
    /// Ctrl/Cmd click: remove the group if all of it is selected, else add all of it
    ToggleGroup,
    /// Shift click: add the group
    Additive,
}

/// Combine `targets` into `current` according to `gesture`
pub fn merge(current: &HashSet<PartId>, targets: &[PartId], gesture: Gesture) -> HashSet<PartId> {
    let target_set: HashSet<PartId> = targets.iter().cloned().collect();

    match gesture {
        Gesture::Replace => {
            if *current == target_set {
                HashSet::new()
            } else {
                target_set
            }
        }
        Gesture::ToggleGroup => {
            if target_set.iter().all(|id| current.contains(id)) {
                current.difference(&target_set).cloned().collect()
            } else {
                current.union(&target_set).cloned().collect()
            }
        }
        Gesture::Additive => current.union(&target_set).cloned().collect(),
    }
}

/// "Select all history": clear if everything is already selected, else select exactly `all`.
///
/// Returns `None` when there is nothing to select.
pub fn select_all(current: &HashSet<PartId>, all: &[PartId]) -> Option<HashSet<PartId>> {
    if all.is_empty() {
        return None;
    }
    if all.iter().all(|id| current.contains(id)) {
        Some(HashSet::new())
    } else {
        Some(all.iter().cloned().collect())
    }
}
