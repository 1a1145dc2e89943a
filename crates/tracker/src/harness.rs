//! Headless harness for driving the tracker without a viewer.
//!
//! Wraps [`AppState`] with string-friendly helpers for tests and the command
//! protocol.

use chrono::NaiveDate;
use shared::{AppMode, AssemblyPart, PartId, PartSeed};

use crate::error::SubmitError;
use crate::fixtures::demo_seeds;
use crate::state::{AppState, Gesture, SubmitOutcome, TrackerSettings};

/// Headless harness: app state with default settings
pub struct TrackerHarness {
    pub state: AppState,
}

impl TrackerHarness {
    /// Create a harness with no parts.
    pub fn new() -> Self {
        Self::with_parts(Vec::new())
    }

    pub fn with_parts(seeds: Vec<PartSeed>) -> Self {
        Self::with_settings(seeds, TrackerSettings::default())
    }

    pub fn with_settings(seeds: Vec<PartSeed>, settings: TrackerSettings) -> Self {
        Self {
            state: AppState::new(seeds, settings),
        }
    }

    /// Harness loaded with the built-in demo model
    pub fn demo() -> Self {
        Self::with_parts(demo_seeds())
    }

    // ── Parts ─────────────────────────────────────────────────

    /// Replace the parts with a JSON array of seeds
    pub fn load_parts_json(&mut self, json: &str) -> Result<usize, String> {
        let seeds: Vec<PartSeed> =
            serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;
        self.state.load(seeds);
        Ok(self.part_count())
    }

    /// Export the current parts as JSON
    pub fn export_parts_json(&self) -> String {
        serde_json::to_string_pretty(self.state.parts()).unwrap_or_default()
    }

    pub fn part(&self, id: &str) -> Option<&AssemblyPart> {
        self.state.repository().get(id)
    }

    pub fn part_count(&self) -> usize {
        self.state.parts().len()
    }

    // ── Selection ─────────────────────────────────────────────

    /// Select exactly these parts (a plain group click)
    pub fn select(&mut self, ids: &[&str]) {
        let ids: Vec<PartId> = ids.iter().map(|s| s.to_string()).collect();
        self.state.select_group(&ids, Gesture::Replace);
    }

    pub fn click(&mut self, id: &str) {
        self.state.click_part(id);
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    /// Selected ids in load order
    pub fn selected(&self) -> Vec<PartId> {
        self.state.repository().selected_ids_ordered()
    }

    // ── Modes and writes ──────────────────────────────────────

    pub fn set_mode(&mut self, mode: AppMode) {
        self.state.set_mode(mode);
    }

    pub fn set_assembly_selection(&mut self, enabled: bool) {
        self.state.set_assembly_selection(enabled);
    }

    pub fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        self.state.submit()
    }

    /// Tick the overwrite checkbox and confirm
    pub fn confirm_overwrite(&mut self) -> Result<SubmitOutcome, SubmitError> {
        self.state.acknowledge_overwrite(true)?;
        self.state.confirm_overwrite()
    }

    // ── Inspection ────────────────────────────────────────────

    /// Ids in the active history, in display order
    pub fn history_ids(&mut self) -> Vec<PartId> {
        self.state.history().all_part_ids()
    }

    /// Ids in one history day of the active mode
    pub fn history_day(&mut self, date: NaiveDate) -> Vec<PartId> {
        self.state
            .history()
            .day(date)
            .map(|d| d.parts.clone())
            .unwrap_or_default()
    }

    pub fn log_actions(&self, id: &str) -> Vec<String> {
        self.part(id)
            .map(|p| p.logs.iter().map(|l| l.action.clone()).collect())
            .unwrap_or_default()
    }
}

impl Default for TrackerHarness {
    fn default() -> Self {
        Self::new()
    }
}
