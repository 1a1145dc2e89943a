pub mod forms;
pub mod group_edit;
pub mod navigation;
pub mod repository;
pub mod selection;
pub mod settings;
pub mod submit;

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::{AppMode, AssemblyPart, DisplayField, PartId, PartSeed};

pub use forms::{FormFeedback, PendingOverwrite, RecordForms};
pub use group_edit::{GroupEdit, GroupSaveOutcome};
pub use navigation::HistoryNav;
pub use repository::{PartRepository, StoreCommand, WriteReason};
pub use selection::Gesture;
pub use settings::{DisplaySettings, TrackerSettings};
pub use submit::SubmitOutcome;

use crate::i18n::{self, Lang};
use crate::views::statistics::StatisticsTarget;
use crate::views::{CalendarMonth, HistoryView, Statistics, Suggestions, ViewCache};

/// Selected parts listed before "show more"
pub const SELECTION_PAGE: usize = 50;

/// Combined application state
pub struct AppState {
    repository: PartRepository,
    mode: AppMode,
    /// Simulated host flag: assembly selection enabled in the viewer
    assembly_selection: bool,
    pub forms: RecordForms,
    pub settings: TrackerSettings,
    views: ViewCache,
    nav: HistoryNav,
    group_edit: Option<GroupEdit>,
    /// Number of selected parts currently listed
    selection_limit: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new(), TrackerSettings::default())
    }
}

impl AppState {
    pub fn new(seeds: Vec<PartSeed>, settings: TrackerSettings) -> Self {
        Self {
            repository: PartRepository::load(seeds),
            mode: AppMode::default(),
            assembly_selection: true,
            forms: RecordForms::default(),
            settings,
            views: ViewCache::new(),
            nav: HistoryNav::default(),
            group_edit: None,
            selection_limit: SELECTION_PAGE,
        }
    }

    /// Replace the whole part list
    pub fn load(&mut self, seeds: Vec<PartSeed>) {
        self.repository = PartRepository::load(seeds);
        self.views.invalidate();
        self.nav.reset();
        self.group_edit = None;
        self.on_selection_changed();
    }

    pub fn repository(&self) -> &PartRepository {
        &self.repository
    }

    pub fn parts(&self) -> &[AssemblyPart] {
        self.repository.parts()
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Switch tabs: clears the selection, the form feedback and the history
    /// navigation, and resets every form date to today
    pub fn set_mode(&mut self, mode: AppMode) {
        if mode == self.mode {
            return;
        }
        tracing::debug!("Mode {} -> {mode}", self.mode);
        self.mode = mode;
        self.nav.reset();
        self.group_edit = None;
        self.forms.reset_dates(forms::today());
        self.apply_selection(HashSet::new());
        self.on_selection_changed();
    }

    // ── Gating ────────────────────────────────────────────────

    pub fn assembly_selection(&self) -> bool {
        self.assembly_selection
    }

    pub fn set_assembly_selection(&mut self, enabled: bool) {
        if enabled == self.assembly_selection {
            return;
        }
        self.assembly_selection = enabled;
        tracing::debug!("Assembly selection {}", if enabled { "on" } else { "off" });
        if matches!(
            self.forms.error(),
            Some(crate::error::SubmitError::ModeBlocked { .. })
        ) {
            self.forms.clear_feedback();
        }
    }

    pub fn toggle_assembly_selection(&mut self) {
        self.set_assembly_selection(!self.assembly_selection);
    }

    /// True when the active mode cannot write under the current flag
    pub fn is_mode_blocked(&self) -> bool {
        !self.mode.accepts_writes(self.assembly_selection)
    }

    // ── Selection ─────────────────────────────────────────────

    /// Make `next` the selection. Unknown ids are dropped.
    fn apply_selection(&mut self, mut next: HashSet<PartId>) {
        next.retain(|id| self.repository.get(id).is_some());
        if next == self.repository.selected_ids() {
            return;
        }
        tracing::debug!(
            "Selection {} -> {} parts",
            self.repository.selected_count(),
            next.len()
        );
        self.repository.apply(StoreCommand::ReplaceSelection { ids: next });
        self.on_selection_changed();
    }

    fn on_selection_changed(&mut self) {
        self.forms.clear_feedback();
        self.selection_limit = SELECTION_PAGE;
    }

    /// Merge a group of parts into the selection
    pub fn select_group(&mut self, ids: &[PartId], gesture: Gesture) {
        let next = selection::merge(&self.repository.selected_ids(), ids, gesture);
        self.apply_selection(next);
    }

    /// Viewer click on one part. Ignored in statistics mode.
    pub fn click_part(&mut self, id: &str) {
        if self.mode == AppMode::Statistics || self.repository.get(id).is_none() {
            return;
        }
        self.select_group(&[id.to_string()], Gesture::ToggleGroup);
    }

    /// Select everything in the active history, or clear if it is all selected
    pub fn select_all_history(&mut self) {
        let all = self.history().all_part_ids();
        if let Some(next) = selection::select_all(&self.repository.selected_ids(), &all) {
            self.apply_selection(next);
        }
    }

    pub fn clear_selection(&mut self) {
        self.apply_selection(HashSet::new());
    }

    pub fn remove_from_selection(&mut self, id: &str) {
        if !self.repository.get(id).is_some_and(|p| p.is_selected) {
            return;
        }
        self.repository.apply(StoreCommand::RemoveFromSelection { id: id.to_string() });
        self.on_selection_changed();
    }

    /// Statistics bar or leaderboard row click
    pub fn select_statistics(&mut self, target: &StatisticsTarget, gesture: Gesture) {
        let ids = target.part_ids(self.repository.parts());
        self.select_group(&ids, gesture);
    }

    /// Selected parts listed in the sidebar
    pub fn visible_selected(&self) -> Vec<&AssemblyPart> {
        self.repository.selected().take(self.selection_limit).collect()
    }

    /// Selected parts not listed yet
    pub fn hidden_selected_count(&self) -> usize {
        self.repository.selected_count().saturating_sub(self.selection_limit)
    }

    pub fn show_more(&mut self) {
        self.selection_limit += SELECTION_PAGE;
    }

    // ── Derived views ─────────────────────────────────────────

    pub fn history(&mut self) -> &HistoryView {
        self.views
            .history(self.repository.parts(), self.repository.records_version(), self.mode)
    }

    pub fn statistics(&mut self) -> &Statistics {
        self.views
            .statistics(self.repository.parts(), self.repository.records_version())
    }

    pub fn suggestions(&mut self) -> &Suggestions {
        self.views
            .suggestions(self.repository.parts(), self.repository.records_version())
    }

    /// Activity calendar for the month containing `date`, moved by `offset` months
    pub fn calendar(&self, date: NaiveDate, offset: i32) -> Option<CalendarMonth> {
        let parts = self.repository.parts();
        CalendarMonth::containing(date, parts)?.shifted(offset, parts)
    }

    pub fn nav(&self) -> &HistoryNav {
        &self.nav
    }

    pub fn group_edit(&self) -> Option<&GroupEdit> {
        self.group_edit.as_ref()
    }

    // ── Preferences ───────────────────────────────────────────

    /// Label attribute of the active mode
    pub fn display_field(&self) -> DisplayField {
        self.settings.display.field_for(self.mode)
    }

    pub fn set_display_field(&mut self, field: DisplayField) {
        self.settings.display.set(self.mode, field);
    }

    pub fn part_label(&self, id: &str) -> Option<&str> {
        let field = self.display_field();
        self.repository.get(id).map(|p| p.label(field))
    }

    /// Switch the UI language. Cached views carry localized labels and are rebuilt.
    pub fn set_language(&mut self, lang: Lang) {
        i18n::set_lang(lang);
        self.settings.language = lang;
        self.views.invalidate();
    }
}
