//! Derived view cache
//!
//! Views are pure functions of the parts. The cache remembers the last result
//! per view together with the repository record version it was built from.

use shared::{AppMode, AssemblyPart};

use super::{build_history, build_statistics, build_suggestions, HistoryView, Statistics, Suggestions};

/// Cached derived views, rebuilt when the record version (or mode) changes
#[derive(Default)]
pub struct ViewCache {
    history: Option<((u64, AppMode), HistoryView)>,
    statistics: Option<(u64, Statistics)>,
    suggestions: Option<(u64, Suggestions)>,
    rebuild_count: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&mut self, parts: &[AssemblyPart], version: u64, mode: AppMode) -> &HistoryView {
        let key = (version, mode);
        if self.history.as_ref().is_some_and(|(k, _)| *k != key) {
            self.history = None;
        }
        let rebuilds = &mut self.rebuild_count;
        &self
            .history
            .get_or_insert_with(|| {
                *rebuilds += 1;
                (key, build_history(parts, mode))
            })
            .1
    }

    pub fn statistics(&mut self, parts: &[AssemblyPart], version: u64) -> &Statistics {
        if self.statistics.as_ref().is_some_and(|(v, _)| *v != version) {
            self.statistics = None;
        }
        let rebuilds = &mut self.rebuild_count;
        &self
            .statistics
            .get_or_insert_with(|| {
                *rebuilds += 1;
                (version, build_statistics(parts))
            })
            .1
    }

    pub fn suggestions(&mut self, parts: &[AssemblyPart], version: u64) -> &Suggestions {
        if self.suggestions.as_ref().is_some_and(|(v, _)| *v != version) {
            self.suggestions = None;
        }
        let rebuilds = &mut self.rebuild_count;
        &self
            .suggestions
            .get_or_insert_with(|| {
                *rebuilds += 1;
                (version, build_suggestions(parts))
            })
            .1
    }

    /// Drop everything (used when a new part set is loaded)
    pub fn invalidate(&mut self) {
        self.history = None;
        self.statistics = None;
        self.suggestions = None;
    }

    /// Rebuild counter
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }
}
