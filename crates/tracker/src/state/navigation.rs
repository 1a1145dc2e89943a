//! History list navigation: expanded months and the open day

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use shared::PartId;

use super::selection::Gesture;
use super::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryNav {
    /// `YYYY-MM` keys
    pub expanded_months: BTreeSet<String>,
    /// At most one day is open
    pub expanded_date: Option<NaiveDate>,
}

impl HistoryNav {
    pub fn is_month_expanded(&self, key: &str) -> bool {
        self.expanded_months.contains(key)
    }

    pub fn is_date_expanded(&self, date: NaiveDate) -> bool {
        self.expanded_date == Some(date)
    }

    pub fn reset(&mut self) {
        self.expanded_months.clear();
        self.expanded_date = None;
    }
}

impl AppState {
    /// Month header click.
    ///
    /// A plain click on an open month collapses it and clears the selection.
    /// Anything else opens it and merges its parts into the selection.
    pub fn toggle_month(&mut self, key: &str, gesture: Gesture) {
        let Some(ids) = self.history().month(key).map(|m| m.part_ids()) else {
            return;
        };
        if gesture == Gesture::Replace && self.nav.is_month_expanded(key) {
            self.nav.expanded_months.remove(key);
            self.clear_selection();
        } else {
            self.nav.expanded_months.insert(key.to_string());
            self.select_group(&ids, gesture);
        }
    }

    /// Day header click, same rules as [`AppState::toggle_month`]
    pub fn toggle_date(&mut self, date: NaiveDate, gesture: Gesture) {
        let Some(ids) = self.history().day(date).map(|d| d.parts.clone()) else {
            return;
        };
        if gesture == Gesture::Replace && self.nav.is_date_expanded(date) {
            self.nav.expanded_date = None;
            self.clear_selection();
        } else {
            self.nav.expanded_date = Some(date);
            self.select_group(&ids, gesture);
        }
    }

    /// Vehicle header click inside a delivery day
    pub fn select_vehicle_group(&mut self, date: NaiveDate, vehicle: &str, gesture: Gesture) {
        let ids: Vec<PartId> = self
            .history()
            .day(date)
            .and_then(|d| d.vehicles.iter().find(|g| g.vehicle == vehicle))
            .map(|g| g.parts.clone())
            .unwrap_or_default();
        if !ids.is_empty() {
            self.select_group(&ids, gesture);
        }
    }
}
