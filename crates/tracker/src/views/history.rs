//! History grouping: month → day → vehicle

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::{AppMode, AssemblyPart, PartId, RecordKind};

use crate::i18n::t;
use crate::state::repository::{day_label, month_label};

/// Parts of one day delivered by one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleGroup {
    pub vehicle: String,
    pub parts: Vec<PartId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub label: String,
    /// Members in repository order
    pub parts: Vec<PartId>,
    /// Delivery mode only, sorted by vehicle
    pub vehicles: Vec<VehicleGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryMonth {
    /// `YYYY-MM`
    pub key: String,
    pub label: String,
    /// Most recent first
    pub days: Vec<HistoryDay>,
}

impl HistoryMonth {
    pub fn part_ids(&self) -> Vec<PartId> {
        self.days.iter().flat_map(|d| d.parts.iter().cloned()).collect()
    }
}

/// Grouped history for one record kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub kind: Option<RecordKind>,
    /// Most recent first
    pub months: Vec<HistoryMonth>,
}

impl HistoryView {
    /// Every part in the grouping, in display order
    pub fn all_part_ids(&self) -> Vec<PartId> {
        self.months.iter().flat_map(|m| m.part_ids()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn month(&self, key: &str) -> Option<&HistoryMonth> {
        self.months.iter().find(|m| m.key == key)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&HistoryDay> {
        self.months
            .iter()
            .flat_map(|m| m.days.iter())
            .find(|d| d.date == date)
    }
}

fn vehicle_key(part: &AssemblyPart) -> String {
    match &part.delivery {
        Some(d) if !d.vehicle.is_empty() => d.vehicle.clone(),
        _ => t("history.unassigned_vehicle").to_string(),
    }
}

/// Group parts by the date of the mode's record kind
pub fn build_history(parts: &[AssemblyPart], mode: AppMode) -> HistoryView {
    let Some(kind) = mode.record_kind() else {
        return HistoryView::default();
    };

    // (year, month) → date → parts; BTreeMap keeps keys ordered ascending
    let mut months: BTreeMap<(i32, u32), BTreeMap<NaiveDate, Vec<&AssemblyPart>>> =
        BTreeMap::new();
    for part in parts {
        if let Some(date) = part.record_date(kind) {
            months
                .entry((date.year(), date.month()))
                .or_default()
                .entry(date)
                .or_default()
                .push(part);
        }
    }

    let months = months
        .into_iter()
        .rev()
        .map(|((year, month), days)| HistoryMonth {
            key: format!("{year}-{month:02}"),
            label: month_label(year, month),
            days: days
                .into_iter()
                .rev()
                .map(|(date, members)| {
                    let vehicles = if kind == RecordKind::Delivery {
                        let mut groups: BTreeMap<String, Vec<PartId>> = BTreeMap::new();
                        for p in &members {
                            groups.entry(vehicle_key(p)).or_default().push(p.id.clone());
                        }
                        groups
                            .into_iter()
                            .map(|(vehicle, parts)| VehicleGroup { vehicle, parts })
                            .collect()
                    } else {
                        Vec::new()
                    };
                    HistoryDay {
                        date,
                        label: day_label(date),
                        parts: members.iter().map(|p| p.id.clone()).collect(),
                        vehicles,
                    }
                })
                .collect(),
        })
        .collect();

    HistoryView {
        kind: Some(kind),
        months,
    }
}
