//! Statistics snapshot: counts, leaderboards, recent activity

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{AssemblyPart, PartId, RecordKind};

/// Leaderboard length
pub const TOP_N: usize = 5;

/// Number of active days in the activity series
pub const ACTIVITY_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub installed: usize,
    pub delivered: usize,
    pub bolted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub label: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub counts: KindCounts,
    pub top_installers: Vec<LeaderboardEntry>,
    pub top_vehicles: Vec<LeaderboardEntry>,
    pub top_bolters: Vec<LeaderboardEntry>,
    /// Last active installation days, oldest first
    pub installation_activity: Vec<ActivityPoint>,
    /// Last active delivery days, oldest first
    pub delivery_activity: Vec<ActivityPoint>,
}

impl Statistics {
    /// Share of all parts that carry `value` records, rounded to a whole percent
    pub fn percent(&self, value: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((value as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// Occurrence counter that remembers first-seen order
#[derive(Default)]
struct Tally(Vec<(String, usize)>);

impl Tally {
    fn add(&mut self, label: &str) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some((_, n)) => *n += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    /// Highest counts first; `sort_by` is stable so ties keep first-seen order
    fn top(mut self, n: usize) -> Vec<LeaderboardEntry> {
        self.0.sort_by(|a, b| b.1.cmp(&a.1));
        self.0
            .into_iter()
            .take(n)
            .map(|(label, value)| LeaderboardEntry { label, value })
            .collect()
    }
}

fn recent_activity(mut dates: Vec<NaiveDate>) -> Vec<ActivityPoint> {
    dates.sort();
    let mut points: Vec<ActivityPoint> = Vec::new();
    for date in dates {
        match points.last_mut() {
            Some(last) if last.date == date => last.value += 1,
            _ => points.push(ActivityPoint { date, value: 1 }),
        }
    }
    let skip = points.len().saturating_sub(ACTIVITY_DAYS);
    points.split_off(skip)
}

pub fn build_statistics(parts: &[AssemblyPart]) -> Statistics {
    let mut counts = KindCounts::default();
    let mut installers = Tally::default();
    let mut vehicles = Tally::default();
    let mut bolters = Tally::default();
    let mut install_dates = Vec::new();
    let mut delivery_dates = Vec::new();

    for part in parts {
        if let Some(r) = &part.installation {
            counts.installed += 1;
            install_dates.push(r.date);
            for name in &r.installers {
                installers.add(name);
            }
        }
        if let Some(r) = &part.delivery {
            counts.delivered += 1;
            delivery_dates.push(r.date);
            vehicles.add(&r.vehicle);
        }
        if let Some(r) = &part.bolting {
            counts.bolted += 1;
            bolters.add(&r.installer);
        }
    }

    Statistics {
        total: parts.len(),
        counts,
        top_installers: installers.top(TOP_N),
        top_vehicles: vehicles.top(TOP_N),
        top_bolters: bolters.top(TOP_N),
        installation_activity: recent_activity(install_dates),
        delivery_activity: recent_activity(delivery_dates),
    }
}

// ── Id queries behind the clickable statistics rows ──────────

/// Parts carrying a record of the kind
pub fn ids_with_kind(parts: &[AssemblyPart], kind: RecordKind) -> Vec<PartId> {
    parts
        .iter()
        .filter(|p| p.has_record(kind))
        .map(|p| p.id.clone())
        .collect()
}

/// Parts whose record of the kind falls on the date
pub fn ids_on_date(parts: &[AssemblyPart], kind: RecordKind, date: NaiveDate) -> Vec<PartId> {
    parts
        .iter()
        .filter(|p| p.record_date(kind) == Some(date))
        .map(|p| p.id.clone())
        .collect()
}

/// Parts installed (or bolted) by the named worker
pub fn ids_by_worker(parts: &[AssemblyPart], kind: RecordKind, name: &str) -> Vec<PartId> {
    parts
        .iter()
        .filter(|p| match kind {
            RecordKind::Installation => p
                .installation
                .as_ref()
                .is_some_and(|r| r.installers.iter().any(|n| n == name)),
            RecordKind::Bolting => p.bolting.as_ref().is_some_and(|r| r.installer == name),
            RecordKind::Delivery => false,
        })
        .map(|p| p.id.clone())
        .collect()
}

pub fn ids_by_vehicle(parts: &[AssemblyPart], vehicle: &str) -> Vec<PartId> {
    parts
        .iter()
        .filter(|p| p.delivery.as_ref().is_some_and(|r| r.vehicle == vehicle))
        .map(|p| p.id.clone())
        .collect()
}

/// A clickable statistics element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum StatisticsTarget {
    /// Count bar
    Kind { kind: RecordKind },
    /// Activity bar
    Day { kind: RecordKind, date: NaiveDate },
    /// Installer or bolter leaderboard row
    Worker { kind: RecordKind, name: String },
    /// Vehicle leaderboard row
    Vehicle { vehicle: String },
}

impl StatisticsTarget {
    pub fn part_ids(&self, parts: &[AssemblyPart]) -> Vec<PartId> {
        match self {
            StatisticsTarget::Kind { kind } => ids_with_kind(parts, *kind),
            StatisticsTarget::Day { kind, date } => ids_on_date(parts, *kind, *date),
            StatisticsTarget::Worker { kind, name } => ids_by_worker(parts, *kind, name),
            StatisticsTarget::Vehicle { vehicle } => ids_by_vehicle(parts, vehicle),
        }
    }
}
