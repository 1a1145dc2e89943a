//! Activity calendar: per-day counts and a Monday-first month grid

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::AssemblyPart;

use crate::state::repository::month_label;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub installed: usize,
    pub delivered: usize,
    pub bolted: usize,
}

impl DayActivity {
    pub fn is_empty(&self) -> bool {
        self.installed == 0 && self.delivered == 0 && self.bolted == 0
    }
}

/// Record counts per date, for every kind
pub fn activity_by_day(parts: &[AssemblyPart]) -> BTreeMap<NaiveDate, DayActivity> {
    let mut map: BTreeMap<NaiveDate, DayActivity> = BTreeMap::new();
    for part in parts {
        if let Some(r) = &part.installation {
            map.entry(r.date).or_default().installed += 1;
        }
        if let Some(r) = &part.delivery {
            map.entry(r.date).or_default().delivered += 1;
        }
        if let Some(r) = &part.bolting {
            map.entry(r.date).or_default().bolted += 1;
        }
    }
    map
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub activity: DayActivity,
}

/// One month laid out in week rows starting on Monday
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub label: String,
    /// Blank cells before the 1st
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

impl CalendarMonth {
    /// Returns `None` for an invalid year/month
    pub fn new(year: i32, month: u32, parts: &[AssemblyPart]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let activity = activity_by_day(parts);

        let days = first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| CalendarDay {
                date,
                activity: activity.get(&date).copied().unwrap_or_default(),
            })
            .collect();

        Some(Self {
            year,
            month,
            label: month_label(year, month),
            leading_blanks: first.weekday().num_days_from_monday(),
            days,
        })
    }

    pub fn containing(date: NaiveDate, parts: &[AssemblyPart]) -> Option<Self> {
        Self::new(date.year(), date.month(), parts)
    }

    pub fn previous(&self, parts: &[AssemblyPart]) -> Option<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12, parts)
        } else {
            Self::new(self.year, self.month - 1, parts)
        }
    }

    pub fn next(&self, parts: &[AssemblyPart]) -> Option<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1, parts)
        } else {
            Self::new(self.year, self.month + 1, parts)
        }
    }

    /// Step `months` forward (negative goes back)
    pub fn shifted(self, months: i32, parts: &[AssemblyPart]) -> Option<Self> {
        let mut month = self;
        for _ in 0..months.unsigned_abs() {
            month = if months < 0 {
                month.previous(parts)?
            } else {
                month.next(parts)?
            };
        }
        Some(month)
    }
}
