//! Factory functions for creating test data.
//!
//! Provides helpers to construct parts, records and repositories used in tests
//! and by the demo model the binary loads when no part file is given.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared::*;

use crate::state::repository::PartRepository;

// ── Literals ────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` literal.
///
/// # Panics
/// On a malformed literal.
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .unwrap_or_else(|e| panic!("fixture date '{s}' is not YYYY-MM-DD: {e}"))
}

/// Parse a `HH:MM` literal.
///
/// # Panics
/// On a malformed literal.
pub fn time(s: &str) -> NaiveTime {
    hhmm::parse(s).unwrap_or_else(|e| panic!("fixture time '{s}' is not HH:MM: {e}"))
}

fn stamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|day| day.and_hms_opt(h, min, 0))
        .map(|t| t.and_utc())
        .unwrap_or_default()
}

fn system_log(at: DateTime<Utc>, action: &str) -> LogEntry {
    LogEntry {
        timestamp: at,
        action: action.to_string(),
        user: "System".to_string(),
    }
}

// ── Record factories ────────────────────────────────────────────

pub fn installation(installers: &[&str], date_str: &str, method: InstallMethod) -> InstallationRecord {
    InstallationRecord::new(
        installers.iter().map(|s| s.to_string()).collect(),
        date(date_str),
        method,
    )
}

pub fn delivery(vehicle: &str, date_str: &str, arrival: &str, unloading: &str) -> DeliveryRecord {
    DeliveryRecord {
        vehicle: vehicle.to_string(),
        date: date(date_str),
        arrival_time: time(arrival),
        unloading_time: time(unloading),
    }
}

pub fn bolting(installer: &str, date_str: &str) -> BoltingRecord {
    BoltingRecord {
        installer: installer.to_string(),
        date: date(date_str),
    }
}

// ── Part factories ──────────────────────────────────────────────

/// Seed with the given id and mark, no records.
pub fn seed(id: &str, mark: &str) -> PartSeed {
    PartSeed {
        id: Some(id.to_string()),
        guid: format!("ifc-guid-{id}"),
        name: "Steel Beam".to_string(),
        cast_unit_pos: mark.to_string(),
        ..Default::default()
    }
}

/// Part without any records. The mark is `P-<id>`.
pub fn plain_part(id: &str) -> AssemblyPart {
    seed(id, &format!("P-{id}")).into_part(id.to_string())
}

/// Part installed by crane by the default installer.
pub fn installed_part(id: &str, date_str: &str) -> AssemblyPart {
    installed_by(id, date_str, &[DEFAULT_INSTALLER])
}

/// Part installed by crane by the listed installers.
pub fn installed_by(id: &str, date_str: &str, installers: &[&str]) -> AssemblyPart {
    let mut part = plain_part(id);
    part.installation = Some(installation(installers, date_str, InstallMethod::Crane));
    part
}

/// Part delivered 08:00-09:00 by the vehicle.
pub fn delivered_part(id: &str, date_str: &str, vehicle: &str) -> AssemblyPart {
    let mut part = plain_part(id);
    part.delivery = Some(delivery(vehicle, date_str, "08:00", "09:00"));
    part
}

/// Part whose bolts were tightened by the installer.
pub fn bolted_part(id: &str, date_str: &str, installer: &str) -> AssemblyPart {
    let mut part = plain_part(id);
    part.bolting = Some(bolting(installer, date_str));
    part
}

// ── Repository factories ────────────────────────────────────────

pub fn repo_with(seeds: Vec<PartSeed>) -> PartRepository {
    PartRepository::load(seeds)
}

/// `count` record-less seeds with ids `1..=count`.
pub fn blank_seeds(count: usize) -> Vec<PartSeed> {
    (1..=count)
        .map(|i| seed(&i.to_string(), &format!("P-{i}")))
        .collect()
}

/// The demo model: seven parts, the first three already carrying records.
pub fn demo_seeds() -> Vec<PartSeed> {
    let part = |id: &str, guid: &str, name: &str, mark: &str, x: f64, y: f64| PartSeed {
        id: Some(id.to_string()),
        guid: guid.to_string(),
        name: name.to_string(),
        cast_unit_pos: mark.to_string(),
        position: Position { x, y },
        ..Default::default()
    };

    let mut beam = part("1", "ifc-guid-101", "Steel Beam", "B-101", 20.0, 30.0);
    beam.installation = Some(installation(
        &["Jaan Tamm", "Peeter Paju"],
        "2023-10-01",
        InstallMethod::Crane,
    ));
    beam.delivery = Some(delivery("123 ABC", "2023-09-28", "08:00", "09:00"));
    beam.bolting = Some(bolting("Jaan Tamm", "2023-10-02"));
    beam.logs = vec![
        system_log(stamp(2023, 9, 28, 8, 0), "Delivered: 123 ABC"),
        system_log(stamp(2023, 10, 1, 10, 0), "Installed: Crane"),
        system_log(stamp(2023, 10, 2, 14, 0), "Bolts tightened"),
    ];

    let mut column = part("2", "ifc-guid-202", "Concrete Column", "C-202", 50.0, 30.0);
    column.installation = Some(installation(&["Jaan Tamm"], "2023-10-01", InstallMethod::Lift));
    column.logs = vec![system_log(stamp(2023, 10, 1, 11, 30), "Installed: Lift")];

    let mut second_beam = part("3", "ifc-guid-102", "Steel Beam", "B-102", 80.0, 30.0);
    second_beam.delivery = Some(delivery("456 XYZ", "2023-09-28", "14:30", "15:30"));
    second_beam.logs = vec![system_log(stamp(2023, 9, 28, 14, 30), "Delivered: 456 XYZ")];

    vec![
        beam,
        column,
        second_beam,
        part("4", "ifc-guid-055", "Connection Plate", "PL-55", 35.0, 60.0),
        part("5", "ifc-guid-056", "Connection Plate", "PL-56", 65.0, 60.0),
        part("6", "ifc-guid-001", "Wind Brace", "WB-01", 20.0, 80.0),
        part("7", "ifc-guid-002", "Wind Brace", "WB-02", 80.0, 80.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_model() {
        let seeds = demo_seeds();
        assert_eq!(seeds.len(), 7);
        assert!(seeds[0].installation.is_some());
        assert!(seeds[0].delivery.is_some());
        assert!(seeds[0].bolting.is_some());
        assert_eq!(seeds[0].logs.len(), 3);
        assert!(seeds[3..].iter().all(|s| s.installation.is_none() && s.logs.is_empty()));
    }

    #[test]
    fn test_demo_log_timestamps() {
        let seeds = demo_seeds();
        assert_eq!(seeds[1].logs[0].timestamp.to_rfc3339(), "2023-10-01T11:30:00+00:00");
    }

    #[test]
    fn test_part_factories() {
        let p = installed_by("9", "2024-01-01", &["A", "B"]);
        assert_eq!(p.cast_unit_pos, "P-9");
        assert_eq!(p.installation.unwrap().installers, vec!["A", "B"]);
        assert_eq!(delivered_part("1", "2024-01-01", "X").delivery.unwrap().vehicle, "X");
        assert_eq!(bolted_part("1", "2024-01-01", "B").bolting.unwrap().installer, "B");
        assert_eq!(blank_seeds(3).len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_bad_date_literal_panics() {
        date("01.01.2024");
    }
}
