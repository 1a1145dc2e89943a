//! Integration tests for TrackerHarness.
//!
//! Drives full select → fill form → submit flows through the headless harness.

use assembly_tracker_lib::error::{SubmitError, ValidationError};
use assembly_tracker_lib::fixtures::{date, delivery, installation, seed, time};
use assembly_tracker_lib::harness::TrackerHarness;
use assembly_tracker_lib::state::forms::MethodChoice;
use assembly_tracker_lib::state::SubmitOutcome;
use shared::{AppMode, InstallMethod, PartSeed};

fn scenario_parts() -> Vec<PartSeed> {
    let a = seed("A", "A-1");
    let mut b = seed("B", "B-1");
    b.installation = Some(installation(&["X"], "2024-01-01", InstallMethod::Crane));
    vec![a, b]
}

#[test]
fn test_harness_installation_write() {
    let mut h = TrackerHarness::with_parts(scenario_parts());
    let before = h.part("B").unwrap().clone();

    h.select(&["A"]);
    let form = &mut h.state.forms.installation;
    form.installers = vec!["Y".into()];
    form.date = date("2024-01-02");
    form.method = MethodChoice::Lift;

    assert_eq!(h.submit(), Ok(SubmitOutcome::Committed { count: 1 }));

    let a = h.part("A").unwrap();
    assert_eq!(
        a.installation,
        Some(installation(&["Y"], "2024-01-02", InstallMethod::Lift))
    );
    assert_eq!(a.logs.len(), 1);
    assert!(!a.is_selected);
    assert_eq!(h.part("B"), Some(&before));
}

#[test]
fn test_harness_delivery_overwrite_flow() {
    let mut c = seed("C", "C-1");
    c.delivery = Some(delivery("1 AAA", "2024-02-01", "08:00", "09:00"));
    let mut h = TrackerHarness::with_parts(vec![c]);
    h.set_mode(AppMode::Delivery);

    h.select(&["C"]);
    let form = &mut h.state.forms.delivery;
    form.vehicle = "2 BBB".into();
    form.date = date("2024-02-01");
    form.arrival_time = time("08:00");
    form.unloading_time = time("09:00");

    assert_eq!(h.submit(), Ok(SubmitOutcome::NeedsConfirmation { conflicts: 1 }));
    assert_eq!(h.part("C").unwrap().delivery.as_ref().unwrap().vehicle, "1 AAA");
    assert!(h.part("C").unwrap().logs.is_empty());

    assert_eq!(h.confirm_overwrite(), Ok(SubmitOutcome::Committed { count: 1 }));
    let c = h.part("C").unwrap();
    assert_eq!(c.delivery, Some(delivery("2 BBB", "2024-02-01", "08:00", "09:00")));
    assert_eq!(h.log_actions("C"), vec!["Delivered: 2 BBB"]);
}

#[test]
fn test_harness_time_validation_blocks_write() {
    let mut h = TrackerHarness::with_parts(scenario_parts());
    h.set_mode(AppMode::Delivery);
    h.select(&["A", "B"]);
    h.state.forms.delivery.arrival_time = time("10:00");
    h.state.forms.delivery.unloading_time = time("09:00");

    let err = h.submit().unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::UnloadingBeforeArrival { .. })
    ));
    assert!(h.part("A").unwrap().delivery.is_none());
    assert!(h.part("B").unwrap().delivery.is_none());
    assert_eq!(h.selected(), vec!["A", "B"]);
}

#[test]
fn test_harness_write_is_atomic_over_selection() {
    let seeds = (1..=10).map(|i| seed(&i.to_string(), &format!("P-{i}"))).collect();
    let mut h = TrackerHarness::with_parts(seeds);
    h.select(&["2", "4", "6", "8"]);
    assert_eq!(h.submit(), Ok(SubmitOutcome::Committed { count: 4 }));

    for part in h.state.parts() {
        let written = ["2", "4", "6", "8"].contains(&part.id.as_str());
        assert_eq!(part.installation.is_some(), written, "part {}", part.id);
        assert_eq!(part.logs.len(), usize::from(written));
        assert!(!part.is_selected);
    }
}

#[test]
fn test_harness_duplicate_gating_needs_confirmation() {
    let mut h = TrackerHarness::with_parts(scenario_parts());
    h.select(&["A", "B"]);
    assert_eq!(h.submit(), Ok(SubmitOutcome::NeedsConfirmation { conflicts: 1 }));
    assert!(h.part("A").unwrap().installation.is_none());
    assert_eq!(h.selected(), vec!["A", "B"]);

    // Submitting again does not bypass the prompt
    assert_eq!(h.submit(), Ok(SubmitOutcome::NeedsConfirmation { conflicts: 1 }));
    assert_eq!(
        h.state.confirm_overwrite(),
        Err(SubmitError::OverwriteNotAcknowledged)
    );

    assert_eq!(h.confirm_overwrite(), Ok(SubmitOutcome::Committed { count: 2 }));
    let b = h.part("B").unwrap();
    assert_eq!(b.installation.as_ref().unwrap().installers, vec!["Silver Vat"]);
}

#[test]
fn test_harness_blocked_modes() {
    let mut h = TrackerHarness::with_parts(scenario_parts());
    h.set_mode(AppMode::Bolting);
    h.select(&["A"]);
    let err = h.submit().unwrap_err();
    assert!(matches!(err, SubmitError::ModeBlocked { .. }));
    assert_eq!(h.selected(), vec!["A"]);

    h.set_assembly_selection(false);
    assert_eq!(h.submit(), Ok(SubmitOutcome::Committed { count: 1 }));

    h.set_mode(AppMode::Installation);
    h.select(&["A"]);
    assert!(matches!(
        h.submit(),
        Err(SubmitError::ModeBlocked { mode: AppMode::Installation, assembly_selection: false })
    ));
}

#[test]
fn test_harness_history_and_statistics_after_writes() {
    let mut h = TrackerHarness::with_parts(scenario_parts());
    h.select(&["A"]);
    h.state.forms.installation.date = date("2024-01-02");
    h.submit().unwrap();

    assert_eq!(h.history_ids(), vec!["A", "B"]);
    assert_eq!(h.history_day(date("2024-01-02")), vec!["A"]);

    let stats = h.state.statistics();
    assert_eq!(stats.counts.installed, 2);
    // Tie: first seen wins
    assert_eq!(stats.top_installers[0].label, "Silver Vat");
    assert_eq!(stats.top_installers[1].label, "X");
    assert_eq!(stats.percent(stats.counts.installed), 100);

    let suggestions = h.state.suggestions();
    assert_eq!(suggestions.installers, vec!["Silver Vat", "X"]);
}

#[test]
fn test_harness_group_edit_round() {
    let mut h = TrackerHarness::demo();
    h.state.edit_history_day(date("2023-10-01")).unwrap();
    assert_eq!(h.state.group_edit().unwrap().members().len(), 2);
    h.state.toggle_removal("2").unwrap();
    let outcome = h.state.save_group_edit().unwrap();
    assert_eq!(outcome.written, 1);
    assert_eq!(outcome.cleared, 1);
    assert!(h.part("2").unwrap().installation.is_none());
    assert_eq!(
        h.log_actions("1").last().map(String::as_str),
        Some("Installation data edited")
    );
}
