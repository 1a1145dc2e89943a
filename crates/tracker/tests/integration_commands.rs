//! Integration tests for the TrackerCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use assembly_tracker_lib::command::{execute_json, execute_json_batch};
use assembly_tracker_lib::harness::TrackerHarness;

#[test]
fn test_command_load_parts() {
    let mut h = TrackerHarness::new();
    let json = r#"{"command": "load_parts", "parts": [
        {"id": "1", "guid": "g-1", "name": "Steel Beam", "castUnitPos": "B-1"},
        {"guid": "g-2", "name": "Wind Brace", "cast_unit_pos": "WB-1",
         "installation": {"installers": ["A"], "date": "2024-01-01", "method": {"other": "Telescopic"}}}
    ]}"#;

    let resp = execute_json(&mut h, json).unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    assert_eq!(resp.data.unwrap()["part_count"], 2);
    assert_eq!(h.part("1").unwrap().cast_unit_pos, "B-1");
    // The second part got a generated id
    assert_eq!(h.state.parts()[1].id.len(), 36);
}

#[test]
fn test_command_installation_workflow_via_json_batch() {
    let mut h = TrackerHarness::demo();

    let json = r#"[
        {"command": "click_part", "id": "4"},
        {"command": "click_part", "id": "5"},
        {"command": "set_installation_form", "installers": ["Mari Maasikas", " Mari Maasikas "], "date": "2024-03-01", "method": {"other": "Telescopic handler"}},
        {"command": "submit"},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 5);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    let submit = responses[3].data.as_ref().unwrap();
    assert_eq!(submit["outcome"], "committed");
    assert_eq!(submit["count"], 2);

    let inspect = responses[4].data.as_ref().unwrap();
    assert_eq!(inspect["selected"].as_array().unwrap().len(), 0);

    let r = h.part("4").unwrap().installation.as_ref().unwrap();
    assert_eq!(r.installers, vec!["Mari Maasikas"]);
    assert_eq!(h.log_actions("5"), vec!["Installed: Telescopic handler"]);
}

#[test]
fn test_command_overwrite_prompt_in_inspect() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "select_group", "ids": ["1", "2", "3"]},
        {"command": "submit"},
        {"command": "inspect"},
        {"command": "confirm_overwrite"},
        {"command": "acknowledge_overwrite"},
        {"command": "confirm_overwrite"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses[1].data.as_ref().unwrap()["outcome"], "needs_confirmation");
    assert_eq!(responses[1].data.as_ref().unwrap()["conflicts"], 2);

    let feedback = &responses[2].data.as_ref().unwrap()["feedback"];
    let listed = feedback["pending_overwrite"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["label"], "B-101");
    assert_eq!(listed[1]["summary"], "01.10.2023 (Jaan Tamm)");
    assert_eq!(feedback["remaining"], 0);
    assert_eq!(feedback["acknowledged"], false);

    assert!(!responses[3].success);
    assert_eq!(
        responses[3].data.as_ref().unwrap()["error_kind"],
        "overwrite_not_acknowledged"
    );
    assert!(responses[5].success);
    assert_eq!(responses[5].data.as_ref().unwrap()["count"], 3);
}

#[test]
fn test_command_blocked_mode_reports_overlay() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "set_mode", "mode": "bolting"},
        {"command": "click_part", "id": "6"},
        {"command": "submit"},
        {"command": "toggle_assembly_selection"},
        {"command": "set_bolting_form", "installer": "Peeter Paju", "date": "2024-05-05"},
        {"command": "submit"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    let blocked = &responses[2];
    assert!(!blocked.success);
    let data = blocked.data.as_ref().unwrap();
    assert_eq!(data["error_kind"], "mode_blocked");
    assert_eq!(data["presentation"], "overlay");
    assert_eq!(
        responses[3].data.as_ref().unwrap()["assembly_selection"],
        false
    );
    assert!(responses[5].success, "Failed: {:?}", responses[5].error);
    assert_eq!(h.part("6").unwrap().bolting.as_ref().unwrap().installer, "Peeter Paju");
}

#[test]
fn test_command_delivery_arrival_suggests_unloading() {
    let mut h = TrackerHarness::demo();
    execute_json(&mut h, r#"{"command": "set_mode", "mode": "delivery"}"#).unwrap();
    let resp = execute_json(
        &mut h,
        r#"{"command": "set_delivery_form", "vehicle": "777 TTT", "arrival_time": "13:15"}"#,
    )
    .unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["arrival_time"], "13:15");
    assert_eq!(data["unloading_time"], "14:15");

    let resp = execute_json(
        &mut h,
        r#"{"command": "set_delivery_form", "unloading_time": "12:00"}"#,
    )
    .unwrap();
    assert_eq!(resp.data.unwrap()["unloading_time"], "12:00");

    execute_json(&mut h, r#"{"command": "click_part", "id": "7"}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "submit"}"#).unwrap();
    assert!(!resp.success);
    assert_eq!(resp.data.unwrap()["error_kind"], "validation");
    assert!(h.part("7").unwrap().delivery.is_none());
}

#[test]
fn test_command_history_navigation() {
    let mut h = TrackerHarness::demo();
    execute_json(&mut h, r#"{"command": "set_mode", "mode": "delivery"}"#).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "history"}"#).unwrap();
    let history = resp.data.unwrap();
    let month = &history["months"][0];
    assert_eq!(month["key"], "2023-09");
    assert_eq!(month["label"], "September 2023");
    let day = &month["days"][0];
    assert_eq!(day["label"], "28.09.2023 - Thursday");
    assert_eq!(day["vehicles"][0]["vehicle"], "123 ABC");
    assert_eq!(day["vehicles"][1]["vehicle"], "456 XYZ");

    let json = r#"[
        {"command": "toggle_month", "key": "2023-09"},
        {"command": "select_vehicle_group", "date": "2023-09-28", "vehicle": "456 XYZ"},
        {"command": "toggle_date", "date": "2023-09-28", "gesture": "additive"},
        {"command": "toggle_date", "date": "2023-09-28"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses[0].data.as_ref().unwrap()["selected"], serde_json::json!(["1", "3"]));
    assert_eq!(responses[1].data.as_ref().unwrap()["selected"], serde_json::json!(["3"]));
    assert_eq!(responses[2].data.as_ref().unwrap()["selected"], serde_json::json!(["1", "3"]));
    // Plain click on the open day collapses it
    assert_eq!(responses[3].data.as_ref().unwrap()["selected"], serde_json::json!([]));
}

#[test]
fn test_command_statistics_and_selection() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "set_mode", "mode": "statistics"},
        {"command": "statistics"},
        {"command": "select_statistics", "target": {"by": "worker", "kind": "installation", "name": "Jaan Tamm"}},
        {"command": "select_statistics", "target": {"by": "kind", "kind": "bolting"}, "gesture": "toggle_group"},
        {"command": "submit"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();

    let stats = responses[1].data.as_ref().unwrap();
    assert_eq!(stats["total"], 7);
    assert_eq!(stats["counts"]["installed"], 2);
    assert_eq!(stats["counts"]["delivered"], 2);
    assert_eq!(stats["counts"]["bolted"], 1);
    assert_eq!(stats["top_installers"][0]["label"], "Jaan Tamm");
    assert_eq!(stats["top_installers"][0]["value"], 2);

    assert_eq!(responses[2].data.as_ref().unwrap()["selected"], serde_json::json!(["1", "2"]));
    // Part 1 is bolted and already selected: toggled off
    assert_eq!(responses[3].data.as_ref().unwrap()["selected"], serde_json::json!(["2"]));
    assert_eq!(responses[4].data.as_ref().unwrap()["error_kind"], "read_only_mode");
}

#[test]
fn test_command_group_edit_via_json() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "click_part", "id": "6"},
        {"command": "edit_history_day", "date": "2023-10-01"},
        {"command": "toggle_addition", "id": "6"},
        {"command": "set_group_draft", "payload": {"kind": "installation", "installers": ["Uus Mees"], "date": "2023-10-03", "method": "manual"}},
        {"command": "save_group_edit"},
        {"command": "history"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }
    assert_eq!(responses[1].data.as_ref().unwrap()["members"], serde_json::json!(["1", "2"]));
    assert_eq!(responses[2].data.as_ref().unwrap()["marked"], true);
    assert_eq!(responses[4].data.as_ref().unwrap()["written"], 3);

    let day = &responses[5].data.as_ref().unwrap()["months"][0]["days"][0];
    assert_eq!(day["date"], "2023-10-03");
    assert_eq!(day["parts"], serde_json::json!(["1", "2", "6"]));
}

#[test]
fn test_command_group_edit_blocked_by_gating_flag() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "edit_history_day", "date": "2023-10-01"},
        {"command": "set_group_draft", "payload": {"kind": "installation", "installers": ["Q", "Q", " "], "date": "2023-10-03", "method": "lift"}},
        {"command": "set_assembly_selection", "enabled": false},
        {"command": "save_group_edit"},
        {"command": "set_assembly_selection", "enabled": true},
        {"command": "save_group_edit"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    let blocked = responses[3].data.as_ref().unwrap();
    assert!(!responses[3].success);
    assert_eq!(blocked["error_kind"], "mode_blocked");
    assert_eq!(blocked["presentation"], "overlay");

    assert!(responses[5].success);
    assert_eq!(responses[5].data.as_ref().unwrap()["written"], 2);
    let beam = h.part("1").unwrap();
    assert_eq!(beam.installation.as_ref().unwrap().installers, vec!["Q"]);
}

#[test]
fn test_command_group_edit_kind_mismatch() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "open_group_edit", "ids": ["1"]},
        {"command": "set_group_draft", "payload": {"kind": "bolting", "installer": "A", "date": "2024-01-01"}},
        {"command": "save_single_edit"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses[0].success);
    assert_eq!(responses[1].data.as_ref().unwrap()["error_kind"], "kind_mismatch");
    assert_eq!(responses[2].data.as_ref().unwrap()["error_kind"], "no_group_edit");
}

#[test]
fn test_command_part_log_newest_first() {
    let mut h = TrackerHarness::demo();
    let resp = execute_json(&mut h, r#"{"command": "part_log", "id": "1"}"#).unwrap();
    let logs = resp.data.unwrap();
    assert_eq!(logs[0]["action"], "Bolts tightened");
    assert_eq!(logs[2]["action"], "Delivered: 123 ABC");

    let resp = execute_json(&mut h, r#"{"command": "part_log", "id": "99"}"#).unwrap();
    assert!(!resp.success);
}

#[test]
fn test_command_calendar_and_suggestions() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "calendar", "date": "2023-10-15"},
        {"command": "suggestions"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    let calendar = responses[0].data.as_ref().unwrap();
    assert_eq!(calendar["year"], 2023);
    assert_eq!(calendar["month"], 10);
    // 1 October 2023 is a Sunday
    assert_eq!(calendar["leading_blanks"], 6);
    assert_eq!(calendar["days"][0]["activity"]["installed"], 2);

    let suggestions = responses[1].data.as_ref().unwrap();
    assert_eq!(
        suggestions["installers"],
        serde_json::json!(["Jaan Tamm", "Peeter Paju", "Silver Vat"])
    );
    assert_eq!(suggestions["vehicles"], serde_json::json!(["123 ABC", "456 XYZ"]));
}

#[test]
fn test_command_installer_chips_and_filtered_suggestions() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "add_installer", "name": " Jaan Tamm "},
        {"command": "add_installer", "name": "Jaan Tamm"},
        {"command": "suggestions", "query": "AA"},
        {"command": "remove_installer", "name": "Silver Vat"},
        {"command": "pop_installer"},
        {"command": "pop_installer"}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let data = |i: usize| responses[i].data.clone().unwrap();
    assert_eq!(data(0)["added"], true);
    assert_eq!(data(0)["installers"], serde_json::json!(["Silver Vat", "Jaan Tamm"]));
    assert_eq!(data(1)["added"], false);
    // Jaan Tamm is already a chip
    assert_eq!(data(2)["installers"], serde_json::json!([]));
    assert_eq!(data(2)["vehicles"], serde_json::json!([]));
    assert_eq!(data(3)["installers"], serde_json::json!(["Jaan Tamm"]));
    assert_eq!(data(4)["removed"], "Jaan Tamm");
    assert_eq!(data(5)["removed"], serde_json::Value::Null);
    assert!(h.state.forms.installation.installers.is_empty());
}

#[test]
fn test_command_calendar_offset() {
    let mut h = TrackerHarness::demo();
    let json = r#"[
        {"command": "calendar", "date": "2023-11-15", "offset": -1},
        {"command": "calendar", "date": "2023-10-15", "offset": 3}
    ]"#;
    let responses = execute_json_batch(&mut h, json).unwrap();
    let october = responses[0].data.as_ref().unwrap();
    assert_eq!(october["year"], 2023);
    assert_eq!(october["month"], 10);
    assert_eq!(october["days"][0]["activity"]["installed"], 2);
    let january = responses[1].data.as_ref().unwrap();
    assert_eq!(january["year"], 2024);
    assert_eq!(january["month"], 1);
}

#[test]
fn test_command_export_and_reload() {
    let mut h = TrackerHarness::demo();
    let resp = execute_json(&mut h, r#"{"command": "export_parts"}"#).unwrap();
    let parts = resp.data.unwrap();
    assert_eq!(parts.as_array().unwrap().len(), 7);

    let reload = serde_json::json!({ "command": "load_parts", "parts": parts }).to_string();
    let mut h2 = TrackerHarness::new();
    let resp = execute_json(&mut h2, &reload).unwrap();
    assert!(resp.success, "Failed: {:?}", resp.error);
    assert_eq!(h2.part("3").unwrap().delivery.as_ref().unwrap().vehicle, "456 XYZ");
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = TrackerHarness::new();
    let result = execute_json(&mut h, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));

    let result = execute_json_batch(&mut h, r#"{"command": "submit"}"#);
    assert!(result.unwrap_err().contains("Invalid commands JSON"));
}
