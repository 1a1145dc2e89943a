//! JSON command protocol.
//!
//! Each command mirrors one sidebar or viewer interaction and runs against a
//! [`TrackerHarness`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{hhmm, AppMode, DisplayField, InstallMethod, PartId, PartSeed, RecordPayload};

use crate::error::SubmitError;
use crate::harness::TrackerHarness;
use crate::i18n::Lang;
use crate::state::forms::MethodChoice;
use crate::state::{FormFeedback, Gesture};
use crate::views::StatisticsTarget;

/// A command the tracker can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TrackerCommand {
    /// Replace the part list
    LoadParts { parts: Vec<PartSeed> },
    SetMode { mode: AppMode },
    SetAssemblySelection { enabled: bool },
    ToggleAssemblySelection,
    /// Viewer click on one part
    ClickPart { id: PartId },
    /// Merge a group of parts into the selection
    SelectGroup {
        ids: Vec<PartId>,
        #[serde(default)]
        gesture: Gesture,
    },
    SelectAllHistory,
    ClearSelection,
    RemoveFromSelection { id: PartId },
    ToggleMonth {
        key: String,
        #[serde(default)]
        gesture: Gesture,
    },
    ToggleDate {
        date: NaiveDate,
        #[serde(default)]
        gesture: Gesture,
    },
    SelectVehicleGroup {
        date: NaiveDate,
        vehicle: String,
        #[serde(default)]
        gesture: Gesture,
    },
    SelectStatistics {
        target: StatisticsTarget,
        #[serde(default)]
        gesture: Gesture,
    },
    ShowMore,
    /// Fill the installation form; omitted fields keep their value
    SetInstallationForm {
        #[serde(default)]
        installers: Option<Vec<String>>,
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        method: Option<InstallMethod>,
    },
    /// Add one installer chip; blank or repeated names are ignored
    AddInstaller { name: String },
    RemoveInstaller { name: String },
    /// Drop the last installer chip
    PopInstaller,
    /// Fill the delivery form; times are `HH:MM`
    SetDeliveryForm {
        #[serde(default)]
        vehicle: Option<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
        #[serde(default)]
        arrival_time: Option<String>,
        #[serde(default)]
        unloading_time: Option<String>,
    },
    SetBoltingForm {
        #[serde(default)]
        installer: Option<String>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    Submit,
    AcknowledgeOverwrite {
        #[serde(default = "yes")]
        acknowledged: bool,
    },
    ConfirmOverwrite,
    CancelOverwrite,
    OpenGroupEdit { ids: Vec<PartId> },
    EditHistoryDay { date: NaiveDate },
    ToggleRemoval { id: PartId },
    ToggleAddition { id: PartId },
    SetGroupDraft { payload: RecordPayload },
    SaveGroupEdit,
    CloseGroupEdit,
    OpenSingleEdit { id: PartId },
    SetSingleDraft { payload: RecordPayload },
    SaveSingleEdit,
    CancelSingleEdit,
    SetDisplayField { field: DisplayField },
    SetLanguage { lang: Lang },
    /// Mode, gating flag, selection and form feedback
    Inspect,
    History,
    Statistics,
    /// All suggestions, or those containing `query`
    Suggestions {
        #[serde(default)]
        query: Option<String>,
    },
    /// Month containing `date`, moved by `offset` months
    Calendar {
        date: NaiveDate,
        #[serde(default)]
        offset: i32,
    },
    /// Audit trail of one part, most recent first
    PartLog { id: PartId },
    ExportParts,
}

fn yes() -> bool {
    true
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    /// Serialize a view into the data field
    fn ok_with<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(format!("Serialization failed: {e}")),
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn submit_err(e: &SubmitError) -> Self {
        Self {
            success: false,
            error: Some(e.to_string()),
            data: Some(serde_json::json!({
                "error_kind": e.kind(),
                "presentation": e.presentation(),
                "message": e.message(),
            })),
        }
    }

    fn from_result<T: Serialize>(result: Result<T, SubmitError>) -> Self {
        match result {
            Ok(value) => Self::ok_with(&value),
            Err(e) => Self::submit_err(&e),
        }
    }
}

fn parse_time(field: &str, value: &str) -> Result<chrono::NaiveTime, CommandResponse> {
    hhmm::parse(value).map_err(|e| CommandResponse::err(format!("Invalid {field} '{value}': {e}")))
}

fn inspect(harness: &TrackerHarness) -> serde_json::Value {
    let state = &harness.state;
    let feedback = match &state.forms.feedback {
        None => serde_json::Value::Null,
        Some(FormFeedback::Error(e)) => serde_json::json!({
            "error_kind": e.kind(),
            "presentation": e.presentation(),
            "message": e.message(),
        }),
        Some(FormFeedback::Overwrite(pending)) => {
            let (shown, remaining) = pending.preview();
            serde_json::json!({
                "pending_overwrite": shown,
                "remaining": remaining,
                "acknowledged": pending.acknowledged,
            })
        }
    };
    let listed: Vec<serde_json::Value> = state
        .visible_selected()
        .into_iter()
        .map(|p| serde_json::json!({ "id": p.id, "label": p.label(state.display_field()) }))
        .collect();
    serde_json::json!({
        "mode": state.mode(),
        "assembly_selection": state.assembly_selection(),
        "blocked": state.is_mode_blocked(),
        "part_count": state.parts().len(),
        "selected": harness.selected(),
        "listed": listed,
        "hidden_selected": state.hidden_selected_count(),
        "feedback": feedback,
        "group_edit": state.group_edit(),
        "nav": state.nav(),
    })
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TrackerHarness, cmd: TrackerCommand) -> CommandResponse {
    let state = &mut harness.state;
    match cmd {
        TrackerCommand::LoadParts { parts } => {
            state.load(parts);
            CommandResponse::ok_with_data(serde_json::json!({ "part_count": state.parts().len() }))
        }

        TrackerCommand::SetMode { mode } => {
            state.set_mode(mode);
            CommandResponse::ok()
        }

        TrackerCommand::SetAssemblySelection { enabled } => {
            state.set_assembly_selection(enabled);
            CommandResponse::ok()
        }

        TrackerCommand::ToggleAssemblySelection => {
            state.toggle_assembly_selection();
            CommandResponse::ok_with_data(
                serde_json::json!({ "assembly_selection": state.assembly_selection() }),
            )
        }

        TrackerCommand::ClickPart { id } => {
            state.click_part(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::SelectGroup { ids, gesture } => {
            state.select_group(&ids, gesture);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::SelectAllHistory => {
            state.select_all_history();
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::ClearSelection => {
            state.clear_selection();
            CommandResponse::ok()
        }

        TrackerCommand::RemoveFromSelection { id } => {
            state.remove_from_selection(&id);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::ToggleMonth { key, gesture } => {
            state.toggle_month(&key, gesture);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::ToggleDate { date, gesture } => {
            state.toggle_date(date, gesture);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::SelectVehicleGroup {
            date,
            vehicle,
            gesture,
        } => {
            state.select_vehicle_group(date, &vehicle, gesture);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::SelectStatistics { target, gesture } => {
            state.select_statistics(&target, gesture);
            CommandResponse::ok_with_data(serde_json::json!({ "selected": harness.selected() }))
        }

        TrackerCommand::ShowMore => {
            state.show_more();
            CommandResponse::ok_with_data(
                serde_json::json!({ "hidden_selected": state.hidden_selected_count() }),
            )
        }

        TrackerCommand::SetInstallationForm {
            installers,
            date,
            method,
        } => {
            let form = &mut state.forms.installation;
            if let Some(names) = installers {
                form.installers.clear();
                for name in &names {
                    form.add_installer(name);
                }
            }
            if let Some(date) = date {
                form.date = date;
            }
            if let Some(method) = method {
                form.method = MethodChoice::from(&method);
                if let InstallMethod::Other(text) = method {
                    form.custom_method = text;
                }
            }
            CommandResponse::ok()
        }

        TrackerCommand::AddInstaller { name } => {
            let form = &mut state.forms.installation;
            let added = form.add_installer(&name);
            CommandResponse::ok_with_data(
                serde_json::json!({ "added": added, "installers": form.installers }),
            )
        }

        TrackerCommand::RemoveInstaller { name } => {
            let form = &mut state.forms.installation;
            form.remove_installer(&name);
            CommandResponse::ok_with_data(serde_json::json!({ "installers": form.installers }))
        }

        TrackerCommand::PopInstaller => {
            let form = &mut state.forms.installation;
            let removed = form.pop_installer();
            CommandResponse::ok_with_data(
                serde_json::json!({ "removed": removed, "installers": form.installers }),
            )
        }

        TrackerCommand::SetDeliveryForm {
            vehicle,
            date,
            arrival_time,
            unloading_time,
        } => {
            let arrival = match arrival_time.map(|t| parse_time("arrival_time", &t)).transpose() {
                Ok(t) => t,
                Err(resp) => return resp,
            };
            let unloading =
                match unloading_time.map(|t| parse_time("unloading_time", &t)).transpose() {
                    Ok(t) => t,
                    Err(resp) => return resp,
                };
            let form = &mut state.forms.delivery;
            if let Some(vehicle) = vehicle {
                form.vehicle = vehicle;
            }
            if let Some(date) = date {
                form.date = date;
            }
            if let Some(arrival) = arrival {
                form.set_arrival_time(arrival);
            }
            if let Some(unloading) = unloading {
                form.unloading_time = unloading;
            }
            CommandResponse::ok_with_data(serde_json::json!({
                "arrival_time": form.arrival_time.format(hhmm::FORMAT).to_string(),
                "unloading_time": form.unloading_time.format(hhmm::FORMAT).to_string(),
            }))
        }

        TrackerCommand::SetBoltingForm { installer, date } => {
            let form = &mut state.forms.bolting;
            if let Some(installer) = installer {
                form.installer = installer;
            }
            if let Some(date) = date {
                form.date = date;
            }
            CommandResponse::ok()
        }

        TrackerCommand::Submit => CommandResponse::from_result(state.submit()),

        TrackerCommand::AcknowledgeOverwrite { acknowledged } => {
            CommandResponse::from_result(state.acknowledge_overwrite(acknowledged))
        }

        TrackerCommand::ConfirmOverwrite => CommandResponse::from_result(state.confirm_overwrite()),

        TrackerCommand::CancelOverwrite => {
            state.cancel_overwrite();
            CommandResponse::ok()
        }

        TrackerCommand::OpenGroupEdit { ids } => {
            CommandResponse::from_result(state.open_group_edit(&ids).map(|()| state.group_edit()))
        }

        TrackerCommand::EditHistoryDay { date } => {
            CommandResponse::from_result(state.edit_history_day(date).map(|()| state.group_edit()))
        }

        TrackerCommand::ToggleRemoval { id } => CommandResponse::from_result(
            state
                .toggle_removal(&id)
                .map(|marked| serde_json::json!({ "marked": marked })),
        ),

        TrackerCommand::ToggleAddition { id } => CommandResponse::from_result(
            state
                .toggle_addition(&id)
                .map(|marked| serde_json::json!({ "marked": marked })),
        ),

        TrackerCommand::SetGroupDraft { payload } => {
            CommandResponse::from_result(state.set_group_draft(payload))
        }

        TrackerCommand::SaveGroupEdit => CommandResponse::from_result(state.save_group_edit()),

        TrackerCommand::CloseGroupEdit => {
            state.close_group_edit();
            CommandResponse::ok()
        }

        TrackerCommand::OpenSingleEdit { id } => {
            CommandResponse::from_result(state.open_single_edit(&id))
        }

        TrackerCommand::SetSingleDraft { payload } => {
            CommandResponse::from_result(state.set_single_draft(payload))
        }

        TrackerCommand::SaveSingleEdit => CommandResponse::from_result(state.save_single_edit()),

        TrackerCommand::CancelSingleEdit => {
            state.cancel_single_edit();
            CommandResponse::ok()
        }

        TrackerCommand::SetDisplayField { field } => {
            state.set_display_field(field);
            CommandResponse::ok()
        }

        TrackerCommand::SetLanguage { lang } => {
            state.set_language(lang);
            CommandResponse::ok()
        }

        TrackerCommand::Inspect => CommandResponse::ok_with_data(inspect(harness)),

        TrackerCommand::History => CommandResponse::ok_with(state.history()),

        TrackerCommand::Statistics => CommandResponse::ok_with(state.statistics()),

        TrackerCommand::Suggestions { query } => {
            let chosen = state.forms.installation.installers.clone();
            let suggestions = state.suggestions();
            match query {
                Some(query) => CommandResponse::ok_with(&suggestions.matching(&query, &chosen)),
                None => CommandResponse::ok_with(suggestions),
            }
        }

        TrackerCommand::Calendar { date, offset } => match state.calendar(date, offset) {
            Some(month) => CommandResponse::ok_with(&month),
            None => CommandResponse::err(format!("No calendar month for {date} {offset:+}")),
        },

        TrackerCommand::PartLog { id } => match state.repository().get(&id) {
            Some(part) => {
                let logs: Vec<_> = part.logs_newest_first().collect();
                CommandResponse::ok_with(&logs)
            }
            None => CommandResponse::err(format!("Unknown part '{id}'")),
        },

        TrackerCommand::ExportParts => CommandResponse::ok_with(&state.parts()),
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TrackerHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: TrackerCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TrackerHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<TrackerCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}
