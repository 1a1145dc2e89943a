//! Record form state (data only)
//!
//! In-progress input for the three record modes plus the feedback shown next
//! to the form. Turning a form into a payload is where field validation lives.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};
use shared::{
    BoltingRecord, DeliveryRecord, InstallMethod, InstallationRecord, PartId, RecordPayload,
    DEFAULT_INSTALLER, DEFAULT_VEHICLE,
};

use crate::error::{SubmitError, ValidationError};

/// Overwrite conflicts listed before the "and N more" line
pub const CONFLICT_PREVIEW_LIMIT: usize = 20;

/// Local calendar date
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Trim names the way the forms do and drop blank or repeated installers
pub fn normalize_payload(payload: RecordPayload) -> RecordPayload {
    match payload {
        RecordPayload::Installation(r) => {
            let method = match r.method {
                InstallMethod::Other(text) => InstallMethod::Other(text.trim().to_string()),
                preset => preset,
            };
            InstallationRecord::new(r.installers, r.date, method).into()
        }
        RecordPayload::Delivery(r) => DeliveryRecord {
            vehicle: r.vehicle.trim().to_string(),
            ..r
        }
        .into(),
        RecordPayload::Bolting(r) => BoltingRecord {
            installer: r.installer.trim().to_string(),
            ..r
        }
        .into(),
    }
}

/// Check the record invariants that every write must satisfy
pub fn validate_payload(payload: &RecordPayload) -> Result<(), ValidationError> {
    match payload {
        RecordPayload::Installation(r) => {
            if r.installers.is_empty() {
                return Err(ValidationError::MissingInstallers);
            }
            if matches!(&r.method, InstallMethod::Other(text) if text.trim().is_empty()) {
                return Err(ValidationError::MissingCustomMethod);
            }
        }
        RecordPayload::Delivery(r) => {
            if r.unloading_time < r.arrival_time {
                return Err(ValidationError::UnloadingBeforeArrival {
                    arrival: r.arrival_time,
                    unloading: r.unloading_time,
                });
            }
        }
        RecordPayload::Bolting(r) => {
            if r.installer.trim().is_empty() {
                return Err(ValidationError::MissingBoltInstaller);
            }
        }
    }
    Ok(())
}

/// Method picker value; `Other` takes its text from the custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodChoice {
    #[default]
    Crane,
    Lift,
    Manual,
    Other,
}

impl From<&InstallMethod> for MethodChoice {
    fn from(method: &InstallMethod) -> Self {
        match method {
            InstallMethod::Crane => MethodChoice::Crane,
            InstallMethod::Lift => MethodChoice::Lift,
            InstallMethod::Manual => MethodChoice::Manual,
            InstallMethod::Other(_) => MethodChoice::Other,
        }
    }
}

/// Installation form input
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationForm {
    pub installers: Vec<String>,
    pub date: NaiveDate,
    pub method: MethodChoice,
    pub custom_method: String,
}

impl InstallationForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            installers: vec![DEFAULT_INSTALLER.to_string()],
            date,
            method: MethodChoice::Crane,
            custom_method: String::new(),
        }
    }

    /// Add a trimmed name; empty and already listed names are ignored
    pub fn add_installer(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.installers.iter().any(|n| n == name) {
            return false;
        }
        self.installers.push(name.to_string());
        true
    }

    pub fn remove_installer(&mut self, name: &str) {
        self.installers.retain(|n| n != name);
    }

    /// Backspace on an empty input removes the last chip
    pub fn pop_installer(&mut self) -> Option<String> {
        self.installers.pop()
    }

    pub fn to_payload(&self) -> Result<RecordPayload, ValidationError> {
        if self.installers.is_empty() {
            return Err(ValidationError::MissingInstallers);
        }
        let method = match self.method {
            MethodChoice::Crane => InstallMethod::Crane,
            MethodChoice::Lift => InstallMethod::Lift,
            MethodChoice::Manual => InstallMethod::Manual,
            MethodChoice::Other => {
                let text = self.custom_method.trim();
                if text.is_empty() {
                    return Err(ValidationError::MissingCustomMethod);
                }
                InstallMethod::Other(text.to_string())
            }
        };
        let payload = RecordPayload::Installation(InstallationRecord::new(
            self.installers.clone(),
            self.date,
            method,
        ));
        validate_payload(&payload)?;
        Ok(payload)
    }
}

/// Delivery form input
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryForm {
    pub vehicle: String,
    pub date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub unloading_time: NaiveTime,
}

impl DeliveryForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            vehicle: DEFAULT_VEHICLE.to_string(),
            date,
            arrival_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            unloading_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        }
    }

    /// Set the arrival time and suggest unloading one hour later
    pub fn set_arrival_time(&mut self, arrival: NaiveTime) {
        self.arrival_time = arrival;
        let (suggested, _) = arrival.overflowing_add_signed(TimeDelta::hours(1));
        self.unloading_time = suggested;
    }

    pub fn to_payload(&self) -> Result<RecordPayload, ValidationError> {
        let payload = RecordPayload::Delivery(DeliveryRecord {
            vehicle: self.vehicle.trim().to_string(),
            date: self.date,
            arrival_time: self.arrival_time,
            unloading_time: self.unloading_time,
        });
        validate_payload(&payload)?;
        Ok(payload)
    }
}

/// Bolting form input
#[derive(Debug, Clone, PartialEq)]
pub struct BoltingForm {
    pub installer: String,
    pub date: NaiveDate,
}

impl BoltingForm {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            installer: DEFAULT_INSTALLER.to_string(),
            date,
        }
    }

    pub fn to_payload(&self) -> Result<RecordPayload, ValidationError> {
        let payload = RecordPayload::Bolting(BoltingRecord {
            installer: self.installer.trim().to_string(),
            date: self.date,
        });
        validate_payload(&payload)?;
        Ok(payload)
    }
}

/// A selected part that already carries a record of the submitted kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub id: PartId,
    pub label: String,
    /// Current record, e.g. `01.10.2023 (Jaan Tamm)`
    pub summary: String,
}

/// A validated submit held back until the user acknowledges the overwrite
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOverwrite {
    pub payload: RecordPayload,
    pub conflicts: Vec<Conflict>,
    /// State of the "overwrite existing data" checkbox
    pub acknowledged: bool,
}

impl PendingOverwrite {
    /// Conflicts to list, and how many were left out
    pub fn preview(&self) -> (&[Conflict], usize) {
        let shown = self.conflicts.len().min(CONFLICT_PREVIEW_LIMIT);
        (&self.conflicts[..shown], self.conflicts.len() - shown)
    }
}

/// Feedback shown next to the active form
#[derive(Debug, Clone, PartialEq)]
pub enum FormFeedback {
    Error(SubmitError),
    Overwrite(PendingOverwrite),
}

/// Form state for all record modes
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForms {
    pub installation: InstallationForm,
    pub delivery: DeliveryForm,
    pub bolting: BoltingForm,
    pub feedback: Option<FormFeedback>,
}

impl Default for RecordForms {
    fn default() -> Self {
        Self::new(today())
    }
}

impl RecordForms {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            installation: InstallationForm::new(date),
            delivery: DeliveryForm::new(date),
            bolting: BoltingForm::new(date),
            feedback: None,
        }
    }

    /// Reset every form date (done on mode switch)
    pub fn reset_dates(&mut self, date: NaiveDate) {
        self.installation.date = date;
        self.delivery.date = date;
        self.bolting.date = date;
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    pub fn error(&self) -> Option<&SubmitError> {
        match &self.feedback {
            Some(FormFeedback::Error(e)) => Some(e),
            _ => None,
        }
    }

    pub fn pending_overwrite(&self) -> Option<&PendingOverwrite> {
        match &self.feedback {
            Some(FormFeedback::Overwrite(p)) => Some(p),
            _ => None,
        }
    }
}
