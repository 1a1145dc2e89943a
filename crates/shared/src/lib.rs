use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

mod records;

pub use records::{
    hhmm, BoltingRecord, DeliveryRecord, InstallMethod, InstallationRecord, RecordPayload,
};

/// Unique part identifier inside a loaded model
pub type PartId = String;

/// Installer offered by the forms even before any history exists
pub const DEFAULT_INSTALLER: &str = "Silver Vat";

/// Vehicle offered by the delivery form even before any history exists
pub const DEFAULT_VEHICLE: &str = "123 ABC";

/// Actor written into audit entries. There is no user identity system.
pub const CURRENT_USER: &str = "Current User";

/// The three independent event kinds tracked per part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Installation,
    Delivery,
    Bolting,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Installation => write!(f, "installation"),
            RecordKind::Delivery => write!(f, "delivery"),
            RecordKind::Bolting => write!(f, "bolting"),
        }
    }
}

/// Active sidebar tab. Statistics is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    #[default]
    Installation,
    Delivery,
    Bolting,
    Statistics,
}

impl AppMode {
    /// Record kind written in this mode, `None` for Statistics
    pub fn record_kind(self) -> Option<RecordKind> {
        match self {
            AppMode::Installation => Some(RecordKind::Installation),
            AppMode::Delivery => Some(RecordKind::Delivery),
            AppMode::Bolting => Some(RecordKind::Bolting),
            AppMode::Statistics => None,
        }
    }

    /// Whether writes are allowed given the host "assembly selection" flag.
    ///
    /// Installation and delivery need assembly selection on, bolting needs it off.
    pub fn accepts_writes(self, assembly_selection: bool) -> bool {
        match self {
            AppMode::Installation | AppMode::Delivery => assembly_selection,
            AppMode::Bolting => !assembly_selection,
            AppMode::Statistics => true,
        }
    }
}

impl std::fmt::Display for AppMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppMode::Installation => write!(f, "installation"),
            AppMode::Delivery => write!(f, "delivery"),
            AppMode::Bolting => write!(f, "bolting"),
            AppMode::Statistics => write!(f, "statistics"),
        }
    }
}

/// Which part attribute is used as its label in lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayField {
    Guid,
    Name,
    #[default]
    CastUnitPos,
}

/// Viewer coordinates, opaque to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One audit trail entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub user: String,
}

impl LogEntry {
    /// Entry stamped with the current time for the placeholder user
    pub fn now(action: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action: action.into(),
            user: CURRENT_USER.to_string(),
        }
    }
}

/// A tracked physical component (beam, column, plate, brace)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPart {
    pub id: PartId,
    pub guid: String,
    pub name: String,
    #[serde(alias = "castUnitPos")]
    pub cast_unit_pos: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, alias = "isSelected")]
    pub is_selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolting: Option<BoltingRecord>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl AssemblyPart {
    pub fn has_record(&self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Installation => self.installation.is_some(),
            RecordKind::Delivery => self.delivery.is_some(),
            RecordKind::Bolting => self.bolting.is_some(),
        }
    }

    /// Copy of the record of the given kind
    pub fn record(&self, kind: RecordKind) -> Option<RecordPayload> {
        match kind {
            RecordKind::Installation => self.installation.clone().map(RecordPayload::from),
            RecordKind::Delivery => self.delivery.clone().map(RecordPayload::from),
            RecordKind::Bolting => self.bolting.clone().map(RecordPayload::from),
        }
    }

    /// Date of the record of the given kind
    pub fn record_date(&self, kind: RecordKind) -> Option<NaiveDate> {
        match kind {
            RecordKind::Installation => self.installation.as_ref().map(|r| r.date),
            RecordKind::Delivery => self.delivery.as_ref().map(|r| r.date),
            RecordKind::Bolting => self.bolting.as_ref().map(|r| r.date),
        }
    }

    /// Replace the record matching the payload's kind
    pub fn set_record(&mut self, payload: RecordPayload) {
        match payload {
            RecordPayload::Installation(r) => self.installation = Some(r),
            RecordPayload::Delivery(r) => self.delivery = Some(r),
            RecordPayload::Bolting(r) => self.bolting = Some(r),
        }
    }

    pub fn clear_record(&mut self, kind: RecordKind) {
        match kind {
            RecordKind::Installation => self.installation = None,
            RecordKind::Delivery => self.delivery = None,
            RecordKind::Bolting => self.bolting = None,
        }
    }

    /// Label according to the display preference. An empty mark falls back to the name.
    pub fn label(&self, field: DisplayField) -> &str {
        match field {
            DisplayField::Guid => &self.guid,
            DisplayField::Name => &self.name,
            DisplayField::CastUnitPos if self.cast_unit_pos.is_empty() => &self.name,
            DisplayField::CastUnitPos => &self.cast_unit_pos,
        }
    }

    /// Audit trail for presentation, most recent first
    pub fn logs_newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.logs.iter().rev()
    }
}

/// Base data for one part as supplied by the model source.
///
/// `id` may be omitted; the repository assigns one at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartSeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PartId>,
    pub guid: String,
    pub name: String,
    #[serde(default, alias = "castUnitPos")]
    pub cast_unit_pos: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation: Option<InstallationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bolting: Option<BoltingRecord>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl PartSeed {
    /// Materialize the seed under the given id, unselected
    pub fn into_part(self, id: PartId) -> AssemblyPart {
        AssemblyPart {
            id,
            guid: self.guid,
            name: self.name,
            cast_unit_pos: self.cast_unit_pos,
            position: self.position,
            is_selected: false,
            installation: self.installation,
            delivery: self.delivery,
            bolting: self.bolting,
            logs: self.logs,
        }
    }
}
