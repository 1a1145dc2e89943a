use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::RecordKind;

/// How a part was lifted into place
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallMethod {
    Crane,
    Lift,
    Manual,
    /// Free-text description entered when none of the presets apply
    Other(String),
}

/// Installation event: who installed the part, when, and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// Installer names in entry order, no duplicates
    pub installers: Vec<String>,
    pub date: NaiveDate,
    pub method: InstallMethod,
}

impl InstallationRecord {
    /// Build a record, dropping blank and repeated installer names
    pub fn new(installers: Vec<String>, date: NaiveDate, method: InstallMethod) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(installers.len());
        for name in installers {
            let name = name.trim();
            if !name.is_empty() && !unique.iter().any(|n| n == name) {
                unique.push(name.to_string());
            }
        }
        Self {
            installers: unique,
            date,
            method,
        }
    }
}

/// Delivery event: which vehicle brought the part and the unloading window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub vehicle: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub arrival_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub unloading_time: NaiveTime,
}

/// Bolt tightening event (exactly one installer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoltingRecord {
    pub installer: String,
    pub date: NaiveDate,
}

/// A record of any kind, tagged by the kind it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordPayload {
    Installation(InstallationRecord),
    Delivery(DeliveryRecord),
    Bolting(BoltingRecord),
}

impl RecordPayload {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPayload::Installation(_) => RecordKind::Installation,
            RecordPayload::Delivery(_) => RecordKind::Delivery,
            RecordPayload::Bolting(_) => RecordKind::Bolting,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            RecordPayload::Installation(r) => r.date,
            RecordPayload::Delivery(r) => r.date,
            RecordPayload::Bolting(r) => r.date,
        }
    }
}

impl From<InstallationRecord> for RecordPayload {
    fn from(record: InstallationRecord) -> Self {
        RecordPayload::Installation(record)
    }
}

impl From<DeliveryRecord> for RecordPayload {
    fn from(record: DeliveryRecord) -> Self {
        RecordPayload::Delivery(record)
    }
}

impl From<BoltingRecord> for RecordPayload {
    fn from(record: BoltingRecord) -> Self {
        RecordPayload::Bolting(record)
    }
}

/// Time-of-day as `HH:MM` on the wire; `HH:MM:SS` is accepted on input.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }
}
