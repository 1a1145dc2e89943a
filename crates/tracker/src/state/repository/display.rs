//! Display helper functions for parts and records

use chrono::{Datelike, NaiveDate};
use shared::{InstallMethod, RecordKind, RecordPayload};

use crate::i18n::{self, t};

/// Why a record is being written; selects the audit wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteReason {
    /// Saved from the mode form
    Recorded,
    /// Saved from a history group edit
    Edited,
}

/// Localized name of an install method (free text for Other)
pub fn method_label(method: &InstallMethod) -> String {
    match method {
        InstallMethod::Crane => t("method.crane").to_string(),
        InstallMethod::Lift => t("method.lift").to_string(),
        InstallMethod::Manual => t("method.manual").to_string(),
        InstallMethod::Other(text) => text.clone(),
    }
}

/// `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// `dd.mm.yyyy - weekday`
pub fn day_label(date: NaiveDate) -> String {
    format!(
        "{} - {}",
        format_date(date),
        i18n::weekday_name(i18n::lang(), date.weekday())
    )
}

/// `Month yyyy`
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", i18n::month_name(i18n::lang(), month), year)
}

/// Short summary shown when a record is about to be overwritten
pub fn record_summary(payload: &RecordPayload) -> String {
    match payload {
        RecordPayload::Installation(r) => {
            format!("{} ({})", format_date(r.date), r.installers.join(", "))
        }
        RecordPayload::Delivery(r) => format!("{} ({})", format_date(r.date), r.vehicle),
        RecordPayload::Bolting(r) => format!("{} ({})", format_date(r.date), r.installer),
    }
}

/// Audit text for a record write
pub fn write_action(payload: &RecordPayload, reason: WriteReason) -> String {
    match (reason, payload) {
        (WriteReason::Recorded, RecordPayload::Installation(r)) => {
            format!("{}: {}", t("log.installed"), method_label(&r.method))
        }
        (WriteReason::Recorded, RecordPayload::Delivery(r)) => {
            format!("{}: {}", t("log.delivered"), r.vehicle)
        }
        (WriteReason::Recorded, RecordPayload::Bolting(_)) => t("log.bolted").to_string(),
        (WriteReason::Edited, p) => match p.kind() {
            RecordKind::Installation => t("log.edited_installation").to_string(),
            RecordKind::Delivery => t("log.edited_delivery").to_string(),
            RecordKind::Bolting => t("log.edited_bolting").to_string(),
        },
    }
}

/// Audit text for a record removal
pub fn removal_action(kind: RecordKind) -> String {
    match kind {
        RecordKind::Installation => t("log.removed_installation"),
        RecordKind::Delivery => t("log.removed_delivery"),
        RecordKind::Bolting => t("log.removed_bolting"),
    }
    .to_string()
}
