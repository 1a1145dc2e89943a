//! Form validation and submit errors

use chrono::NaiveTime;
use serde::Serialize;
use shared::{AppMode, PartId, RecordKind};
use thiserror::Error;

use crate::i18n::t;

/// A form field problem. Blocks the write until corrected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("at least one installer is required")]
    MissingInstallers,
    #[error("the other installation method needs a description")]
    MissingCustomMethod,
    #[error("unloading time {unloading} is earlier than arrival time {arrival}")]
    UnloadingBeforeArrival {
        arrival: NaiveTime,
        unloading: NaiveTime,
    },
    #[error("a bolt installer must be chosen")]
    MissingBoltInstaller,
}

impl ValidationError {
    /// Localized message for the form
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::MissingInstallers => t("error.missing_installers"),
            ValidationError::MissingCustomMethod => t("error.missing_custom_method"),
            ValidationError::UnloadingBeforeArrival { .. } => t("error.unloading_before_arrival"),
            ValidationError::MissingBoltInstaller => t("error.missing_bolt_installer"),
        }
    }
}

/// Where a submit failure is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// Message next to the form
    Inline,
    /// Full overlay; nothing can be written until the gating flag changes
    Overlay,
}

/// Why a submit, confirmation or group save did not write anything
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{0} mode is read-only")]
    ReadOnlyMode(AppMode),
    #[error("{mode} mode cannot write while assembly selection is {}", on_off(.assembly_selection))]
    ModeBlocked {
        mode: AppMode,
        assembly_selection: bool,
    },
    #[error("no parts are selected")]
    EmptySelection,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("the overwrite has not been acknowledged")]
    OverwriteNotAcknowledged,
    #[error("no overwrite is waiting for confirmation")]
    NoPendingOverwrite,
    #[error("{found} data cannot be saved to a {expected} group")]
    KindMismatch {
        expected: RecordKind,
        found: RecordKind,
    },
    #[error("no group is being edited")]
    NoGroupEdit,
    #[error("part {0} is not a member of the edited group")]
    NotInGroup(PartId),
}

fn on_off(flag: &bool) -> &'static str {
    if *flag {
        "on"
    } else {
        "off"
    }
}

impl SubmitError {
    pub fn presentation(&self) -> Presentation {
        match self {
            SubmitError::ModeBlocked { .. } => Presentation::Overlay,
            _ => Presentation::Inline,
        }
    }

    /// Stable machine-readable name, used by the command protocol
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::ReadOnlyMode(_) => "read_only_mode",
            SubmitError::ModeBlocked { .. } => "mode_blocked",
            SubmitError::EmptySelection => "empty_selection",
            SubmitError::Validation(_) => "validation",
            SubmitError::OverwriteNotAcknowledged => "overwrite_not_acknowledged",
            SubmitError::NoPendingOverwrite => "no_pending_overwrite",
            SubmitError::KindMismatch { .. } => "kind_mismatch",
            SubmitError::NoGroupEdit => "no_group_edit",
            SubmitError::NotInGroup(_) => "not_in_group",
        }
    }

    /// Localized message for the user
    pub fn message(&self) -> &'static str {
        match self {
            SubmitError::ReadOnlyMode(_) => t("error.read_only"),
            SubmitError::ModeBlocked {
                assembly_selection, ..
            } => {
                if *assembly_selection {
                    t("error.blocked_off")
                } else {
                    t("error.blocked_on")
                }
            }
            SubmitError::EmptySelection => t("error.empty_selection"),
            SubmitError::Validation(e) => e.message(),
            SubmitError::OverwriteNotAcknowledged => t("error.not_acknowledged"),
            SubmitError::NoPendingOverwrite => t("error.no_pending_overwrite"),
            SubmitError::KindMismatch { .. } => t("error.kind_mismatch"),
            SubmitError::NoGroupEdit => t("error.no_group_edit"),
            SubmitError::NotInGroup(_) => t("error.not_in_group"),
        }
    }
}
