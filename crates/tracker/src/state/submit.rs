//! Form submit: gating, validation, overwrite confirmation, commit

use serde::Serialize;
use shared::{RecordKind, RecordPayload};

use super::forms::{Conflict, FormFeedback, PendingOverwrite};
use super::repository::{record_summary, StoreCommand, WriteReason};
use super::AppState;
use crate::error::SubmitError;

/// Result of a submit or confirmation that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The record was written to `count` parts
    Committed { count: usize },
    /// Nothing written; `conflicts` selected parts already carry the record
    NeedsConfirmation { conflicts: usize },
}

impl AppState {
    /// Submit the active mode's form against the current selection.
    ///
    /// Failures are also kept as form feedback until the mode or selection changes.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let result = self.try_submit();
        if let Err(e) = &result {
            tracing::debug!("Submit rejected: {e}");
            self.forms.feedback = Some(FormFeedback::Error(e.clone()));
        }
        result
    }

    fn try_submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let kind = self.writable_kind()?;
        if self.repository.selected_count() == 0 {
            return Err(SubmitError::EmptySelection);
        }

        let payload = match kind {
            RecordKind::Installation => self.forms.installation.to_payload()?,
            RecordKind::Delivery => self.forms.delivery.to_payload()?,
            RecordKind::Bolting => self.forms.bolting.to_payload()?,
        };

        let conflicts = self.conflicts(kind);
        if !conflicts.is_empty() {
            let count = conflicts.len();
            tracing::debug!("{count} selected parts already have {kind} data");
            self.forms.feedback = Some(FormFeedback::Overwrite(PendingOverwrite {
                payload,
                conflicts,
                acknowledged: false,
            }));
            return Ok(SubmitOutcome::NeedsConfirmation { conflicts: count });
        }

        Ok(self.commit(payload))
    }

    /// Record kind of the active mode, if it may write under the gating flag
    pub(super) fn writable_kind(&self) -> Result<RecordKind, SubmitError> {
        let kind = self
            .mode
            .record_kind()
            .ok_or(SubmitError::ReadOnlyMode(self.mode))?;
        if self.is_mode_blocked() {
            return Err(SubmitError::ModeBlocked {
                mode: self.mode,
                assembly_selection: self.assembly_selection,
            });
        }
        Ok(kind)
    }

    /// Selected parts that already carry a record of `kind`
    fn conflicts(&self, kind: RecordKind) -> Vec<Conflict> {
        let field = self.display_field();
        self.repository
            .selected()
            .filter_map(|p| {
                p.record(kind).map(|current| Conflict {
                    id: p.id.clone(),
                    label: p.label(field).to_string(),
                    summary: record_summary(&current),
                })
            })
            .collect()
    }

    fn commit(&mut self, payload: RecordPayload) -> SubmitOutcome {
        let targets = self.repository.selected_ids();
        let count = targets.len();
        self.repository.apply(StoreCommand::WriteRecord {
            targets,
            payload,
            reason: WriteReason::Recorded,
        });
        // Written parts are deselected
        self.on_selection_changed();
        SubmitOutcome::Committed { count }
    }

    /// Tick or untick the "overwrite existing data" checkbox
    pub fn acknowledge_overwrite(&mut self, acknowledged: bool) -> Result<(), SubmitError> {
        match &mut self.forms.feedback {
            Some(FormFeedback::Overwrite(pending)) => {
                pending.acknowledged = acknowledged;
                Ok(())
            }
            _ => Err(SubmitError::NoPendingOverwrite),
        }
    }

    /// Write the held-back payload to the whole selection
    pub fn confirm_overwrite(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let acknowledged = match self.forms.pending_overwrite() {
            Some(pending) => pending.acknowledged,
            None => return Err(SubmitError::NoPendingOverwrite),
        };
        if !acknowledged {
            return Err(SubmitError::OverwriteNotAcknowledged);
        }
        self.writable_kind()?;

        match self.forms.feedback.take() {
            Some(FormFeedback::Overwrite(pending)) => {
                tracing::info!("Overwriting {} existing records", pending.conflicts.len());
                Ok(self.commit(pending.payload))
            }
            _ => Err(SubmitError::NoPendingOverwrite),
        }
    }

    /// Dismiss the overwrite prompt without writing
    pub fn cancel_overwrite(&mut self) {
        if self.forms.pending_overwrite().is_some() {
            self.forms.clear_feedback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::fixtures::{blank_seeds, date, demo_seeds, time};
    use crate::state::{Gesture, TrackerSettings};
    use shared::{AppMode, InstallMethod, PartId};

    fn state(seeds: Vec<shared::PartSeed>) -> AppState {
        AppState::new(seeds, TrackerSettings::default())
    }

    fn select(state: &mut AppState, list: &[&str]) {
        let ids: Vec<PartId> = list.iter().map(|s| s.to_string()).collect();
        state.select_group(&ids, Gesture::Replace);
    }

    #[test]
    fn test_statistics_is_read_only() {
        let mut s = state(blank_seeds(1));
        s.set_mode(AppMode::Statistics);
        assert_eq!(s.submit(), Err(SubmitError::ReadOnlyMode(AppMode::Statistics)));
    }

    #[test]
    fn test_blocked_before_empty_selection() {
        let mut s = state(blank_seeds(1));
        s.set_mode(AppMode::Bolting);
        let err = s.submit().unwrap_err();
        assert!(matches!(err, SubmitError::ModeBlocked { mode: AppMode::Bolting, assembly_selection: true }));
    }

    #[test]
    fn test_empty_selection_before_validation() {
        let mut s = state(blank_seeds(1));
        s.forms.installation.installers.clear();
        assert_eq!(s.submit(), Err(SubmitError::EmptySelection));
    }

    #[test]
    fn test_validation_error_writes_nothing() {
        let mut s = state(blank_seeds(1));
        select(&mut s, &["1"]);
        s.set_mode(AppMode::Delivery);
        select(&mut s, &["1"]);
        s.forms.delivery.arrival_time = time("10:00");
        s.forms.delivery.unloading_time = time("09:00");
        let version = s.repository().records_version();
        let err = s.submit().unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Validation(ValidationError::UnloadingBeforeArrival { .. })
        ));
        assert_eq!(s.repository().records_version(), version);
        assert_eq!(s.repository().selected_count(), 1);
        assert_eq!(s.forms.error(), Some(&err));
    }

    #[test]
    fn test_commit_writes_and_deselects() {
        let mut s = state(blank_seeds(3));
        select(&mut s, &["1", "2"]);
        s.forms.installation.add_installer("Jaan Tamm");
        s.forms.installation.date = date("2024-01-01");
        assert_eq!(s.submit(), Ok(SubmitOutcome::Committed { count: 2 }));

        for id in ["1", "2"] {
            let p = s.repository().get(id).unwrap();
            let r = p.installation.as_ref().unwrap();
            assert_eq!(r.installers, vec!["Silver Vat", "Jaan Tamm"]);
            assert_eq!(r.method, InstallMethod::Crane);
            assert_eq!(p.logs.len(), 1);
            assert!(!p.is_selected);
        }
        assert!(s.repository().get("3").unwrap().installation.is_none());
        assert!(s.forms.feedback.is_none());
    }

    #[test]
    fn test_overwrite_requires_acknowledgement() {
        let mut s = state(demo_seeds());
        select(&mut s, &["1", "4"]);
        assert_eq!(s.submit(), Ok(SubmitOutcome::NeedsConfirmation { conflicts: 1 }));
        let pending = s.forms.pending_overwrite().unwrap();
        assert_eq!(pending.conflicts[0].label, "B-101");
        assert_eq!(pending.conflicts[0].summary, "01.10.2023 (Jaan Tamm, Peeter Paju)");
        assert!(s.repository().get("4").unwrap().installation.is_none());

        assert_eq!(s.confirm_overwrite(), Err(SubmitError::OverwriteNotAcknowledged));
        assert!(s.forms.pending_overwrite().is_some());

        s.acknowledge_overwrite(true).unwrap();
        assert_eq!(s.confirm_overwrite(), Ok(SubmitOutcome::Committed { count: 2 }));
        let beam = s.repository().get("1").unwrap();
        assert_eq!(beam.installation.as_ref().unwrap().installers, vec!["Silver Vat"]);
        assert_eq!(beam.logs.len(), 4);
        assert_eq!(s.confirm_overwrite(), Err(SubmitError::NoPendingOverwrite));
    }

    #[test]
    fn test_cancel_overwrite() {
        let mut s = state(demo_seeds());
        select(&mut s, &["1"]);
        s.submit().unwrap();
        s.cancel_overwrite();
        assert!(s.forms.feedback.is_none());
        assert_eq!(s.acknowledge_overwrite(true), Err(SubmitError::NoPendingOverwrite));
        assert_eq!(s.repository().selected_count(), 1);
    }

    #[test]
    fn test_pending_overwrite_dropped_on_selection_change() {
        let mut s = state(demo_seeds());
        select(&mut s, &["1"]);
        s.submit().unwrap();
        s.click_part("5");
        assert_eq!(s.confirm_overwrite(), Err(SubmitError::NoPendingOverwrite));
    }

    #[test]
    fn test_bolting_commit_with_flag_off() {
        let mut s = state(blank_seeds(2));
        s.set_mode(AppMode::Bolting);
        s.set_assembly_selection(false);
        select(&mut s, &["2"]);
        s.forms.bolting.installer = "Peeter Paju".into();
        assert_eq!(s.submit(), Ok(SubmitOutcome::Committed { count: 1 }));
        let p = s.repository().get("2").unwrap();
        assert_eq!(p.bolting.as_ref().unwrap().installer, "Peeter Paju");
        assert_eq!(p.logs[0].action, "Bolts tightened");
    }
}
