//! Group edit: change or remove one record kind across a history group
//!
//! The group is a snapshot of member ids taken when the editor opens. Members
//! can be marked for removal, currently selected outsiders can be marked for
//! addition, and the shared draft is written to the final set in one step.

use std::collections::HashSet;

use serde::Serialize;
use shared::{PartId, RecordKind, RecordPayload};

use super::forms::{normalize_payload, validate_payload};
use super::repository::{StoreCommand, WriteReason};
use super::AppState;
use crate::error::SubmitError;

/// Editing one member on its own
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleEdit {
    pub id: PartId,
    pub draft: RecordPayload,
}

/// Open group editor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupEdit {
    kind: RecordKind,
    members: Vec<PartId>,
    removals: HashSet<PartId>,
    /// In the order they were marked
    additions: Vec<PartId>,
    draft: RecordPayload,
    single: Option<SingleEdit>,
}

/// What a group save wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GroupSaveOutcome {
    pub written: usize,
    pub cleared: usize,
}

impl GroupEdit {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn members(&self) -> &[PartId] {
        &self.members
    }

    pub fn draft(&self) -> &RecordPayload {
        &self.draft
    }

    pub fn single(&self) -> Option<&SingleEdit> {
        self.single.as_ref()
    }

    pub fn is_marked_for_removal(&self, id: &str) -> bool {
        self.removals.contains(id)
    }

    pub fn is_marked_for_addition(&self, id: &str) -> bool {
        self.additions.iter().any(|a| a == id)
    }

    /// Members kept, in group order, followed by additions
    pub fn final_targets(&self) -> Vec<PartId> {
        self.members
            .iter()
            .filter(|id| !self.removals.contains(*id))
            .chain(self.additions.iter())
            .cloned()
            .collect()
    }

    fn check_kind(&self, payload: &RecordPayload) -> Result<(), SubmitError> {
        if payload.kind() != self.kind {
            return Err(SubmitError::KindMismatch {
                expected: self.kind,
                found: payload.kind(),
            });
        }
        Ok(())
    }
}

impl AppState {
    /// Open the editor on the parts among `ids` that carry the active mode's record.
    ///
    /// The draft starts from the first member's record. Blocked modes cannot open it.
    pub fn open_group_edit(&mut self, ids: &[PartId]) -> Result<(), SubmitError> {
        let kind = self.writable_kind()?;

        let mut seen = HashSet::new();
        let members: Vec<PartId> = ids
            .iter()
            .filter(|id| self.repository.get(id).is_some_and(|p| p.has_record(kind)))
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();

        let draft = members
            .first()
            .and_then(|id| self.repository.get(id))
            .and_then(|p| p.record(kind))
            .ok_or(SubmitError::EmptySelection)?;

        tracing::debug!("Editing {kind} group of {} parts", members.len());
        self.group_edit = Some(GroupEdit {
            kind,
            members,
            removals: HashSet::new(),
            additions: Vec::new(),
            draft,
            single: None,
        });
        Ok(())
    }

    /// Open the editor on one history day
    pub fn edit_history_day(&mut self, date: chrono::NaiveDate) -> Result<(), SubmitError> {
        let ids = self
            .history()
            .day(date)
            .map(|d| d.parts.clone())
            .unwrap_or_default();
        self.open_group_edit(&ids)
    }

    pub fn close_group_edit(&mut self) {
        self.group_edit = None;
    }

    fn editor(&mut self) -> Result<&mut GroupEdit, SubmitError> {
        self.group_edit.as_mut().ok_or(SubmitError::NoGroupEdit)
    }

    /// Mark or unmark a member for removal; returns whether it is now marked
    pub fn toggle_removal(&mut self, id: &str) -> Result<bool, SubmitError> {
        let edit = self.editor()?;
        if !edit.members.iter().any(|m| m == id) {
            return Err(SubmitError::NotInGroup(id.to_string()));
        }
        if edit.removals.remove(id) {
            Ok(false)
        } else {
            edit.removals.insert(id.to_string());
            Ok(true)
        }
    }

    /// Selected parts outside the group
    pub fn addition_candidates(&self) -> Vec<PartId> {
        let Some(edit) = &self.group_edit else {
            return Vec::new();
        };
        self.repository
            .selected()
            .filter(|p| !edit.members.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Mark or unmark a candidate for addition; returns whether it is now marked.
    /// Ids that are not candidates are ignored.
    pub fn toggle_addition(&mut self, id: &str) -> Result<bool, SubmitError> {
        self.editor()?;
        let candidate = self.addition_candidates().iter().any(|c| c == id);
        let edit = self.editor()?;
        if let Some(pos) = edit.additions.iter().position(|a| a == id) {
            edit.additions.remove(pos);
            return Ok(false);
        }
        if !candidate {
            return Ok(false);
        }
        edit.additions.push(id.to_string());
        Ok(true)
    }

    pub fn set_group_draft(&mut self, payload: RecordPayload) -> Result<(), SubmitError> {
        let edit = self.editor()?;
        edit.check_kind(&payload)?;
        edit.draft = normalize_payload(payload);
        Ok(())
    }

    /// Clear removed members, write the draft to the final set and close.
    ///
    /// An empty final set closes the editor after the removals.
    pub fn save_group_edit(&mut self) -> Result<GroupSaveOutcome, SubmitError> {
        self.writable_kind()?;
        let edit = self.editor()?;
        let targets = edit.final_targets();
        if !targets.is_empty() {
            validate_payload(&edit.draft)?;
        }

        let Some(edit) = self.group_edit.take() else {
            return Err(SubmitError::NoGroupEdit);
        };
        let mut outcome = GroupSaveOutcome::default();

        if !edit.removals.is_empty() {
            outcome.cleared = edit.removals.len();
            self.repository.apply(StoreCommand::ClearRecord {
                kind: edit.kind,
                targets: edit.removals,
            });
        }
        if !targets.is_empty() {
            outcome.written = targets.len();
            self.repository.apply(StoreCommand::WriteRecord {
                targets: targets.into_iter().collect(),
                payload: edit.draft,
                reason: WriteReason::Edited,
            });
            self.on_selection_changed();
        }
        Ok(outcome)
    }

    /// Edit one member on its own. Highlights just that part.
    pub fn open_single_edit(&mut self, id: &str) -> Result<(), SubmitError> {
        let edit = self.editor()?;
        if !edit.members.iter().any(|m| m == id) {
            return Err(SubmitError::NotInGroup(id.to_string()));
        }
        let kind = edit.kind;
        let fallback = edit.draft.clone();
        let draft = self
            .repository
            .get(id)
            .and_then(|p| p.record(kind))
            .unwrap_or(fallback);
        self.editor()?.single = Some(SingleEdit {
            id: id.to_string(),
            draft,
        });
        self.apply_selection(HashSet::from([id.to_string()]));
        Ok(())
    }

    pub fn set_single_draft(&mut self, payload: RecordPayload) -> Result<(), SubmitError> {
        let edit = self.editor()?;
        edit.check_kind(&payload)?;
        match &mut edit.single {
            Some(single) => {
                single.draft = normalize_payload(payload);
                Ok(())
            }
            None => Err(SubmitError::NoGroupEdit),
        }
    }

    /// Write the single draft to its part and return to the group
    pub fn save_single_edit(&mut self) -> Result<(), SubmitError> {
        self.writable_kind()?;
        let edit = self.editor()?;
        let single = edit.single.as_ref().ok_or(SubmitError::NoGroupEdit)?;
        validate_payload(&single.draft)?;

        let Some(single) = edit.single.take() else {
            return Err(SubmitError::NoGroupEdit);
        };
        self.repository.apply(StoreCommand::WriteRecord {
            targets: HashSet::from([single.id]),
            payload: single.draft,
            reason: WriteReason::Edited,
        });
        self.on_selection_changed();
        Ok(())
    }

    pub fn cancel_single_edit(&mut self) {
        if let Some(edit) = &mut self.group_edit {
            edit.single = None;
        }
    }
}
