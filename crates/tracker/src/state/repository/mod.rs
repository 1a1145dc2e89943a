//! Part repository
//!
//! Owns the ordered part list. Every mutation is a [`StoreCommand`] applied by
//! [`PartRepository::apply`], so there is exactly one write path into the parts.

mod display;
mod record_ops;
mod selection_ops;

pub use display::{
    day_label, format_date, method_label, month_label, record_summary, removal_action,
    write_action, WriteReason,
};

use std::collections::HashSet;

use shared::{AssemblyPart, PartId, PartSeed, RecordKind, RecordPayload};

/// A state transition on the repository
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCommand {
    /// Set `is_selected` on exactly these ids, leaving all others alone
    SetSelectionFlags { ids: HashSet<PartId>, selected: bool },
    /// Selected iff the id is in the set
    ReplaceSelection { ids: HashSet<PartId> },
    ToggleSelection { id: PartId },
    RemoveFromSelection { id: PartId },
    /// Replace the payload's record kind on every target, log it and deselect
    WriteRecord {
        targets: HashSet<PartId>,
        payload: RecordPayload,
        reason: WriteReason,
    },
    /// Drop the record kind from every target and log the removal
    ClearRecord {
        kind: RecordKind,
        targets: HashSet<PartId>,
    },
}

/// Authoritative part list with mutation counters
#[derive(Debug, Default, Clone)]
pub struct PartRepository {
    parts: Vec<AssemblyPart>,
    /// Increments on every mutation
    pub(crate) version: u64,
    /// Increments only when records or logs change
    pub(crate) records_version: u64,
}

impl PartRepository {
    /// Build a repository from the model feed.
    ///
    /// Seeds without an id, or whose id is already taken, get a fresh UUID.
    pub fn load(seeds: Vec<PartSeed>) -> Self {
        let mut seen: HashSet<PartId> = HashSet::with_capacity(seeds.len());
        let mut parts = Vec::with_capacity(seeds.len());

        for mut seed in seeds {
            let id = match seed.id.take() {
                Some(id) if !id.is_empty() && !seen.contains(&id) => id,
                Some(id) => {
                    let fresh = uuid::Uuid::new_v4().to_string();
                    tracing::warn!("Duplicate or empty part id '{id}', assigned {fresh}");
                    fresh
                }
                None => uuid::Uuid::new_v4().to_string(),
            };
            seen.insert(id.clone());
            parts.push(seed.into_part(id));
        }

        tracing::info!("Loaded {} parts", parts.len());
        Self {
            parts,
            version: 0,
            records_version: 0,
        }
    }

    /// Current repository version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Record version (increments when records or logs change)
    pub fn records_version(&self) -> u64 {
        self.records_version
    }

    /// All parts in load order
    pub fn parts(&self) -> &[AssemblyPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Get a part by ID
    pub fn get(&self, id: &str) -> Option<&AssemblyPart> {
        self.parts.iter().find(|p| p.id == id)
    }

    /// Selected parts in load order
    pub fn selected(&self) -> impl Iterator<Item = &AssemblyPart> {
        self.parts.iter().filter(|p| p.is_selected)
    }

    pub fn selected_ids(&self) -> HashSet<PartId> {
        self.selected().map(|p| p.id.clone()).collect()
    }

    /// Selected ids in load order
    pub fn selected_ids_ordered(&self) -> Vec<PartId> {
        self.selected().map(|p| p.id.clone()).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Apply a state transition
    pub fn apply(&mut self, command: StoreCommand) {
        match command {
            StoreCommand::SetSelectionFlags { ids, selected } => {
                self.set_selection_flags(&ids, selected)
            }
            StoreCommand::ReplaceSelection { ids } => self.replace_selection(&ids),
            StoreCommand::ToggleSelection { id } => self.toggle_selection(&id),
            StoreCommand::RemoveFromSelection { id } => {
                self.set_selection_flags(&HashSet::from([id]), false)
            }
            StoreCommand::WriteRecord {
                targets,
                payload,
                reason,
            } => self.write_record(&targets, payload, reason),
            StoreCommand::ClearRecord { kind, targets } => self.clear_record(kind, &targets),
        }
    }

    /// Apply a transition to a copy, leaving `self` untouched
    pub fn applied(&self, command: StoreCommand) -> Self {
        let mut next = self.clone();
        next.apply(command);
        next
    }
}
