//! Record writes and removals

use std::collections::HashSet;

use shared::{LogEntry, PartId, RecordKind, RecordPayload};

use super::display::{removal_action, write_action, WriteReason};
use super::PartRepository;

impl PartRepository {
    pub(super) fn write_record(
        &mut self,
        targets: &HashSet<PartId>,
        payload: RecordPayload,
        reason: WriteReason,
    ) {
        let action = write_action(&payload, reason);
        let mut written = 0usize;

        for part in self.parts.iter_mut().filter(|p| targets.contains(&p.id)) {
            part.set_record(payload.clone());
            part.logs.push(LogEntry::now(action.clone()));
            part.is_selected = false;
            written += 1;
        }

        self.version += 1;
        self.records_version += 1;
        tracing::info!("Wrote {} record to {written} parts ({action})", payload.kind());
    }

    pub(super) fn clear_record(&mut self, kind: RecordKind, targets: &HashSet<PartId>) {
        let action = removal_action(kind);
        let mut cleared = 0usize;

        for part in self.parts.iter_mut().filter(|p| targets.contains(&p.id)) {
            part.clear_record(kind);
            part.logs.push(LogEntry::now(action.clone()));
            cleared += 1;
        }

        self.version += 1;
        self.records_version += 1;
        tracing::info!("Cleared {kind} record on {cleared} parts");
    }
}
