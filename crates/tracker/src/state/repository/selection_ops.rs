//! Selection flag mutations

use std::collections::HashSet;

use shared::PartId;

use super::PartRepository;

impl PartRepository {
    pub(super) fn set_selection_flags(&mut self, ids: &HashSet<PartId>, selected: bool) {
        for part in self.parts.iter_mut().filter(|p| ids.contains(&p.id)) {
            part.is_selected = selected;
        }
        self.version += 1;
    }

    pub(super) fn replace_selection(&mut self, ids: &HashSet<PartId>) {
        for part in &mut self.parts {
            part.is_selected = ids.contains(&part.id);
        }
        self.version += 1;
    }

    pub(super) fn toggle_selection(&mut self, id: &str) {
        if let Some(part) = self.parts.iter_mut().find(|p| p.id == id) {
            part.is_selected = !part.is_selected;
            self.version += 1;
        }
    }
}
