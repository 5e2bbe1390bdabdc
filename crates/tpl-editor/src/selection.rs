//! The set of selected field ids.

use smallvec::SmallVec;
use tpl_core::id::FieldId;

/// Order-insensitive id set. Selections are almost always one or two ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: SmallVec<[FieldId; 4]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.ids.contains(&id)
    }

    pub fn as_slice(&self) -> &[FieldId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.ids.iter().copied()
    }

    /// The id when exactly one field is selected.
    pub fn single(&self) -> Option<FieldId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Plain click: the selection becomes `{id}`.
    pub fn replace(&mut self, id: FieldId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Modifier click. Returns whether `id` is selected afterwards.
    pub fn toggle(&mut self, id: FieldId) -> bool {
        if let Some(pos) = self.ids.iter().position(|s| *s == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = FieldId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that fail `keep` (e.g. fields removed by undo).
    pub fn retain(&mut self, mut keep: impl FnMut(FieldId) -> bool) {
        self.ids.retain(|id| keep(*id));
    }
}
