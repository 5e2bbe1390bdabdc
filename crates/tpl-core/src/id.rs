use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable identity of a field within one template.
///
/// Ids are plain integers on the wire; they drive diffing, selection
/// and undo, so they never change once assigned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(pub u32);

impl FieldId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Next id not used by any of `ids`: max + 1, starting at 1. Once the
    /// max is `u32::MAX`, the lowest unused id instead. `None` when every
    /// id is taken.
    pub fn next_free(ids: impl IntoIterator<Item = FieldId>) -> Option<Self> {
        let used: BTreeSet<u32> = ids.into_iter().map(|id| id.0).collect();
        let max = used.last().copied().unwrap_or(0);
        if let Some(next) = max.checked_add(1) {
            return Some(Self(next));
        }
        let mut candidate = 1u32;
        for &id in used.range(1..) {
            if id != candidate {
                break;
            }
            candidate = candidate.checked_add(1)?;
        }
        (!used.contains(&candidate)).then_some(Self(candidate))
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
