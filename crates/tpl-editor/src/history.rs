//! Snapshot undo/redo.
//!
//! Every entry is a full copy of the state taken right before a commit.
//! `record` must be called before the mutation is applied, so the top of
//! `past` is always the state preceding the most recent commit.

/// Two-stack snapshot history with a bounded `past`.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    future: Vec<T>,
    /// Maximum undo depth; the oldest entry is dropped first.
    max_depth: usize,
}

impl<T: Clone> History<T> {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Push a pre-mutation snapshot and clear the redo stack.
    pub fn record(&mut self, current: &T) {
        self.past.push(current.clone());
        if self.past.len() > self.max_depth {
            self.past.remove(0);
        }
        self.future.clear();
    }

    /// Pop the previous state. `current` moves onto the redo stack.
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.past.pop()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Pop the next state. `current` moves back onto the undo stack.
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.future.pop()?;
        self.past.push(current.clone());
        Some(next)
    }

    /// Drop the newest `past` entry without restoring it (aborted gesture).
    pub fn discard_last(&mut self) -> Option<T> {
        self.past.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_undo_redo_cycle() {
        let mut h = History::new(10);
        h.record(&"s0");
        assert_eq!(h.undo(&"s1"), Some("s0"));
        assert_eq!(h.redo(&"s0"), Some("s1"));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn empty_stacks_are_noops() {
        let mut h: History<u32> = History::new(10);
        assert_eq!(h.undo(&1), None);
        assert_eq!(h.redo(&1), None);
        assert!(!h.can_undo());
    }

    #[test]
    fn new_record_clears_future() {
        let mut h = History::new(10);
        h.record(&0);
        h.undo(&1);
        assert!(h.can_redo());
        h.record(&0);
        assert!(!h.can_redo());
        assert_eq!(h.redo(&5), None);
    }

    #[test]
    fn depth_limit_drops_oldest() {
        let mut h = History::new(3);
        for i in 0..5 {
            h.record(&i);
        }
        assert_eq!(h.undo_depth(), 3);
        assert_eq!(h.undo(&5), Some(4));
        assert_eq!(h.undo(&4), Some(3));
        assert_eq!(h.undo(&3), Some(2));
        assert_eq!(h.undo(&2), None);
    }
}
