use std::collections::{BTreeSet, VecDeque};

/// Seeds currently hidden.
pub type HiddenSet = BTreeSet<usize>;

/// Maximum number of snapshots kept on either stack.
pub const HISTORY_LIMIT: usize = 50;

/// Undo/redo stacks of [`HiddenSet`] snapshots.
///
/// The undo stack always holds at least one entry, the current state; it starts as the
/// empty set. Both stacks drop their oldest entry once they exceed the limit.
#[derive(Clone, Debug)]
pub struct History {
    undo: VecDeque<HiddenSet>,
    redo: VecDeque<HiddenSet>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        let mut undo = VecDeque::new();
        undo.push_back(HiddenSet::new());
        Self {
            undo,
            redo: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// The snapshot on top of the undo stack.
    pub fn current(&self) -> &HiddenSet {
        // The undo stack is never empty.
        &self.undo[self.undo.len() - 1]
    }

    /// Records a new state. Returns `false` (and changes nothing) when it equals the
    /// current state; otherwise the redo stack is discarded.
    pub fn push(&mut self, state: HiddenSet) -> bool {
        if *self.current() == state {
            return false;
        }
        push_capped(&mut self.undo, state, self.limit);
        self.redo.clear();
        true
    }

    /// Steps back one snapshot and returns the state to apply.
    pub fn undo(&mut self) -> Option<&HiddenSet> {
        if self.undo.len() <= 1 {
            return None;
        }
        let state = self.undo.pop_back()?;
        push_capped(&mut self.redo, state, self.limit);
        Some(self.current())
    }

    /// Re-applies the most recently undone snapshot and returns it.
    pub fn redo(&mut self) -> Option<&HiddenSet> {
        let state = self.redo.pop_back()?;
        push_capped(&mut self.undo, state, self.limit);
        Some(self.current())
    }

    /// Forgets everything and starts over from the empty set.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.undo.push_back(HiddenSet::new());
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }
}

fn push_capped(stack: &mut VecDeque<HiddenSet>, state: HiddenSet, limit: usize) {
    stack.push_back(state);
    while stack.len() > limit {
        stack.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[usize]) -> HiddenSet {
        items.iter().copied().collect()
    }

    #[test]
    fn test_starts_empty() {
        let h = History::default();
        assert!(h.current().is_empty());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_push_ignores_equal_state() {
        let mut h = History::default();
        assert!(h.push(set(&[3, 1])));
        assert!(!h.push(set(&[1, 3])));
        assert_eq!(h.undo_len(), 2);
    }

    #[test]
    fn test_undo_redo_round() {
        let mut h = History::default();
        h.push(set(&[1]));
        h.push(set(&[1, 2]));

        assert_eq!(h.undo(), Some(&set(&[1])));
        assert_eq!(h.undo(), Some(&set(&[])));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(&set(&[1])));
        assert_eq!(h.redo(), Some(&set(&[1, 2])));
        assert_eq!(h.redo(), None);
    }

    #[test]
    fn test_push_discards_redo() {
        let mut h = History::default();
        h.push(set(&[1]));
        h.undo();
        assert!(h.can_redo());
        h.push(set(&[4]));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_stacks_are_capped() {
        let mut h = History::new(3);
        for i in 1..=5 {
            h.push(set(&[i]));
        }
        assert_eq!(h.undo_len(), 3);
        assert_eq!(h.current(), &set(&[5]));

        // The empty initial state has been dropped, so only two undos remain.
        assert_eq!(h.undo(), Some(&set(&[4])));
        assert_eq!(h.undo(), Some(&set(&[3])));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo_len(), 2);
    }

    #[test]
    fn test_reset() {
        let mut h = History::default();
        h.push(set(&[1]));
        h.push(set(&[2]));
        h.undo();
        h.reset();
        assert!(h.current().is_empty());
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }
}
