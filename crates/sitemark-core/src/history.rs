//! Snapshot-based undo/redo history.
//!
//! Each entry is a full copy of the markup collection, so restoring a
//! snapshot reproduces the exact prior state. Both stacks are bounded
//! ring buffers; pushing onto a full stack evicts its oldest entry.

use crate::markup::MarkupObject;
use std::collections::VecDeque;

/// Default maximum number of snapshots per stack.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// A full copy of the markup collection.
pub type Snapshot = Vec<MarkupObject>;

/// Fixed-capacity stack that drops its oldest entry on overflow.
#[derive(Debug, Clone)]
struct BoundedStack {
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl BoundedStack {
    fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_DEPTH)),
            capacity,
        }
    }

    fn push(&mut self, snapshot: Snapshot) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Undo/redo stacks for one editing session.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: BoundedStack,
    redo_stack: BoundedStack,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    /// Create a history keeping at most `depth` snapshots per stack.
    pub fn new(depth: usize) -> Self {
        Self {
            undo_stack: BoundedStack::new(depth),
            redo_stack: BoundedStack::new(depth),
        }
    }

    /// Push the pre-mutation state (call before making changes).
    pub fn record(&mut self, current: &[MarkupObject]) {
        self.undo_stack.push(current.to_vec());
        self.redo_stack.clear();
    }

    /// Step back. Returns the snapshot to install, or None if nothing to undo.
    pub fn undo(&mut self, current: &[MarkupObject]) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop()?;
        self.redo_stack.push(current.to_vec());
        Some(snapshot)
    }

    /// Step forward. Returns the snapshot to install, or None if nothing to redo.
    pub fn redo(&mut self, current: &[MarkupObject]) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop()?;
        self.undo_stack.push(current.to_vec());
        Some(snapshot)
    }

    /// Drop all history (e.g. after opening a document).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Maximum snapshots kept per stack.
    pub fn capacity(&self) -> usize {
        self.undo_stack.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{MarkupBox, MarkupColor, MarkupShape};
    use kurbo::Rect;

    fn object(x: f64) -> MarkupObject {
        MarkupBox::new(Rect::new(x, 0.0, x + 10.0, 10.0), MarkupShape::Square, MarkupColor::Red).into()
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::default();
        let s1 = vec![object(0.0)];
        let mut s2 = s1.clone();
        history.record(&s1);
        s2.push(object(20.0));

        let undone = history.undo(&s2).unwrap();
        assert_eq!(undone, s1);
        let redone = history.redo(&undone).unwrap();
        assert_eq!(redone, s2);
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::default();
        assert!(!history.can_undo());
        assert!(history.undo(&[]).is_none());
        assert!(!history.can_redo());
        assert!(history.redo(&[]).is_none());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::default();
        history.record(&[]);
        let _ = history.undo(&[object(0.0)]);
        assert!(history.can_redo());
        history.record(&[]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_oldest_snapshot_evicted() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(&[object(f64::from(i))]);
        }
        assert_eq!(history.undo_depth(), 3);

        // The remaining snapshots are the three most recent, newest first.
        let mut current = vec![];
        let mut origins = vec![];
        while let Some(snapshot) = history.undo(&current) {
            origins.push(snapshot[0].origin().x);
            current = snapshot;
        }
        assert_eq!(origins, vec![4.0, 3.0, 2.0]);
    }

    #[test]
    fn test_redo_stack_bounded() {
        let mut history = History::new(2);
        for _ in 0..4 {
            history.record(&[]);
        }
        while history.undo(&[]).is_some() {}
        assert_eq!(history.redo_depth(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = History::new(0);
        history.record(&[object(0.0)]);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.record(&[]);
        history.record(&[]);
        let _ = history.undo(&[]);
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
