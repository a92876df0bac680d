//! Snapshot-based undo/redo.

use scene::Layout;
use std::collections::VecDeque;

/// Full layout snapshots taken before each history-worthy mutation.
///
/// Session-local: never persisted, discarded when a new document is loaded.
#[derive(Clone, Debug)]
pub struct History {
    undo_stack: VecDeque<Layout>,
    redo_stack: Vec<Layout>,
    limit: usize,
    /// Redo branch set aside while a checkpoint is open.
    open_checkpoint: Option<Vec<Layout>>,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
            open_checkpoint: None,
        }
    }

    /// Record the state as it was before a mutation. Clears the redo branch
    /// and commits any open checkpoint.
    pub fn push(&mut self, snapshot: Layout) {
        self.open_checkpoint = None;
        self.push_snapshot(snapshot);
        self.redo_stack.clear();
    }

    fn push_snapshot(&mut self, snapshot: Layout) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Open a checkpoint: push `snapshot` and set the redo branch aside so a
    /// rollback can bring it back.
    pub fn push_checkpoint(&mut self, snapshot: Layout) {
        let redo = std::mem::take(&mut self.redo_stack);
        self.push_snapshot(snapshot);
        self.open_checkpoint = Some(redo);
    }

    /// Keep the open checkpoint as an ordinary undo entry.
    pub fn commit_checkpoint(&mut self) {
        self.open_checkpoint = None;
    }

    /// Drop the open checkpoint and return its snapshot, restoring the redo
    /// branch. `None` when no checkpoint is open, including when another
    /// mutation has been recorded since it was taken.
    pub fn rollback_checkpoint(&mut self) -> Option<Layout> {
        let redo = self.open_checkpoint.take()?;
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack = redo;
        Some(snapshot)
    }

    /// Step back. `current` becomes redoable; returns the state to restore.
    pub fn undo(&mut self, current: Layout) -> Option<Layout> {
        self.open_checkpoint = None;
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward. `current` becomes undoable; returns the state to restore.
    pub fn redo(&mut self, current: Layout) -> Option<Layout> {
        self.open_checkpoint = None;
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current);
        Some(next)
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

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_checkpoint = None;
    }
}
