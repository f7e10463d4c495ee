//! Bounded undo/redo history over full-state snapshots.
//!
//! Linear history: recording a new snapshot invalidates any redo path.
//! Both stacks are capped; eviction silently drops the oldest entries.
//! Replaying history never re-enters the recording path because the
//! store's mutation methods are the only callers of [`History::record`].

use crate::types::Snapshot;
use std::collections::VecDeque;

/// Maximum depth of each of the past and future stacks.
pub const HISTORY_CAP: usize = 15;

/// Undo/redo stacks of owned snapshots.
#[derive(Debug, Default)]
pub struct History {
    /// Older to newer.
    past: VecDeque<Snapshot>,
    /// Newer to older, counted from the undo point.
    future: VecDeque<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record pre-mutation state. Clears the redo path.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.past.push_back(snapshot);
        if self.past.len() > HISTORY_CAP {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Step back one snapshot, exchanging `current` onto the redo
    /// stack. Returns the state to restore, or `None` when there is
    /// nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push_front(current);
        self.future.truncate(HISTORY_CAP);
        Some(previous)
    }

    /// Step forward one snapshot, symmetric to [`History::undo`].
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop_front()?;
        self.past.push_back(current);
        if self.past.len() > HISTORY_CAP {
            self.past.pop_front();
        }
        Some(next)
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

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
