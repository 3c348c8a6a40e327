// Copyright 2025 the Yard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear undo/redo over whole-state snapshots.

use std::collections::VecDeque;

use crate::error::YardError;

/// Undo and redo stacks of snapshots.
///
/// [`push`](Self::push) records the state *before* a mutation and clears the
/// redo stack. [`undo`](Self::undo) and [`redo`](Self::redo) trade the
/// caller's current state for the stored one. When more than `limit` undo
/// entries accumulate, the oldest is dropped.
#[derive(Clone, Debug)]
pub struct History<S> {
    undo: VecDeque<S>,
    redo: Vec<S>,
    limit: usize,
}

impl<S> History<S> {
    /// Empty history keeping at most `limit` undo entries (at least one).
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state preceding a mutation.
    pub fn push(&mut self, before: S) {
        self.redo.clear();
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(before);
    }

    /// Step back: store `current` for redo and return the previous state.
    ///
    /// # Errors
    ///
    /// [`YardError::HistoryEmpty`] when nothing was recorded; `current` is
    /// dropped in that case, so callers keep their own copy.
    pub fn undo(&mut self, current: S) -> Result<S, YardError> {
        let previous = self.undo.pop_back().ok_or(YardError::HistoryEmpty)?;
        self.redo.push(current);
        Ok(previous)
    }

    /// Step forward: store `current` for undo and return the undone state.
    ///
    /// # Errors
    ///
    /// [`YardError::HistoryEmpty`] when nothing was undone since the last push.
    pub fn redo(&mut self, current: S) -> Result<S, YardError> {
        let next = self.redo.pop().ok_or(YardError::HistoryEmpty)?;
        self.undo.push_back(current);
        Ok(next)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Whether [`undo`](Self::undo) would succeed.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether [`redo`](Self::redo) would succeed.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undo entries.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redo entries.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Maximum number of undo entries.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
