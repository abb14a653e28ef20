//! Undo/redo history of past image states.
//!
//! Both stacks hold only *past* states; the session keeps the current buffer
//! itself. Buffers are moved between the stacks and the caller, never copied.
//!
//! `record` is the only operation that clears the redo stack.

use std::collections::VecDeque;

use crate::buffer::ImageBuffer;
use crate::error::EditError;

/// Two LIFO stacks of [`ImageBuffer`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct HistoryManager {
    // Front is the oldest entry so a depth limit can evict from it.
    undo_stack: VecDeque<ImageBuffer>,
    redo_stack: Vec<ImageBuffer>,
    limit: Option<usize>,
}

impl HistoryManager {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `limit` undo entries; the oldest is evicted first.
    ///
    /// A limit of zero disables undo entirely.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Push a past state after a successful mutation and clear the redo stack.
    pub fn record(&mut self, buffer: ImageBuffer) {
        self.undo_stack.push_back(buffer);
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
                log::debug!("history limit {} reached, oldest entry evicted", limit);
            }
        }

        if !self.redo_stack.is_empty() {
            log::debug!("redo history cleared ({} entries)", self.redo_stack.len());
            self.redo_stack.clear();
        }
    }

    /// Step back one state.
    ///
    /// On success `current` moves to the redo stack and the previous state is
    /// returned. On failure `current` is handed back untouched along with
    /// [`EditError::NothingToUndo`].
    pub fn undo(&mut self, current: ImageBuffer) -> Result<ImageBuffer, (ImageBuffer, EditError)> {
        match self.undo_stack.pop_back() {
            Some(previous) => {
                self.redo_stack.push(current);
                Ok(previous)
            }
            None => Err((current, EditError::NothingToUndo)),
        }
    }

    /// Step forward one state; mirror image of [`undo`](Self::undo).
    pub fn redo(&mut self, current: ImageBuffer) -> Result<ImageBuffer, (ImageBuffer, EditError)> {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push_back(current);
                Ok(next)
            }
            None => Err((current, EditError::NothingToRedo)),
        }
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

    /// Forget every past state.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
