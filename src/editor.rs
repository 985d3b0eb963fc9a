//! Editing sessions.
//!
//! An [`EditSession`] is the single writer of a live [`CanvasDocument`].
//! Every mutation goes through [`EditSession::apply`], which snapshots the
//! document first so it can be undone. A failed mutation leaves both the
//! document and the history untouched.

use std::collections::VecDeque;

use crate::document::CanvasDocument;
use crate::error::Result;

/// Maximum number of undo snapshots kept.
pub const HISTORY_DEPTH: usize = 100;

/// A live document plus its undo/redo history.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    document: CanvasDocument,
    undo: VecDeque<CanvasDocument>,
    redo: Vec<CanvasDocument>,
}

impl EditSession {
    pub fn new(document: CanvasDocument) -> Self {
        Self {
            document,
            undo: VecDeque::new(),
            redo: Vec::new(),
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn into_document(self) -> CanvasDocument {
        self.document
    }

    /// Run a mutation against the document.
    ///
    /// On success the previous state is pushed onto the undo stack and the
    /// redo stack is cleared. On error the document is restored.
    pub fn apply<T, F>(&mut self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut CanvasDocument) -> Result<T>,
    {
        let snapshot = self.document.clone();
        match edit(&mut self.document) {
            Ok(out) => {
                if self.undo.len() == HISTORY_DEPTH {
                    self.undo.pop_front();
                }
                self.undo.push_back(snapshot);
                self.redo.clear();
                Ok(out)
            }
            Err(e) => {
                self.document = snapshot;
                Err(e)
            }
        }
    }

    /// Revert the last applied edit. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo.pop_back() {
            Some(prev) => {
                let current = std::mem::replace(&mut self.document, prev);
                self.redo.push(current);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.redo.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.document, next);
                self.undo.push_back(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
