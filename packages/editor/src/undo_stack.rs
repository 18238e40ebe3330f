//! # Undo/Redo Stack
//!
//! Tracks body edit history and enables undo/redo.
//!
//! ## Design
//!
//! - Each edit records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original edits
//! - New edits clear the redo stack
//! - Batches group several edits into one undo step (an append is a
//!   trailing trim plus an insert)

use crate::body::Body;
use crate::edits::{BodyEdit, EditError};

/// A group of edits that are undone/redone together
#[derive(Debug, Clone)]
pub struct EditBatch {
    /// The edits in application order
    pub edits: Vec<BodyEdit>,

    /// The inverse edits, in the order they must be applied to undo
    pub inverses: Vec<BodyEdit>,

    pub description: Option<String>,
}

impl EditBatch {
    fn empty() -> Self {
        Self {
            edits: Vec::new(),
            inverses: Vec::new(),
            description: None,
        }
    }
}

#[derive(Debug)]
pub struct UndoStack {
    undo_stack: Vec<EditBatch>,
    redo_stack: Vec<EditBatch>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    current_batch: Option<EditBatch>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Apply an edit and record it for undo
    pub fn apply(&mut self, edit: &BodyEdit, body: &mut Body) -> Result<(), EditError> {
        let inverse = edit.to_inverse(body)?;
        edit.apply(body)?;

        if let Some(batch) = &mut self.current_batch {
            batch.edits.push(edit.clone());
            batch.inverses.insert(0, inverse);
        } else {
            self.push_batch(EditBatch {
                edits: vec![edit.clone()],
                inverses: vec![inverse],
                description: None,
            });
        }

        Ok(())
    }

    /// Apply several edits as a single undo step.
    ///
    /// If one fails, the ones already applied are rolled back.
    pub fn apply_batch(
        &mut self,
        edits: &[BodyEdit],
        description: impl Into<String>,
        body: &mut Body,
    ) -> Result<(), EditError> {
        let mut batch = EditBatch::empty();
        batch.description = Some(description.into());

        for edit in edits {
            let applied = edit
                .to_inverse(body)
                .and_then(|inverse| edit.apply(body).map(|_| inverse));

            match applied {
                Ok(inverse) => {
                    batch.edits.push(edit.clone());
                    batch.inverses.insert(0, inverse);
                }
                Err(err) => {
                    for inverse in &batch.inverses {
                        inverse.apply(body)?;
                    }
                    return Err(err);
                }
            }
        }

        if !batch.edits.is_empty() {
            self.push_batch(batch);
        }
        Ok(())
    }

    /// Apply `edit` and fold it into the most recent batch in place of that
    /// batch's final edit, keeping the original inverse.
    ///
    /// Returns `false` without applying when there is no history.
    pub fn amend_last(&mut self, edit: BodyEdit, body: &mut Body) -> Result<bool, EditError> {
        let Some(batch) = self.undo_stack.last_mut() else {
            return Ok(false);
        };

        edit.apply(body)?;
        match batch.edits.last_mut() {
            Some(last) => *last = edit,
            None => batch.edits.push(edit),
        }
        self.redo_stack.clear();

        Ok(true)
    }

    /// Start a batch of edits (undone/redone together)
    pub fn begin_batch(&mut self) {
        self.current_batch = Some(EditBatch::empty());
    }

    /// End the current batch and push it to the undo stack
    pub fn end_batch(&mut self) {
        if let Some(batch) = self.current_batch.take() {
            if !batch.edits.is_empty() {
                self.push_batch(batch);
            }
        }
    }

    pub fn set_batch_description(&mut self, description: impl Into<String>) {
        if let Some(batch) = &mut self.current_batch {
            batch.description = Some(description.into());
        }
    }

    fn push_batch(&mut self, batch: EditBatch) {
        self.undo_stack.push(batch);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        self.redo_stack.clear();
    }

    /// Undo the most recent batch; returns the batch that was undone
    pub fn undo(&mut self, body: &mut Body) -> Result<Option<&EditBatch>, EditError> {
        let Some(batch) = self.undo_stack.pop() else {
            return Ok(None);
        };

        let result = batch
            .inverses
            .iter()
            .try_for_each(|inverse| inverse.apply(body));
        if let Err(err) = result {
            self.undo_stack.push(batch);
            return Err(err);
        }

        self.redo_stack.push(batch);
        Ok(self.redo_stack.last())
    }

    /// Redo the most recently undone batch; returns the batch that was redone
    pub fn redo(&mut self, body: &mut Body) -> Result<Option<&EditBatch>, EditError> {
        let Some(batch) = self.redo_stack.pop() else {
            return Ok(None);
        };

        let result = batch.edits.iter().try_for_each(|edit| edit.apply(body));
        if let Err(err) = result {
            self.redo_stack.push(batch);
            return Err(err);
        }

        self.undo_stack.push(batch);
        Ok(self.undo_stack.last())
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|batch| batch.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
