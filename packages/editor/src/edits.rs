//! # Body Edits
//!
//! Primitive, validated operations on a [`Body`]. Higher level actions
//! (appending a block, typing into the overlay) are expressed as one or more
//! edits so they can be recorded and undone.
//!
//! ## Edit Semantics
//!
//! ### Insert
//! - Index may equal the body length (append)
//! - Fails if the block's key is already present
//!
//! ### Update
//! - Whole-block replacement, never a partial merge
//! - The key at the index must not change
//!
//! ### Remove / Move
//! - Index based; `Move` removes then reinserts at the target index

use crate::block::{Block, BlockKind};
use crate::body::Body;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BodyEdit {
    Insert { index: usize, block: Block },
    Update { index: usize, block: Block },
    Remove { index: usize },
    Move { from: usize, to: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Index {index} out of range for body of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Block key changed from {expected} to {found}")]
    KeyMismatch { expected: String, found: String },

    #[error("Duplicate block key: {0}")]
    DuplicateKey(String),

    #[error("No ids left for {0} blocks")]
    IdsExhausted(BlockKind),
}

impl BodyEdit {
    /// Validate without applying
    pub fn validate(&self, body: &Body) -> Result<(), EditError> {
        match self {
            BodyEdit::Insert { index, block } => {
                check_index(*index, body.len() + 1, body.len())?;
                if body.position_of_key(&block.key()).is_some() {
                    return Err(EditError::DuplicateKey(block.key()));
                }
                Ok(())
            }

            BodyEdit::Update { index, block } => {
                let existing = body.get(*index).ok_or(EditError::IndexOutOfRange {
                    index: *index,
                    len: body.len(),
                })?;
                if existing.key() != block.key() {
                    return Err(EditError::KeyMismatch {
                        expected: existing.key(),
                        found: block.key(),
                    });
                }
                Ok(())
            }

            BodyEdit::Remove { index } => check_index(*index, body.len(), body.len()),

            BodyEdit::Move { from, to } => {
                check_index(*from, body.len(), body.len())?;
                check_index(*to, body.len(), body.len())
            }
        }
    }

    /// Apply edit to body with validation
    pub fn apply(&self, body: &mut Body) -> Result<(), EditError> {
        self.validate(body)?;

        let blocks = body.blocks_mut();
        match self {
            BodyEdit::Insert { index, block } => blocks.insert(*index, block.clone()),
            BodyEdit::Update { index, block } => blocks[*index] = block.clone(),
            BodyEdit::Remove { index } => {
                blocks.remove(*index);
            }
            BodyEdit::Move { from, to } => {
                let block = blocks.remove(*from);
                blocks.insert(*to, block);
            }
        }

        Ok(())
    }

    /// Create the edit that reverts this one.
    ///
    /// Must be called before [`BodyEdit::apply`], against the same body.
    pub fn to_inverse(&self, body: &Body) -> Result<BodyEdit, EditError> {
        self.validate(body)?;

        Ok(match self {
            BodyEdit::Insert { index, .. } => BodyEdit::Remove { index: *index },
            BodyEdit::Update { index, .. } => BodyEdit::Update {
                index: *index,
                block: body.blocks()[*index].clone(),
            },
            BodyEdit::Remove { index } => BodyEdit::Insert {
                index: *index,
                block: body.blocks()[*index].clone(),
            },
            BodyEdit::Move { from, to } => BodyEdit::Move {
                from: *to,
                to: *from,
            },
        })
    }
}

fn check_index(index: usize, bound: usize, len: usize) -> Result<(), EditError> {
    if index < bound {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { index, len })
    }
}
