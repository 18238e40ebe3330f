//! Error types for the editor

use crate::block::BlockKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Edit error: {0}")]
    Edit(#[from] crate::edits::EditError),

    #[error("{kind} blocks are not enabled for {policy}")]
    KindDisabled { kind: BlockKind, policy: &'static str },

    #[error("No block is open for editing")]
    OverlayClosed,

    #[error("Block {0} has no editable content")]
    NotEditable(String),

    #[error("Cannot write {found} content into block {key}")]
    KindMismatch { key: String, found: BlockKind },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
