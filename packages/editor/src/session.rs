//! # Edit Session
//!
//! One editing surface over a body: the body itself, the overlay that marks
//! which block is being edited, and the undo history.
//!
//! ## Overlay
//!
//! ```text
//!            add_block / set_active
//!   Closed ──────────────────────────▶ Open { index, key }
//!     ▲                                   │  on_change(payload)
//!     │             close()               │  writes the whole block
//!     └───────────────────────────────────┘
//! ```
//!
//! Writes land in the body immediately; closing never reverts them. When a
//! structural change moves the open block the overlay follows its key, and
//! when the block disappears the overlay closes.

use crate::block::{Block, BlockKind, BlockPayload};
use crate::body::Body;
use crate::edits::BodyEdit;
use crate::policy::BodyPolicy;
use crate::undo_stack::UndoStack;
use crate::EditorError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Closed,
    Open { index: usize, key: String },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        matches!(self, Overlay::Open { .. })
    }
}

pub struct EditSession {
    body: Body,
    policy: BodyPolicy,
    overlay: Overlay,
    history: UndoStack,

    /// Index of the block the last `on_change` wrote, while nothing else happened since
    typing_at: Option<usize>,
}

impl EditSession {
    pub fn new(body: Body, policy: BodyPolicy) -> Self {
        Self {
            body,
            policy,
            overlay: Overlay::Closed,
            history: UndoStack::new(),
            typing_at: None,
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn into_body(self) -> Body {
        self.body
    }

    pub fn policy(&self) -> &BodyPolicy {
        &self.policy
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    /// Swap in a body from elsewhere (e.g. a backend response).
    ///
    /// History is dropped since it no longer describes this body.
    pub fn replace_body(&mut self, body: Body) {
        self.body = body;
        self.history.clear();
        self.typing_at = None;
        self.follow_overlay();
    }

    /// Append a block of `kind`; returns the index the overlay opened on
    pub fn add_block(&mut self, kind: BlockKind) -> Result<Option<usize>, EditorError> {
        if !self.policy.allows(kind) {
            return Err(EditorError::KindDisabled {
                kind,
                policy: self.policy.name,
            });
        }

        let plan = self.body.plan_append(kind)?;
        self.history
            .apply_batch(&plan.edits, format!("Add {}", kind), &mut self.body)?;
        self.typing_at = None;

        tracing::debug!(key = %plan.key, index = plan.index, "appended block");

        if plan.opens_overlay {
            self.overlay = Overlay::Open {
                index: plan.index,
                key: plan.key,
            };
            Ok(Some(plan.index))
        } else {
            self.follow_overlay();
            Ok(None)
        }
    }

    /// Open the overlay on an existing block
    pub fn set_active(&mut self, index: usize) -> Result<(), EditorError> {
        let block = self.body.get(index).ok_or(crate::EditError::IndexOutOfRange {
            index,
            len: self.body.len(),
        })?;

        if block.kind() == BlockKind::Divider {
            return Err(EditorError::NotEditable(block.key()));
        }

        self.overlay = Overlay::Open {
            index,
            key: block.key(),
        };
        self.typing_at = None;
        Ok(())
    }

    /// Write the open block's new content
    pub fn on_change(&mut self, payload: BlockPayload) -> Result<(), EditorError> {
        let Overlay::Open { index, key } = &self.overlay else {
            return Err(EditorError::OverlayClosed);
        };
        let index = *index;

        let current = self
            .body
            .get(index)
            .ok_or(EditorError::OverlayClosed)?;
        if current.kind() != payload.kind() {
            return Err(EditorError::KindMismatch {
                key: key.clone(),
                found: payload.kind(),
            });
        }

        let edit = BodyEdit::Update {
            index,
            block: Block::new(current.id, payload),
        };

        // Consecutive writes to one block are a single undo step.
        let amended = self.typing_at == Some(index) && self.history.amend_last(edit.clone(), &mut self.body)?;
        if !amended {
            self.history.apply(&edit, &mut self.body)?;
        }
        self.typing_at = Some(index);

        Ok(())
    }

    pub fn close(&mut self) {
        self.overlay = Overlay::Closed;
        self.typing_at = None;
    }

    pub fn remove_block(&mut self, index: usize) -> Result<(), EditorError> {
        self.history.apply(&BodyEdit::Remove { index }, &mut self.body)?;
        self.typing_at = None;
        self.follow_overlay();
        Ok(())
    }

    pub fn move_block(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.history.apply(&BodyEdit::Move { from, to }, &mut self.body)?;
        self.typing_at = None;
        self.follow_overlay();
        Ok(())
    }

    /// Returns whether anything was undone
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        let undone = self.history.undo(&mut self.body)?.is_some();
        self.typing_at = None;
        self.follow_overlay();
        Ok(undone)
    }

    /// Returns whether anything was redone
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        let redone = self.history.redo(&mut self.body)?.is_some();
        self.typing_at = None;
        self.follow_overlay();
        Ok(redone)
    }

    /// Placeholder text for the open block
    pub fn placeholder(&self) -> Option<&'static str> {
        match &self.overlay {
            Overlay::Open { index, .. } => self
                .body
                .get(*index)
                .and_then(|block| self.policy.placeholder(block.kind())),
            Overlay::Closed => None,
        }
    }

    /// Re-point the overlay at its key after the body changed shape
    fn follow_overlay(&mut self) {
        let Overlay::Open { index, key } = &self.overlay else {
            return;
        };

        if self.body.get(*index).is_some_and(|block| &block.key() == key) {
            return;
        }

        match self.body.position_of_key(key) {
            Some(new_index) => {
                self.overlay = Overlay::Open {
                    index: new_index,
                    key: key.clone(),
                }
            }
            None => self.overlay = Overlay::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HexColor;

    fn article() -> EditSession {
        EditSession::new(Body::new(), BodyPolicy::article())
    }

    #[test]
    fn test_session_creation() {
        let session = article();
        assert_eq!(session.overlay(), &Overlay::Closed);
        assert!(session.body().is_empty());
        assert_eq!(session.placeholder(), None);
    }

    #[test]
    fn test_add_block_opens_overlay() {
        let mut session = article();
        let index = session.add_block(BlockKind::Header).unwrap();

        assert_eq!(index, Some(0));
        assert_eq!(
            session.overlay(),
            &Overlay::Open {
                index: 0,
                key: "header1".to_string()
            }
        );
        assert_eq!(session.placeholder(), Some("Section heading"));
    }

    #[test]
    fn test_divider_does_not_open_overlay() {
        let mut session = article();
        assert_eq!(session.add_block(BlockKind::Divider).unwrap(), None);
        assert!(!session.overlay().is_open());
        assert!(matches!(
            session.set_active(0),
            Err(EditorError::NotEditable(_))
        ));
    }

    #[test]
    fn test_policy_rejects_disabled_kind() {
        let mut session = EditSession::new(Body::new(), BodyPolicy::post());
        assert!(matches!(
            session.add_block(BlockKind::Quote),
            Err(EditorError::KindDisabled { kind: BlockKind::Quote, policy: "post" })
        ));
    }

    #[test]
    fn test_on_change_writes_immediately_and_close_keeps_it() {
        let mut session = article();
        session.add_block(BlockKind::Text).unwrap();

        let color = HexColor::parse("#112233").unwrap();
        session
            .on_change(BlockPayload::text("Hello", Some(color.clone())))
            .unwrap();
        session.close();

        assert_eq!(
            session.body().get(0).unwrap().payload,
            BlockPayload::text("Hello", Some(color))
        );
        assert!(matches!(
            session.on_change(BlockPayload::text("late", None)),
            Err(EditorError::OverlayClosed)
        ));
    }

    #[test]
    fn test_on_change_rejects_other_kind() {
        let mut session = article();
        session.add_block(BlockKind::Quote).unwrap();

        let result = session.on_change(BlockPayload::text("x", None));
        assert!(matches!(result, Err(EditorError::KindMismatch { .. })));
    }

    #[test]
    fn test_typing_is_one_undo_step() {
        let mut session = article();
        session.add_block(BlockKind::Text).unwrap();
        session.on_change(BlockPayload::text("H", None)).unwrap();
        session.on_change(BlockPayload::text("He", None)).unwrap();
        session.on_change(BlockPayload::text("Hey", None)).unwrap();

        assert_eq!(session.history().undo_levels(), 2);

        session.undo().unwrap();
        assert_eq!(session.body().get(0).unwrap().payload, BlockPayload::text("", None));

        session.redo().unwrap();
        assert_eq!(session.body().get(0).unwrap().payload, BlockPayload::text("Hey", None));
    }

    #[test]
    fn test_overlay_follows_moved_block() {
        let mut session = article();
        session.add_block(BlockKind::Header).unwrap();
        session.on_change(BlockPayload::Header { text: "Top".to_string() }).unwrap();
        session.add_block(BlockKind::Text).unwrap();
        session.on_change(BlockPayload::text("Body", None)).unwrap();

        session.move_block(1, 0).unwrap();
        assert_eq!(
            session.overlay(),
            &Overlay::Open {
                index: 0,
                key: "text1".to_string()
            }
        );

        session.remove_block(0).unwrap();
        assert_eq!(session.overlay(), &Overlay::Closed);
    }

    #[test]
    fn test_undo_append_closes_overlay() {
        let mut session = article();
        session.add_block(BlockKind::Quote).unwrap();
        assert!(session.undo().unwrap());

        assert!(session.body().is_empty());
        assert_eq!(session.overlay(), &Overlay::Closed);
    }
}
