//! # Body
//!
//! Ordered list of blocks; order is presentation order.
//!
//! ## Append
//!
//! ```text
//! 1. next id = max id of that kind + 1      (counters are derived, never cached;
//!                                            fails if the max is u32::MAX)
//! 2. last block abandoned?  → remove it      (empty, or text with only a color)
//! 3. insert the new block at the end
//! 4. open the overlay on it, unless it is a divider
//! ```
//!
//! The trim only looks at the last block, so a body never gains two
//! consecutive abandoned blocks through appends. Abandoned blocks elsewhere
//! in the body are left alone.
//!
//! An append either applies completely or leaves the body untouched.

use crate::block::{Block, BlockKind, BlockPayload};
use crate::counters::next_id;
use crate::edits::{BodyEdit, EditError};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    blocks: Vec<Block>,
}

/// Edits that perform an append, computed without touching the body
#[derive(Debug, Clone, PartialEq)]
pub struct AppendPlan {
    pub edits: Vec<BodyEdit>,
    /// Index of the new block once the edits are applied
    pub index: usize,
    pub key: String,
    pub opens_overlay: bool,
}

/// Result of [`Body::append`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
    pub index: usize,
    pub key: String,
    pub opens_overlay: bool,
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a body, rejecting duplicate keys
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, EditError> {
        let mut seen = HashSet::new();
        for block in &blocks {
            if !seen.insert(block.key()) {
                return Err(EditError::DuplicateKey(block.key()));
            }
        }
        Ok(Self { blocks })
    }

    /// Caller guarantees keys are unique
    pub(crate) fn from_blocks_unchecked(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn position_of(&self, kind: BlockKind, id: u32) -> Option<usize> {
        self.blocks
            .iter()
            .position(|block| block.kind() == kind && block.id == id)
    }

    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|block| block.key() == key)
    }

    pub fn find_key(&self, key: &str) -> Option<&Block> {
        self.position_of_key(key).map(|index| &self.blocks[index])
    }

    /// Compute the edits for appending a block of `kind`
    pub fn plan_append(&self, kind: BlockKind) -> Result<AppendPlan, EditError> {
        let id = next_id(&self.blocks, kind).ok_or(EditError::IdsExhausted(kind))?;
        let block = Block::new(id, BlockPayload::empty(kind));
        let key = block.key();

        let mut edits = Vec::with_capacity(2);
        let mut len = self.blocks.len();

        if self.blocks.last().is_some_and(Block::is_abandoned) {
            len -= 1;
            edits.push(BodyEdit::Remove { index: len });
        }

        edits.push(BodyEdit::Insert { index: len, block });

        Ok(AppendPlan {
            edits,
            index: len,
            key,
            opens_overlay: kind != BlockKind::Divider,
        })
    }

    /// Append a fresh block of `kind`, trimming an abandoned trailing block first
    pub fn append(&mut self, kind: BlockKind) -> Result<Appended, EditError> {
        let plan = self.plan_append(kind)?;

        let mut inverses = Vec::with_capacity(plan.edits.len());
        for edit in &plan.edits {
            let applied = edit
                .to_inverse(self)
                .and_then(|inverse| edit.apply(self).map(|_| inverse));

            match applied {
                Ok(inverse) => inverses.push(inverse),
                Err(err) => {
                    for inverse in inverses.iter().rev() {
                        inverse.apply(self)?;
                    }
                    return Err(err);
                }
            }
        }

        Ok(Appended {
            index: plan.index,
            key: plan.key,
            opens_overlay: plan.opens_overlay,
        })
    }

    /// Replace the block at `index`, keeping its key
    pub fn update(&mut self, index: usize, payload: BlockPayload) -> Result<(), EditError> {
        let id = self
            .get(index)
            .map(|block| block.id)
            .ok_or(EditError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;

        BodyEdit::Update {
            index,
            block: Block::new(id, payload),
        }
        .apply(self)
    }

    pub fn remove(&mut self, index: usize) -> Result<Block, EditError> {
        let block = self
            .get(index)
            .cloned()
            .ok_or(EditError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        BodyEdit::Remove { index }.apply(self)?;
        Ok(block)
    }
}

impl<'a> IntoIterator for &'a Body {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HexColor;

    fn keys(body: &Body) -> Vec<String> {
        body.iter().map(Block::key).collect()
    }

    #[test]
    fn test_append_to_empty_body() {
        let mut body = Body::new();
        let appended = body.append(BlockKind::Header).unwrap();

        assert_eq!(appended.index, 0);
        assert_eq!(appended.key, "header1");
        assert!(appended.opens_overlay);
    }

    #[test]
    fn test_append_trims_abandoned_trailing_block() {
        let mut body = Body::new();
        body.append(BlockKind::Text).unwrap();
        body.append(BlockKind::Text).unwrap();

        // The empty text1 was dropped when text2 arrived.
        assert_eq!(keys(&body), vec!["text2"]);
    }

    #[test]
    fn test_color_only_text_is_trimmed() {
        let mut body = Body::from_blocks(vec![
            Block::new(1, BlockPayload::text("kept", None)),
            Block::new(2, BlockPayload::text("", Some(HexColor::parse("#112233").unwrap()))),
        ])
        .unwrap();

        let appended = body.append(BlockKind::Quote).unwrap();

        assert_eq!(body.len(), 2);
        assert_eq!(appended.index, 1);
        assert_eq!(keys(&body), vec!["text1", "quote1"]);
    }

    #[test]
    fn test_divider_value_and_overlay() {
        let mut body = Body::new();
        body.append(BlockKind::Text).unwrap();
        let appended = body.append(BlockKind::Divider).unwrap();

        assert!(!appended.opens_overlay);
        assert_eq!(keys(&body), vec!["divider1"]);
        assert_eq!(body.get(0).unwrap().payload, BlockPayload::Divider);
    }

    #[test]
    fn test_divider_is_never_trimmed() {
        let mut body = Body::new();
        body.append(BlockKind::Divider).unwrap();
        body.append(BlockKind::Divider).unwrap();

        assert_eq!(keys(&body), vec!["divider1", "divider2"]);
    }

    #[test]
    fn test_update_keeps_key() {
        let mut body = Body::new();
        body.append(BlockKind::Quote).unwrap();
        body.update(0, BlockPayload::Quote { text: "q".to_string() }).unwrap();

        assert_eq!(body.find_key("quote1").unwrap().payload, BlockPayload::Quote { text: "q".to_string() });
    }

    #[test]
    fn test_append_at_id_ceiling_leaves_body_untouched() {
        let mut body = Body::from_blocks(vec![
            Block::new(u32::MAX, BlockPayload::text("x", None)),
            Block::new(1, BlockPayload::empty(BlockKind::Header)),
        ])
        .unwrap();
        let original = body.clone();

        assert_eq!(
            body.append(BlockKind::Text),
            Err(EditError::IdsExhausted(BlockKind::Text))
        );
        assert_eq!(body, original);

        // Other kinds still have room; the abandoned header is trimmed as usual.
        body.append(BlockKind::Quote).unwrap();
        assert_eq!(keys(&body), vec!["text4294967295", "quote1"]);
    }

    #[test]
    fn test_from_blocks_rejects_duplicates() {
        let result = Body::from_blocks(vec![
            Block::new(1, BlockPayload::Divider),
            Block::new(1, BlockPayload::Divider),
        ]);
        assert_eq!(result, Err(EditError::DuplicateKey("divider1".to_string())));
    }
}
