//! Per-kind id counters.
//!
//! Counters are always derived from the current blocks and never stored on
//! their own, so a new id is `max(existing) + 1` even after deletions.
//! A kind whose highest id is `u32::MAX` has no next id.

use crate::block::{Block, BlockKind};
use crate::codec::parse_key;
use std::collections::BTreeMap;

/// Highest id in use for each block kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterRegistry {
    counters: BTreeMap<BlockKind, u32>,
}

impl CounterRegistry {
    /// Build the registry from typed blocks
    pub fn scan(blocks: &[Block]) -> Self {
        let mut registry = Self::default();
        for block in blocks {
            registry.observe(block.kind(), block.id);
        }
        registry
    }

    /// Build the registry from raw wire keys.
    ///
    /// Keys outside the `{kind}{n}` grammar are ignored.
    pub fn scan_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::default();
        for (kind, id) in keys.into_iter().filter_map(parse_key) {
            registry.observe(kind, id);
        }
        registry
    }

    fn observe(&mut self, kind: BlockKind, id: u32) {
        let current = self.counters.entry(kind).or_insert(0);
        *current = (*current).max(id);
    }

    /// Highest id seen for `kind`, 0 when none
    pub fn get(&self, kind: BlockKind) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    pub fn next_id(&self, kind: BlockKind) -> Option<u32> {
        self.get(kind).checked_add(1)
    }

    pub fn next_key(&self, kind: BlockKind) -> Option<String> {
        self.next_id(kind).map(|id| format!("{}{}", kind, id))
    }
}

/// Next free id for `kind` in `blocks`, `None` once ids run out
pub fn next_id(blocks: &[Block], kind: BlockKind) -> Option<u32> {
    blocks
        .iter()
        .filter(|block| block.kind() == kind)
        .map(|block| block.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}
