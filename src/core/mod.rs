//! Core block model for the writing draft.
//!
//! This module provides the data structures every other layer builds on:
//!
//! - [`Block`] - a titled outline entry in a two-level hierarchy
//! - [`BlockStore`] - id-indexed arena with a stable display order
//! - [`IdAllocator`] - monotonic id source for user-created blocks
//! - [`hierarchy`] - pure invariant predicates over a store

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_segmentation::UnicodeSegmentation;

pub mod hierarchy;

pub type BlockId = u64;

/// Display limit for block titles, in grapheme clusters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Provenance of a block. Does not affect any structural rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Generated,
    Custom,
}

/// A writing block: a short section title plus the summary it stands for.
///
/// Blocks form a two-level hierarchy. A top-level block (`parent == None`)
/// owns an ordered `children` list; a child block carries the owning parent's
/// id and never has children of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub title: String,
    pub summary: String,
    pub source: Source,
    pub parent: Option<BlockId>,
    pub children: Vec<BlockId>,
    pub developed: bool,
}

impl Block {
    pub fn new(
        id: BlockId,
        title: impl Into<String>,
        summary: impl Into<String>,
        source: Source,
    ) -> Self {
        Self {
            id,
            title: clamp_title(&title.into()),
            summary: summary.into(),
            source,
            parent: None,
            children: Vec::new(),
            developed: false,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }
}

/// Truncates a title to [`TITLE_MAX_CHARS`] grapheme clusters, replacing the
/// tail with an ellipsis when it does not fit.
pub fn clamp_title(title: &str) -> String {
    let graphemes: Vec<&str> = title.graphemes(true).collect();
    if graphemes.len() <= TITLE_MAX_CHARS {
        return title.to_string();
    }
    let mut out: String = graphemes[..TITLE_MAX_CHARS - 3].concat();
    out.push_str("...");
    out
}

/// Id source for user-created blocks.
///
/// Custom ids start at [`IdAllocator::CUSTOM_BASE`] and only grow. Externally
/// assigned ids (AI-generated blocks number themselves `max + 1...`) are
/// reported back through [`IdAllocator::reserve`] so the two ranges never
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: BlockId,
}

impl IdAllocator {
    pub const CUSTOM_BASE: BlockId = 1000;

    pub fn new() -> Self {
        Self::seeded(Self::CUSTOM_BASE)
    }

    pub fn seeded(next: BlockId) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> BlockId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Marks `id` as taken; later allocations will be strictly greater.
    pub fn reserve(&mut self, id: BlockId) {
        if id >= self.next {
            self.next = id + 1;
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Id-indexed arena of blocks with a stable insertion order.
///
/// `order` holds every block id, parents and children alike; the top-level
/// display order is the subsequence of ids whose block has no parent. Child
/// display order lives on the owning parent's `children` list, so a child's
/// position in `order` stops mattering once it is attached.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStore {
    blocks: BTreeMap<BlockId, Block>,
    order: Vec<BlockId>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    /// Every block id in display order, children included.
    pub fn ids_in_order(&self) -> &[BlockId] {
        &self.order
    }

    pub fn iter_in_order(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    pub(crate) fn iter_all(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Block at the given position in the full display order.
    pub fn at(&self, index: usize) -> Option<&Block> {
        self.order.get(index).and_then(|id| self.blocks.get(id))
    }

    /// Ids of top-level blocks, in display order. Derived view.
    pub fn top_level(&self) -> Vec<BlockId> {
        self.order
            .iter()
            .copied()
            .filter(|id| {
                self.blocks
                    .get(id)
                    .map(|block| block.is_top_level())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Position of `id` among the top-level blocks, if it is one.
    pub fn top_index(&self, id: BlockId) -> Option<usize> {
        self.top_level().iter().position(|top| *top == id)
    }

    /// Position of `id` in the full display order.
    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.order.iter().position(|entry| *entry == id)
    }

    /// Children of `id` in their display order, resolved to blocks.
    pub fn children_of(&self, id: BlockId) -> Vec<&Block> {
        let Some(parent) = self.blocks.get(&id) else {
            return Vec::new();
        };
        parent
            .children
            .iter()
            .filter_map(|child| self.blocks.get(child))
            .collect()
    }

    /// Appends `block` to the arena. The caller guarantees a unique id and
    /// performs any parent/children wiring itself.
    pub(crate) fn push(&mut self, block: Block) {
        let id = block.id;
        self.blocks.insert(id, block);
        self.order.push(id);
    }

    /// Removes a block from the arena and the display order. Parent/children
    /// links referring to it are the caller's responsibility.
    pub(crate) fn take(&mut self, id: BlockId) -> Option<Block> {
        let block = self.blocks.remove(&id)?;
        self.order.retain(|entry| *entry != id);
        Some(block)
    }

    /// Moves `id` so it sits immediately after `anchor` in the display order.
    pub(crate) fn place_after(&mut self, id: BlockId, anchor: BlockId) {
        if id == anchor || !self.blocks.contains_key(&id) {
            return;
        }
        self.order.retain(|entry| *entry != id);
        let at = match self.order.iter().position(|entry| *entry == anchor) {
            Some(pos) => pos + 1,
            None => self.order.len(),
        };
        self.order.insert(at, id);
    }

    /// Moves `id` so it sits immediately before `anchor`, or at the end when
    /// `anchor` is `None` or missing.
    pub(crate) fn place_before(&mut self, id: BlockId, anchor: Option<BlockId>) {
        if Some(id) == anchor || !self.blocks.contains_key(&id) {
            return;
        }
        self.order.retain(|entry| *entry != id);
        let at = anchor
            .and_then(|a| self.order.iter().position(|entry| *entry == a))
            .unwrap_or(self.order.len());
        self.order.insert(at, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_title_short_passthrough() {
        assert_eq!(clamp_title("Opening greeting"), "Opening greeting");
    }

    #[test]
    fn clamp_title_truncates_with_ellipsis() {
        let long = "x".repeat(80);
        let clamped = clamp_title(&long);
        assert_eq!(clamped.graphemes(true).count(), TITLE_MAX_CHARS);
        assert!(clamped.ends_with("..."));
    }

    #[test]
    fn clamp_title_counts_graphemes_not_bytes() {
        let flags = "🇺🇸".repeat(50);
        assert_eq!(clamp_title(&flags), flags);
    }

    #[test]
    fn allocator_is_monotonic_and_reservable() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 1000);
        assert_eq!(ids.allocate(), 1001);
        ids.reserve(5000);
        assert_eq!(ids.allocate(), 5001);
        ids.reserve(42);
        assert_eq!(ids.allocate(), 5002);
    }

    #[test]
    fn top_level_view_skips_children() {
        let mut store = BlockStore::new();
        let mut a = Block::new(1, "A", "a", Source::Generated);
        a.children.push(2);
        let mut b = Block::new(2, "B", "b", Source::Generated);
        b.parent = Some(1);
        let c = Block::new(3, "C", "c", Source::Custom);
        store.push(a);
        store.push(b);
        store.push(c);

        assert_eq!(store.top_level(), vec![1, 3]);
        assert_eq!(store.top_index(3), Some(1));
        assert_eq!(store.top_index(2), None);
        assert_eq!(store.children_of(1).len(), 1);
    }
}
