//! The draft document: block hierarchy plus the expansion array, and the
//! resolver that turns drag gestures into structural moves.
//!
//! All state mutation funnels through [`Draft`]. Structural moves arrive as
//! an explicit [`MoveOp`] (the presentation layer builds one, either
//! directly or via [`resolve_gesture`]); the resolver validates the move
//! against the hierarchy invariants before committing, so an illegal move
//! never leaves partial state behind.

use crate::core::{
    Block, BlockId, BlockStore, IdAllocator, Source, clamp_title,
    hierarchy::{ineligible_for_child_zone, same_parent, would_create_cycle},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a new block lands in the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropSpot {
    /// Top level, after every existing block.
    End,
    /// Top level, at this position in the top-level display order.
    At(usize),
    /// Child zone of the given parent block.
    ChildZone(BlockId),
}

/// One structural move, tagged by kind. Constructed by the presentation
/// layer from a completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MoveOp {
    /// Reorder among top-level blocks. `from` addresses the top-level
    /// display order as it stands; the dragged block is removed and then
    /// reinserted at `to` in the shrunken list.
    ReorderTopLevel { from: usize, to: usize },
    /// Drop into a parent's child zone: demotes a top-level block or
    /// reassigns a child, appending to the parent's children.
    AssignChild { block: BlockId, parent: BlockId },
    /// Reorder within one parent's children, placing `block` at the
    /// position `before` currently occupies.
    ReorderChildren {
        parent: BlockId,
        block: BlockId,
        before: BlockId,
    },
    /// Promote a child to top level, placed right after the target block.
    PromoteChild { block: BlockId, after: BlockId },
    /// Demote a top-level block to a child, inserted before the target
    /// child in its parent's list.
    DemoteToChild { block: BlockId, before: BlockId },
    /// Move a child from one parent to another, inserted before the target
    /// child in the destination list.
    MoveBetweenParents { block: BlockId, before: BlockId },
}

impl MoveOp {
    fn kind(&self) -> &'static str {
        match self {
            MoveOp::ReorderTopLevel { .. } => "reorder-top-level",
            MoveOp::AssignChild { .. } => "assign-child",
            MoveOp::ReorderChildren { .. } => "reorder-children",
            MoveOp::PromoteChild { .. } => "promote-child",
            MoveOp::DemoteToChild { .. } => "demote-to-child",
            MoveOp::MoveBetweenParents { .. } => "move-between-parents",
        }
    }
}

/// Why a move was refused. Vetoed moves are silent no-ops at the API level;
/// the reason is surfaced through the outcome and a `tracing` warning only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveVeto {
    #[error("block not found")]
    UnknownBlock,
    #[error("index out of range")]
    OutOfRange,
    #[error("a block with children cannot become a child")]
    ParentWithChildren,
    #[error("move would make a block its own ancestor")]
    WouldCycle,
    #[error("children may not have children of their own")]
    DepthLimit,
    #[error("block is not a child")]
    NotAChild,
    #[error("target is not a top-level block")]
    NotTopLevel,
}

/// Result of [`Draft::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied,
    /// The move would have produced no net change and was skipped.
    Noop,
    Rejected(MoveVeto),
}

/// The dragged side of a gesture, as the presentation layer knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// Legacy top-level reordering: position in the top-level order.
    Index(usize),
    Block(BlockId),
}

/// The drop side of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Legacy top-level reordering: position in the top-level order.
    Index(usize),
    Block(BlockId),
    ChildZone(BlockId),
}

/// Translates a drag-source/drop-target pair into a single [`MoveOp`],
/// first match wins:
///
/// 1. plain index pair -> reorder-top-level
/// 2. child-zone target -> assign-child
/// 3. same non-null parent -> reorder-children
/// 4. child dropped on a top-level block -> promote-child
/// 5. top-level block dropped on a child -> demote-to-child
/// 6. different non-null parents -> move-between-parents
///
/// Returns `None` when the gesture names unknown blocks, targets itself, or
/// fits no row (the caller simply ignores the gesture).
pub fn resolve_gesture(
    store: &BlockStore,
    source: DragSource,
    target: DropTarget,
) -> Option<MoveOp> {
    if let (DragSource::Index(from), DropTarget::Index(to)) = (source, target) {
        return Some(MoveOp::ReorderTopLevel { from, to });
    }

    let tops = store.top_level();
    let dragged_id = match source {
        DragSource::Block(id) => id,
        DragSource::Index(index) => *tops.get(index)?,
    };

    if let DropTarget::ChildZone(parent) = target {
        if parent == dragged_id {
            return None;
        }
        return Some(MoveOp::AssignChild {
            block: dragged_id,
            parent,
        });
    }

    let target_id = match target {
        DropTarget::Block(id) => id,
        DropTarget::Index(index) => *tops.get(index)?,
        DropTarget::ChildZone(_) => unreachable!(),
    };
    if target_id == dragged_id {
        return None;
    }

    let dragged = store.get(dragged_id)?;
    let target_block = store.get(target_id)?;

    if same_parent(dragged, target_block) {
        return Some(MoveOp::ReorderChildren {
            parent: dragged.parent?,
            block: dragged_id,
            before: target_id,
        });
    }

    match (dragged.parent, target_block.parent) {
        (Some(_), None) => Some(MoveOp::PromoteChild {
            block: dragged_id,
            after: target_id,
        }),
        (None, Some(_)) => Some(MoveOp::DemoteToChild {
            block: dragged_id,
            before: target_id,
        }),
        (Some(_), Some(_)) => Some(MoveOp::MoveBetweenParents {
            block: dragged_id,
            before: target_id,
        }),
        (None, None) => {
            let from = store.top_index(dragged_id)?;
            let to = store.top_index(target_id)?;
            Some(MoveOp::ReorderTopLevel { from, to })
        }
    }
}

/// Shallow patch for [`Draft::update`]. Structural fields are deliberately
/// absent; they change only through moves.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("block not found")]
    BlockNotFound,
    #[error("paragraph index out of range")]
    InvalidParagraph,
}

/// The top-level application state: the block arena, the expansion array
/// (one developed paragraph per top-level block), and the id allocator for
/// user-created blocks.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    store: BlockStore,
    expanded: Vec<String>,
    ids: IdAllocator,
}

impl Draft {
    pub fn new() -> Self {
        Self {
            store: BlockStore::new(),
            expanded: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.store.get(id)
    }

    /// The developed paragraphs, index-aligned with the top-level order as
    /// of the last structural touch.
    pub fn expanded(&self) -> &[String] {
        &self.expanded
    }

    /// All paragraphs joined with blank lines.
    pub fn full_text(&self) -> String {
        self.expanded.join("\n\n").trim().to_string()
    }

    pub fn word_count(&self) -> usize {
        self.full_text().split_whitespace().count()
    }

    /// Creates a block from user input and inserts it at `spot`. Returns the
    /// new id, or `None` when the drop was vetoed.
    pub fn insert(
        &mut self,
        title: impl Into<String>,
        summary: impl Into<String>,
        source: Source,
        spot: DropSpot,
    ) -> Option<BlockId> {
        let id = self.ids.allocate();
        let block = Block::new(id, title, summary, source);
        self.insert_block(block, spot)
    }

    /// Inserts an externally built block (e.g. AI-generated). A colliding id
    /// is re-keyed from the allocator; either way the allocator is bumped
    /// past the id actually used, keeping the two ranges disjoint.
    ///
    /// A child-zone drop is vetoed (silent no-op, `None`) when the parent is
    /// unknown, is itself a child, or when the block carries children.
    pub fn insert_block(&mut self, mut block: Block, spot: DropSpot) -> Option<BlockId> {
        if self.store.contains(block.id) {
            block.id = self.ids.allocate();
        }
        self.ids.reserve(block.id);
        let id = block.id;

        match spot {
            DropSpot::ChildZone(parent_id) => {
                let Some(parent) = self.store.get(parent_id) else {
                    warn!(block = id, parent = parent_id, "drop vetoed: unknown parent");
                    return None;
                };
                if !parent.is_top_level() {
                    warn!(block = id, parent = parent_id, "drop vetoed: nested child zone");
                    return None;
                }
                if ineligible_for_child_zone(&block) {
                    warn!(block = id, "drop vetoed: block has children");
                    return None;
                }
                block.parent = Some(parent_id);
                self.store.push(block);
                if let Some(parent) = self.store.get_mut(parent_id) {
                    parent.children.push(id);
                }
            }
            DropSpot::End => {
                block.parent = None;
                self.store.push(block);
            }
            DropSpot::At(position) => {
                block.parent = None;
                let anchor = self.store.top_level().get(position).copied();
                self.store.push(block);
                self.store.place_before(id, anchor);
            }
        }
        Some(id)
    }

    /// Removes the block at `index` in the full display order.
    pub fn remove_at(&mut self, index: usize) -> Option<Block> {
        let id = self.store.ids_in_order().get(index).copied()?;
        self.remove(id)
    }

    /// Removes a block. A child is detached from its parent's list; a parent
    /// has its children promoted to top level in place, preserving their
    /// relative order.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        // The promoted children take over the parent's position, so find
        // the first block after it that is not one of them.
        let index = self.store.index_of(id)?;
        let successor = self
            .store
            .ids_in_order()
            .iter()
            .skip(index + 1)
            .copied()
            .find(|next| {
                self.store
                    .get(*next)
                    .is_some_and(|block| block.parent != Some(id))
            });
        let removed = self.store.take(id)?;

        if let Some(parent_id) = removed.parent {
            if let Some(parent) = self.store.get_mut(parent_id) {
                parent.children.retain(|child| *child != id);
            }
        }

        for child_id in removed.children.iter().copied() {
            let Some(child) = self.store.get_mut(child_id) else {
                continue;
            };
            child.parent = None;
            self.store.place_before(child_id, successor);
        }

        Some(removed)
    }

    /// Title/summary edits only. Never touches structural fields.
    pub fn update(&mut self, id: BlockId, patch: BlockPatch) -> Result<(), EditError> {
        let block = self.store.get_mut(id).ok_or(EditError::BlockNotFound)?;
        if let Some(title) = patch.title {
            block.title = clamp_title(&title);
        }
        if let Some(summary) = patch.summary {
            block.summary = summary;
        }
        Ok(())
    }

    /// Manual edit of a developed paragraph. Leaves `developed` flags alone.
    pub fn set_paragraph(&mut self, index: usize, text: impl Into<String>) -> Result<(), EditError> {
        let slot = self
            .expanded
            .get_mut(index)
            .ok_or(EditError::InvalidParagraph)?;
        *slot = text.into();
        Ok(())
    }

    /// The top-level block whose expansion slot `id` maps to: itself when
    /// top-level, its parent otherwise.
    pub fn governing(&self, id: BlockId) -> Option<BlockId> {
        let block = self.store.get(id)?;
        match block.parent {
            Some(parent) if self.store.contains(parent) => Some(parent),
            Some(_) => None,
            None => Some(id),
        }
    }

    /// Applies one structural move. Every veto is detected before any state
    /// is touched, so a rejected move leaves the draft exactly as it was.
    pub fn apply_move(&mut self, op: MoveOp) -> MoveOutcome {
        let outcome = match op {
            MoveOp::ReorderTopLevel { from, to } => self.reorder_top_level(from, to),
            MoveOp::AssignChild { block, parent } => self.assign_child(block, parent),
            MoveOp::ReorderChildren {
                parent,
                block,
                before,
            } => self.reorder_children(parent, block, before),
            MoveOp::PromoteChild { block, after } => self.promote_child(block, after),
            MoveOp::DemoteToChild { block, before } => self.reparent_before(block, before, true),
            MoveOp::MoveBetweenParents { block, before } => {
                self.reparent_before(block, before, false)
            }
        };
        match outcome {
            MoveOutcome::Applied => debug!(kind = op.kind(), "move applied"),
            MoveOutcome::Noop => debug!(kind = op.kind(), "move skipped, no net change"),
            MoveOutcome::Rejected(veto) => {
                warn!(kind = op.kind(), %veto, "move vetoed");
            }
        }
        outcome
    }

    fn reorder_top_level(&mut self, from: usize, to: usize) -> MoveOutcome {
        let tops = self.store.top_level();
        if from >= tops.len() || to >= tops.len() {
            return MoveOutcome::Rejected(MoveVeto::OutOfRange);
        }
        if to == from {
            return MoveOutcome::Noop;
        }
        // The dragged block is removed first; `to` addresses the shrunken
        // list, so a forward move ends up past the block that held `to`.
        let dragged = tops[from];
        let remaining: Vec<BlockId> = tops
            .iter()
            .copied()
            .filter(|id| *id != dragged)
            .collect();
        let anchor = remaining.get(to).copied();
        self.store.place_before(dragged, anchor);
        MoveOutcome::Applied
    }

    fn assign_child(&mut self, block_id: BlockId, parent_id: BlockId) -> MoveOutcome {
        let Some(block) = self.store.get(block_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        let Some(parent) = self.store.get(parent_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        if ineligible_for_child_zone(block) {
            return MoveOutcome::Rejected(MoveVeto::ParentWithChildren);
        }
        if !parent.is_top_level() {
            return MoveOutcome::Rejected(MoveVeto::DepthLimit);
        }
        if would_create_cycle(&self.store, block_id, parent_id) {
            return MoveOutcome::Rejected(MoveVeto::WouldCycle);
        }
        if block.parent == Some(parent_id)
            && parent.children.last() == Some(&block_id)
        {
            return MoveOutcome::Noop;
        }

        let old_parent = block.parent;
        self.detach(block_id, old_parent);
        if let Some(entry) = self.store.get_mut(block_id) {
            entry.parent = Some(parent_id);
        }
        if let Some(parent) = self.store.get_mut(parent_id) {
            parent.children.push(block_id);
        }
        MoveOutcome::Applied
    }

    fn reorder_children(
        &mut self,
        parent_id: BlockId,
        block_id: BlockId,
        before_id: BlockId,
    ) -> MoveOutcome {
        if block_id == before_id {
            return MoveOutcome::Noop;
        }
        let Some(block) = self.store.get(block_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        if block.parent != Some(parent_id) {
            return MoveOutcome::Rejected(MoveVeto::NotAChild);
        }
        let Some(parent) = self.store.get_mut(parent_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        let Some(current) = parent.children.iter().position(|c| *c == block_id) else {
            return MoveOutcome::Rejected(MoveVeto::NotAChild);
        };
        parent.children.remove(current);
        // Stale target: fall back to appending.
        let destination = parent
            .children
            .iter()
            .position(|c| *c == before_id)
            .unwrap_or(parent.children.len());
        parent.children.insert(destination, block_id);
        if destination == current {
            return MoveOutcome::Noop;
        }
        MoveOutcome::Applied
    }

    fn promote_child(&mut self, block_id: BlockId, after_id: BlockId) -> MoveOutcome {
        let Some(block) = self.store.get(block_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        let Some(old_parent) = block.parent else {
            return MoveOutcome::Rejected(MoveVeto::NotAChild);
        };
        match self.store.get(after_id) {
            Some(target) if target.is_top_level() => {}
            Some(_) => return MoveOutcome::Rejected(MoveVeto::NotTopLevel),
            None => return MoveOutcome::Rejected(MoveVeto::UnknownBlock),
        }

        self.detach(block_id, Some(old_parent));
        if let Some(entry) = self.store.get_mut(block_id) {
            entry.parent = None;
        }
        self.store.place_after(block_id, after_id);
        MoveOutcome::Applied
    }

    /// Shared tail of demote-to-child and move-between-parents: both attach
    /// `block` before `before` inside the target child's parent list.
    fn reparent_before(
        &mut self,
        block_id: BlockId,
        before_id: BlockId,
        expect_top_level: bool,
    ) -> MoveOutcome {
        let Some(block) = self.store.get(block_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        if expect_top_level {
            if !block.is_top_level() {
                return MoveOutcome::Rejected(MoveVeto::NotTopLevel);
            }
            if ineligible_for_child_zone(block) {
                return MoveOutcome::Rejected(MoveVeto::ParentWithChildren);
            }
        } else if block.parent.is_none() {
            return MoveOutcome::Rejected(MoveVeto::NotAChild);
        }
        let Some(target) = self.store.get(before_id) else {
            return MoveOutcome::Rejected(MoveVeto::UnknownBlock);
        };
        let Some(new_parent) = target.parent else {
            return MoveOutcome::Rejected(MoveVeto::NotAChild);
        };
        if would_create_cycle(&self.store, block_id, new_parent) {
            return MoveOutcome::Rejected(MoveVeto::WouldCycle);
        }

        let old_parent = block.parent;
        self.detach(block_id, old_parent);
        if let Some(entry) = self.store.get_mut(block_id) {
            entry.parent = Some(new_parent);
        }
        if let Some(parent) = self.store.get_mut(new_parent) {
            // Stale target: fall back to appending.
            let at = parent
                .children
                .iter()
                .position(|c| *c == before_id)
                .unwrap_or(parent.children.len());
            parent.children.insert(at, block_id);
        }
        MoveOutcome::Applied
    }

    fn detach(&mut self, block_id: BlockId, parent: Option<BlockId>) {
        if let Some(parent_id) = parent {
            if let Some(parent) = self.store.get_mut(parent_id) {
                parent.children.retain(|child| *child != block_id);
            }
        }
    }

    // Expansion-array plumbing used by the compose layer.

    pub(crate) fn resize_expansion(&mut self, len: usize) {
        self.expanded.resize(len, String::new());
    }

    pub(crate) fn replace_expansion(&mut self, paragraphs: Vec<String>) {
        self.expanded = paragraphs;
    }

    pub(crate) fn write_slot(&mut self, index: usize, text: String) {
        while self.expanded.len() <= index {
            self.expanded.push(String::new());
        }
        self.expanded[index] = text;
    }

    pub(crate) fn insert_slot(&mut self, index: usize, text: String) {
        let at = index.min(self.expanded.len());
        self.expanded.insert(at, text);
    }

    pub(crate) fn mark_developed(&mut self, id: BlockId) {
        if let Some(block) = self.store.get_mut(id) {
            block.developed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::check_consistency;

    fn draft_with_tops(n: u64) -> Draft {
        let mut draft = Draft::new();
        for i in 1..=n {
            let block = Block::new(i, format!("T{i}"), format!("summary {i}"), Source::Generated);
            draft.insert_block(block, DropSpot::End);
        }
        draft
    }

    #[test]
    fn insert_into_child_zone_wires_both_sides() {
        let mut draft = draft_with_tops(2);
        let id = draft
            .insert("Child", "supporting point", Source::Custom, DropSpot::ChildZone(1))
            .unwrap();
        assert_eq!(draft.block(id).unwrap().parent, Some(1));
        assert_eq!(draft.block(1).unwrap().children, vec![id]);
        check_consistency(draft.store()).unwrap();
    }

    #[test]
    fn insert_at_position_lands_before_anchor() {
        let mut draft = draft_with_tops(3);
        let id = draft
            .insert("Mid", "middle", Source::Custom, DropSpot::At(1))
            .unwrap();
        assert_eq!(draft.store().top_level(), vec![1, id, 2, 3]);
    }

    #[test]
    fn colliding_insert_is_rekeyed() {
        let mut draft = draft_with_tops(1);
        let twin = Block::new(1, "Twin", "twin", Source::Generated);
        let id = draft.insert_block(twin, DropSpot::End).unwrap();
        assert_ne!(id, 1);
        check_consistency(draft.store()).unwrap();
    }

    #[test]
    fn remove_promotes_children_in_order() {
        let mut draft = draft_with_tops(3);
        draft.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
        draft.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
        draft.remove(1);
        assert_eq!(draft.store().top_level(), vec![2, 3]);
        assert!(draft.block(2).unwrap().is_top_level());
        check_consistency(draft.store()).unwrap();
    }

    #[test]
    fn update_never_touches_structure() {
        let mut draft = draft_with_tops(2);
        draft.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
        draft
            .update(
                2,
                BlockPatch {
                    title: Some("New title".into()),
                    summary: None,
                },
            )
            .unwrap();
        let block = draft.block(2).unwrap();
        assert_eq!(block.title, "New title");
        assert_eq!(block.parent, Some(1));
    }

    #[test]
    fn resolver_maps_gestures_to_ops() {
        let mut draft = draft_with_tops(4);
        draft.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
        draft.apply_move(MoveOp::AssignChild { block: 4, parent: 1 });
        let store = draft.store();

        assert_eq!(
            resolve_gesture(store, DragSource::Index(0), DropTarget::Index(1)),
            Some(MoveOp::ReorderTopLevel { from: 0, to: 1 })
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(3), DropTarget::Block(4)),
            Some(MoveOp::ReorderChildren {
                parent: 1,
                block: 3,
                before: 4
            })
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(3), DropTarget::Block(2)),
            Some(MoveOp::PromoteChild { block: 3, after: 2 })
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(2), DropTarget::Block(4)),
            Some(MoveOp::DemoteToChild { block: 2, before: 4 })
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(2), DropTarget::ChildZone(1)),
            Some(MoveOp::AssignChild { block: 2, parent: 1 })
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(2), DropTarget::ChildZone(2)),
            None
        );
        assert_eq!(
            resolve_gesture(store, DragSource::Block(2), DropTarget::Block(2)),
            None
        );
    }

    #[test]
    fn move_between_parents_inserts_before_target() {
        let mut draft = draft_with_tops(4);
        draft.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
        draft.apply_move(MoveOp::AssignChild { block: 4, parent: 3 });

        let op = resolve_gesture(
            draft.store(),
            DragSource::Block(2),
            DropTarget::Block(4),
        )
        .unwrap();
        assert_eq!(op, MoveOp::MoveBetweenParents { block: 2, before: 4 });
        assert_eq!(draft.apply_move(op), MoveOutcome::Applied);

        assert!(draft.block(1).unwrap().children.is_empty());
        assert_eq!(draft.block(3).unwrap().children, vec![2, 4]);
        assert_eq!(draft.block(2).unwrap().parent, Some(3));
        check_consistency(draft.store()).unwrap();
    }

    #[test]
    fn manual_paragraph_edit_keeps_developed_flags() {
        let mut draft = draft_with_tops(2);
        draft.resize_expansion(2);
        draft.set_paragraph(1, "edited by hand").unwrap();
        assert_eq!(draft.expanded()[1], "edited by hand");
        assert!(!draft.block(2).unwrap().developed);
        assert_eq!(
            draft.set_paragraph(5, "nope"),
            Err(EditError::InvalidParagraph)
        );
    }
}
