//! Pure hierarchy predicates and the consistency validator.
//!
//! The resolver consults these before committing any structural mutation;
//! none of them mutate the store.

use super::{Block, BlockId, BlockStore};
use std::collections::BTreeSet;

/// Walks parent links upward from `target_parent` and reports whether
/// `dragged` is encountered, i.e. whether attaching `dragged` below
/// `target_parent` would close a cycle. Attaching a block under itself
/// counts as a cycle.
pub fn would_create_cycle(store: &BlockStore, dragged: BlockId, target_parent: BlockId) -> bool {
    if dragged == target_parent {
        return true;
    }
    let mut seen = BTreeSet::new();
    let mut current = store.get(target_parent);
    while let Some(block) = current {
        // A malformed store could loop forever without this guard.
        if !seen.insert(block.id) {
            return true;
        }
        match block.parent {
            Some(parent) if parent == dragged => return true,
            Some(parent) => current = store.get(parent),
            None => break,
        }
    }
    false
}

/// A block that already owns children may never become a child itself.
pub fn ineligible_for_child_zone(block: &Block) -> bool {
    !block.children.is_empty()
}

/// True when both blocks are children of the same parent.
pub fn same_parent(a: &Block, b: &Block) -> bool {
    a.parent.is_some() && a.parent == b.parent
}

/// A violated structural invariant, as reported by [`check_consistency`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("block {0} is its own parent")]
    SelfParent(BlockId),
    #[error("block {0} is its own ancestor")]
    Cycle(BlockId),
    #[error("child {child} of {parent} has children of its own")]
    NestedChild { parent: BlockId, child: BlockId },
    #[error("block {child} names parent {parent} which does not list it")]
    MissingChildLink { parent: BlockId, child: BlockId },
    #[error("block {child} names parent {parent} which does not exist")]
    DanglingParent { parent: BlockId, child: BlockId },
    #[error("parent {parent} lists child {child} more than once")]
    DuplicateChild { parent: BlockId, child: BlockId },
    #[error("parent {parent} lists child {child} which does not point back")]
    StrayChild { parent: BlockId, child: BlockId },
    #[error("block {0} is missing from the display order")]
    NotInOrder(BlockId),
    #[error("display order references unknown block {0}")]
    UnknownInOrder(BlockId),
}

/// Verifies the full invariant set: no self-parenting, no cycles, depth at
/// most two, symmetric parent/children links, and a display order that
/// covers the arena exactly once. Primarily exercised by tests.
pub fn check_consistency(store: &BlockStore) -> Result<(), ConsistencyError> {
    let mut ordered = BTreeSet::new();
    for id in store.ids_in_order() {
        let Some(block) = store.get(*id) else {
            return Err(ConsistencyError::UnknownInOrder(*id));
        };
        if !ordered.insert(block.id) {
            return Err(ConsistencyError::UnknownInOrder(block.id));
        }
    }
    // Order ids are unique and resolvable, so equal counts mean full coverage.
    if ordered.len() != store.len() {
        let missing = store
            .iter_all()
            .map(|block| block.id)
            .find(|id| !ordered.contains(id))
            .unwrap_or_default();
        return Err(ConsistencyError::NotInOrder(missing));
    }

    for block in store.iter_in_order() {
        if let Some(parent_id) = block.parent {
            if parent_id == block.id {
                return Err(ConsistencyError::SelfParent(block.id));
            }
            if would_create_cycle(store, block.id, parent_id) {
                return Err(ConsistencyError::Cycle(block.id));
            }
            if !block.children.is_empty() {
                return Err(ConsistencyError::NestedChild {
                    parent: parent_id,
                    child: block.id,
                });
            }
            let parent = store.get(parent_id).ok_or(ConsistencyError::DanglingParent {
                parent: parent_id,
                child: block.id,
            })?;
            if parent.children.iter().filter(|c| **c == block.id).count() != 1 {
                return Err(ConsistencyError::MissingChildLink {
                    parent: parent_id,
                    child: block.id,
                });
            }
        }

        let mut seen_children = BTreeSet::new();
        for child_id in &block.children {
            if !seen_children.insert(*child_id) {
                return Err(ConsistencyError::DuplicateChild {
                    parent: block.id,
                    child: *child_id,
                });
            }
            match store.get(*child_id) {
                Some(child) if child.parent == Some(block.id) => {}
                _ => {
                    return Err(ConsistencyError::StrayChild {
                        parent: block.id,
                        child: *child_id,
                    });
                }
            }
        }
    }

    Ok(())
}
