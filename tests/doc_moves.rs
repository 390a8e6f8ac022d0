use draft_blocks::{
    Block, DragSource, Draft, DropSpot, DropTarget, MoveOp, MoveOutcome, Source,
    check_consistency, resolve_gesture,
};

fn draft(n: u64) -> Draft {
    let mut draft = Draft::new();
    for id in 1..=n {
        let block = Block::new(id, format!("B{id}"), format!("summary {id}"), Source::Generated);
        draft.insert_block(block, DropSpot::End);
    }
    draft
}

#[test]
fn index_pair_always_resolves_to_top_level_reorder() {
    let d = draft(3);
    assert_eq!(
        resolve_gesture(d.store(), DragSource::Index(2), DropTarget::Index(0)),
        Some(MoveOp::ReorderTopLevel { from: 2, to: 0 })
    );
}

#[test]
fn top_level_reorder_splices_after_removal() {
    let mut d = draft(4);
    assert_eq!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 3, to: 1 }),
        MoveOutcome::Applied
    );
    assert_eq!(d.store().top_level(), vec![1, 4, 2, 3]);
}

#[test]
fn forward_reorder_lands_past_the_target_position() {
    let mut d = draft(4);
    assert_eq!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 0, to: 3 }),
        MoveOutcome::Applied
    );
    assert_eq!(d.store().top_level(), vec![2, 3, 4, 1]);
}

#[test]
fn reorder_onto_the_next_block_swaps_the_pair() {
    let mut d = draft(3);
    assert_eq!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 0, to: 1 }),
        MoveOutcome::Applied
    );
    assert_eq!(d.store().top_level(), vec![2, 1, 3]);
}

#[test]
fn reorder_into_own_slot_is_a_noop() {
    let mut d = draft(3);
    let before = d.store().top_level();
    assert_eq!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 1, to: 1 }),
        MoveOutcome::Noop
    );
    assert_eq!(d.store().top_level(), before);
}

#[test]
fn reorder_skips_over_attached_children() {
    let mut d = draft(4);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    // Top-level view is [1, 3, 4]; move 4 to the front.
    assert_eq!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 2, to: 0 }),
        MoveOutcome::Applied
    );
    assert_eq!(d.store().top_level(), vec![4, 1, 3]);
    assert_eq!(d.block(1).unwrap().children, vec![2]);
    check_consistency(d.store()).unwrap();
}

#[test]
fn assign_child_appends_to_the_children_list() {
    let mut d = draft(3);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    d.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
    assert_eq!(d.block(1).unwrap().children, vec![2, 3]);
    assert_eq!(d.store().top_level(), vec![1]);
    check_consistency(d.store()).unwrap();
}

#[test]
fn sibling_reorder_places_before_the_target() {
    let mut d = draft(4);
    for id in [2, 3, 4] {
        d.apply_move(MoveOp::AssignChild { block: id, parent: 1 });
    }
    let op = resolve_gesture(d.store(), DragSource::Block(4), DropTarget::Block(2));
    assert_eq!(
        op,
        Some(MoveOp::ReorderChildren {
            parent: 1,
            block: 4,
            before: 2
        })
    );
    assert_eq!(d.apply_move(op.unwrap()), MoveOutcome::Applied);
    assert_eq!(d.block(1).unwrap().children, vec![4, 2, 3]);
}

#[test]
fn promotion_lands_right_after_the_target() {
    let mut d = draft(4);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    // Top-level view [1, 3, 4]; promote 2 after 3.
    d.apply_move(MoveOp::PromoteChild { block: 2, after: 3 });
    assert_eq!(d.store().top_level(), vec![1, 3, 2, 4]);
    assert!(d.block(1).unwrap().children.is_empty());
    check_consistency(d.store()).unwrap();
}

#[test]
fn demotion_lands_right_before_the_target_child() {
    let mut d = draft(4);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    d.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
    d.apply_move(MoveOp::DemoteToChild { block: 4, before: 3 });
    assert_eq!(d.block(1).unwrap().children, vec![2, 4, 3]);
    assert_eq!(d.store().top_level(), vec![1]);
    check_consistency(d.store()).unwrap();
}

#[test]
fn stale_target_falls_back_to_appending() {
    let mut d = draft(4);
    for id in [2, 3, 4] {
        d.apply_move(MoveOp::AssignChild { block: id, parent: 1 });
    }
    // Resolve against the current state, then mutate before applying.
    let op = resolve_gesture(d.store(), DragSource::Block(2), DropTarget::Block(4)).unwrap();
    d.apply_move(MoveOp::PromoteChild { block: 4, after: 1 });

    assert_eq!(d.apply_move(op), MoveOutcome::Applied);
    assert_eq!(d.block(1).unwrap().children, vec![3, 2]);
    check_consistency(d.store()).unwrap();
}

#[test]
fn transfer_between_parents_updates_both_lists() {
    let mut d = draft(5);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    d.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
    d.apply_move(MoveOp::AssignChild { block: 5, parent: 4 });

    d.apply_move(MoveOp::MoveBetweenParents { block: 3, before: 5 });
    assert_eq!(d.block(1).unwrap().children, vec![2]);
    assert_eq!(d.block(4).unwrap().children, vec![3, 5]);
    assert_eq!(d.block(3).unwrap().parent, Some(4));
    check_consistency(d.store()).unwrap();
}

#[test]
fn gesture_onto_itself_resolves_to_nothing() {
    let d = draft(2);
    assert_eq!(
        resolve_gesture(d.store(), DragSource::Block(1), DropTarget::Block(1)),
        None
    );
    assert_eq!(
        resolve_gesture(d.store(), DragSource::Block(1), DropTarget::ChildZone(1)),
        None
    );
}

#[test]
fn out_of_range_reorder_is_rejected_without_effect() {
    let mut d = draft(2);
    let before = d.clone();
    assert!(matches!(
        d.apply_move(MoveOp::ReorderTopLevel { from: 9, to: 0 }),
        MoveOutcome::Rejected(_)
    ));
    assert_eq!(d, before);
}

#[test]
fn removing_a_parent_promotes_its_children_in_place() {
    let mut d = draft(4);
    d.apply_move(MoveOp::AssignChild { block: 2, parent: 1 });
    d.apply_move(MoveOp::AssignChild { block: 3, parent: 1 });
    d.remove(1);
    assert_eq!(d.store().top_level(), vec![2, 3, 4]);
    check_consistency(d.store()).unwrap();
}
