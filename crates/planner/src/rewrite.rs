//! Structural rewrites: splicing nodes out and substituting subtrees.
//!
//! Rewrites re-point parent slots found through the traversal stack;
//! nodes never carry parent references. Pids of untouched nodes are
//! preserved — no rewrite renumbers the plan. Schema chaining at a splice
//! point is the caller's responsibility to restore when the spliced node
//! changed row shape.

use crate::node::{LogicalNode, NodeType, Shape};
use crate::visit::find_top_parent_node;
use common::{PidFactory, PlanError, PlanResult};

/// Splice a unary node out of the plan.
///
/// `target` is matched by deep equality against `parent`'s children,
/// left side first for binary parents. The matched child is replaced by
/// its own child and returned; its vacated slot holds a fresh `Terminal`
/// carrying the removed node's input schema.
///
/// Errors with `Invariant` when `target` is not unary, or no child of
/// `parent` matches it.
pub fn delete_node(
    factory: &mut PidFactory,
    parent: &mut LogicalNode,
    target: &LogicalNode,
) -> PlanResult<LogicalNode> {
    if target.shape() != Shape::Unary {
        return Err(PlanError::Invariant(format!(
            "deleteNode target must be unary, got {:?}",
            target.node_type()
        )));
    }

    let side = match parent.shape() {
        Shape::Leaf => {
            return Err(PlanError::Invariant(
                "deleteNode parent has no children".into(),
            ));
        }
        Shape::Unary => {
            if parent.child() != Some(target) {
                return Err(PlanError::Invariant(
                    "deleteNode target is not a child of parent".into(),
                ));
            }
            0
        }
        Shape::Binary => {
            if parent.left() == Some(target) {
                0
            } else if parent.right() == Some(target) {
                1
            } else {
                return Err(PlanError::Invariant(
                    "deleteNode target matches neither side of parent".into(),
                ));
            }
        }
    };

    let slot = match (parent.shape(), side) {
        (Shape::Unary, _) => parent.child_mut().expect("unary parent owns a child"),
        (Shape::Binary, 0) => parent.left_mut().expect("binary parent"),
        _ => parent.right_mut().expect("binary parent"),
    };
    let placeholder = LogicalNode::terminal(factory, slot.in_schema.clone());
    let grand_slot = slot
        .child_mut()
        .expect("matched child is unary and owns a child");
    let grandchild = std::mem::replace(grand_slot, placeholder);
    let removed = std::mem::replace(slot, grandchild);
    Ok(removed)
}

/// Replace every node below `start` that deep-equals `target` with a
/// fresh-pid clone of `replacement`.
///
/// Traversal is post-order; a parent slot is re-pointed after its subtree
/// was processed, so the walk never descends into freshly substituted
/// content (which may itself contain `target`). `start` itself is never
/// replaced — it has no parent slot to re-point. Returns the number of
/// substitutions; zero leaves the plan untouched.
pub fn replace_node(
    factory: &mut PidFactory,
    start: &mut LogicalNode,
    target: &LogicalNode,
    replacement: &LogicalNode,
) -> usize {
    let mut count = 0;
    replace_walk(factory, start, target, replacement, &mut count);
    count
}

fn replace_walk(
    factory: &mut PidFactory,
    node: &mut LogicalNode,
    target: &LogicalNode,
    replacement: &LogicalNode,
    count: &mut usize,
) {
    for slot in node.children_mut() {
        replace_walk(factory, slot, target, replacement, count);
        if &*slot == target {
            *slot = replacement.clone_with(factory);
            *count += 1;
        }
    }
}

/// Positional replacement: substitute `new_node` for the child of the
/// top parent of `kind` (post-order first).
///
/// The parent must be unary and `new_node` must not be binary. When both
/// the displaced child and `new_node` are unary, `new_node` adopts the
/// displaced child's child — the old operator is excised and the
/// grandchild re-attached beneath the new one.
pub fn replace_child_of_kind(
    root: &mut LogicalNode,
    mut new_node: LogicalNode,
    kind: NodeType,
) -> PlanResult<()> {
    if find_top_parent_node(root, kind).is_none() {
        return Err(PlanError::UnsupportedPlan(format!(
            "plan has no parent of a {kind:?} node"
        )));
    }
    let parent = find_top_parent_mut(root, kind).expect("checked above");
    if parent.shape() != Shape::Unary {
        return Err(PlanError::Invariant(format!(
            "replace target's parent must be unary, got {:?}",
            parent.node_type()
        )));
    }
    if new_node.shape() == Shape::Binary {
        return Err(PlanError::Invariant(
            "replacement node must not be binary".into(),
        ));
    }

    let slot = parent.child_mut().expect("unary parent owns a child");
    if new_node.shape() == Shape::Unary && slot.shape() == Shape::Unary {
        std::mem::swap(
            new_node.child_mut().expect("unary"),
            slot.child_mut().expect("unary"),
        );
    }
    *slot = new_node;
    Ok(())
}

fn find_top_parent_mut<'a>(
    root: &'a mut LogicalNode,
    kind: NodeType,
) -> Option<&'a mut LogicalNode> {
    let descend = root
        .children()
        .iter()
        .position(|c| find_top_parent_node(c, kind).is_some());
    if let Some(idx) = descend {
        let child = root.children_mut().into_iter().nth(idx).expect("in range");
        return find_top_parent_mut(child, kind);
    }
    if root.children().iter().any(|c| c.node_type() == kind) {
        Some(root)
    } else {
        None
    }
}
