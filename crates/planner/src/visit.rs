//! Read-only traversal over logical trees.
//!
//! Visitors are plain closures taking `(node, ancestors)` where
//! `ancestors` is the traversal stack from the root down to the node's
//! parent. Both orders visit children left to right; the orders below are
//! contractual and covered by tests.

use crate::node::{LogicalNode, NodeType};
use hashbrown::HashSet;

/// Visit children left to right, then the node itself.
pub fn post_order<'a, F>(root: &'a LogicalNode, visitor: &mut F)
where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    let mut stack = Vec::new();
    post_order_walk(root, &mut stack, visitor);
}

fn post_order_walk<'a, F>(
    node: &'a LogicalNode,
    stack: &mut Vec<&'a LogicalNode>,
    visitor: &mut F,
) where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    stack.push(node);
    for child in node.children() {
        post_order_walk(child, stack, visitor);
    }
    stack.pop();
    visitor(node, stack);
}

/// Visit the node, then its children left to right.
pub fn pre_order<'a, F>(root: &'a LogicalNode, visitor: &mut F)
where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    let mut stack = Vec::new();
    pre_order_walk(root, &mut stack, visitor);
}

fn pre_order_walk<'a, F>(
    node: &'a LogicalNode,
    stack: &mut Vec<&'a LogicalNode>,
    visitor: &mut F,
) where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    visitor(node, stack);
    stack.push(node);
    for child in node.children() {
        pre_order_walk(child, stack, visitor);
    }
    stack.pop();
}

/// Post-order that respects query-block boundaries: a `TableSubquery`
/// node is visited but its child block is not entered.
pub fn post_order_within_block<'a, F>(root: &'a LogicalNode, visitor: &mut F)
where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    let mut stack = Vec::new();
    block_walk(root, &mut stack, visitor);
}

fn block_walk<'a, F>(node: &'a LogicalNode, stack: &mut Vec<&'a LogicalNode>, visitor: &mut F)
where
    F: FnMut(&'a LogicalNode, &[&'a LogicalNode]),
{
    if node.node_type() != NodeType::TableSubquery {
        stack.push(node);
        for child in node.children() {
            block_walk(child, stack, visitor);
        }
        stack.pop();
    }
    visitor(node, stack);
}

/// First node of `kind` in post-order.
///
/// Despite the name, "top" means first encountered when post-ordering
/// from `root` — the deepest-leftmost match, not the shallowest. Callers
/// rely on this order; it is a contract.
pub fn find_top_node<'a>(root: &'a LogicalNode, kind: NodeType) -> Option<&'a LogicalNode> {
    for child in root.children() {
        if let Some(found) = find_top_node(child, kind) {
            return Some(found);
        }
    }
    (root.node_type() == kind).then_some(root)
}

/// All nodes of `kind` in post-order.
pub fn find_all_nodes<'a>(root: &'a LogicalNode, kind: NodeType) -> Vec<&'a LogicalNode> {
    let mut found = Vec::new();
    post_order(root, &mut |node, _| {
        if node.node_type() == kind {
            found.push(node);
        }
    });
    found
}

/// First node in post-order with some child of `kind`. A binary node
/// matches when either child has the kind.
pub fn find_top_parent_node<'a>(
    root: &'a LogicalNode,
    kind: NodeType,
) -> Option<&'a LogicalNode> {
    for child in root.children() {
        if let Some(found) = find_top_parent_node(child, kind) {
            return Some(found);
        }
    }
    root.children()
        .iter()
        .any(|c| c.node_type() == kind)
        .then_some(root)
}

/// Canonical names of all scans reachable from `root`, in post-order.
/// Crosses into subquery blocks.
pub fn relation_lineage(root: &LogicalNode) -> Vec<String> {
    let mut lineage = Vec::new();
    post_order(root, &mut |node, _| {
        if matches!(
            node.node_type(),
            NodeType::Scan | NodeType::PartitionedScan
        ) && let Some(name) = node.canonical_name()
        {
            lineage.push(name.to_string());
        }
    });
    lineage
}

/// Canonical names of all relations visible in `root`'s query block:
/// scans plus subquery aliases, without entering nested blocks.
pub fn relation_lineage_within_block(root: &LogicalNode) -> HashSet<String> {
    let mut lineage = HashSet::new();
    post_order_within_block(root, &mut |node, _| {
        if let Some(name) = node.canonical_name() {
            lineage.insert(name.to_string());
        }
    });
    lineage
}
