//! Logical plan utilities: the operator tree of a distributed SQL query
//! and the algorithms that traverse, rewrite, and analyze it during
//! planning.
//!
//! The semantic analyzer hands this layer an initial tree; rewrites and
//! analyses run to completion; the finished plan goes to the execution
//! layer, which treats it as immutable and relies only on the invariants
//! established here:
//!
//! 1. **Schema chaining** - a unary node's input schema is its child's
//!    output schema; a binary node's input is the left-then-right
//!    concatenation of its children's outputs
//! 2. **Pid uniqueness** - every node carries a plan-unique, monotonic
//!    pid; clones are restamped through the plan's [`PidFactory`]
//! 3. **Traversal order** - pre- and post-order visit children left to
//!    right, and the orders are contractual
//!
//! # Example
//!
//! ```no_run
//! use catalog::Catalog;
//! use common::PidFactory;
//! use planner::{LogicalNode, LogicalPlan};
//!
//! let mut catalog = Catalog::bootstrap();
//! # let columns = vec![types::Column::unqualified("id", types::DataType::Int4)];
//! catalog.create_table("default", "users", columns, None).unwrap();
//!
//! let mut factory = PidFactory::new();
//! let scan = LogicalNode::scan(&mut factory, catalog.table("default", "users").unwrap(), None);
//! let root = LogicalNode::root(&mut factory, scan);
//! let plan = LogicalPlan::new(factory, root);
//! println!("{}", plan.explain());
//! ```

mod analysis;
mod explain;
mod node;
mod rewrite;
mod two_phase;
mod visit;


use common::PidFactory;

pub use analysis::{
    TupleComparator, can_be_evaluated, comparators_from_join_qual, is_commutative_join,
    join_key_pairs, sort_specs_from_join_qual,
};
pub use explain::{explain, explain_table};
pub use node::{JoinType, LogicalNode, NodeType, NodeVariant, SetOpKind, Shape};
pub use rewrite::{delete_node, replace_child_of_kind, replace_node};
pub use two_phase::{transform_groupby_to_2p, transform_groupby_to_2p_v2, transform_sort_to_2p};
pub use visit::{
    find_all_nodes, find_top_node, find_top_parent_node, post_order, post_order_within_block,
    pre_order, relation_lineage, relation_lineage_within_block,
};

/// A rooted logical tree together with the pid factory that stamped it.
///
/// A plan and its nodes form a tree of owned values; concurrent planning
/// of different plans needs no coordination because nothing is shared.
pub struct LogicalPlan {
    pid_factory: PidFactory,
    root: LogicalNode,
}

impl LogicalPlan {
    pub fn new(pid_factory: PidFactory, root: LogicalNode) -> Self {
        Self { pid_factory, root }
    }

    pub fn root(&self) -> &LogicalNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut LogicalNode {
        &mut self.root
    }

    pub fn pid_factory_mut(&mut self) -> &mut PidFactory {
        &mut self.pid_factory
    }

    /// Replace every node below the root that deep-equals `target` with
    /// a fresh-pid clone of `replacement`. See [`replace_node`].
    pub fn replace_node(&mut self, target: &LogicalNode, replacement: &LogicalNode) -> usize {
        rewrite::replace_node(&mut self.pid_factory, &mut self.root, target, replacement)
    }

    pub fn explain(&self) -> String {
        explain::explain(&self.root)
    }
}
