//! Rendering of whole plans for the explain surface, built on the
//! per-node [`LogicalNode::plan_string`] summaries.

use crate::node::LogicalNode;
use crate::visit::pre_order;
use common::pretty::{self, TableStyleKind};

/// Indented tree rendering, one node per line, children beneath their
/// parent. Stable across runs.
pub fn explain(node: &LogicalNode) -> String {
    let mut lines = vec![node.plan_string()];
    for child in node.children() {
        lines.push(pretty::indent(&explain(child)));
    }
    lines.join("\n")
}

/// Tabular rendering: one row per node in pre-order, with pid, summary,
/// and output schema.
pub fn explain_table(node: &LogicalNode, style: TableStyleKind) -> String {
    let mut rows = Vec::new();
    pre_order(node, &mut |n, _| {
        rows.push(vec![
            n.pid().to_string(),
            n.plan_string(),
            n.out_schema.to_string(),
        ]);
    });
    pretty::render_string_table(&["id", "operator", "out schema"], rows, style)
}
