//! Two-phase splits of group-by and sort operators for distributed
//! execution: a partial child runs per partition, a final parent merges.

use crate::node::{LogicalNode, NodeVariant};
use common::{PidFactory, PlanError, PlanResult};
use expr::{AggCall, AggPhase, EvalNode, Target, find_distinct_agg_functions, targets_to_schema};
use types::Column;

/// Split an aggregation and wire the halves: returns the final group-by
/// with the partial group-by as its child, the partial sitting on the
/// original input.
///
/// The original node becomes the parent and keeps its pid; the child is
/// freshly stamped. See [`transform_groupby_to_2p_v2`] for the split
/// contract.
pub fn transform_groupby_to_2p(
    groupby: LogicalNode,
    factory: &mut PidFactory,
) -> PlanResult<LogicalNode> {
    let (mut parent, child) = transform_groupby_to_2p_v2(groupby, factory)?;
    let slot = parent.child_mut().expect("group-by is unary");
    *slot = child;
    Ok(parent)
}

/// Split an aggregation into independent final (parent) and partial
/// (child) halves; the caller wires them across a shuffle boundary. The
/// parent reads through a `Terminal` placeholder carrying the child's
/// output schema.
///
/// Per original target:
/// - a target without aggregates is a grouping passthrough: the parent
///   keeps it and the child serves it through the appended grouping
///   columns;
/// - each distinct aggregate `f` gets a fresh intermediate column name
///   `column_k` (one monotonic counter per transformation). A distinct
///   aggregate makes the child emit `f`'s raw argument columns and the
///   parent aggregate over the intermediates; otherwise the child runs a
///   phase-First clone of `f` and the parent's matching aggregates are
///   re-argumented in place to the intermediate, phase Final.
///
/// Child target order: aggregate intermediates first, then grouping
/// columns not already produced. Matching in the parent uses structural
/// equality of the pre-mutation aggregate calls, which is why parents are
/// re-argumented rather than rebuilt.
pub fn transform_groupby_to_2p_v2(
    groupby: LogicalNode,
    factory: &mut PidFactory,
) -> PlanResult<(LogicalNode, LogicalNode)> {
    let kind = groupby.node_type();
    let parent_pid = groupby.pid();
    let input_schema = groupby.in_schema.clone();
    let output_schema = groupby.out_schema.clone();
    let NodeVariant::GroupBy {
        grouping,
        mut targets,
        distinct,
        child: input,
    } = groupby.variant
    else {
        return Err(PlanError::UnsupportedPlan(format!(
            "two-phase aggregation split over {kind:?}"
        )));
    };

    let mut child_targets: Vec<Target> = Vec::new();
    let mut next_column = 0usize;
    for target in targets.iter_mut() {
        for agg in find_distinct_agg_functions(&target.expr) {
            if agg.distinct {
                if agg.args.is_empty() {
                    return Err(PlanError::MalformedExpression(format!(
                        "distinct aggregate {} has no argument to forward",
                        agg.func.name
                    )));
                }
                // No partial aggregation over distinct inputs: the child
                // forwards the raw argument columns and the parent keeps
                // the aggregate, re-argumented to the intermediates.
                let mut new_args = Vec::with_capacity(agg.args.len());
                for arg in &agg.args {
                    let name = next_intermediate(&mut next_column);
                    new_args.push(EvalNode::Field(Column::unqualified(&name, arg.data_type())));
                    child_targets.push(Target::aliased(arg.clone(), name));
                }
                rewrite_matching_aggs(&mut target.expr, &agg, &new_args, agg.phase);
            } else {
                let name = next_intermediate(&mut next_column);
                let mut partial = agg.clone();
                partial.phase = AggPhase::First;
                let intermediate =
                    EvalNode::Field(Column::unqualified(&name, partial.func.return_type));
                child_targets.push(Target::aliased(EvalNode::Agg(partial), name));
                rewrite_matching_aggs(&mut target.expr, &agg, &[intermediate], AggPhase::Final);
            }
        }
    }

    // Finalization runs once, after the per-target loop: append grouping
    // columns the child does not yet produce, then recompute its schema.
    for column in &grouping {
        let produced = child_targets
            .iter()
            .any(|t| t.output_column().qualified_name() == column.qualified_name());
        if !produced {
            child_targets.push(Target::new(EvalNode::Field(column.clone())));
        }
    }
    let child_out = targets_to_schema(&child_targets);

    let child = LogicalNode::from_parts(
        factory.next_pid(),
        input_schema,
        child_out.clone(),
        NodeVariant::GroupBy {
            grouping: grouping.clone(),
            targets: child_targets,
            distinct,
            child: input,
        },
    );
    let placeholder = LogicalNode::terminal(factory, child_out.clone());
    let parent = LogicalNode::from_parts(
        parent_pid,
        child_out,
        output_schema,
        NodeVariant::GroupBy {
            grouping,
            targets,
            distinct,
            child: Box::new(placeholder),
        },
    );
    Ok((parent, child))
}

/// Split a sort into a per-stream partial sort (child, fresh pid) under
/// a merging sort (the original node, original pid). The sort keys are
/// carried by both halves.
pub fn transform_sort_to_2p(
    sort: LogicalNode,
    factory: &mut PidFactory,
) -> PlanResult<LogicalNode> {
    let kind = sort.node_type();
    let parent_pid = sort.pid();
    let in_schema = sort.in_schema.clone();
    let out_schema = sort.out_schema.clone();
    let NodeVariant::Sort { keys, child: input } = sort.variant else {
        return Err(PlanError::UnsupportedPlan(format!(
            "two-phase sort split over {kind:?}"
        )));
    };

    let child = LogicalNode::from_parts(
        factory.next_pid(),
        in_schema.clone(),
        in_schema,
        NodeVariant::Sort {
            keys: keys.clone(),
            child: input,
        },
    );
    let parent = LogicalNode::from_parts(
        parent_pid,
        child.out_schema.clone(),
        out_schema,
        NodeVariant::Sort {
            keys,
            child: Box::new(child),
        },
    );
    Ok(parent)
}

fn next_intermediate(counter: &mut usize) -> String {
    let name = format!("column_{}", *counter);
    *counter += 1;
    name
}

/// Re-argument every aggregate structurally equal to `pattern`, setting
/// its arguments and phase in place.
fn rewrite_matching_aggs(
    expr: &mut EvalNode,
    pattern: &AggCall,
    new_args: &[EvalNode],
    phase: AggPhase,
) {
    if let EvalNode::Agg(call) = expr
        && call == pattern
    {
        call.args = new_args.to_vec();
        call.phase = phase;
        return;
    }
    for child in expr.children_mut() {
        rewrite_matching_aggs(child, pattern, new_args, phase);
    }
}
