//! Predicate-placement and join-key analyses.

use crate::node::{JoinType, LogicalNode, NodeVariant};
use crate::visit::relation_lineage_within_block;
use common::{PlanError, PlanResult};
use expr::{EvalNode, find_all_column_refs, find_distinct_ref_columns, is_join_qual};
use hashbrown::HashSet;
use std::cmp::Ordering;
use types::{Column, Datum, Schema, SortSpec};

/// Whether `expr` may be evaluated at `node`'s position in the plan.
///
/// At a join, the expression must reference exactly two relations, one
/// covered by each side's query-block lineage (subquery aliases count,
/// their internals do not). At a scan or subquery, every reference must
/// carry the node's canonical name as qualifier and resolve against the
/// node's schema. Anywhere else, every reference must resolve by
/// qualified name against the node's input schema.
pub fn can_be_evaluated(expr: &EvalNode, node: &LogicalNode) -> bool {
    match &node.variant {
        NodeVariant::Join { left, right, .. } => {
            let refs = find_distinct_ref_columns(expr);
            if refs.iter().any(|c| !c.has_qualifier()) {
                return false;
            }
            let qualifiers: HashSet<&str> =
                refs.iter().filter_map(|c| c.qualifier.as_deref()).collect();
            if qualifiers.len() != 2 {
                return false;
            }
            let left_lineage = relation_lineage_within_block(left);
            let right_lineage = relation_lineage_within_block(right);
            let mut iter = qualifiers.into_iter();
            let first = iter.next().expect("two qualifiers");
            let second = iter.next().expect("two qualifiers");
            (left_lineage.contains(first) && right_lineage.contains(second))
                || (left_lineage.contains(second) && right_lineage.contains(first))
        }
        NodeVariant::Scan { .. } | NodeVariant::PartitionedScan { .. } => {
            let name = node.canonical_name().expect("scans are relations");
            find_all_column_refs(expr).iter().all(|c| {
                c.qualifier.as_deref() == Some(name)
                    && node.in_schema.column_by_name(&c.name).is_some()
            })
        }
        NodeVariant::TableSubquery { name, .. } => {
            find_all_column_refs(expr).iter().all(|c| {
                c.qualifier.as_deref() == Some(name.as_str())
                    && node.out_schema.column_by_name(&c.name).is_some()
            })
        }
        _ => find_all_column_refs(expr)
            .iter()
            .all(|c| node.in_schema.contains(&c.qualified_name())),
    }
}

/// Extract equi-join key pairs from a join predicate.
///
/// Every subexpression recognized as a join qual contributes one pair;
/// each side is assigned to whichever schema contains its qualified name,
/// so pair ordering is always `(from left schema, from right schema)`
/// regardless of how the predicate was written. Range and single-relation
/// conjuncts are ignored.
pub fn join_key_pairs(
    join_qual: &EvalNode,
    left: &Schema,
    right: &Schema,
) -> PlanResult<Vec<(Column, Column)>> {
    let mut pairs = Vec::new();
    collect_key_pairs(join_qual, left, right, &mut pairs)?;
    Ok(pairs)
}

fn collect_key_pairs(
    expr: &EvalNode,
    left: &Schema,
    right: &Schema,
    pairs: &mut Vec<(Column, Column)>,
) -> PlanResult<()> {
    if is_join_qual(expr) {
        let (lhs, rhs) = match expr {
            EvalNode::Binary {
                left: lhs,
                right: rhs,
                ..
            } => (lhs, rhs),
            _ => unreachable!("join quals are binary"),
        };
        let a = find_all_column_refs(lhs).remove(0);
        let b = find_all_column_refs(rhs).remove(0);

        let pair = if left.contains(&a.qualified_name()) && right.contains(&b.qualified_name()) {
            (a, b)
        } else if left.contains(&b.qualified_name()) && right.contains(&a.qualified_name()) {
            (b, a)
        } else {
            return Err(PlanError::MalformedJoinPredicate(format!(
                "cannot assign {} and {} to the join inputs",
                a.qualified_name(),
                b.qualified_name()
            )));
        };
        pairs.push(pair);
        return Ok(());
    }
    for child in expr.children() {
        collect_key_pairs(child, left, right, pairs)?;
    }
    Ok(())
}

/// Ascending sort specs over the join keys of each side, in key-pair
/// order. Defaults: ascending, nulls-last.
pub fn sort_specs_from_join_qual(
    join_qual: &EvalNode,
    left: &Schema,
    right: &Schema,
) -> PlanResult<(Vec<SortSpec>, Vec<SortSpec>)> {
    let pairs = join_key_pairs(join_qual, left, right)?;
    let left_specs = pairs.iter().map(|(l, _)| SortSpec::new(l.clone())).collect();
    let right_specs = pairs.into_iter().map(|(_, r)| SortSpec::new(r)).collect();
    Ok((left_specs, right_specs))
}

/// Tuple comparators over the join keys of each side, pairwise aligned
/// with [`sort_specs_from_join_qual`].
pub fn comparators_from_join_qual(
    join_qual: &EvalNode,
    left: &Schema,
    right: &Schema,
) -> PlanResult<(TupleComparator, TupleComparator)> {
    let (left_specs, right_specs) = sort_specs_from_join_qual(join_qual, left, right)?;
    Ok((
        TupleComparator::new(left, &left_specs)?,
        TupleComparator::new(right, &right_specs)?,
    ))
}

/// TRUE only for inner joins; every other flavor is order-sensitive.
pub fn is_commutative_join(join_type: JoinType) -> bool {
    join_type == JoinType::Inner
}

/// Compares tuples of one schema by a list of sort specs.
#[derive(Clone, Debug)]
pub struct TupleComparator {
    keys: Vec<ComparatorKey>,
}

#[derive(Clone, Debug)]
struct ComparatorKey {
    index: usize,
    ascending: bool,
    nulls_first: bool,
}

impl TupleComparator {
    /// Resolve each spec's column against `schema` by qualified name.
    pub fn new(schema: &Schema, specs: &[SortSpec]) -> PlanResult<Self> {
        let keys = specs
            .iter()
            .map(|spec| {
                let index = schema
                    .column_index(&spec.column.qualified_name())
                    .ok_or_else(|| {
                        PlanError::Invariant(format!(
                            "sort key {} is not in schema {schema}",
                            spec.column.qualified_name()
                        ))
                    })?;
                Ok(ComparatorKey {
                    index,
                    ascending: spec.ascending,
                    nulls_first: spec.nulls_first,
                })
            })
            .collect::<PlanResult<Vec<_>>>()?;
        Ok(Self { keys })
    }

    /// Lexicographic comparison over the resolved keys. Null placement
    /// follows each key's spec; mismatched value types compare equal and
    /// defer to later keys.
    pub fn compare(&self, a: &[Datum], b: &[Datum]) -> Ordering {
        for key in &self.keys {
            let (va, vb) = (&a[key.index], &b[key.index]);
            let ord = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => {
                    if key.nulls_first {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    }
                }
                (false, true) => {
                    if key.nulls_first {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    }
                }
                (false, false) => {
                    let ord = va.cmp_same_type(vb).unwrap_or(Ordering::Equal);
                    if key.ascending { ord } else { ord.reverse() }
                }
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
