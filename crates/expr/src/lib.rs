#[cfg(test)]
mod tests;

use catalog::FunctionDesc;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::{Column, DataType, Datum, Schema};

/// Binary comparison, logical, and arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        use BinaryOp::*;
        matches!(self, Eq | Ne | Lt | Le | Gt | Ge)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_arithmetic(self) -> bool {
        use BinaryOp::*;
        matches!(self, Add | Sub | Mul | Div | Mod)
    }

    pub fn symbol(self) -> &'static str {
        use BinaryOp::*;
        match self {
            Eq => "=",
            Ne => "<>",
            Lt => "<",
            Le => "<=",
            Gt => ">",
            Ge => ">=",
            And => "and",
            Or => "or",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Which half of a two-phase aggregation an aggregate call computes.
///
/// `Final` is the default and also describes single-phase evaluation;
/// `First` marks the partial, per-partition computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggPhase {
    First,
    Final,
}

/// A scalar function call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncCall {
    pub func: FunctionDesc,
    pub args: Vec<EvalNode>,
}

/// An aggregate function call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggCall {
    pub func: FunctionDesc,
    pub args: Vec<EvalNode>,
    pub distinct: bool,
    pub phase: AggPhase,
}

impl AggCall {
    pub fn new(func: FunctionDesc, args: Vec<EvalNode>) -> Self {
        Self {
            func,
            args,
            distinct: false,
            phase: AggPhase::Final,
        }
    }

    pub fn distinct(func: FunctionDesc, args: Vec<EvalNode>) -> Self {
        Self {
            func,
            args,
            distinct: true,
            phase: AggPhase::Final,
        }
    }
}

/// A scalar expression tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvalNode {
    /// Column reference.
    Field(Column),
    /// Typed constant.
    Const(Datum),
    Unary {
        op: UnaryOp,
        expr: Box<EvalNode>,
    },
    Binary {
        op: BinaryOp,
        left: Box<EvalNode>,
        right: Box<EvalNode>,
    },
    Func(FuncCall),
    Agg(AggCall),
}

impl EvalNode {
    pub fn binary(op: BinaryOp, left: EvalNode, right: EvalNode) -> Self {
        EvalNode::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Left operand for binary nodes, sole operand for unary nodes.
    pub fn left(&self) -> Option<&EvalNode> {
        match self {
            EvalNode::Binary { left, .. } => Some(left),
            EvalNode::Unary { expr, .. } => Some(expr),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&EvalNode> {
        match self {
            EvalNode::Binary { right, .. } => Some(right),
            _ => None,
        }
    }

    /// Positional children, left to right.
    pub fn children(&self) -> Vec<&EvalNode> {
        match self {
            EvalNode::Field(_) | EvalNode::Const(_) => Vec::new(),
            EvalNode::Unary { expr, .. } => vec![expr.as_ref()],
            EvalNode::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            EvalNode::Func(FuncCall { args, .. }) => args.iter().collect(),
            EvalNode::Agg(AggCall { args, .. }) => args.iter().collect(),
        }
    }

    /// Positional children, left to right, mutable. Used by rewrites that
    /// re-argument subexpressions in place.
    pub fn children_mut(&mut self) -> Vec<&mut EvalNode> {
        match self {
            EvalNode::Field(_) | EvalNode::Const(_) => Vec::new(),
            EvalNode::Unary { expr, .. } => vec![expr.as_mut()],
            EvalNode::Binary { left, right, .. } => vec![left.as_mut(), right.as_mut()],
            EvalNode::Func(FuncCall { args, .. }) => args.iter_mut().collect(),
            EvalNode::Agg(AggCall { args, .. }) => args.iter_mut().collect(),
        }
    }

    /// Computed value type of this expression.
    pub fn data_type(&self) -> DataType {
        match self {
            EvalNode::Field(column) => column.data_type,
            EvalNode::Const(datum) => datum.data_type(),
            EvalNode::Unary { op, expr } => match op {
                UnaryOp::Not => DataType::Bool,
                UnaryOp::Neg => expr.data_type(),
            },
            EvalNode::Binary { op, left, right } => {
                if op.is_comparison() || op.is_logical() {
                    DataType::Bool
                } else {
                    left.data_type().widened(right.data_type())
                }
            }
            EvalNode::Func(call) => call.func.return_type,
            EvalNode::Agg(call) => call.func.return_type,
        }
    }

    /// Default output name for a target without an alias.
    pub fn label(&self) -> String {
        match self {
            EvalNode::Field(column) => column.name.clone(),
            EvalNode::Const(datum) => datum.to_string(),
            EvalNode::Func(call) => call.func.name.clone(),
            EvalNode::Agg(call) => call.func.name.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for EvalNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalNode::Field(column) => write!(f, "{}", column.qualified_name()),
            EvalNode::Const(datum) => write!(f, "{datum}"),
            EvalNode::Unary { op, expr } => match op {
                UnaryOp::Not => write!(f, "not {expr}"),
                UnaryOp::Neg => write!(f, "-{expr}"),
            },
            EvalNode::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.symbol())
            }
            EvalNode::Func(call) => {
                let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", call.func.name, args.join(", "))
            }
            EvalNode::Agg(call) => {
                let args: Vec<String> = call.args.iter().map(|a| a.to_string()).collect();
                write!(
                    f,
                    "{}({}{})",
                    call.func.name,
                    if call.distinct { "distinct " } else { "" },
                    args.join(", ")
                )
            }
        }
    }
}

/// A named output expression of a projection or aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub expr: EvalNode,
    pub alias: Option<String>,
}

impl Target {
    pub fn new(expr: EvalNode) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: EvalNode, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(alias.into()),
        }
    }

    /// Output column name: the alias if set, the expression's default
    /// name otherwise.
    pub fn column_name(&self) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => self.expr.label(),
        }
    }

    /// The output column this target produces. An aliased target yields
    /// an unqualified column named by the alias; a bare field reference
    /// passes its column through, qualifier included.
    pub fn output_column(&self) -> Column {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => Column::unqualified(alias, self.expr.data_type()),
            (None, EvalNode::Field(column)) => column.clone(),
            (None, expr) => Column::unqualified(expr.label(), expr.data_type()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} as {alias}", self.expr),
            None => write!(f, "{}", self.expr),
        }
    }
}

/// Every field reference in `expr`, pre-order, duplicates preserved.
pub fn find_all_column_refs(expr: &EvalNode) -> Vec<Column> {
    let mut refs = Vec::new();
    collect_column_refs(expr, &mut refs);
    refs
}

fn collect_column_refs(expr: &EvalNode, out: &mut Vec<Column>) {
    if let EvalNode::Field(column) = expr {
        out.push(column.clone());
    }
    for child in expr.children() {
        collect_column_refs(child, out);
    }
}

/// Referenced columns in source order, deduplicated by qualified name.
pub fn find_distinct_ref_columns(expr: &EvalNode) -> Vec<Column> {
    let mut distinct: Vec<Column> = Vec::new();
    for column in find_all_column_refs(expr) {
        if !distinct
            .iter()
            .any(|c| c.qualified_name() == column.qualified_name())
        {
            distinct.push(column);
        }
    }
    distinct
}

/// Aggregate calls inside `expr`, pre-order, deduplicated by structural
/// equality (function, arguments, distinct flag).
pub fn find_distinct_agg_functions(expr: &EvalNode) -> Vec<AggCall> {
    let mut aggs: Vec<AggCall> = Vec::new();
    collect_agg_functions(expr, &mut aggs);
    aggs
}

fn collect_agg_functions(expr: &EvalNode, out: &mut Vec<AggCall>) {
    if let EvalNode::Agg(call) = expr {
        if !out.contains(call) {
            out.push(call.clone());
        }
    }
    for child in expr.children() {
        collect_agg_functions(child, out);
    }
}

/// True for `=`, `<>`, `<`, `<=`, `>`, `>=` at the top of `expr`.
pub fn is_comparison_op(expr: &EvalNode) -> bool {
    matches!(expr, EvalNode::Binary { op, .. } if op.is_comparison())
}

/// A join qual is a comparison with exactly one column reference on each
/// side, the two references qualified by different relations. Unqualified
/// references disqualify: a join key connects two named relations.
pub fn is_join_qual(expr: &EvalNode) -> bool {
    let EvalNode::Binary { op, left, right } = expr else {
        return false;
    };
    if !op.is_comparison() {
        return false;
    }
    let left_refs = find_all_column_refs(left);
    let right_refs = find_all_column_refs(right);
    if left_refs.len() != 1 || right_refs.len() != 1 {
        return false;
    }
    match (&left_refs[0].qualifier, &right_refs[0].qualifier) {
        (Some(lq), Some(rq)) => lq != rq,
        _ => false,
    }
}

/// The output schema produced by a target list.
pub fn targets_to_schema(targets: &[Target]) -> Schema {
    Schema::new(targets.iter().map(Target::output_column).collect())
}

/// Wrap each column of `schema` in a bare field-reference target.
pub fn schema_to_targets(schema: &Schema) -> Vec<Target> {
    schema
        .iter()
        .map(|c| Target::new(EvalNode::Field(c.clone())))
        .collect()
}

/// A deep-cloned copy of `targets` in which every bare field-reference
/// target has its column's qualifier removed. Used when pushing targets
/// across relation boundaries. Idempotent.
pub fn strip_targets(targets: &[Target]) -> Vec<Target> {
    targets
        .iter()
        .map(|t| {
            let mut t = t.clone();
            if let EvalNode::Field(column) = &mut t.expr {
                column.clear_qualifier();
            }
            t
        })
        .collect()
}
