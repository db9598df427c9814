use super::*;
use catalog::FunctionKind;
use types::DataType::*;

fn col(qualifier: &str, name: &str) -> Column {
    Column::new(qualifier, name, Int4)
}

fn sum_desc() -> FunctionDesc {
    FunctionDesc::new("sum", vec![Int4], Int8, FunctionKind::Aggregate)
}

fn sum(expr: EvalNode) -> EvalNode {
    EvalNode::Agg(AggCall::new(sum_desc(), vec![expr]))
}

#[test]
fn column_refs_are_collected_in_source_order_with_duplicates() {
    // a.x = b.y and a.x > 1
    let expr = EvalNode::binary(
        BinaryOp::And,
        EvalNode::binary(
            BinaryOp::Eq,
            EvalNode::Field(col("a", "x")),
            EvalNode::Field(col("b", "y")),
        ),
        EvalNode::binary(
            BinaryOp::Gt,
            EvalNode::Field(col("a", "x")),
            EvalNode::Const(Datum::Int4(1)),
        ),
    );

    let all: Vec<String> = find_all_column_refs(&expr)
        .iter()
        .map(|c| c.qualified_name())
        .collect();
    assert_eq!(all, vec!["a.x", "b.y", "a.x"]);

    let distinct: Vec<String> = find_distinct_ref_columns(&expr)
        .iter()
        .map(|c| c.qualified_name())
        .collect();
    assert_eq!(distinct, vec!["a.x", "b.y"]);
}

#[test]
fn distinct_agg_collection_uses_structural_equality() {
    let twice = EvalNode::binary(
        BinaryOp::Add,
        sum(EvalNode::Field(col("t", "v"))),
        sum(EvalNode::Field(col("t", "v"))),
    );
    assert_eq!(find_distinct_agg_functions(&twice).len(), 1);

    let distinct_flag_differs = EvalNode::binary(
        BinaryOp::Add,
        sum(EvalNode::Field(col("t", "v"))),
        EvalNode::Agg(AggCall::distinct(
            sum_desc(),
            vec![EvalNode::Field(col("t", "v"))],
        )),
    );
    assert_eq!(find_distinct_agg_functions(&distinct_flag_differs).len(), 2);
}

#[test]
fn comparison_detection() {
    let cmp = EvalNode::binary(
        BinaryOp::Le,
        EvalNode::Field(col("a", "x")),
        EvalNode::Const(Datum::Int4(3)),
    );
    assert!(is_comparison_op(&cmp));

    let logical = EvalNode::binary(BinaryOp::And, cmp.clone(), cmp.clone());
    assert!(!is_comparison_op(&logical));
    assert!(!is_comparison_op(&EvalNode::Field(col("a", "x"))));

    assert!(BinaryOp::Add.is_arithmetic());
    assert!(!BinaryOp::Le.is_arithmetic());
    assert!(BinaryOp::Or.is_logical());
}

#[test]
fn positional_child_access() {
    let cmp = EvalNode::binary(
        BinaryOp::Lt,
        EvalNode::Field(col("a", "x")),
        EvalNode::Const(Datum::Int4(3)),
    );
    assert_eq!(cmp.left(), Some(&EvalNode::Field(col("a", "x"))));
    assert_eq!(cmp.right(), Some(&EvalNode::Const(Datum::Int4(3))));
    assert_eq!(cmp.children().len(), 2);

    let not = EvalNode::Unary {
        op: UnaryOp::Not,
        expr: Box::new(cmp.clone()),
    };
    assert_eq!(not.left(), Some(&cmp));
    assert_eq!(not.right(), None);

    assert_eq!(EvalNode::Field(col("a", "x")).left(), None);
}

#[test]
fn scalar_function_calls_carry_their_descriptor() {
    let upper = FunctionDesc::new("upper", vec![Text], Text, FunctionKind::Scalar);
    let call = EvalNode::Func(FuncCall {
        func: upper,
        args: vec![EvalNode::Field(Column::new("t", "name", Text))],
    });

    assert_eq!(call.data_type(), Text);
    assert_eq!(call.to_string(), "upper(t.name)");
    assert_eq!(call.label(), "upper");

    let target = Target::new(call);
    assert_eq!(target.column_name(), "upper");
}

#[test]
fn join_qual_requires_one_ref_per_side_and_distinct_qualifiers() {
    let good = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::Field(col("a", "x")),
        EvalNode::Field(col("b", "y")),
    );
    assert!(is_join_qual(&good));

    // Same qualifier on both sides.
    let same = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::Field(col("a", "x")),
        EvalNode::Field(col("a", "z")),
    );
    assert!(!is_join_qual(&same));

    // Literal side has no reference.
    let range = EvalNode::binary(
        BinaryOp::Gt,
        EvalNode::Field(col("a", "k")),
        EvalNode::Const(Datum::Int4(5)),
    );
    assert!(!is_join_qual(&range));

    // Two refs on one side.
    let two_refs = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::binary(
            BinaryOp::Add,
            EvalNode::Field(col("a", "x")),
            EvalNode::Field(col("a", "k")),
        ),
        EvalNode::Field(col("b", "y")),
    );
    assert!(!is_join_qual(&two_refs));

    // Unqualified reference.
    let unqualified = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::Field(Column::unqualified("x", Int4)),
        EvalNode::Field(col("b", "y")),
    );
    assert!(!is_join_qual(&unqualified));
}

#[test]
fn join_qual_holds_for_non_equality_comparisons() {
    let lt = EvalNode::binary(
        BinaryOp::Lt,
        EvalNode::Field(col("a", "x")),
        EvalNode::Field(col("b", "y")),
    );
    assert!(is_join_qual(&lt));
}

#[test]
fn targets_to_schema_uses_alias_then_field_then_label() {
    let targets = vec![
        Target::aliased(EvalNode::Field(col("t", "g")), "grp"),
        Target::new(EvalNode::Field(col("t", "v"))),
        Target::new(sum(EvalNode::Field(col("t", "v")))),
    ];

    let schema = targets_to_schema(&targets);
    let names: Vec<String> = schema.iter().map(|c| c.qualified_name()).collect();
    assert_eq!(names, vec!["grp", "t.v", "sum"]);
    assert_eq!(schema.columns()[0].data_type, Int4);
    assert_eq!(schema.columns()[2].data_type, Int8);
}

#[test]
fn schema_to_targets_is_the_reversible_shape() {
    let schema = Schema::new(vec![col("t", "a"), col("t", "b")]);
    let targets = schema_to_targets(&schema);

    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.alias.is_none()));
    assert_eq!(targets_to_schema(&targets), schema);
}

#[test]
fn strip_targets_removes_qualifiers_and_is_idempotent() {
    let targets = vec![
        Target::new(EvalNode::Field(col("t", "a"))),
        Target::new(sum(EvalNode::Field(col("t", "v")))),
    ];

    let stripped = strip_targets(&targets);
    match &stripped[0].expr {
        EvalNode::Field(c) => {
            assert!(!c.has_qualifier());
            assert_eq!(c.name, "a");
        }
        other => panic!("expected field, got {other:?}"),
    }
    // Qualifiers inside non-field targets are left alone.
    assert_eq!(stripped[1], targets[1]);

    assert_eq!(strip_targets(&stripped), stripped);
}

#[test]
fn value_types_propagate() {
    let cmp = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::Field(col("a", "x")),
        EvalNode::Const(Datum::Int4(1)),
    );
    assert_eq!(cmp.data_type(), Bool);

    let arith = EvalNode::binary(
        BinaryOp::Add,
        EvalNode::Field(col("a", "x")),
        EvalNode::Const(Datum::Int8(1)),
    );
    assert_eq!(arith.data_type(), Int8);

    assert_eq!(sum(EvalNode::Field(col("t", "v"))).data_type(), Int8);
}

#[test]
fn display_is_stable() {
    let qual = EvalNode::binary(
        BinaryOp::Eq,
        EvalNode::Field(col("a", "x")),
        EvalNode::Field(col("b", "y")),
    );
    assert_eq!(qual.to_string(), "a.x = b.y");

    let agg = EvalNode::Agg(AggCall::distinct(
        sum_desc(),
        vec![EvalNode::Field(col("t", "v"))],
    ));
    assert_eq!(agg.to_string(), "sum(distinct t.v)");

    let target = Target::aliased(agg, "total");
    assert_eq!(target.to_string(), "sum(distinct t.v) as total");
}
