use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Value type tags carried by columns and expressions.
///
/// Used for propagation and equality only; arithmetic over values happens
/// in the execution layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Bool,
    Int4,
    Int8,
    Float8,
    Text,
    Date,
    Timestamp,
    /// The type of an untyped NULL constant.
    Null,
}

impl DataType {
    /// Result type of an arithmetic operator over two operand types.
    ///
    /// Floats absorb integers; a wider integer absorbs a narrower one.
    /// Non-numeric operands keep the left type (the analyzer upstream is
    /// responsible for rejecting them).
    pub fn widened(self, other: DataType) -> DataType {
        use DataType::*;
        match (self, other) {
            (Float8, _) | (_, Float8) => Float8,
            (Int8, _) | (_, Int8) => Int8,
            (Int4, Int4) => Int4,
            (left, _) => left,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Bool => "bool",
            DataType::Int4 => "int4",
            DataType::Int8 => "int8",
            DataType::Float8 => "float8",
            DataType::Text => "text",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Null => "null",
        };
        f.write_str(name)
    }
}

/// A typed constant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Datum {
    Bool(bool),
    Int4(i32),
    Int8(i64),
    Float8(f64),
    Text(String),
    Null,
}

impl Datum {
    pub fn data_type(&self) -> DataType {
        match self {
            Datum::Bool(_) => DataType::Bool,
            Datum::Int4(_) => DataType::Int4,
            Datum::Int8(_) => DataType::Int8,
            Datum::Float8(_) => DataType::Float8,
            Datum::Text(_) => DataType::Text,
            Datum::Null => DataType::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Compare two datums of the same type. Returns `None` for mismatched
    /// types and for NULL operands; callers decide null ordering.
    pub fn cmp_same_type(&self, other: &Datum) -> Option<Ordering> {
        match (self, other) {
            (Datum::Bool(a), Datum::Bool(b)) => Some(a.cmp(b)),
            (Datum::Int4(a), Datum::Int4(b)) => Some(a.cmp(b)),
            (Datum::Int8(a), Datum::Int8(b)) => Some(a.cmp(b)),
            (Datum::Float8(a), Datum::Float8(b)) => Some(a.total_cmp(b)),
            (Datum::Text(a), Datum::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

// Float constants compare and hash by bit pattern so expression trees keep
// derivable structural equality.
impl PartialEq for Datum {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Datum::Bool(a), Datum::Bool(b)) => a == b,
            (Datum::Int4(a), Datum::Int4(b)) => a == b,
            (Datum::Int8(a), Datum::Int8(b)) => a == b,
            (Datum::Float8(a), Datum::Float8(b)) => a.to_bits() == b.to_bits(),
            (Datum::Text(a), Datum::Text(b)) => a == b,
            (Datum::Null, Datum::Null) => true,
            _ => false,
        }
    }
}

impl Eq for Datum {}

impl Hash for Datum {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Datum::Bool(b) => b.hash(state),
            Datum::Int4(v) => v.hash(state),
            Datum::Int8(v) => v.hash(state),
            Datum::Float8(v) => v.to_bits().hash(state),
            Datum::Text(t) => t.hash(state),
            Datum::Null => {}
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Bool(b) => write!(f, "{b}"),
            Datum::Int4(v) => write!(f, "{v}"),
            Datum::Int8(v) => write!(f, "{v}"),
            Datum::Float8(v) => write!(f, "{v}"),
            Datum::Text(t) => write!(f, "'{t}'"),
            Datum::Null => f.write_str("NULL"),
        }
    }
}

/// A column: optional relation qualifier, local name, and value type.
///
/// Equality is qualified name plus type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub qualifier: Option<String>,
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(
        qualifier: impl Into<String>,
        name: impl Into<String>,
        data_type: DataType,
    ) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
            data_type,
        }
    }

    pub fn unqualified(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            data_type,
        }
    }

    pub fn has_qualifier(&self) -> bool {
        self.qualifier.is_some()
    }

    /// `qualifier.name`, or the bare local name when unqualified.
    pub fn qualified_name(&self) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Drop the qualifier, keeping the local name and type.
    pub fn clear_qualifier(&mut self) {
        self.qualifier = None;
    }

    /// Replace the qualifier with `qualifier`.
    pub fn requalify(&mut self, qualifier: &str) {
        self.qualifier = Some(qualifier.to_string());
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// An ordered sequence of columns.
///
/// Qualified names are unique within one schema; plan constructors keep
/// that invariant, the catalog validates it at table creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn empty() -> Self {
        Self { columns: Vec::new() }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Membership by qualified name.
    pub fn contains(&self, qualified_name: &str) -> bool {
        self.columns
            .iter()
            .any(|c| c.qualified_name() == qualified_name)
    }

    /// First column with the given local name, in declaration order.
    /// Ambiguity between qualifiers is a caller-resolved condition.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_by_qualified_name(&self, qualified_name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.qualified_name() == qualified_name)
    }

    /// Position of a column by qualified name.
    pub fn column_index(&self, qualified_name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.qualified_name() == qualified_name)
    }

    /// Left-then-right concatenation, as consumed by binary operators.
    pub fn concat(left: &Schema, right: &Schema) -> Schema {
        let mut columns = left.columns.clone();
        columns.extend(right.columns.iter().cloned());
        Schema { columns }
    }

    /// A copy of this schema with every column requalified.
    pub fn requalified(&self, qualifier: &str) -> Schema {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.requalify(qualifier);
                c
            })
            .collect();
        Schema { columns }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} ({})", c.qualified_name(), c.data_type))
            .collect();
        write!(f, "{{{}}}", cols.join(", "))
    }
}

/// One ordering key of a sort: column, direction, null placement.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub ascending: bool,
    pub nulls_first: bool,
}

impl SortSpec {
    /// Ascending, nulls-last.
    pub fn new(column: Column) -> Self {
        Self {
            column,
            ascending: true,
            nulls_first: false,
        }
    }

    pub fn descending(column: Column) -> Self {
        Self {
            column,
            ascending: false,
            nulls_first: false,
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.column.qualified_name(),
            if self.ascending { "asc" } else { "desc" },
            if self.nulls_first { " nulls-first" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cmp::Ordering::{Equal, Greater, Less};

    #[test]
    fn cmp_same_type_works() {
        assert_eq!(Datum::Int4(1).cmp_same_type(&Datum::Int4(2)), Some(Less));
        assert_eq!(
            Datum::Int4(1).cmp_same_type(&Datum::Text("1".into())),
            None
        );
        assert_eq!(Datum::Null.cmp_same_type(&Datum::Int4(1)), None);
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(Datum::Float8(1.5), Datum::Float8(1.5));
        assert_ne!(Datum::Float8(0.0), Datum::Float8(-0.0));
    }

    #[test]
    fn column_equality_is_qualified_name_plus_type() {
        let a = Column::new("t", "x", DataType::Int4);
        let b = Column::new("t", "x", DataType::Int4);
        let c = Column::new("u", "x", DataType::Int4);
        let d = Column::new("t", "x", DataType::Int8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn schema_lookup_prefers_declaration_order() {
        let schema = Schema::new(vec![
            Column::new("a", "x", DataType::Int4),
            Column::new("b", "x", DataType::Int8),
        ]);

        let first = schema.column_by_name("x").unwrap();
        assert_eq!(first.qualifier.as_deref(), Some("a"));
        assert!(schema.contains("b.x"));
        assert!(!schema.contains("c.x"));

        let exact = schema.column_by_qualified_name("b.x").unwrap();
        assert_eq!(exact.data_type, DataType::Int8);
        assert_eq!(schema.column_index("b.x"), Some(1));
    }

    #[test]
    fn schema_concat_keeps_left_then_right() {
        let left = Schema::new(vec![Column::new("a", "x", DataType::Int4)]);
        let right = Schema::new(vec![Column::new("b", "y", DataType::Text)]);
        let merged = Schema::concat(&left, &right);

        let names: Vec<String> = merged.iter().map(|c| c.qualified_name()).collect();
        assert_eq!(names, vec!["a.x", "b.y"]);
    }

    #[test]
    fn requalified_schema_rewrites_every_column() {
        let schema = Schema::new(vec![
            Column::new("t", "x", DataType::Int4),
            Column::unqualified("y", DataType::Text),
        ]);

        let sub = schema.requalified("s");
        assert!(sub.contains("s.x"));
        assert!(sub.contains("s.y"));
        assert!(!sub.contains("t.x"));
    }

    #[test]
    fn serde_round_trip_stability() {
        let schema = Schema::new(vec![
            Column::new("t", "x", DataType::Int4),
            Column::unqualified("label", DataType::Text),
        ]);

        let json = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }

    proptest! {
        #[test]
        fn int_order_is_antisymmetric(i in any::<i64>(), j in any::<i64>()) {
            let a = Datum::Int8(i);
            let b = Datum::Int8(j);
            match (a.cmp_same_type(&b), b.cmp_same_type(&a)) {
                (Some(o1), Some(o2)) => prop_assert_eq!(o1, o2.reverse()),
                _ => prop_assert!(false, "same-type compare returned None"),
            }
        }

        #[test]
        fn text_cmp_matches_std(a in ".*", b in ".*") {
            let va = Datum::Text(a.clone());
            let vb = Datum::Text(b.clone());
            prop_assert_eq!(va.cmp_same_type(&vb), Some(a.cmp(&b)));
        }

        #[test]
        fn widened_is_symmetric_for_numerics(
            a in prop_oneof![Just(DataType::Int4), Just(DataType::Int8), Just(DataType::Float8)],
            b in prop_oneof![Just(DataType::Int4), Just(DataType::Int8), Just(DataType::Float8)],
        ) {
            prop_assert_eq!(a.widened(b), b.widened(a));
        }
    }

    #[test]
    fn widened_promotes_toward_float() {
        assert_eq!(DataType::Int4.widened(DataType::Int8), DataType::Int8);
        assert_eq!(DataType::Int8.widened(DataType::Float8), DataType::Float8);
        assert_eq!(DataType::Int4.widened(DataType::Int4), DataType::Int4);
    }

    #[test]
    fn sort_spec_defaults() {
        let spec = SortSpec::new(Column::new("t", "x", DataType::Int4));
        assert!(spec.ascending);
        assert!(!spec.nulls_first);
        assert_eq!(spec.to_string(), "t.x asc");
        assert_eq!(Equal, Datum::Int4(3).cmp_same_type(&Datum::Int4(3)).unwrap());
        assert_eq!(Greater, Datum::Int4(4).cmp_same_type(&Datum::Int4(3)).unwrap());
    }
}
