//! The logical operator tree: a tagged sum of node variants with a
//! Leaf/Unary/Binary shape classification.
//!
//! Nodes carry no parent pointers; traversal helpers supply an explicit
//! ancestor stack instead (see [`crate::visit`]). Children live inside
//! their variant, so a subtree is a plain owned value.

use catalog::TableDesc;
use common::{Pid, PidFactory};
use expr::{EvalNode, Target, targets_to_schema};
use std::hash::{Hash, Hasher};
use types::{Column, Schema, SortSpec};

/// Closed tag of every node kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Terminal,
    Scan,
    PartitionedScan,
    TableSubquery,
    Selection,
    Projection,
    GroupBy,
    Having,
    Sort,
    Limit,
    Join,
    Union,
    Intersect,
    Except,
    Insert,
    Store,
    CreateTable,
    DropTable,
    CreateDatabase,
    DropDatabase,
    CreateIndex,
    DropIndex,
}

/// Arity classification of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Leaf,
    Unary,
    Binary,
}

/// Join flavor. Only `Inner` is commutative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
    Cross,
}

/// Set-operation flavor of a [`NodeVariant::SetOp`] node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

/// Operator payloads and children. Children are embedded per variant so
/// arity-dependent code dispatches exhaustively.
#[derive(Debug, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    Root {
        child: Box<LogicalNode>,
    },
    /// Exchange-boundary stand-in: a leaf that carries a schema and
    /// nothing else. Two-phase splitting and node deletion leave one in
    /// a vacated child slot for the caller to wire over.
    Terminal,
    Scan {
        table: String,
        alias: Option<String>,
    },
    PartitionedScan {
        table: String,
        alias: Option<String>,
        partitions: Vec<String>,
    },
    TableSubquery {
        name: String,
        child: Box<LogicalNode>,
    },
    Selection {
        qual: EvalNode,
        child: Box<LogicalNode>,
    },
    Projection {
        targets: Vec<Target>,
        child: Box<LogicalNode>,
    },
    GroupBy {
        grouping: Vec<Column>,
        targets: Vec<Target>,
        distinct: bool,
        child: Box<LogicalNode>,
    },
    Having {
        qual: EvalNode,
        child: Box<LogicalNode>,
    },
    Sort {
        keys: Vec<SortSpec>,
        child: Box<LogicalNode>,
    },
    Limit {
        fetch: u64,
        child: Box<LogicalNode>,
    },
    Join {
        join_type: JoinType,
        qual: Option<EvalNode>,
        left: Box<LogicalNode>,
        right: Box<LogicalNode>,
    },
    SetOp {
        op: SetOpKind,
        all: bool,
        left: Box<LogicalNode>,
        right: Box<LogicalNode>,
    },
    Insert {
        table: String,
        overwrite: bool,
        child: Box<LogicalNode>,
    },
    Store {
        table: String,
        partition_keys: Vec<Column>,
        child: Box<LogicalNode>,
    },
    CreateTable {
        table: String,
        schema: Schema,
    },
    DropTable {
        table: String,
    },
    CreateDatabase {
        database: String,
    },
    DropDatabase {
        database: String,
    },
    CreateIndex {
        index: String,
        table: String,
        columns: Vec<Column>,
        unique: bool,
    },
    DropIndex {
        index: String,
    },
}

/// One node of a logical plan.
///
/// `pid` is plan-local and excluded from equality and hashing; two nodes
/// are deep-equal iff their kinds, payloads, schemas, and children match
/// structurally in positional order.
#[derive(Debug)]
pub struct LogicalNode {
    pid: Pid,
    pub in_schema: Schema,
    pub out_schema: Schema,
    pub variant: NodeVariant,
}

impl PartialEq for LogicalNode {
    fn eq(&self, other: &Self) -> bool {
        self.in_schema == other.in_schema
            && self.out_schema == other.out_schema
            && self.variant == other.variant
    }
}

impl Eq for LogicalNode {}

impl Hash for LogicalNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.in_schema.hash(state);
        self.out_schema.hash(state);
        self.variant.hash(state);
    }
}

impl LogicalNode {
    pub(crate) fn from_parts(
        pid: Pid,
        in_schema: Schema,
        out_schema: Schema,
        variant: NodeVariant,
    ) -> Self {
        Self {
            pid,
            in_schema,
            out_schema,
            variant,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn node_type(&self) -> NodeType {
        use NodeVariant as V;
        match &self.variant {
            V::Root { .. } => NodeType::Root,
            V::Terminal => NodeType::Terminal,
            V::Scan { .. } => NodeType::Scan,
            V::PartitionedScan { .. } => NodeType::PartitionedScan,
            V::TableSubquery { .. } => NodeType::TableSubquery,
            V::Selection { .. } => NodeType::Selection,
            V::Projection { .. } => NodeType::Projection,
            V::GroupBy { .. } => NodeType::GroupBy,
            V::Having { .. } => NodeType::Having,
            V::Sort { .. } => NodeType::Sort,
            V::Limit { .. } => NodeType::Limit,
            V::Join { .. } => NodeType::Join,
            V::SetOp { op, .. } => match op {
                SetOpKind::Union => NodeType::Union,
                SetOpKind::Intersect => NodeType::Intersect,
                SetOpKind::Except => NodeType::Except,
            },
            V::Insert { .. } => NodeType::Insert,
            V::Store { .. } => NodeType::Store,
            V::CreateTable { .. } => NodeType::CreateTable,
            V::DropTable { .. } => NodeType::DropTable,
            V::CreateDatabase { .. } => NodeType::CreateDatabase,
            V::DropDatabase { .. } => NodeType::DropDatabase,
            V::CreateIndex { .. } => NodeType::CreateIndex,
            V::DropIndex { .. } => NodeType::DropIndex,
        }
    }

    pub fn shape(&self) -> Shape {
        use NodeVariant as V;
        match &self.variant {
            V::Terminal
            | V::Scan { .. }
            | V::PartitionedScan { .. }
            | V::CreateTable { .. }
            | V::DropTable { .. }
            | V::CreateDatabase { .. }
            | V::DropDatabase { .. }
            | V::CreateIndex { .. }
            | V::DropIndex { .. } => Shape::Leaf,
            V::Root { .. }
            | V::TableSubquery { .. }
            | V::Selection { .. }
            | V::Projection { .. }
            | V::GroupBy { .. }
            | V::Having { .. }
            | V::Sort { .. }
            | V::Limit { .. }
            | V::Insert { .. }
            | V::Store { .. } => Shape::Unary,
            V::Join { .. } | V::SetOp { .. } => Shape::Binary,
        }
    }

    /// Children left to right.
    pub fn children(&self) -> Vec<&LogicalNode> {
        use NodeVariant as V;
        match &self.variant {
            V::Root { child }
            | V::TableSubquery { child, .. }
            | V::Selection { child, .. }
            | V::Projection { child, .. }
            | V::GroupBy { child, .. }
            | V::Having { child, .. }
            | V::Sort { child, .. }
            | V::Limit { child, .. }
            | V::Insert { child, .. }
            | V::Store { child, .. } => vec![child.as_ref()],
            V::Join { left, right, .. } | V::SetOp { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            V::Terminal
            | V::Scan { .. }
            | V::PartitionedScan { .. }
            | V::CreateTable { .. }
            | V::DropTable { .. }
            | V::CreateDatabase { .. }
            | V::DropDatabase { .. }
            | V::CreateIndex { .. }
            | V::DropIndex { .. } => Vec::new(),
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut LogicalNode> {
        use NodeVariant as V;
        match &mut self.variant {
            V::Root { child }
            | V::TableSubquery { child, .. }
            | V::Selection { child, .. }
            | V::Projection { child, .. }
            | V::GroupBy { child, .. }
            | V::Having { child, .. }
            | V::Sort { child, .. }
            | V::Limit { child, .. }
            | V::Insert { child, .. }
            | V::Store { child, .. } => vec![child.as_mut()],
            V::Join { left, right, .. } | V::SetOp { left, right, .. } => {
                vec![left.as_mut(), right.as_mut()]
            }
            V::Terminal
            | V::Scan { .. }
            | V::PartitionedScan { .. }
            | V::CreateTable { .. }
            | V::DropTable { .. }
            | V::CreateDatabase { .. }
            | V::DropDatabase { .. }
            | V::CreateIndex { .. }
            | V::DropIndex { .. } => Vec::new(),
        }
    }

    /// The only child of a unary node.
    pub fn child(&self) -> Option<&LogicalNode> {
        match self.shape() {
            Shape::Unary => self.children().pop(),
            _ => None,
        }
    }

    pub fn child_mut(&mut self) -> Option<&mut LogicalNode> {
        match self.shape() {
            Shape::Unary => self.children_mut().pop(),
            _ => None,
        }
    }

    /// Left (outer) child of a binary node.
    pub fn left(&self) -> Option<&LogicalNode> {
        match &self.variant {
            NodeVariant::Join { left, .. } | NodeVariant::SetOp { left, .. } => {
                Some(left.as_ref())
            }
            _ => None,
        }
    }

    /// Right (inner) child of a binary node.
    pub fn right(&self) -> Option<&LogicalNode> {
        match &self.variant {
            NodeVariant::Join { right, .. } | NodeVariant::SetOp { right, .. } => {
                Some(right.as_ref())
            }
            _ => None,
        }
    }

    pub(crate) fn left_mut(&mut self) -> Option<&mut LogicalNode> {
        match &mut self.variant {
            NodeVariant::Join { left, .. } | NodeVariant::SetOp { left, .. } => {
                Some(left.as_mut())
            }
            _ => None,
        }
    }

    pub(crate) fn right_mut(&mut self) -> Option<&mut LogicalNode> {
        match &mut self.variant {
            NodeVariant::Join { right, .. } | NodeVariant::SetOp { right, .. } => {
                Some(right.as_mut())
            }
            _ => None,
        }
    }

    /// Canonical relation name of a scan or subquery node.
    pub fn canonical_name(&self) -> Option<&str> {
        match &self.variant {
            NodeVariant::Scan { table, alias }
            | NodeVariant::PartitionedScan { table, alias, .. } => {
                Some(alias.as_deref().unwrap_or(table))
            }
            NodeVariant::TableSubquery { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Deep clone with fresh pids stamped on every node of the subtree.
    ///
    /// There is deliberately no `Clone` impl: an identity copy would
    /// duplicate pids and break plan-wide uniqueness.
    pub fn clone_with(&self, factory: &mut PidFactory) -> LogicalNode {
        use NodeVariant as V;
        let variant = match &self.variant {
            V::Root { child } => V::Root {
                child: Box::new(child.clone_with(factory)),
            },
            V::Terminal => V::Terminal,
            V::Scan { table, alias } => V::Scan {
                table: table.clone(),
                alias: alias.clone(),
            },
            V::PartitionedScan {
                table,
                alias,
                partitions,
            } => V::PartitionedScan {
                table: table.clone(),
                alias: alias.clone(),
                partitions: partitions.clone(),
            },
            V::TableSubquery { name, child } => V::TableSubquery {
                name: name.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::Selection { qual, child } => V::Selection {
                qual: qual.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::Projection { targets, child } => V::Projection {
                targets: targets.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::GroupBy {
                grouping,
                targets,
                distinct,
                child,
            } => V::GroupBy {
                grouping: grouping.clone(),
                targets: targets.clone(),
                distinct: *distinct,
                child: Box::new(child.clone_with(factory)),
            },
            V::Having { qual, child } => V::Having {
                qual: qual.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::Sort { keys, child } => V::Sort {
                keys: keys.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::Limit { fetch, child } => V::Limit {
                fetch: *fetch,
                child: Box::new(child.clone_with(factory)),
            },
            V::Join {
                join_type,
                qual,
                left,
                right,
            } => V::Join {
                join_type: *join_type,
                qual: qual.clone(),
                left: Box::new(left.clone_with(factory)),
                right: Box::new(right.clone_with(factory)),
            },
            V::SetOp {
                op,
                all,
                left,
                right,
            } => V::SetOp {
                op: *op,
                all: *all,
                left: Box::new(left.clone_with(factory)),
                right: Box::new(right.clone_with(factory)),
            },
            V::Insert {
                table,
                overwrite,
                child,
            } => V::Insert {
                table: table.clone(),
                overwrite: *overwrite,
                child: Box::new(child.clone_with(factory)),
            },
            V::Store {
                table,
                partition_keys,
                child,
            } => V::Store {
                table: table.clone(),
                partition_keys: partition_keys.clone(),
                child: Box::new(child.clone_with(factory)),
            },
            V::CreateTable { table, schema } => V::CreateTable {
                table: table.clone(),
                schema: schema.clone(),
            },
            V::DropTable { table } => V::DropTable {
                table: table.clone(),
            },
            V::CreateDatabase { database } => V::CreateDatabase {
                database: database.clone(),
            },
            V::DropDatabase { database } => V::DropDatabase {
                database: database.clone(),
            },
            V::CreateIndex {
                index,
                table,
                columns,
                unique,
            } => V::CreateIndex {
                index: index.clone(),
                table: table.clone(),
                columns: columns.clone(),
                unique: *unique,
            },
            V::DropIndex { index } => V::DropIndex {
                index: index.clone(),
            },
        };
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: self.in_schema.clone(),
            out_schema: self.out_schema.clone(),
            variant,
        }
    }

    /// Stable one-line summary for the explain surface.
    pub fn plan_string(&self) -> String {
        use NodeVariant as V;
        match &self.variant {
            V::Root { .. } => "Root".into(),
            V::Terminal => "Terminal".into(),
            V::Scan { table, alias } => match alias {
                Some(alias) => format!("Scan (table={table} as {alias})"),
                None => format!("Scan (table={table})"),
            },
            V::PartitionedScan {
                table, partitions, ..
            } => format!(
                "PartitionedScan (table={table}, partitions={})",
                partitions.len()
            ),
            V::TableSubquery { name, .. } => format!("TableSubquery (name={name})"),
            V::Selection { qual, .. } => format!("Selection (qual={qual})"),
            V::Projection { targets, .. } => {
                format!("Projection (targets=[{}])", join_display(targets))
            }
            V::GroupBy {
                grouping,
                targets,
                distinct,
                ..
            } => format!(
                "GroupBy ({}keys=[{}], targets=[{}])",
                if *distinct { "distinct, " } else { "" },
                join_display(grouping),
                join_display(targets),
            ),
            V::Having { qual, .. } => format!("Having (qual={qual})"),
            V::Sort { keys, .. } => format!("Sort (keys=[{}])", join_display(keys)),
            V::Limit { fetch, .. } => format!("Limit (fetch={fetch})"),
            V::Join {
                join_type, qual, ..
            } => match qual {
                Some(qual) => format!("Join (type={join_type:?}, qual={qual})"),
                None => format!("Join (type={join_type:?})"),
            },
            V::SetOp { op, all, .. } => format!(
                "{op:?}{}",
                if *all { " (all)" } else { "" }
            ),
            V::Insert {
                table, overwrite, ..
            } => format!("Insert (table={table}, overwrite={overwrite})"),
            V::Store { table, .. } => format!("Store (table={table})"),
            V::CreateTable { table, .. } => format!("CreateTable (table={table})"),
            V::DropTable { table } => format!("DropTable (table={table})"),
            V::CreateDatabase { database } => format!("CreateDatabase (database={database})"),
            V::DropDatabase { database } => format!("DropDatabase (database={database})"),
            V::CreateIndex { index, table, .. } => {
                format!("CreateIndex (index={index}, table={table})")
            }
            V::DropIndex { index } => format!("DropIndex (index={index})"),
        }
    }
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// Constructors. Each establishes the schema-chaining invariant: a unary
// node's input schema is its child's output schema, a binary node's input
// schema is the left-then-right concatenation.
impl LogicalNode {
    pub fn root(factory: &mut PidFactory, child: LogicalNode) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Root {
                child: Box::new(child),
            },
        }
    }

    pub fn terminal(factory: &mut PidFactory, schema: Schema) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Terminal,
        }
    }

    /// Scan over a catalog table. The output schema is the table schema
    /// requalified with the scan's canonical name (the lowercased alias
    /// when present, the table name otherwise).
    pub fn scan(factory: &mut PidFactory, table: &TableDesc, alias: Option<&str>) -> LogicalNode {
        let alias = alias.map(catalog::canonical_name);
        let canonical = alias.clone().unwrap_or_else(|| table.name.clone());
        let schema = table.schema.requalified(&canonical);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Scan {
                table: table.name.clone(),
                alias,
            },
        }
    }

    pub fn partitioned_scan(
        factory: &mut PidFactory,
        table: &TableDesc,
        alias: Option<&str>,
        partitions: Vec<String>,
    ) -> LogicalNode {
        let alias = alias.map(catalog::canonical_name);
        let canonical = alias.clone().unwrap_or_else(|| table.name.clone());
        let schema = table.schema.requalified(&canonical);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::PartitionedScan {
                table: table.name.clone(),
                alias,
                partitions,
            },
        }
    }

    /// A nested query block exposed as a relation named `name`. The
    /// child's output is requalified with the canonical subquery name.
    pub fn table_subquery(
        factory: &mut PidFactory,
        name: &str,
        child: LogicalNode,
    ) -> LogicalNode {
        let name = catalog::canonical_name(name);
        let in_schema = child.out_schema.clone();
        let out_schema = in_schema.requalified(&name);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema,
            out_schema,
            variant: NodeVariant::TableSubquery {
                name,
                child: Box::new(child),
            },
        }
    }

    pub fn selection(factory: &mut PidFactory, qual: EvalNode, child: LogicalNode) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Selection {
                qual,
                child: Box::new(child),
            },
        }
    }

    pub fn projection(
        factory: &mut PidFactory,
        targets: Vec<Target>,
        child: LogicalNode,
    ) -> LogicalNode {
        let in_schema = child.out_schema.clone();
        let out_schema = targets_to_schema(&targets);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema,
            out_schema,
            variant: NodeVariant::Projection {
                targets,
                child: Box::new(child),
            },
        }
    }

    pub fn group_by(
        factory: &mut PidFactory,
        grouping: Vec<Column>,
        targets: Vec<Target>,
        distinct: bool,
        child: LogicalNode,
    ) -> LogicalNode {
        let in_schema = child.out_schema.clone();
        let out_schema = targets_to_schema(&targets);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema,
            out_schema,
            variant: NodeVariant::GroupBy {
                grouping,
                targets,
                distinct,
                child: Box::new(child),
            },
        }
    }

    pub fn having(factory: &mut PidFactory, qual: EvalNode, child: LogicalNode) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Having {
                qual,
                child: Box::new(child),
            },
        }
    }

    pub fn sort(factory: &mut PidFactory, keys: Vec<SortSpec>, child: LogicalNode) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Sort {
                keys,
                child: Box::new(child),
            },
        }
    }

    pub fn limit(factory: &mut PidFactory, fetch: u64, child: LogicalNode) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Limit {
                fetch,
                child: Box::new(child),
            },
        }
    }

    /// Join with left = outer, right = inner ordering.
    pub fn join(
        factory: &mut PidFactory,
        join_type: JoinType,
        qual: Option<EvalNode>,
        left: LogicalNode,
        right: LogicalNode,
    ) -> LogicalNode {
        let in_schema = Schema::concat(&left.out_schema, &right.out_schema);
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: in_schema.clone(),
            out_schema: in_schema,
            variant: NodeVariant::Join {
                join_type,
                qual,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn set_op(
        factory: &mut PidFactory,
        op: SetOpKind,
        all: bool,
        left: LogicalNode,
        right: LogicalNode,
    ) -> LogicalNode {
        let in_schema = Schema::concat(&left.out_schema, &right.out_schema);
        let out_schema = left.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema,
            out_schema,
            variant: NodeVariant::SetOp {
                op,
                all,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn insert(
        factory: &mut PidFactory,
        table: &str,
        overwrite: bool,
        child: LogicalNode,
    ) -> LogicalNode {
        let in_schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema,
            out_schema: Schema::empty(),
            variant: NodeVariant::Insert {
                table: catalog::canonical_name(table),
                overwrite,
                child: Box::new(child),
            },
        }
    }

    /// Store the child's result under `table`, optionally hash-partitioned
    /// by `partition_keys`. The sender half of a shuffle boundary.
    pub fn store(
        factory: &mut PidFactory,
        table: &str,
        partition_keys: Vec<Column>,
        child: LogicalNode,
    ) -> LogicalNode {
        let schema = child.out_schema.clone();
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: schema.clone(),
            out_schema: schema,
            variant: NodeVariant::Store {
                table: catalog::canonical_name(table),
                partition_keys,
                child: Box::new(child),
            },
        }
    }

    pub fn create_table(factory: &mut PidFactory, table: &str, schema: Schema) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::CreateTable {
                table: catalog::canonical_name(table),
                schema,
            },
        }
    }

    pub fn drop_table(factory: &mut PidFactory, table: &str) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::DropTable {
                table: catalog::canonical_name(table),
            },
        }
    }

    pub fn create_database(factory: &mut PidFactory, database: &str) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::CreateDatabase {
                database: catalog::canonical_name(database),
            },
        }
    }

    pub fn drop_database(factory: &mut PidFactory, database: &str) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::DropDatabase {
                database: catalog::canonical_name(database),
            },
        }
    }

    pub fn create_index(
        factory: &mut PidFactory,
        index: &str,
        table: &str,
        columns: Vec<Column>,
        unique: bool,
    ) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::CreateIndex {
                index: catalog::canonical_name(index),
                table: catalog::canonical_name(table),
                columns,
                unique,
            },
        }
    }

    pub fn drop_index(factory: &mut PidFactory, index: &str) -> LogicalNode {
        LogicalNode {
            pid: factory.next_pid(),
            in_schema: Schema::empty(),
            out_schema: Schema::empty(),
            variant: NodeVariant::DropIndex {
                index: catalog::canonical_name(index),
            },
        }
    }
}
