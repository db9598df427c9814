use std::{fs, path::Path};

use ahash::RandomState;
use common::{PlanError, PlanResult};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use types::{Column, DataType, Schema};
use uuid::Uuid;

type Map<K, V> = HashMap<K, V, RandomState>;

/// Case-normalized identifier, as stored and looked up everywhere.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}

/// Scalar vs. aggregate function classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
}

/// Signature of a registered function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDesc {
    pub name: String,
    pub arg_types: Vec<DataType>,
    pub return_type: DataType,
    pub kind: FunctionKind,
}

impl FunctionDesc {
    pub fn new(
        name: impl Into<String>,
        arg_types: Vec<DataType>,
        return_type: DataType,
        kind: FunctionKind,
    ) -> Self {
        Self {
            name: canonical_name(&name.into()),
            arg_types,
            return_type,
            kind,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == FunctionKind::Aggregate
    }
}

/// How a table's rows are distributed over partitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionMethod {
    Hash { columns: Vec<String>, partitions: u32 },
    Range { columns: Vec<String> },
}

/// Links catalog entries to physical storage artifacts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageDescriptor {
    pub file_id: Uuid,
}

impl StorageDescriptor {
    pub fn new() -> Self {
        Self {
            file_id: Uuid::new_v4(),
        }
    }
}

impl Default for StorageDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata describing an index on a table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDesc {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

/// Metadata describing a registered table.
///
/// The stored schema is qualified with the table's canonical name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableDesc {
    pub name: String,
    pub schema: Schema,
    pub partition: Option<PartitionMethod>,
    pub storage: StorageDescriptor,
    pub indexes: Vec<IndexDesc>,
    #[serde(skip)]
    #[serde(default)]
    index_lookup: Map<String, usize>,
}

impl TableDesc {
    fn new(name: String, schema: Schema, partition: Option<PartitionMethod>) -> Self {
        let mut table = Self {
            name,
            schema,
            partition,
            storage: StorageDescriptor::new(),
            indexes: Vec::new(),
            index_lookup: Map::default(),
        };
        table.rebuild_index_lookup();
        table
    }

    pub fn has_index(&self, index_name: &str) -> bool {
        self.index_lookup.contains_key(&canonical_name(index_name))
    }

    pub fn index(&self, index_name: &str) -> PlanResult<&IndexDesc> {
        let idx = self
            .index_lookup
            .get(&canonical_name(index_name))
            .copied()
            .ok_or_else(|| {
                PlanError::Catalog(format!(
                    "index '{index_name}' does not exist on table '{}'",
                    self.name
                ))
            })?;
        Ok(&self.indexes[idx])
    }

    pub fn indexes(&self) -> &[IndexDesc] {
        &self.indexes
    }

    fn add_index(&mut self, index: IndexDesc) -> PlanResult<()> {
        if self.index_lookup.contains_key(&index.name) {
            return Err(PlanError::Catalog(format!(
                "index '{}' already exists on table '{}'",
                index.name, self.name
            )));
        }
        self.indexes.push(index);
        self.rebuild_index_lookup();
        Ok(())
    }

    fn remove_index(&mut self, index_name: &str) -> PlanResult<()> {
        let idx = self
            .index_lookup
            .get(&canonical_name(index_name))
            .copied()
            .ok_or_else(|| {
                PlanError::Catalog(format!(
                    "index '{index_name}' does not exist on table '{}'",
                    self.name
                ))
            })?;
        self.indexes.remove(idx);
        self.rebuild_index_lookup();
        Ok(())
    }

    fn rebuild_index_lookup(&mut self) {
        self.index_lookup.clear();
        for (idx, index) in self.indexes.iter().enumerate() {
            self.index_lookup.insert(index.name.clone(), idx);
        }
    }
}

/// One namespace of tables.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseDesc {
    pub name: String,
    tables: Vec<TableDesc>,
    #[serde(skip)]
    #[serde(default)]
    table_index: Map<String, usize>,
}

impl DatabaseDesc {
    fn new(name: String) -> Self {
        Self {
            name,
            tables: Vec::new(),
            table_index: Map::default(),
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDesc> {
        self.tables.iter()
    }

    fn rebuild_table_index(&mut self) {
        self.table_index.clear();
        for (idx, table) in self.tables.iter_mut().enumerate() {
            self.table_index.insert(table.name.clone(), idx);
            table.rebuild_index_lookup();
        }
    }
}

/// In-memory catalog: databases, tables, indexes, and a function registry.
///
/// Lookups are treated as pure functions during planning. All identifiers
/// are canonicalized to lowercase on entry and on lookup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Catalog {
    databases: Vec<DatabaseDesc>,
    functions: Vec<FunctionDesc>,
    #[serde(skip)]
    #[serde(default)]
    database_index: Map<String, usize>,
    #[serde(skip)]
    #[serde(default)]
    function_index: Map<String, Vec<usize>>,
}

#[bon::bon]
impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        let mut catalog = Self {
            databases: Vec::new(),
            functions: Vec::new(),
            database_index: Map::default(),
            function_index: Map::default(),
        };
        catalog.rebuild_indexes();
        catalog
    }

    /// A catalog with the `default` database and the built-in aggregate
    /// functions registered.
    pub fn bootstrap() -> Self {
        let mut catalog = Self::new();
        catalog
            .create_database("default")
            .expect("fresh catalog accepts the default database");
        for func in builtin_functions() {
            catalog
                .register_function(func)
                .expect("built-in signatures are distinct");
        }
        catalog
    }

    /// Load a catalog from disk, returning an empty catalog if the file
    /// does not exist.
    pub fn load(path: &Path) -> PlanResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = fs::read_to_string(path)
            .map_err(|err| PlanError::Catalog(format!("read failed: {err}")))?;
        let mut catalog: Catalog = serde_json::from_str(&data)
            .map_err(|err| PlanError::Catalog(format!("invalid catalog file: {err}")))?;
        catalog.rebuild_indexes();
        Ok(catalog)
    }

    /// Persist the catalog contents as pretty JSON.
    pub fn save(&self, path: &Path) -> PlanResult<()> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| PlanError::Catalog(format!("serialize failed: {err}")))?;
        fs::write(path, data).map_err(|err| PlanError::Catalog(format!("write failed: {err}")))?;
        Ok(())
    }

    pub fn create_database(&mut self, name: &str) -> PlanResult<()> {
        let name = canonical_name(name);
        if self.database_index.contains_key(&name) {
            return Err(PlanError::Catalog(format!(
                "database '{name}' already exists"
            )));
        }
        self.databases.push(DatabaseDesc::new(name));
        self.rebuild_indexes();
        Ok(())
    }

    pub fn drop_database(&mut self, name: &str) -> PlanResult<()> {
        let idx = self.database_position(name)?;
        self.databases.remove(idx);
        self.rebuild_indexes();
        Ok(())
    }

    pub fn exists_database(&self, name: &str) -> bool {
        self.database_index.contains_key(&canonical_name(name))
    }

    pub fn database(&self, name: &str) -> PlanResult<&DatabaseDesc> {
        let idx = self.database_position(name)?;
        Ok(&self.databases[idx])
    }

    /// Register a table. Column names must be unique within the table;
    /// the stored schema is requalified with the table's canonical name.
    pub fn create_table(
        &mut self,
        database: &str,
        name: &str,
        columns: Vec<Column>,
        partition: Option<PartitionMethod>,
    ) -> PlanResult<()> {
        if columns.is_empty() {
            return Err(PlanError::Catalog(
                "table must contain at least one column".into(),
            ));
        }
        let name = canonical_name(name);
        let mut seen: Map<String, ()> = Map::default();
        for column in &columns {
            if seen.insert(column.name.clone(), ()).is_some() {
                return Err(PlanError::Catalog(format!(
                    "duplicate column '{}' found while building schema",
                    column.name
                )));
            }
        }
        let schema = Schema::new(columns).requalified(&name);

        let db_idx = self.database_position(database)?;
        let db = &mut self.databases[db_idx];
        if db.table_index.contains_key(&name) {
            return Err(PlanError::Catalog(format!(
                "table '{name}' already exists in database '{}'",
                db.name
            )));
        }
        db.tables.push(TableDesc::new(name, schema, partition));
        db.rebuild_table_index();
        Ok(())
    }

    pub fn drop_table(&mut self, database: &str, name: &str) -> PlanResult<()> {
        let db_idx = self.database_position(database)?;
        let db = &mut self.databases[db_idx];
        let name = canonical_name(name);
        let idx = db.table_index.get(&name).copied().ok_or_else(|| {
            PlanError::Catalog(format!(
                "unknown table '{name}' in database '{}'",
                db.name
            ))
        })?;
        db.tables.remove(idx);
        db.rebuild_table_index();
        Ok(())
    }

    pub fn table(&self, database: &str, name: &str) -> PlanResult<&TableDesc> {
        let db_idx = self.database_position(database)?;
        let db = &self.databases[db_idx];
        let name = canonical_name(name);
        let idx = db.table_index.get(&name).copied().ok_or_else(|| {
            PlanError::Catalog(format!(
                "unknown table '{name}' in database '{}'",
                db.name
            ))
        })?;
        Ok(&db.tables[idx])
    }

    pub fn exists_table(&self, database: &str, name: &str) -> bool {
        self.table(database, name).is_ok()
    }

    /// Create an index over the given table columns.
    #[builder]
    pub fn create_index(
        &mut self,
        database: &str,
        table: &str,
        name: &str,
        columns: &[&str],
        #[builder(default = false)] unique: bool,
    ) -> PlanResult<()> {
        if columns.is_empty() {
            return Err(PlanError::Catalog(
                "index must reference at least one column".into(),
            ));
        }
        let resolved = {
            let desc = self.table(database, table)?;
            let mut resolved = Vec::with_capacity(columns.len());
            for column in columns {
                let column = canonical_name(column);
                if desc.schema.column_by_name(&column).is_none() {
                    return Err(PlanError::Catalog(format!(
                        "unknown column '{column}' on table '{}'",
                        desc.name
                    )));
                }
                resolved.push(column);
            }
            resolved
        };
        let index = IndexDesc {
            name: canonical_name(name),
            columns: resolved,
            unique,
        };
        self.table_mut(database, table)?.add_index(index)
    }

    pub fn drop_index(&mut self, database: &str, table: &str, name: &str) -> PlanResult<()> {
        self.table_mut(database, table)?.remove_index(name)
    }

    pub fn exists_index(&self, database: &str, table: &str, name: &str) -> bool {
        self.table(database, table)
            .map(|t| t.has_index(name))
            .unwrap_or(false)
    }

    /// Register a function signature. Duplicate (name, argument types)
    /// pairs are rejected.
    pub fn register_function(&mut self, desc: FunctionDesc) -> PlanResult<()> {
        let duplicate = self
            .function_index
            .get(&desc.name)
            .is_some_and(|overloads| {
                overloads
                    .iter()
                    .any(|&idx| self.functions[idx].arg_types == desc.arg_types)
            });
        if duplicate {
            return Err(PlanError::Catalog(format!(
                "function '{}({:?})' already registered",
                desc.name, desc.arg_types
            )));
        }
        self.functions.push(desc);
        self.rebuild_indexes();
        Ok(())
    }

    /// Resolve a function by name and argument types. An exact signature
    /// match wins; otherwise the first signature with matching name and
    /// arity is returned. Full overload resolution belongs to semantic
    /// analysis, not this catalog.
    pub fn function(&self, name: &str, arg_types: &[DataType]) -> PlanResult<&FunctionDesc> {
        let name = canonical_name(name);
        let overloads = self
            .function_index
            .get(&name)
            .ok_or_else(|| PlanError::Catalog(format!("unknown function '{name}'")))?;
        if let Some(&idx) = overloads
            .iter()
            .find(|&&idx| self.functions[idx].arg_types == arg_types)
        {
            return Ok(&self.functions[idx]);
        }
        overloads
            .iter()
            .find(|&&idx| self.functions[idx].arg_types.len() == arg_types.len())
            .map(|&idx| &self.functions[idx])
            .ok_or_else(|| PlanError::Catalog(format!("unknown function '{name}'")))
    }

    pub fn exists_function(&self, name: &str) -> bool {
        self.function_index.contains_key(&canonical_name(name))
    }

    pub fn databases(&self) -> impl Iterator<Item = &DatabaseDesc> {
        self.databases.iter()
    }

    fn table_mut(&mut self, database: &str, table: &str) -> PlanResult<&mut TableDesc> {
        let db_idx = self.database_position(database)?;
        let db = &mut self.databases[db_idx];
        let table = canonical_name(table);
        let idx = db.table_index.get(&table).copied().ok_or_else(|| {
            PlanError::Catalog(format!(
                "unknown table '{table}' in database '{}'",
                db.name
            ))
        })?;
        Ok(&mut db.tables[idx])
    }

    fn database_position(&self, name: &str) -> PlanResult<usize> {
        self.database_index
            .get(&canonical_name(name))
            .copied()
            .ok_or_else(|| PlanError::Catalog(format!("unknown database '{name}'")))
    }

    fn rebuild_indexes(&mut self) {
        self.database_index.clear();
        for (idx, db) in self.databases.iter_mut().enumerate() {
            self.database_index.insert(db.name.clone(), idx);
            db.rebuild_table_index();
        }
        self.function_index.clear();
        for (idx, func) in self.functions.iter().enumerate() {
            self.function_index
                .entry(func.name.clone())
                .or_default()
                .push(idx);
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Built-in aggregate signatures registered by [`Catalog::bootstrap`].
pub fn builtin_functions() -> Vec<FunctionDesc> {
    use DataType::*;
    use FunctionKind::Aggregate;

    let mut funcs = vec![
        FunctionDesc::new("sum", vec![Int4], Int8, Aggregate),
        FunctionDesc::new("sum", vec![Int8], Int8, Aggregate),
        FunctionDesc::new("sum", vec![Float8], Float8, Aggregate),
        FunctionDesc::new("count", vec![Int8], Int8, Aggregate),
        FunctionDesc::new("avg", vec![Int4], Float8, Aggregate),
        FunctionDesc::new("avg", vec![Int8], Float8, Aggregate),
        FunctionDesc::new("avg", vec![Float8], Float8, Aggregate),
    ];
    for ty in [Int4, Int8, Float8, Text] {
        funcs.push(FunctionDesc::new("min", vec![ty], ty, Aggregate));
        funcs.push(FunctionDesc::new("max", vec![ty], ty, Aggregate));
    }
    funcs
}
