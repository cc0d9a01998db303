//! The resolved schema graph.

mod builder;
pub use builder::ArchFactory;

mod column;
pub use column::{Column, PrefixedColumn};

mod field;
pub use field::{FieldKind, ForeignKey, ForeignShape, TableField};

mod follow;
pub use follow::ReadFollow;

mod mapper;
pub use mapper::MapperApi;

mod pojo;
pub use pojo::{adapter_columns, AdapterHandle, PojoArch, PojoField, PojoFieldKind};

mod storage_ty;
pub use storage_ty::StorageType;

mod table;
pub use table::{TableArch, TableId};

use crate::model::TypeRef;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::HashMap;

/// The outcome of a successful run: every table, initialized, and every
/// nested structure needing a generated adapter.
#[derive(Debug)]
pub struct Schema {
    tables: Vec<TableArch>,
    adapters: Vec<AdapterHandle>,
    lookup: IndexMap<TypeRef, TableId>,
}

/// A `LEFT JOIN` emitted when following a foreign key.
#[derive(Debug, Clone)]
pub struct Join<'a> {
    /// The table holding the foreign key.
    pub from: &'a TableArch,

    /// The foreign-key column.
    pub column: &'a Column,

    /// The referenced table.
    pub to: &'a TableArch,

    /// The referenced primary-key column.
    pub to_column: &'a Column,

    /// How `from` is named in the statement.
    pub from_name: Cow<'a, str>,

    /// Set when `to` is already part of the statement, e.g. `user_2`.
    pub alias: Option<String>,
}

impl Join<'_> {
    /// How the joined table is named in the statement.
    pub fn to_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.to.sql_name)
    }

    /// The foreign-key column, qualified.
    pub fn from_column(&self) -> PrefixedColumn<'_> {
        self.column.prefixed(&*self.from_name)
    }

    /// The referenced primary-key column, qualified.
    pub fn referenced_column(&self) -> PrefixedColumn<'_> {
        self.to_column.prefixed(self.to_name())
    }
}

/// Columns and joins collected while following foreign keys.
struct FollowWalk<'a> {
    columns: Vec<PrefixedColumn<'a>>,
    joins: Vec<Join<'a>>,

    /// How often each table name has been brought into the statement.
    uses: HashMap<&'a str, usize>,
}

impl<'a> FollowWalk<'a> {
    fn visit(
        &mut self,
        schema: &'a Schema,
        table: &'a TableArch,
        name: Cow<'a, str>,
        follow: ReadFollow,
    ) {
        let follow = schema.effective_follow(table.id, follow);
        for field in table.fields() {
            self.columns
                .extend(field.columns.iter().map(|column| column.prefixed(name.clone())));

            let Some(fk) = field.foreign_key().filter(|_| follow.is_follow()) else {
                continue;
            };

            let to = schema.foreign_table(fk);
            let uses = self.uses.entry(to.sql_name.as_str()).or_insert(0);
            *uses += 1;
            let alias = (*uses > 1).then(|| format!("{}_{}", to.sql_name, *uses));
            let to_name = match &alias {
                Some(alias) => Cow::Owned(alias.clone()),
                None => Cow::Borrowed(to.sql_name.as_str()),
            };

            self.joins.push(Join {
                from: table,
                column: field.column(),
                to,
                to_column: schema.foreign_column(fk),
                from_name: name.clone(),
                alias,
            });
            self.visit(schema, to, to_name, follow.next());
        }
    }
}

impl Schema {
    pub(crate) fn new(
        tables: Vec<TableArch>,
        adapters: Vec<AdapterHandle>,
        lookup: IndexMap<TypeRef, TableId>,
    ) -> Schema {
        Schema {
            tables,
            adapters,
            lookup,
        }
    }

    pub fn tables(&self) -> &[TableArch] {
        &self.tables
    }

    pub fn adapters(&self) -> &[AdapterHandle] {
        &self.adapters
    }

    pub fn table(&self, id: TableId) -> &TableArch {
        &self.tables[id.0]
    }

    /// Finds a table by any of its lookup keys.
    pub fn table_for(&self, ty: &TypeRef) -> Option<&TableArch> {
        self.lookup.get(ty).map(|id| self.table(*id))
    }

    pub fn foreign_table(&self, fk: &ForeignKey) -> &TableArch {
        self.table(fk.table)
    }

    /// The primary-key column a foreign key points at.
    ///
    /// # Panics
    ///
    /// Panics if the referenced table has no primary key, which a validated
    /// schema rules out.
    pub fn foreign_column(&self, fk: &ForeignKey) -> &Column {
        let table = self.foreign_table(fk);
        match table.primary_key() {
            Some(pk) => pk.column(),
            None => panic!("table `{}` has no primary key", table.sql_name),
        }
    }

    /// The policy actually used for `follow` on `table`.
    ///
    /// Following all references from a table that can reach a foreign-key
    /// cycle would never terminate, so `FollowAll` falls back to
    /// `FollowOneLevel` there. Both statement and row generation go through
    /// this, keeping them in lock-step.
    pub fn effective_follow(&self, table: TableId, follow: ReadFollow) -> ReadFollow {
        if follow == ReadFollow::FollowAll && self.reaches_cycle(table) {
            ReadFollow::FollowOneLevel
        } else {
            follow
        }
    }

    /// True if a foreign-key cycle is reachable from `table`.
    pub fn reaches_cycle(&self, table: TableId) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        fn visit(schema: &Schema, id: TableId, marks: &mut [Mark]) -> bool {
            match marks[id.0] {
                Mark::Active => return true,
                Mark::Done => return false,
                Mark::Unvisited => {}
            }
            marks[id.0] = Mark::Active;
            for fk in schema.table(id).fields().iter().filter_map(TableField::foreign_key) {
                if visit(schema, fk.table, marks) {
                    return true;
                }
            }
            marks[id.0] = Mark::Done;
            false
        }

        let mut marks = vec![Mark::Unvisited; self.tables.len()];
        visit(self, table, &mut marks)
    }

    /// Columns read for `table` under `follow`, in row order.
    ///
    /// `NoFollow` uses bare names. Otherwise every column is qualified and
    /// each followed foreign key is directly followed by the columns of the
    /// table it references.
    pub fn select_columns(&self, table: TableId, follow: ReadFollow) -> Vec<PrefixedColumn<'_>> {
        if !self.effective_follow(table, follow).is_follow() {
            return self.table(table).columns().map(Column::bare).collect();
        }
        self.follow_walk(table, follow).columns
    }

    /// Joins emitted for `table` under `follow`, in column order.
    pub fn joins(&self, table: TableId, follow: ReadFollow) -> Vec<Join<'_>> {
        self.follow_walk(table, follow).joins
    }

    /// Walks the followed foreign keys of `table` once, so columns and joins
    /// agree on the name each joined table goes by.
    fn follow_walk(&self, table: TableId, follow: ReadFollow) -> FollowWalk<'_> {
        let root = self.table(table);
        let mut walk = FollowWalk {
            columns: vec![],
            joins: vec![],
            uses: HashMap::from([(root.sql_name.as_str(), 1)]),
        };
        walk.visit(self, root, root.sql_name.as_str().into(), follow);
        walk
    }

    /// Number of columns read for `table` under `follow`.
    pub fn column_count(&self, table: TableId, follow: ReadFollow) -> usize {
        let follow = self.effective_follow(table, follow);
        self.table(table)
            .fields()
            .iter()
            .map(|field| self.field_column_count(field, follow))
            .sum()
    }

    /// Number of columns read for `field` under `follow`, counting the
    /// columns of a followed foreign table.
    pub fn field_column_count(&self, field: &TableField, follow: ReadFollow) -> usize {
        match field.foreign_key() {
            Some(fk) if follow.is_follow() => 1 + self.column_count(fk.table, follow.next()),
            _ => field.column_count(),
        }
    }
}
