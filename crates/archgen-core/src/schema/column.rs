use super::StorageType;
use std::borrow::Cow;
use std::fmt;

/// A column of a table or nested structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// How the column's value is stored.
    pub ty: StorageType,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: StorageType) -> Column {
        Column {
            name: name.into(),
            ty,
        }
    }

    /// The column qualified by a table name or alias, e.g. `song.author_id`.
    pub fn prefixed<'a>(&'a self, table: impl Into<Cow<'a, str>>) -> PrefixedColumn<'a> {
        PrefixedColumn {
            table: Some(table.into()),
            column: self,
        }
    }

    /// The column by its bare name.
    pub fn bare(&self) -> PrefixedColumn<'_> {
        PrefixedColumn {
            table: None,
            column: self,
        }
    }
}

/// A column reference as it appears in a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixedColumn<'a> {
    pub table: Option<Cow<'a, str>>,
    pub column: &'a Column,
}

impl fmt::Display for PrefixedColumn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.column.name),
            None => f.write_str(&self.column.name),
        }
    }
}
