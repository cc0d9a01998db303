use super::Statement;

use archgen_core::schema::{TableArch, TableId};

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub table: TableId,

    /// Whether or not to add an `IF NOT EXISTS` clause.
    pub if_not_exists: bool,

    /// Whether or not to emit `FOREIGN KEY` constraints.
    pub foreign_keys: bool,
}

impl Statement {
    /// Creates a table if it does not exist yet, with foreign-key
    /// constraints.
    pub fn create_table(table: &TableArch) -> Self {
        CreateTable {
            table: table.id,
            if_not_exists: true,
            foreign_keys: true,
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
