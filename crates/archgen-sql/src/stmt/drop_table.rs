use super::Statement;

use archgen_core::schema::{TableArch, TableId};

/// A statement to drop a SQL table.
#[derive(Debug, Clone)]
pub struct DropTable {
    pub table: TableId,

    /// Whether or not to add an `IF EXISTS` clause.
    pub if_exists: bool,
}

impl Statement {
    /// Drops a table if it exists.
    pub fn drop_table_if_exists(table: &TableArch) -> Self {
        DropTable {
            table: table.id,
            if_exists: true,
        }
        .into()
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Self {
        Self::DropTable(value)
    }
}
