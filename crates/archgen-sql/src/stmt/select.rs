use super::Statement;

use archgen_core::schema::{ReadFollow, TableArch, TableId};

/// Reads the rows of a table, joining foreign tables as `follow` asks.
#[derive(Debug, Clone)]
pub struct Select {
    pub table: TableId,
    pub follow: ReadFollow,
}

impl Statement {
    pub fn select(table: &TableArch, follow: ReadFollow) -> Self {
        Select {
            table: table.id,
            follow,
        }
        .into()
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
