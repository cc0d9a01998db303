use super::Statement;

use archgen_core::schema::{TableArch, TableId};

#[derive(Debug, Clone)]
pub struct Delete {
    pub table: TableId,
}

impl Statement {
    pub fn delete(table: &TableArch) -> Self {
        Delete { table: table.id }.into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
