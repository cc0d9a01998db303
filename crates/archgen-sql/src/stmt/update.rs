use super::Statement;

use archgen_core::schema::{Column, TableArch, TableId};

/// Sets a subset of a table's columns.
#[derive(Debug, Clone)]
pub struct Update {
    pub table: TableId,

    /// Names of the columns to set, in order.
    pub columns: Vec<String>,
}

impl Statement {
    /// Updates the given columns.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is empty.
    pub fn update<'a>(table: &TableArch, columns: impl IntoIterator<Item = &'a Column>) -> Self {
        let columns: Vec<_> = columns.into_iter().map(|column| column.name.clone()).collect();
        assert!(
            !columns.is_empty(),
            "update of `{}` sets no columns",
            table.sql_name
        );
        Update {
            table: table.id,
            columns,
        }
        .into()
    }

    /// Updates every column not belonging to the primary key, or `None` if
    /// the table has no such column.
    pub fn update_non_key(table: &TableArch) -> Option<Self> {
        let columns = table
            .fields()
            .iter()
            .filter(|field| !field.primary_key)
            .flat_map(|field| field.columns.iter());
        let mut columns = columns.peekable();
        columns.peek()?;
        Some(Statement::update(table, columns))
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
