use super::{Column, TableField};
use crate::model::{Bridge, ModelInput, TypeRef};
use std::fmt;

/// A resolved model: one table and its fields.
///
/// A table starts out shallow, registered but without fields, and becomes
/// initialized exactly once when its fields are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArch {
    /// Uniquely identifies the table within its schema.
    pub id: TableId,

    /// Name of the table in the database.
    pub sql_name: String,

    /// Name of the generated accessor type.
    pub accessor: String,

    /// The model type.
    pub model: TypeRef,

    pub bridge: Option<Bridge>,

    fields: Option<Vec<TableField>>,
}

/// Uniquely identifies a table
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

impl TableArch {
    pub(crate) fn shallow(id: TableId, input: &ModelInput) -> TableArch {
        TableArch {
            id,
            sql_name: input.sql_name.clone(),
            accessor: input.accessor.clone(),
            model: input.model.clone(),
            bridge: input.bridge.clone(),
            fields: None,
        }
    }

    /// Sets the fields of a shallow table.
    ///
    /// # Panics
    ///
    /// Panics if the table was already initialized.
    pub(crate) fn initialize(&mut self, fields: Vec<TableField>) {
        assert!(
            self.fields.is_none(),
            "table `{}` is already initialized",
            self.sql_name
        );
        self.fields = Some(fields);
    }

    pub fn is_initialized(&self) -> bool {
        self.fields.is_some()
    }

    /// # Panics
    ///
    /// Panics if the table is still shallow.
    pub fn fields(&self) -> &[TableField] {
        match &self.fields {
            Some(fields) => fields,
            None => panic!("table `{}` is not initialized", self.sql_name),
        }
    }

    pub fn field(&self, name: &str) -> Option<&TableField> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// All columns, in field order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.fields().iter().flat_map(|field| field.columns.iter())
    }

    pub fn column_count(&self) -> usize {
        self.fields().iter().map(TableField::column_count).sum()
    }

    pub fn primary_key(&self) -> Option<&TableField> {
        self.fields().iter().find(|field| field.primary_key)
    }

    /// Index of the first column of `field` among the table's columns.
    pub fn column_offset(&self, field: &TableField) -> usize {
        self.fields()
            .iter()
            .take_while(|other| other.name != field.name)
            .map(TableField::column_count)
            .sum()
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, StorageType};

    fn id_field() -> TableField {
        TableField {
            name: "id".into(),
            ty: TypeRef::named("i32"),
            columns: vec![Column::new("id", StorageType::Int)],
            primary_key: true,
            unique: false,
            nullable: false,
            defaults: vec![],
            kind: FieldKind::Native,
        }
    }

    #[test]
    fn shallow_then_initialized() {
        let mut table = TableArch::shallow(TableId(0), &ModelInput::new("model::User"));
        assert!(!table.is_initialized());

        table.initialize(vec![id_field()]);
        assert!(table.is_initialized());
        assert_eq!(table.primary_key().unwrap().name, "id");
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    #[should_panic(expected = "table `user` is already initialized")]
    fn initialize_twice() {
        let mut table = TableArch::shallow(TableId(0), &ModelInput::new("model::User"));
        table.initialize(vec![id_field()]);
        table.initialize(vec![id_field()]);
    }

    #[test]
    #[should_panic(expected = "table `user` is not initialized")]
    fn fields_of_shallow_table() {
        let table = TableArch::shallow(TableId(0), &ModelInput::new("model::User"));
        table.fields();
    }
}
