use super::TypeRef;
use crate::schema::StorageType;

/// One declared field of a model or nested structure, as reported by an
/// [`Introspect`](super::Introspect) provider.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Rust identifier of the field.
    pub name: String,

    /// Declared type, including any `Option` wrapper.
    pub ty: TypeRef,

    /// True when the field may store SQL `NULL`. Always true for `Option`
    /// fields.
    pub nullable: bool,

    /// Explicitly marked as the primary key.
    pub primary_key: bool,

    pub unique: bool,

    /// Storage name override. For fields spanning several columns this is
    /// the prefix of every column.
    pub column: Option<String>,

    /// Column default expressions, one per column, or empty.
    pub defaults: Vec<String>,

    /// Field-scoped conversion declared on the field itself.
    pub inline_mapper: Option<InlineMapper>,
}

/// A conversion embedded in a field declaration rather than found through
/// the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineMapper {
    /// A unit-only enum stored as the index of its variant.
    Ordinal { variants: Vec<String> },

    /// A type exposing `to_field` / `to_storage` associated functions.
    Path { path: String, storage: StorageType },
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> FieldDescriptor {
        let ty = ty.into();
        FieldDescriptor {
            name: name.into(),
            nullable: ty.is_option(),
            ty,
            primary_key: false,
            unique: false,
            column: None,
            defaults: vec![],
            inline_mapper: None,
        }
    }

    pub fn nullable(mut self) -> FieldDescriptor {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> FieldDescriptor {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> FieldDescriptor {
        self.unique = true;
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> FieldDescriptor {
        self.column = Some(name.into());
        self
    }

    pub fn default_value(mut self, expr: impl Into<String>) -> FieldDescriptor {
        self.defaults.push(expr.into());
        self
    }

    pub fn inline_mapper(mut self, mapper: InlineMapper) -> FieldDescriptor {
        self.inline_mapper = Some(mapper);
        self
    }

    /// Storage name of the field, honoring the column override.
    pub fn sql_name(&self) -> String {
        match &self.column {
            Some(column) => column.clone(),
            None => super::naming::sql_name(&self.name),
        }
    }
}
