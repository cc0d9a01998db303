use super::{AdapterHandle, Column, MapperApi, StorageType, TableId};
use crate::model::{AdapterRef, TypeRef};

/// A resolved field of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableField {
    /// Rust identifier of the field.
    pub name: String,

    /// Declared type, including any `Option` wrapper.
    pub ty: TypeRef,

    /// Columns owned by the field, in order.
    pub columns: Vec<Column>,

    pub primary_key: bool,

    pub unique: bool,

    pub nullable: bool,

    /// Column default expressions, one per column, or empty.
    pub defaults: Vec<String>,

    pub kind: FieldKind,
}

/// How a table field is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// One column holding the value directly.
    Native,

    /// One column holding the primary key of another table.
    ForeignKey(ForeignKey),

    /// One column converted through a mapper.
    Mapper(MapperApi),

    /// One or more columns converted through an existing adapter.
    Adapter(AdapterRef),

    /// The columns of a nested structure, converted through its generated
    /// adapter.
    Nested(AdapterHandle),
}

/// The target of a foreign-key field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// The referenced table.
    pub table: TableId,

    /// Storage type of the referenced primary key, and of the key column.
    pub key_ty: StorageType,

    /// Rust type of the key, as declared by the reference.
    pub key_rust_ty: TypeRef,

    pub shape: ForeignShape,
}

/// The supported foreign reference wrapper types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForeignShape {
    /// `ForeignInt<E>`
    Int,

    /// `ForeignLong<E>`
    Long,

    /// `ForeignObj<K, E>`
    Obj,

    /// `Foreign<K, E>`, built through `ForeignObj`.
    Foreign,
}

impl ForeignShape {
    pub fn from_name(name: &str) -> Option<ForeignShape> {
        match name {
            "ForeignInt" => Some(ForeignShape::Int),
            "ForeignLong" => Some(ForeignShape::Long),
            "ForeignObj" => Some(ForeignShape::Obj),
            "Foreign" => Some(ForeignShape::Foreign),
            _ => None,
        }
    }

    /// Number of generic arguments the wrapper takes.
    pub fn arity(self) -> usize {
        match self {
            ForeignShape::Int | ForeignShape::Long => 1,
            ForeignShape::Obj | ForeignShape::Foreign => 2,
        }
    }

    /// Key type implied by the wrapper, if fixed.
    pub fn fixed_key(self) -> Option<&'static str> {
        match self {
            ForeignShape::Int => Some("i32"),
            ForeignShape::Long => Some("i64"),
            ForeignShape::Obj | ForeignShape::Foreign => None,
        }
    }

    /// Type whose constructors build values of this wrapper.
    pub fn factory(self) -> &'static str {
        match self {
            ForeignShape::Int => "ForeignInt",
            ForeignShape::Long => "ForeignLong",
            ForeignShape::Obj | ForeignShape::Foreign => "ForeignObj",
        }
    }
}

impl TableField {
    /// True when declared as `Option<..>`.
    pub fn is_optional(&self) -> bool {
        self.ty.is_option()
    }

    pub fn value_ty(&self) -> &TypeRef {
        self.ty.value_type()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        match &self.kind {
            FieldKind::ForeignKey(fk) => Some(fk),
            _ => None,
        }
    }

    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key().is_some()
    }

    /// The only column of a one-column field.
    ///
    /// # Panics
    ///
    /// Panics if the field spans several columns.
    pub fn column(&self) -> &Column {
        match &self.columns[..] {
            [column] => column,
            _ => panic!(
                "field `{}` spans {} columns",
                self.name,
                self.columns.len()
            ),
        }
    }
}
