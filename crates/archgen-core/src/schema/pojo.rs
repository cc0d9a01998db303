use super::{Column, MapperApi, StorageType};
use crate::model::{naming, AdapterRef, TypeRef};
use std::sync::Arc;

/// A resolved nested structure.
///
/// Built once per type in a run and shared by every field nesting it.
#[derive(Debug, PartialEq)]
pub struct PojoArch {
    pub ty: TypeRef,
    pub fields: Vec<PojoField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PojoField {
    /// Rust identifier of the field.
    pub name: String,

    /// Column name, or column prefix for multi-column fields.
    pub sql_name: String,

    /// Declared type, including any `Option` wrapper.
    pub ty: TypeRef,

    pub kind: PojoFieldKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PojoFieldKind {
    Native(StorageType),
    Mapper(MapperApi),
    Adapter(AdapterRef),
    Nested(AdapterHandle),
}

/// A nested structure whose adapter is generated.
///
/// Handles compare by the identity of the structure they point at.
#[derive(Debug, Clone)]
pub struct AdapterHandle {
    pub pojo: Arc<PojoArch>,
}

impl PojoArch {
    /// The columns of the structure, named under `prefix`.
    pub fn columns(&self, prefix: &str) -> Vec<Column> {
        let mut columns = vec![];
        self.push_columns(prefix, &mut columns);
        columns
    }

    fn push_columns(&self, prefix: &str, out: &mut Vec<Column>) {
        for field in &self.fields {
            let name = naming::compound(prefix, &field.sql_name);
            match &field.kind {
                PojoFieldKind::Native(ty) => out.push(Column::new(name, *ty)),
                PojoFieldKind::Mapper(mapper) => out.push(Column::new(name, mapper.storage())),
                PojoFieldKind::Adapter(adapter) => out.extend(adapter_columns(&name, adapter)),
                PojoFieldKind::Nested(handle) => handle.pojo.push_columns(&name, out),
            }
        }
    }

    pub fn column_count(&self) -> usize {
        self.fields.iter().map(PojoField::column_count).sum()
    }

    /// True if some column is always set, so a stored value can be told
    /// apart from an absent one.
    pub fn has_required_column(&self) -> bool {
        self.fields.iter().any(|field| match &field.kind {
            _ if field.is_optional() => false,
            PojoFieldKind::Nested(handle) => handle.pojo.has_required_column(),
            _ => field.column_count() > 0,
        })
    }
}

impl PojoField {
    pub fn column_count(&self) -> usize {
        match &self.kind {
            PojoFieldKind::Native(_) | PojoFieldKind::Mapper(_) => 1,
            PojoFieldKind::Adapter(adapter) => adapter.columns.len(),
            PojoFieldKind::Nested(handle) => handle.pojo.column_count(),
        }
    }

    pub fn is_optional(&self) -> bool {
        self.ty.is_option()
    }
}

impl AdapterHandle {
    pub fn new(pojo: Arc<PojoArch>) -> AdapterHandle {
        AdapterHandle { pojo }
    }

    /// Name of the generated adapter type.
    pub fn adapter_name(&self) -> String {
        naming::adapter_name(self.pojo.ty.name())
    }

    pub fn ty(&self) -> &TypeRef {
        &self.pojo.ty
    }
}

impl PartialEq for AdapterHandle {
    fn eq(&self, other: &AdapterHandle) -> bool {
        Arc::ptr_eq(&self.pojo, &other.pojo)
    }
}

/// Columns of a field stored through an existing adapter.
///
/// A one-column adapter uses the field's name; wider adapters suffix it with
/// the adapter's column names.
pub fn adapter_columns(name: &str, adapter: &AdapterRef) -> Vec<Column> {
    match &adapter.columns[..] {
        [column] => vec![Column::new(name, column.ty)],
        columns => columns
            .iter()
            .map(|column| Column::new(naming::compound(name, &column.name), column.ty))
            .collect(),
    }
}
