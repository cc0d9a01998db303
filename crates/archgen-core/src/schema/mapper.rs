use super::StorageType;
use crate::model::{MapperRef, TypeRef};

/// A two-way conversion between a field value and one stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperApi {
    /// A type exposing `to_field` and `to_storage`.
    Path { path: String, storage: StorageType },

    /// A unit-only enum stored as the index of its variant.
    Ordinal { ty: TypeRef, variants: Vec<String> },
}

impl MapperApi {
    pub fn storage(&self) -> StorageType {
        match self {
            MapperApi::Path { storage, .. } => *storage,
            MapperApi::Ordinal { .. } => StorageType::Int,
        }
    }

    /// Expression turning the stored value `expr` into the field value.
    pub fn to_field(&self, expr: &str) -> String {
        let name = match self {
            MapperApi::Path { .. } => "",
            MapperApi::Ordinal { ty, .. } => ty.name(),
        };
        self.to_field_as(expr, name)
    }

    /// Like [`to_field`](Self::to_field), naming the enum of an ordinal
    /// mapper `type_name`.
    pub fn to_field_as(&self, expr: &str, type_name: &str) -> String {
        match self {
            MapperApi::Path { path, .. } => format!("{path}::to_field({expr})"),
            MapperApi::Ordinal { variants, .. } => {
                let variants = variants
                    .iter()
                    .map(|variant| format!("{type_name}::{variant}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{variants}][{expr} as usize]")
            }
        }
    }

    /// Expression turning a reference to the field value into the stored
    /// value. The result can be followed by a method call.
    pub fn to_storage(&self, reference: &str) -> String {
        match self {
            MapperApi::Path { path, .. } => format!("{path}::to_storage({reference})"),
            MapperApi::Ordinal { .. } => match reference.strip_prefix('&') {
                Some(place) => format!("({place} as i32)"),
                None => format!("(*{reference} as i32)"),
            },
        }
    }

    /// The type the expressions name, if it needs importing.
    pub fn imported_type(&self) -> Option<&TypeRef> {
        match self {
            MapperApi::Path { .. } => None,
            MapperApi::Ordinal { ty, .. } => Some(ty),
        }
    }
}

impl From<MapperRef> for MapperApi {
    fn from(mapper: MapperRef) -> MapperApi {
        MapperApi::Path {
            path: mapper.path,
            storage: mapper.storage,
        }
    }
}
