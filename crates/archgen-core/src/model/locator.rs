use super::TypeRef;
use crate::schema::StorageType;
use indexmap::IndexMap;

/// Finds pre-existing conversion code for value types.
pub trait AdapterLocator {
    /// A single-column conversion for `ty`, if one exists.
    fn find_mapper(&self, ty: &TypeRef) -> Option<MapperRef>;

    /// A multi-column conversion for `ty`, if one exists.
    fn find_adapter(&self, ty: &TypeRef) -> Option<AdapterRef>;
}

/// Existing code converting a value to and from one column.
///
/// The type at `path` exposes `to_field(storage) -> T` and
/// `to_storage(&T) -> storage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperRef {
    pub path: String,
    pub storage: StorageType,
}

/// Existing code converting a value to and from several columns.
///
/// The type at `path` exposes `create_instance(..) -> T` taking one argument
/// per column, and `fill_values(&T, &mut [Value], start)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterRef {
    pub path: String,
    pub columns: Vec<AdapterColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterColumn {
    pub name: String,
    pub ty: StorageType,
}

impl AdapterRef {
    pub fn new(path: impl Into<String>) -> AdapterRef {
        AdapterRef {
            path: path.into(),
            columns: vec![],
        }
    }

    pub fn column(mut self, name: impl Into<String>, ty: StorageType) -> AdapterRef {
        self.columns.push(AdapterColumn {
            name: name.into(),
            ty,
        });
        self
    }
}

/// An in-memory locator keyed by value type.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    mappers: IndexMap<TypeRef, MapperRef>,
    adapters: IndexMap<TypeRef, AdapterRef>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn mapper(mut self, ty: impl Into<TypeRef>, mapper: MapperRef) -> Registry {
        self.mappers.insert(ty.into(), mapper);
        self
    }

    pub fn adapter(mut self, ty: impl Into<TypeRef>, adapter: AdapterRef) -> Registry {
        self.adapters.insert(ty.into(), adapter);
        self
    }
}

impl AdapterLocator for Registry {
    fn find_mapper(&self, ty: &TypeRef) -> Option<MapperRef> {
        self.mappers.get(ty).cloned()
    }

    fn find_adapter(&self, ty: &TypeRef) -> Option<AdapterRef> {
        self.adapters.get(ty).cloned()
    }
}

impl<T: AdapterLocator + ?Sized> AdapterLocator for &T {
    fn find_mapper(&self, ty: &TypeRef) -> Option<MapperRef> {
        (**self).find_mapper(ty)
    }

    fn find_adapter(&self, ty: &TypeRef) -> Option<AdapterRef> {
        (**self).find_adapter(ty)
    }
}
