use super::{Bridge, FieldDescriptor, Introspect, ModelInput, TypeRef};
use crate::{Error, Result};
use indexmap::IndexMap;

/// Field descriptors for a set of declared types, collected up front.
///
/// This is the introspection provider used when descriptors come from parsed
/// source or are assembled by hand.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    decls: IndexMap<TypeRef, ModelDecl>,

    /// Declared types that cannot be described, with the reason.
    unsupported: IndexMap<TypeRef, String>,
}

/// A declared struct and the table options found on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDecl {
    pub ty: TypeRef,
    pub fields: Vec<FieldDescriptor>,

    /// Declared as a table model rather than only a nested structure.
    pub model: bool,
    pub table: Option<String>,
    pub accessor: Option<String>,
    pub keys: Vec<TypeRef>,
    pub bridge: Option<Bridge>,
}

impl ModelDecl {
    pub fn new(ty: impl Into<TypeRef>) -> ModelDecl {
        ModelDecl {
            ty: ty.into(),
            fields: vec![],
            model: false,
            table: None,
            accessor: None,
            keys: vec![],
            bridge: None,
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> ModelDecl {
        self.fields.push(field);
        self
    }

    /// A table input honoring the declared options.
    pub fn to_input(&self) -> ModelInput {
        let mut input = ModelInput::new(self.ty.clone());
        if let Some(table) = &self.table {
            input.sql_name = table.clone();
        }
        if let Some(accessor) = &self.accessor {
            input.accessor = accessor.clone();
        }
        input.keys = self.keys.clone();
        input.bridge = self.bridge.clone();
        input
    }
}

impl ModelCatalog {
    pub fn new() -> ModelCatalog {
        ModelCatalog::default()
    }

    /// Adds a declaration. Declaring the same type twice is an error.
    pub fn insert(&mut self, decl: ModelDecl) -> Result<()> {
        if self.decls.contains_key(&decl.ty) {
            return Err(Error::introspection(
                decl.ty.to_string(),
                "type is declared more than once",
            ));
        }
        self.decls.insert(decl.ty.clone(), decl);
        Ok(())
    }

    pub fn with(mut self, decl: ModelDecl) -> ModelCatalog {
        self.decls.insert(decl.ty.clone(), decl);
        self
    }

    /// Records a declared type that cannot be stored. Describing it later
    /// fails with `reason`.
    pub fn unsupported(&mut self, ty: impl Into<TypeRef>, reason: impl Into<String>) {
        self.unsupported.insert(ty.into(), reason.into());
    }

    pub fn get(&self, ty: &TypeRef) -> Option<&ModelDecl> {
        self.decls.get(ty)
    }

    /// Finds a declaration by its unqualified name.
    pub fn find_by_name(&self, name: &str) -> Option<&ModelDecl> {
        self.decls.values().find(|decl| decl.ty.name() == name)
    }

    /// Declarations marked as table models, in declaration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDecl> {
        self.decls.values().filter(|decl| decl.model)
    }

    pub fn decls(&self) -> impl Iterator<Item = &ModelDecl> {
        self.decls.values()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl Introspect for ModelCatalog {
    fn fields(&self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>> {
        if let Some(reason) = self.unsupported.get(ty) {
            return Err(Error::introspection(ty.to_string(), reason.clone()));
        }
        match self.decls.get(ty) {
            Some(decl) => Ok(decl.fields.clone()),
            None => Err(Error::introspection(
                ty.to_string(),
                "type is not declared in any parsed source",
            )),
        }
    }
}
