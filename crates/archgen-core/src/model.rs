//! Inputs to a resolution run and the collaborators that describe them.

mod catalog;
pub use catalog::{ModelCatalog, ModelDecl};

mod descriptor;
pub use descriptor::{FieldDescriptor, InlineMapper};

mod input;
pub use input::{Bridge, ModelInput, RunInputs};

mod locator;
pub use locator::{AdapterColumn, AdapterLocator, AdapterRef, MapperRef, Registry};

pub mod naming;

mod ty;
pub use ty::{TypeRef, TypeShape};

use crate::Result;

/// Describes the fields of a model or nested structure type.
///
/// Implementations must be pure: calling `fields` twice for the same type
/// returns the same descriptors in the same order.
pub trait Introspect {
    /// Returns the declared fields of `ty`, in declaration order.
    fn fields(&self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>>;
}

impl<T: Introspect + ?Sized> Introspect for &T {
    fn fields(&self, ty: &TypeRef) -> Result<Vec<FieldDescriptor>> {
        (**self).fields(ty)
    }
}
