use super::context::{Prediction, RunContext};
use super::primary_key;
use crate::model::{FieldDescriptor, ModelInput, TypeRef};
use crate::schema::{ForeignKey, ForeignShape, StorageType};
use crate::{bail, ensure, Result};

/// True for any type named like a foreign reference wrapper.
///
/// Unsupported wrappers still count, so they fail with a precise message
/// instead of being treated as nested structures.
pub(super) fn is_reference(ty: &TypeRef) -> bool {
    ty.is_path() && ty.name().starts_with("Foreign")
}

/// Resolves the table a foreign-key field points at and the storage type of
/// its key.
///
/// The referenced table may still be shallow. Its primary key is then read
/// straight from its descriptors using the same rule the completion pass
/// uses, and the result is recorded so it can be checked once the table is
/// complete.
pub(super) fn resolve(
    cx: &mut RunContext<'_>,
    input: &ModelInput,
    field: &FieldDescriptor,
) -> Result<ForeignKey> {
    let ty = field.ty.value_type();

    let Some(shape) = ForeignShape::from_name(ty.name()) else {
        bail!(
            "invalid foreign key reference type `{ty}`; \
             supported types: Foreign, ForeignInt, ForeignLong, ForeignObj"
        );
    };
    ensure!(
        ty.args().len() == shape.arity(),
        "foreign key reference `{ty}` must have {} type argument(s)",
        shape.arity()
    );

    let key_ty = match shape.fixed_key() {
        Some(key) => TypeRef::named(key),
        None => ty.args()[0].clone(),
    };
    let entity = &ty.args()[shape.arity() - 1];

    let Some(foreign) = cx.table_for(entity) else {
        bail!(
            "foreign model `{}` referenced from `{}` model is missing in the input set for table generation",
            entity.name(),
            input.model_name()
        );
    };
    let foreign_id = foreign.id;

    let primary_key = if foreign.is_initialized() {
        foreign
            .primary_key()
            .map(|pk| (pk.name.clone(), pk.value_ty().clone()))
    } else {
        let foreign_input = cx.input(foreign_id);
        let descriptors = cx.introspect.fields(&foreign_input.model)?;
        let primary_key = descriptors
            .iter()
            .find(|descriptor| primary_key::is_primary_key(foreign_input, descriptor))
            .map(|pk| (pk.name.clone(), pk.ty.value_type().clone()));

        if let Some((name, ty)) = &primary_key {
            cx.predict(Prediction {
                referencing: input.model_name().to_string(),
                referencing_field: field.name.clone(),
                table: foreign_id,
                field: name.clone(),
                ty: ty.clone(),
            });
        }
        primary_key
    };

    let Some((_, pk_ty)) = primary_key else {
        bail!(
            "foreign model `{}` does not have a primary key; expected key type `{key_ty}`",
            entity.name()
        );
    };

    ensure!(
        pk_ty == key_ty,
        "foreign model `{}` primary key `{pk_ty}` doesn't match the foreign key `{key_ty}` declared by `{}.{}`",
        entity.name(),
        input.model_name(),
        field.name
    );

    let Some(key_storage) = StorageType::from_native(&pk_ty) else {
        bail!(
            "foreign model `{}` primary key `{pk_ty}` must be a natively supported type",
            entity.name()
        );
    };

    Ok(ForeignKey {
        table: foreign_id,
        key_ty: key_storage,
        key_rust_ty: key_ty,
        shape,
    })
}
