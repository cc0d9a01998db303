use crate::model::{naming, FieldDescriptor, ModelInput};

/// Decides whether `field` is the primary key of the model `input` describes.
///
/// A field is the key when flagged as such, when named `id`, or when named
/// `<model>_id` after the model or any of its lookup keys.
///
/// Only the input and the field's own descriptor are consulted, never the
/// way other fields resolve. Foreign keys pointing at tables that are not
/// built yet depend on this.
pub(super) fn is_primary_key(input: &ModelInput, field: &FieldDescriptor) -> bool {
    field.primary_key
        || field.name == "id"
        || input
            .lookup_keys()
            .any(|key| field.name == naming::id_field(key.name()))
}
