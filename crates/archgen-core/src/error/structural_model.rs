use super::Error;

/// Error when the set of models cannot be turned into a valid schema.
///
/// This occurs when:
/// - The same model is registered twice under one lookup key
/// - A foreign key references a model missing from the input set
/// - A foreign model has no primary key, or its key type does not match
/// - A primary key cannot be mapped to a storage type
/// - A nested structure contains an unsupported field
///
/// Any of these aborts the run before code is emitted.
#[derive(Debug)]
pub(super) struct StructuralModelError {
    message: Box<str>,
}

impl std::error::Error for StructuralModelError {}

impl core::fmt::Display for StructuralModelError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid model: {}", self.message)
    }
}

impl Error {
    /// Creates a structural model error.
    pub fn structural_model(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::StructuralModel(StructuralModelError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a structural model error.
    pub fn is_structural_model(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::StructuralModel(_))
    }
}
