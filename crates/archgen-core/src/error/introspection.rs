use super::Error;

/// Error when a type cannot be described by the introspection provider.
#[derive(Debug)]
pub(super) struct IntrospectionError {
    ty: Box<str>,
    message: Box<str>,
}

impl std::error::Error for IntrospectionError {}

impl core::fmt::Display for IntrospectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "cannot introspect `{}`: {}", self.ty, self.message)
    }
}

impl Error {
    /// Creates an introspection error for the given type.
    pub fn introspection(ty: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::Introspection(IntrospectionError {
            ty: ty.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an introspection error.
    pub fn is_introspection(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Introspection(_))
    }
}
