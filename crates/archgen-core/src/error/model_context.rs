use super::Error;

/// Records which model, and optionally which field, was being processed when
/// an error surfaced.
#[derive(Debug)]
pub(super) struct ModelContext {
    model: Box<str>,
    field: Option<Box<str>>,
}

impl std::error::Error for ModelContext {}

impl core::fmt::Display for ModelContext {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "processing model `{}`, field `{field}`", self.model),
            None => write!(f, "processing model `{}`", self.model),
        }
    }
}

impl Error {
    /// Creates a model context error, meant to be attached with
    /// [`Error::context`].
    pub fn processing(model: impl Into<String>, field: Option<&str>) -> Error {
        Error::from(super::ErrorKind::ModelContext(ModelContext {
            model: model.into().into(),
            field: field.map(Into::into),
        }))
    }

    /// Returns the outermost model and field recorded on this error chain.
    pub fn model_context(&self) -> Option<(&str, Option<&str>)> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::ModelContext(cx) => Some((&*cx.model, cx.field.as_deref())),
            _ => None,
        })
    }
}
