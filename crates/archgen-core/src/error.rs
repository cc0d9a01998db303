mod adhoc;
mod introspection;
mod model_context;
mod structural_model;

use adhoc::AdhocError;
use introspection::IntrospectionError;
use model_context::ModelContext;
use std::sync::Arc;
use structural_model::StructuralModelError;

/// Returns early with a structural model error built from format arguments.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::structural_model(format!($($arg)*)))
    };
}

/// Creates a structural model error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::structural_model(format!($($arg)*))
    };
}

/// Fails with a structural model error unless the condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}

/// An error raised while resolving models or generating sources.
///
/// Errors form a chain of frames. The outermost frame describes what was
/// being attempted and the last one is the failure itself.
#[derive(Clone)]
pub struct Error {
    frame: Arc<Frame>,
}

#[derive(Debug)]
struct Frame {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    fn new(kind: ErrorKind, cause: Option<Error>) -> Error {
        Error {
            frame: Arc::new(Frame { kind, cause }),
        }
    }

    /// Creates an ad-hoc error from format arguments.
    pub fn from_args(args: core::fmt::Arguments<'_>) -> Error {
        Error::new(ErrorKind::Adhoc(AdhocError::new(args)), None)
    }

    /// Wraps this error in `outer`, which is displayed first.
    pub fn context(self, outer: impl IntoError) -> Error {
        let mut outer = outer.into_error();
        match Arc::get_mut(&mut outer.frame) {
            Some(frame) if frame.cause.is_none() => {
                frame.cause = Some(self);
                outer
            }
            // `outer` is shared or already has a cause of its own
            _ => Error::new(ErrorKind::Nested(outer), Some(self)),
        }
    }

    /// Returns the last error of the chain, the one that caused the failure.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) = &err.frame.cause {
            err = cause;
        }
        err
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        core::iter::successors(Some(self), |err| err.frame.cause.as_ref())
    }

    fn kind(&self) -> &ErrorKind {
        &self.frame.kind
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        for (i, err) in self.chain().enumerate() {
            if i > 0 {
                f.write_str(": ")?;
            }
            write!(f, "{}", err.kind())?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("Error")
                .field("kind", &self.frame.kind)
                .field("cause", &self.frame.cause)
                .finish()
        } else {
            write!(f, "{self}")
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    StructuralModel(StructuralModelError),
    ModelContext(ModelContext),
    Introspection(IntrospectionError),
    Nested(Error),
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            ErrorKind::Anyhow(err) => write!(f, "{err}"),
            ErrorKind::Adhoc(err) => write!(f, "{err}"),
            ErrorKind::StructuralModel(err) => write!(f, "{err}"),
            ErrorKind::ModelContext(err) => write!(f, "{err}"),
            ErrorKind::Introspection(err) => write!(f, "{err}"),
            ErrorKind::Nested(err) => write!(f, "{err}"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error::new(kind, None)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        ErrorKind::Anyhow(err).into()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        anyhow::Error::from(err).into()
    }
}

impl From<core::fmt::Error> for Error {
    fn from(err: core::fmt::Error) -> Error {
        anyhow::Error::from(err).into()
    }
}

/// Conversion accepted by [`Error::context`].
pub trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    fn into_error(self) -> Error {
        self
    }
}
