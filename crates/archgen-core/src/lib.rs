mod error;
pub use error::{Error, IntoError};

pub mod model;

pub mod schema;
pub use schema::Schema;

/// A Result type alias that uses archgen's [`Error`] type.
pub type Result<T, E = Error> = core::result::Result<T, E>;
