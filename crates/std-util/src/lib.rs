pub mod join;
pub mod result;
pub mod snippet;

pub use snippet::{Indent, Snippet};

pub mod prelude {
    pub use crate::{assert_err, assert_err_contains, assert_ok, Indent, Snippet};
}
