use super::Statement;

use archgen_core::schema::{TableArch, TableId};

/// Inserts one row holding every column of a table.
#[derive(Debug, Clone)]
pub struct Insert {
    pub table: TableId,
    pub ignore: Ignore,
}

/// How an insert treats rows that collide with an existing key.
///
/// The mode is always chosen by the caller; it is never derived from the
/// SQL flavor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Ignore {
    /// `INSERT INTO`
    #[default]
    Default,

    /// `INSERT IGNORE INTO`
    Ignore,

    /// `INSERT OR IGNORE INTO`
    OrIgnore,
}

impl Ignore {
    pub const ALL: [Ignore; 3] = [Ignore::Default, Ignore::Ignore, Ignore::OrIgnore];

    pub(crate) fn keyword(self) -> &'static str {
        match self {
            Ignore::Default => "INSERT INTO ",
            Ignore::Ignore => "INSERT IGNORE INTO ",
            Ignore::OrIgnore => "INSERT OR IGNORE INTO ",
        }
    }
}

impl Statement {
    pub fn insert(table: &TableArch, ignore: Ignore) -> Self {
        Insert {
            table: table.id,
            ignore,
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
