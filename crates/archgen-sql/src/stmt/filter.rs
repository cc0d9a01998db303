use super::Statement;

use archgen_core::schema::{ReadFollow, TableArch};
use std::fmt::Display;

/// A `WHERE` clause comparing columns against parameters.
///
/// An empty filter serializes to nothing.
#[derive(Debug, Clone)]
pub struct Filter {
    /// Column references as they appear in the clause, bare or qualified.
    pub columns: Vec<String>,
    pub joiner: Joiner,
}

/// Boolean operator placed between the comparisons of a filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    pub(crate) fn delimiter(self) -> &'static str {
        match self {
            Joiner::And => " AND ",
            Joiner::Or => " OR ",
        }
    }
}

impl Statement {
    pub fn filter<I>(columns: I, joiner: Joiner) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Filter {
            columns: columns.into_iter().map(|column| column.to_string()).collect(),
            joiner,
        }
        .into()
    }

    /// Matches the primary key of `table`, qualified when the statement it
    /// completes follows foreign keys. `None` for tables without a key.
    pub fn filter_primary_key(table: &TableArch, follow: ReadFollow) -> Option<Self> {
        let pk = table.primary_key()?.column();
        let column = if follow.is_follow() {
            pk.prefixed(&table.sql_name)
        } else {
            pk.bare()
        };
        Some(Statement::filter([column], Joiner::And))
    }
}

impl From<Filter> for Statement {
    fn from(value: Filter) -> Self {
        Self::Filter(value)
    }
}
