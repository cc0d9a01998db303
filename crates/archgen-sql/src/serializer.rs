#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Delimited};

mod flavor;
pub use flavor::Flavor;

// Fragment serializers
mod column_def;
mod statement;
mod ty;

use crate::stmt::Statement;

use archgen_core::{
    schema::{TableArch, TableId},
    Schema,
};
use std::mem;
use std_util::Snippet;

/// Serialize a statement to lines of SQL
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the statement is to be serialized
    schema: &'a Schema,

    /// The database flavor handles the differences between SQL dialects.
    flavor: Flavor,
}

struct Formatter<'a> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Completed lines
    lines: Snippet,

    /// The line being written
    dst: String,
}

/// Ends the current line.
struct NewLine;

/// A single `?` parameter placeholder.
struct Placeholder;

impl<'a> Serializer<'a> {
    pub fn new(schema: &'a Schema, flavor: Flavor) -> Serializer<'a> {
        Serializer { schema, flavor }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Serializes `stmt`, one clause per line. No statement terminator is
    /// appended so callers can concatenate clauses.
    pub fn serialize(&self, stmt: &Statement) -> Snippet {
        let mut fmt = Formatter {
            serializer: self,
            lines: Snippet::new(),
            dst: String::new(),
        };

        stmt.to_sql(&mut fmt);

        fmt.end_line();
        fmt.lines
    }

    /// Serializes several statements into one snippet, e.g. a `SELECT`
    /// followed by its `WHERE` clause.
    pub fn serialize_all<'s>(&self, stmts: impl IntoIterator<Item = &'s Statement>) -> Snippet {
        stmts
            .into_iter()
            .fold(Snippet::new(), |lines, stmt| lines.append(&self.serialize(stmt)))
    }

    fn table(&self, id: TableId) -> &'a TableArch {
        self.schema.table(id)
    }
}

impl Formatter<'_> {
    fn end_line(&mut self) {
        if !self.dst.is_empty() {
            let line = mem::take(&mut self.dst);
            self.lines.push(line);
        }
    }
}
