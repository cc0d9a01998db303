use super::Serializer;

use archgen_core::Schema;
use std::fmt;

/// The SQL dialect tables are created for.
///
/// Only DDL depends on the flavor; queries are emitted identically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Flavor {
    Postgresql,
    #[default]
    Sqlite,
    Mysql,
}

impl Flavor {
    pub const ALL: [Flavor; 3] = [Flavor::Sqlite, Flavor::Mysql, Flavor::Postgresql];

    /// Name of the variant, as generated code spells it.
    pub fn variant_name(self) -> &'static str {
        match self {
            Flavor::Postgresql => "Postgresql",
            Flavor::Sqlite => "Sqlite",
            Flavor::Mysql => "Mysql",
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flavor::Postgresql => "postgresql",
            Flavor::Sqlite => "sqlite",
            Flavor::Mysql => "mysql",
        })
    }
}

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Sqlite)
    }

    pub fn postgresql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Postgresql)
    }

    pub fn mysql(schema: &'a Schema) -> Serializer<'a> {
        Serializer::new(schema, Flavor::Mysql)
    }

    pub(super) fn is_mysql(&self) -> bool {
        self.flavor == Flavor::Mysql
    }
}
