use super::{Flavor, Formatter, ToSql};

use archgen_core::schema::StorageType;

/// The SQL type of a column.
///
/// Key columns (primary or foreign) may need a bounded type: MySQL cannot
/// index unbounded text, and SQLite compares blob keys poorly.
pub(super) struct ColumnType {
    pub(super) ty: StorageType,
    pub(super) key: bool,
}

impl ToSql for ColumnType {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = match f.serializer.flavor {
            Flavor::Sqlite => sqlite(self.ty, self.key),
            Flavor::Mysql => mysql(self.ty, self.key),
            Flavor::Postgresql => postgresql(self.ty),
        };
        fmt!(f, name);
    }
}

fn sqlite(ty: StorageType, key: bool) -> &'static str {
    match ty {
        StorageType::Float | StorageType::Double => "REAL",
        StorageType::String => "VARCHAR",
        StorageType::Bytes if key => "VARCHAR",
        StorageType::Bytes => "BLOB",
        _ => "INTEGER",
    }
}

fn mysql(ty: StorageType, key: bool) -> &'static str {
    match ty {
        StorageType::String if key => "VARCHAR(255)",
        StorageType::String => "VARCHAR(4096)",
        StorageType::Bytes if key => "VARBINARY(255)",
        StorageType::Bytes => "BLOB",
        StorageType::Timestamp => "TIMESTAMP(3)",
        ty => common(ty),
    }
}

fn postgresql(ty: StorageType) -> &'static str {
    match ty {
        StorageType::Byte => "SMALLINT",
        StorageType::Double => "DOUBLE PRECISION",
        StorageType::Bytes => "BYTEA",
        ty => common(ty),
    }
}

fn common(ty: StorageType) -> &'static str {
    match ty {
        StorageType::Boolean => "BOOLEAN",
        StorageType::Byte => "TINYINT",
        StorageType::Short => "SMALLINT",
        StorageType::Int => "INTEGER",
        StorageType::Long => "BIGINT",
        StorageType::Float => "REAL",
        StorageType::Double => "DOUBLE",
        StorageType::String => "VARCHAR",
        StorageType::Bytes => "BLOB",
        StorageType::Date => "DATE",
        StorageType::Time => "TIME",
        StorageType::Timestamp => "TIMESTAMP",
    }
}
