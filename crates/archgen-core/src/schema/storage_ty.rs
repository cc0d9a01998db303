use crate::model::TypeRef;
use serde::Deserialize;
use std::fmt;

/// How a column's value is stored.
///
/// Each tag pairs a Rust value type, which generated code reads and writes,
/// with a family of SQL column types chosen per flavor when tables are
/// created.
///
/// | Tag         | Rust type                | Row getter          |
/// |-------------|--------------------------|---------------------|
/// | `Boolean`   | `bool`                   | `get_bool`          |
/// | `Byte`      | `i8`                     | `get_i8`            |
/// | `Short`     | `i16`                    | `get_i16`           |
/// | `Int`       | `i32`                    | `get_i32`           |
/// | `Long`      | `i64`                    | `get_i64`           |
/// | `Float`     | `f32`                    | `get_f32`           |
/// | `Double`    | `f64`                    | `get_f64`           |
/// | `String`    | `String`                 | `get_string`        |
/// | `Bytes`     | `Vec<u8>`                | `get_bytes`         |
/// | `Date`      | `chrono::NaiveDate`      | `get_date`          |
/// | `Time`      | `chrono::NaiveTime`      | `get_time`          |
/// | `Timestamp` | `chrono::NaiveDateTime`  | `get_timestamp`     |
///
/// Nullable columns use the `get_opt_*` variant of the getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Boolean,
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    String,
    Bytes,
    Date,
    Time,
    Timestamp,
}

impl StorageType {
    pub const ALL: [StorageType; 12] = [
        StorageType::Boolean,
        StorageType::Int,
        StorageType::Long,
        StorageType::Short,
        StorageType::Byte,
        StorageType::Float,
        StorageType::Double,
        StorageType::String,
        StorageType::Bytes,
        StorageType::Date,
        StorageType::Time,
        StorageType::Timestamp,
    ];

    /// Maps a natively storable Rust type to its tag.
    ///
    /// `Option` is not looked through; callers pass the value type.
    pub fn from_native(ty: &TypeRef) -> Option<StorageType> {
        if !ty.is_path() {
            return None;
        }

        let args = ty.args();
        let ty = match (ty.path(), args) {
            ("bool", []) => StorageType::Boolean,
            ("i8", []) => StorageType::Byte,
            ("i16", []) => StorageType::Short,
            ("i32", []) => StorageType::Int,
            ("i64", []) => StorageType::Long,
            ("f32", []) => StorageType::Float,
            ("f64", []) => StorageType::Double,
            ("String" | "std::string::String", []) => StorageType::String,
            ("Vec" | "std::vec::Vec", [arg]) if arg.path() == "u8" => StorageType::Bytes,
            ("NaiveDate" | "chrono::NaiveDate", []) => StorageType::Date,
            ("NaiveTime" | "chrono::NaiveTime", []) => StorageType::Time,
            ("NaiveDateTime" | "chrono::NaiveDateTime", []) => StorageType::Timestamp,
            _ => return None,
        };
        Some(ty)
    }

    /// The Rust type generated code uses for values of this tag.
    pub fn rust_type(self) -> &'static str {
        match self {
            StorageType::Boolean => "bool",
            StorageType::Int => "i32",
            StorageType::Long => "i64",
            StorageType::Short => "i16",
            StorageType::Byte => "i8",
            StorageType::Float => "f32",
            StorageType::Double => "f64",
            StorageType::String => "String",
            StorageType::Bytes => "Vec<u8>",
            StorageType::Date => "chrono::NaiveDate",
            StorageType::Time => "chrono::NaiveTime",
            StorageType::Timestamp => "chrono::NaiveDateTime",
        }
    }

    /// Suffix of the row getter reading this tag.
    pub fn getter(self) -> &'static str {
        match self {
            StorageType::Boolean => "bool",
            StorageType::Int => "i32",
            StorageType::Long => "i64",
            StorageType::Short => "i16",
            StorageType::Byte => "i8",
            StorageType::Float => "f32",
            StorageType::Double => "f64",
            StorageType::String => "string",
            StorageType::Bytes => "bytes",
            StorageType::Date => "date",
            StorageType::Time => "time",
            StorageType::Timestamp => "timestamp",
        }
    }

    /// True for the integer tags, whose zero value marks an absent foreign key.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            StorageType::Int | StorageType::Long | StorageType::Short | StorageType::Byte
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StorageType::Boolean => "boolean",
            StorageType::Int => "int",
            StorageType::Long => "long",
            StorageType::Short => "short",
            StorageType::Byte => "byte",
            StorageType::Float => "float",
            StorageType::Double => "double",
            StorageType::String => "string",
            StorageType::Bytes => "bytes",
            StorageType::Date => "date",
            StorageType::Time => "time",
            StorageType::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
