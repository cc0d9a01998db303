//! Storage and accessor naming rules.

use heck::{ToSnakeCase, ToUpperCamelCase};

/// Storage name for a Rust identifier: `userName` and `user_name` both
/// become `user_name`.
pub fn sql_name(ident: &str) -> String {
    ident.trim_start_matches("r#").to_snake_case()
}

/// Default table name for a model type name.
pub fn table_name(model: &str) -> String {
    sql_name(model)
}

/// Default accessor type name for a model type name.
pub fn accessor_name(model: &str) -> String {
    format!("{}Table", model.to_upper_camel_case())
}

/// Generated adapter type name for a nested structure type name.
pub fn adapter_name(pojo: &str) -> String {
    format!("{}Adapter", pojo.to_upper_camel_case())
}

/// Field name conventionally holding the primary key of `model`.
pub fn id_field(model: &str) -> String {
    format!("{}_id", sql_name(model))
}

/// Column holding a foreign key for a field with the given storage name.
pub fn foreign_key_column(field: &str) -> String {
    if field.ends_with("_id") {
        field.to_string()
    } else {
        format!("{field}_id")
    }
}

/// Column name of a sub-column nested under `prefix`.
pub fn compound(prefix: &str, name: &str) -> String {
    format!("{prefix}_{name}")
}

/// Generated source file stem for an accessor or adapter type name.
pub fn file_stem(type_name: &str) -> String {
    sql_name(type_name)
}
