use super::adapter;
use super::{block, ident, Expand, Imports};

use archgen_core::schema::{FieldKind, MapperApi, TableArch, TableField};
use std::fmt;
use std_util::Snippet;

impl Expand<'_> {
    /// `values`, one parameter per column in insert order.
    pub(super) fn values_fn(&self, table: &TableArch, model: &str, imports: &mut Imports) -> Snippet {
        let fields: Vec<_> = table.fields().iter().collect();
        self.values_for("values", &fields, model, imports)
    }

    /// `values_for_update`: the non-key columns, then the key, matching
    /// `UPDATE .. SET .. WHERE <key>=?`. None when the table has no primary
    /// key or nothing besides it.
    pub(super) fn values_for_update_fn(
        &self,
        table: &TableArch,
        model: &str,
        imports: &mut Imports,
    ) -> Option<Snippet> {
        let pk = table.primary_key()?;
        let mut fields: Vec<_> = table
            .fields()
            .iter()
            .filter(|field| !field.primary_key)
            .collect();
        if fields.is_empty() {
            return None;
        }
        fields.push(pk);
        Some(self.values_for("values_for_update", &fields, model, imports))
    }

    /// Initializers are written inline. Columns owned by an adapter start
    /// out null and are filled once the array exists, since one adapter
    /// writes several slots.
    fn values_for(
        &self,
        name: &str,
        fields: &[&TableField],
        model: &str,
        imports: &mut Imports,
    ) -> Snippet {
        let value = imports.runtime("Value");

        let mut inits = Snippet::new();
        let mut fills = Snippet::new();
        let mut index = 0;

        for field in fields {
            let place = format!("param.{}", ident(&field.name));

            let filled_by = match &field.kind {
                FieldKind::Native | FieldKind::ForeignKey(_) => {
                    imports.runtime("ToValue");
                    inits.push(format!("{place}.to_value(),"));
                    None
                }
                FieldKind::Mapper(mapper) => {
                    imports.runtime("ToValue");
                    inits.push(format!("{},", to_value(mapper, &place, field.nullable)));
                    None
                }
                FieldKind::Adapter(adapter) => Some(adapter::use_path(imports, &adapter.path)),
                FieldKind::Nested(handle) => {
                    Some(imports.import(&self.adapter_location(handle).rust_path(self.config)))
                }
            };

            if let Some(path) = filled_by {
                for _ in 0..field.column_count() {
                    inits.push(format!("{value}::Null,"));
                }
                let optional = field.is_optional();
                fills = fills.append(&fill(&path, &place, optional, "&mut array", index));
            }

            index += field.column_count();
        }

        let signature = format!("pub fn {name}(param: &{model}) -> Vec<{value}> {{");
        let body = if fills.is_empty() {
            block("vec![", &inits, "]")
        } else {
            block("let mut array = vec![", &inits, "];")
                .append(&fills)
                .line("array")
        };

        block(signature, &body, "}")
    }
}

/// The value stored for a mapped field at `place`.
pub(super) fn to_value(mapper: &MapperApi, place: &str, optional: bool) -> String {
    if optional {
        format!(
            "{place}.as_ref().map(|value| {}).to_value()",
            mapper.to_storage("value")
        )
    } else {
        format!("{}.to_value()", mapper.to_storage(&format!("&{place}")))
    }
}

/// Lets the adapter at `path` write the columns of the value at `place`,
/// starting at `index`.
pub(super) fn fill(
    path: &str,
    place: &str,
    optional: bool,
    array: &str,
    index: impl fmt::Display,
) -> Snippet {
    if optional {
        block(
            format!("if let Some(value) = &{place} {{"),
            &Snippet::new().line(format!("{path}::fill_values(value, {array}, {index});")),
            "}",
        )
    } else {
        Snippet::new().line(format!("{path}::fill_values(&{place}, {array}, {index});"))
    }
}
