use super::adapter::{self, Param};
use super::{block, crate_path, ident, wrap, Expand, Imports};

use archgen_core::schema::{
    FieldKind, ForeignKey, MapperApi, ReadFollow, StorageType, TableArch, TableField,
};
use std_util::Snippet;

impl Expand<'_> {
    /// `from_row`, reading the fields of `table` in column order.
    ///
    /// Columns are consumed through `start`, so a followed foreign key reads
    /// the referenced table's columns right after its own key column, in the
    /// same order the select statements list them.
    pub(super) fn from_row_fn(
        &self,
        table: &TableArch,
        model: &str,
        imports: &mut Imports,
    ) -> Snippet {
        let row = imports.runtime("Row");
        let read_follow = imports.runtime("ReadFollow");
        let row_error = imports.runtime("RowError");

        let follow = if table.fields().iter().any(TableField::is_foreign_key) {
            "follow"
        } else {
            "_follow"
        };

        let mut fields = Snippet::new();
        for field in table.fields() {
            let read = self.field_read(table, field, imports);
            fields = fields.append(&wrap(&format!("{}: ", ident(&field.name)), &read, ","));
        }

        let literal = block(format!("Ok({model} {{"), &fields, "})");

        Snippet::new()
            .line("pub fn from_row(")
            .line(format!("    row: &{row},"))
            .line(format!("    {follow}: {read_follow},"))
            .line("    start: &mut usize,")
            .line(format!(") -> Result<{model}, {row_error}> {{"))
            .append_indented(&literal, std_util::Indent(1))
            .line("}")
    }

    fn field_read(&self, table: &TableArch, field: &TableField, imports: &mut Imports) -> Snippet {
        match &field.kind {
            FieldKind::Native => {
                Snippet::new().line(column_read(field.column().ty, field.nullable))
            }
            FieldKind::Mapper(mapper) => {
                let read = column_read(field.column().ty, field.nullable);
                Snippet::new().line(to_field(mapper, &read, field.nullable, imports))
            }
            FieldKind::Adapter(adapter) => {
                let path = adapter::use_path(imports, &adapter.path);
                instance_read(&path, &adapter::adapter_params(adapter), field.is_optional())
            }
            FieldKind::Nested(handle) => {
                let path = imports.import(&self.adapter_location(handle).rust_path(self.config));
                instance_read(&path, &adapter::pojo_params(&handle.pojo), field.is_optional())
            }
            FieldKind::ForeignKey(fk) => self.foreign_read(table, field, fk, imports),
        }
    }

    /// One match arm per follow policy, so a single accessor serves every
    /// read depth.
    fn foreign_read(
        &self,
        table: &TableArch,
        field: &TableField,
        fk: &ForeignKey,
        imports: &mut Imports,
    ) -> Snippet {
        let read_follow = imports.runtime("ReadFollow");

        let mut arms = Snippet::new();
        for follow in ReadFollow::ALL {
            let arm = self.foreign_arm(table, field, fk, follow, imports);
            let suffix = if arm.len() > 1 { "" } else { "," };
            arms = arms.append(&wrap(&format!("{read_follow}::{follow} => "), &arm, suffix));
        }

        block("match follow {", &arms, "}")
    }

    fn foreign_arm(
        &self,
        table: &TableArch,
        field: &TableField,
        fk: &ForeignKey,
        follow: ReadFollow,
        imports: &mut Imports,
    ) -> Snippet {
        let effective = self.schema.effective_follow(table.id, follow);
        let factory = imports.runtime(fk.shape.factory());

        let present = |id: &str, imports: &mut Imports| {
            let reference = if effective.is_follow() {
                let accessor = self.accessor_ref(table, fk, imports);
                let read_follow = imports.runtime("ReadFollow");
                format!(
                    "{factory}::of_entity({id}, {accessor}::from_row(row, {read_follow}::{}, start)?)",
                    effective.next()
                )
            } else {
                format!("{factory}::of_id({id})")
            };
            if field.is_optional() {
                format!("Some({reference})")
            } else {
                reference
            }
        };

        if !field.nullable {
            let read = column_read(fk.key_ty, false);
            return if effective.is_follow() {
                let reference = present("id", imports);
                Snippet::new()
                    .line("{")
                    .line(format!("    let id = {read};"))
                    .line(format!("    {reference}"))
                    .line("}")
            } else {
                Snippet::new().line(present(&read, imports))
            };
        }

        // A null key, or the zero key of an integer reference, reads as
        // absent. The columns of the referenced table are skipped then.
        let skip = if effective.is_follow() {
            self.schema.column_count(fk.table, effective.next())
        } else {
            0
        };

        let absent = if field.is_optional() {
            "None".to_string()
        } else {
            format!("{factory}::empty()")
        };

        let absent = if skip > 0 {
            block("{", &Snippet::new().line(format!("*start += {skip};")).line(absent), "}")
        } else {
            Snippet::new().line(format!("{absent},"))
        };

        let present_pattern = if fk.key_ty.is_integer() {
            "Some(id) if id != 0"
        } else {
            "Some(id)"
        };
        let absent_pattern = if fk.key_ty.is_integer() { "_" } else { "None" };

        let arms = Snippet::new()
            .line(format!("{present_pattern} => {},", present("id", imports)))
            .append(&wrap(&format!("{absent_pattern} => "), &absent, ""));

        block(
            format!("match {} {{", column_read(fk.key_ty, true)),
            &arms,
            "}",
        )
    }

    /// How the accessor of the table `fk` references is named in the unit
    /// generating `table`.
    fn accessor_ref(&self, table: &TableArch, fk: &ForeignKey, imports: &mut Imports) -> String {
        if fk.table == table.id {
            return "Self".to_string();
        }
        let foreign = self.schema.foreign_table(fk);
        imports.import(&self.table_location(foreign).rust_path(self.config))
    }
}

/// Reads the next column as a value of `ty`.
pub(super) fn column_read(ty: StorageType, nullable: bool) -> String {
    if nullable {
        format!("row.get_opt_{}(start)?", ty.getter())
    } else {
        format!("row.get_{}(start)?", ty.getter())
    }
}

/// Converts the stored value `expr` to the field value, mapping over the
/// `Option` of a nullable column.
pub(super) fn to_field(
    mapper: &MapperApi,
    expr: &str,
    optional: bool,
    imports: &mut Imports,
) -> String {
    let type_name = mapper
        .imported_type()
        .map(|ty| imports.import(&crate_path(ty)));

    let convert = |expr: &str| match &type_name {
        Some(name) => mapper.to_field_as(expr, name),
        None => mapper.to_field(expr),
    };

    if optional {
        format!("{expr}.map(|value| {})", convert("value"))
    } else {
        convert(expr)
    }
}

/// Builds a multi-column value through `create_instance`. An optional value
/// is absent only when every one of its columns is null, since a present
/// value may hold nullable columns of its own.
fn instance_read(path: &str, params: &[Param], optional: bool) -> Snippet {
    let args = params
        .iter()
        .map(|param| column_read(param.ty, param.optional));
    let create = format!("{path}::create_instance({})", std_util::join::comma(args));

    if !optional {
        return Snippet::new().line(create);
    }

    let all_null = (0..params.len()).map(|offset| match offset {
        0 => "row.is_null(*start)".to_string(),
        offset => format!("row.is_null(*start + {offset})"),
    });

    Snippet::new()
        .line(format!("if {} {{", std_util::join::with(all_null, " && ")))
        .line(format!("    *start += {};", params.len()))
        .line("    None")
        .line("} else {")
        .line(format!("    Some({create})"))
        .line("}")
}
