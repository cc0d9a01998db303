use super::context::RunContext;
use super::primary_key;
use super::resolve::{resolve, Resolved, Scope};
use crate::model::{naming, FieldDescriptor, ModelInput};
use crate::schema::{adapter_columns, Column, FieldKind, TableField};
use crate::{ensure, Result};

/// Resolves every field of `input`, in declaration order.
pub(super) fn build_fields(cx: &mut RunContext<'_>, input: &ModelInput) -> Result<Vec<TableField>> {
    let descriptors = cx.introspect.fields(&input.model)?;

    let mut fields = Vec::with_capacity(descriptors.len());
    for descriptor in &descriptors {
        cx.cursor_mut().enter_field(&descriptor.name);
        fields.push(build_field(cx, input, descriptor)?);
    }
    Ok(fields)
}

fn build_field(
    cx: &mut RunContext<'_>,
    input: &ModelInput,
    descriptor: &FieldDescriptor,
) -> Result<TableField> {
    let sql_name = descriptor.sql_name();

    let (columns, kind) = match resolve(cx, Scope::Table(input), descriptor)? {
        Resolved::ForeignKey(fk) => {
            let name = match &descriptor.column {
                Some(column) => column.clone(),
                None => naming::foreign_key_column(&sql_name),
            };
            (vec![Column::new(name, fk.key_ty)], FieldKind::ForeignKey(fk))
        }
        Resolved::Native(storage) => (vec![Column::new(sql_name, storage)], FieldKind::Native),
        Resolved::HasMapper(mapper) | Resolved::InlineMapper(mapper) => (
            vec![Column::new(sql_name, mapper.storage())],
            FieldKind::Mapper(mapper),
        ),
        Resolved::HasAdapter(adapter) => (
            adapter_columns(&sql_name, &adapter),
            FieldKind::Adapter(adapter),
        ),
        Resolved::Pojo(handle) => (handle.pojo.columns(&sql_name), FieldKind::Nested(handle)),
    };

    if let FieldKind::Nested(handle) = &kind {
        ensure!(
            !descriptor.ty.is_option() || handle.pojo.has_required_column(),
            "optional field `{}` of `{}` nests `{}`, whose columns are all nullable",
            descriptor.name,
            input.model_name(),
            handle.ty()
        );
    }

    ensure!(
        descriptor.defaults.is_empty() || descriptor.defaults.len() == columns.len(),
        "field `{}` declares {} default value(s) for {} column(s)",
        descriptor.name,
        descriptor.defaults.len(),
        columns.len()
    );

    Ok(TableField {
        name: descriptor.name.clone(),
        ty: descriptor.ty.clone(),
        columns,
        primary_key: primary_key::is_primary_key(input, descriptor),
        unique: descriptor.unique,
        nullable: descriptor.nullable || descriptor.ty.is_option(),
        defaults: descriptor.defaults.clone(),
        kind,
    })
}
