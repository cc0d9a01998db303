use crate::model::ModelInput;
use crate::schema::TableField;
use crate::{bail, ensure, Result};
use std::collections::HashMap;

/// Structural checks run when a table is initialized.
pub(super) fn verify_table(input: &ModelInput, fields: &[TableField]) -> Result<()> {
    ensure!(!fields.is_empty(), "model `{}` has no fields", input.model_name());

    verify_primary_key(input, fields)?;
    verify_columns(fields)?;

    if input.bridge.is_some() {
        verify_bridge(input, fields)?;
    }

    Ok(())
}

fn verify_primary_key(input: &ModelInput, fields: &[TableField]) -> Result<()> {
    let keys: Vec<_> = fields.iter().filter(|field| field.primary_key).collect();

    match &keys[..] {
        [] => Ok(()),
        [pk] => {
            ensure!(
                pk.column_count() == 1,
                "primary key `{}` of `{}` must be stored in a single column, found {}",
                pk.name,
                input.model_name(),
                pk.column_count()
            );
            ensure!(
                !pk.nullable,
                "primary key `{}` of `{}` cannot be nullable",
                pk.name,
                input.model_name()
            );
            Ok(())
        }
        _ => {
            let names = keys
                .iter()
                .map(|field| format!("`{}`", field.name))
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "model `{}` has several primary key fields: {names}",
                input.model_name()
            )
        }
    }
}

fn verify_columns(fields: &[TableField]) -> Result<()> {
    let mut owners = HashMap::new();

    for field in fields {
        for column in &field.columns {
            if let Some(owner) = owners.insert(column.name.as_str(), field.name.as_str()) {
                bail!(
                    "column `{}` is declared by both `{owner}` and `{}`",
                    column.name,
                    field.name
                );
            }
        }
    }

    Ok(())
}

fn verify_bridge(input: &ModelInput, fields: &[TableField]) -> Result<()> {
    let Some(bridge) = &input.bridge else {
        return Ok(());
    };

    for name in [&bridge.left, &bridge.right] {
        match fields.iter().find(|field| &field.name == name) {
            Some(field) => ensure!(
                field.is_foreign_key(),
                "bridge field `{name}` of `{}` must be a foreign key",
                input.model_name()
            ),
            None => bail!(
                "bridge field `{name}` is not declared by `{}`",
                input.model_name()
            ),
        }
    }

    Ok(())
}
