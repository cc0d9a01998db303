use super::{ty::ColumnType, Comma, Formatter, ToSql};

use archgen_core::schema::{Column, StorageType, TableArch, TableField};
use archgen_core::Schema;

/// One line between the parentheses of `CREATE TABLE`.
pub(super) enum Definition<'a> {
    Column {
        field: &'a TableField,
        column: &'a Column,
        default: Option<&'a String>,
    },

    /// A unique constraint spanning several columns of one field.
    Unique(&'a [Column]),

    ForeignKey {
        column: &'a Column,
        table: &'a TableArch,
        to_column: &'a Column,
    },
}

impl<'a> Definition<'a> {
    pub(super) fn for_table(
        schema: &'a Schema,
        table: &'a TableArch,
        foreign_keys: bool,
    ) -> Vec<Definition<'a>> {
        let mut out = vec![];

        for field in table.fields() {
            for (index, column) in field.columns.iter().enumerate() {
                out.push(Definition::Column {
                    field,
                    column,
                    default: field.defaults.get(index),
                });
            }
        }

        out.extend(
            table
                .fields()
                .iter()
                .filter(|field| field.unique && field.columns.len() > 1)
                .map(|field| Definition::Unique(&field.columns)),
        );

        if foreign_keys {
            for field in table.fields() {
                if let Some(fk) = field.foreign_key() {
                    out.push(Definition::ForeignKey {
                        column: field.column(),
                        table: schema.foreign_table(fk),
                        to_column: schema.foreign_column(fk),
                    });
                }
            }
        }

        out
    }
}

impl ToSql for &Definition<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match *self {
            Definition::Column {
                field,
                column,
                default,
            } => {
                let ty = ColumnType {
                    ty: column.ty,
                    key: field.primary_key || field.is_foreign_key(),
                };
                let auto_increment = field.primary_key
                    && f.serializer.is_mysql()
                    && matches!(column.ty, StorageType::Int | StorageType::Long);

                let not_null = (!field.nullable).then_some(" NOT NULL");
                let primary_key = field.primary_key.then_some(" PRIMARY KEY");
                let auto_increment_clause = auto_increment.then_some(" AUTO_INCREMENT");
                let unique = (field.unique && field.columns.len() == 1).then_some(" UNIQUE");

                fmt!(f, column " " ty not_null primary_key auto_increment_clause);
                if let Some(default) = default.filter(|_| !auto_increment) {
                    fmt!(f, " DEFAULT (" default ")");
                }
                fmt!(f, unique);
            }
            Definition::Unique(columns) => {
                fmt!(f, "UNIQUE (" Comma(columns) ")");
            }
            Definition::ForeignKey {
                column,
                table,
                to_column,
            } => {
                let name = &table.sql_name;
                fmt!(f, "FOREIGN KEY(" column ") REFERENCES " name "(" to_column ")");
            }
        }
    }
}
