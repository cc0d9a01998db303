use super::{block, crate_path, str_literal, Expand, Imports};
use crate::output::SourceFile;

use archgen_core::schema::{ReadFollow, TableArch};
use archgen_sql::stmt::Ignore;
use archgen_sql::{Flavor, Serializer, Statement};
use heck::ToShoutySnakeCase;
use std_util::Snippet;

impl Expand<'_> {
    pub(super) fn table_unit(&self, table: &TableArch) -> SourceFile {
        let location = self.table_location(table);
        let mut imports = Imports::new(&self.config.runtime, &table.accessor);
        let model = imports.import(&crate_path(&table.model));

        let mut items = self.constants(table);
        let fns = [
            Some(select_fn(&mut imports)),
            self.select_by_pk_fn(table, &mut imports),
            Some(self.column_count_fn(table, &mut imports)),
            Some(self.create_table_fn(table, &mut imports)),
            Some(self.values_fn(table, &model, &mut imports)),
            self.values_for_update_fn(table, &model, &mut imports),
            Some(self.from_row_fn(table, &model, &mut imports)),
        ];
        for item in fns.into_iter().flatten() {
            items = items.line("").append(&item);
        }

        let body = Snippet::new()
            .line(format!("pub struct {};", table.accessor))
            .line("")
            .append(&block(format!("impl {} {{", table.accessor), &items, "}"));

        self.unit(&location, &imports, body)
    }

    /// Names and statements, each statement on one line.
    fn constants(&self, table: &TableArch) -> Snippet {
        let columns: Vec<_> = table.columns().map(|column| str_literal(&column.name)).collect();

        let mut out = Snippet::new()
            .line(constant("TABLE", &table.sql_name))
            .line(format!(
                "pub const COLUMNS: [&'static str; {}] = [{}];",
                columns.len(),
                std_util::join::comma(&columns)
            ));
        if let Some(pk) = table.primary_key() {
            out.push(constant("PRIMARY_KEY", &pk.column().name));
        }
        out.push(format!("pub const COLUMN_COUNT: usize = {};", columns.len()));
        out.push("");

        for ignore in Ignore::ALL {
            let name = match ignore {
                Ignore::Default => "INSERT",
                Ignore::Ignore => "INSERT_IGNORE",
                Ignore::OrIgnore => "INSERT_OR_IGNORE",
            };
            out.push(constant(name, &self.sql([Statement::insert(table, ignore)])));
        }

        if let (Some(update), Some(filter)) = (
            Statement::update_non_key(table),
            Statement::filter_primary_key(table, ReadFollow::NoFollow),
        ) {
            out.push(constant("UPDATE_BY_PK", &self.sql([update, filter])));
        }
        if let Some(filter) = Statement::filter_primary_key(table, ReadFollow::NoFollow) {
            out.push(constant("DELETE_BY_PK", &self.sql([Statement::delete(table), filter])));
        }
        out.push(constant("DELETE_ALL", &self.sql([Statement::delete(table)])));

        for follow in ReadFollow::ALL {
            out.push(constant(
                &select_name("SELECT", follow),
                &self.sql([Statement::select(table, follow)]),
            ));
        }
        for follow in ReadFollow::ALL {
            if let Some(filter) = Statement::filter_primary_key(table, follow) {
                out.push(constant(
                    &select_name("SELECT_BY_PK", follow),
                    &self.sql([Statement::select(table, follow), filter]),
                ));
            }
        }

        out.push(constant(
            "DROP_TABLE",
            &self.sql([Statement::drop_table_if_exists(table)]),
        ));
        out
    }

    /// Statements joined into one line. Only DDL depends on the flavor.
    fn sql<const N: usize>(&self, stmts: [Statement; N]) -> String {
        Serializer::new(self.schema, Flavor::default())
            .serialize_all(&stmts)
            .join(" ")
    }

    fn select_by_pk_fn(&self, table: &TableArch, imports: &mut Imports) -> Option<Snippet> {
        table.primary_key()?;
        let read_follow = imports.runtime("ReadFollow");

        let arms = Snippet::new().lines(ReadFollow::ALL.map(|follow| {
            format!(
                "{read_follow}::{follow} => Self::{},",
                select_name("SELECT_BY_PK", follow)
            )
        }));

        Some(follow_fn("select_by_pk", read_follow, "&'static str", &arms))
    }

    /// Columns `from_row` reads under each policy.
    fn column_count_fn(&self, table: &TableArch, imports: &mut Imports) -> Snippet {
        let read_follow = imports.runtime("ReadFollow");

        let arms = Snippet::new().lines(ReadFollow::ALL.map(|follow| {
            format!(
                "{read_follow}::{follow} => {},",
                self.schema.column_count(table.id, follow)
            )
        }));

        follow_fn("column_count", read_follow, "usize", &arms)
    }

    fn create_table_fn(&self, table: &TableArch, imports: &mut Imports) -> Snippet {
        let flavor_ty = imports.runtime("Flavor");

        let mut arms = Snippet::new();
        for flavor in Flavor::ALL {
            let sql = Serializer::new(self.schema, flavor)
                .serialize(&Statement::create_table(table))
                .join("\n");
            arms.push(format!(
                "{flavor_ty}::{} => {},",
                flavor.variant_name(),
                str_literal(&sql)
            ));
        }

        block(
            format!("pub fn create_table(flavor: {flavor_ty}) -> &'static str {{"),
            &block("match flavor {", &arms, "}"),
            "}",
        )
    }
}

fn select_fn(imports: &mut Imports) -> Snippet {
    let read_follow = imports.runtime("ReadFollow");

    let arms = Snippet::new().lines(ReadFollow::ALL.map(|follow| {
        format!(
            "{read_follow}::{follow} => Self::{},",
            select_name("SELECT", follow)
        )
    }));

    follow_fn("select", read_follow, "&'static str", &arms)
}

/// `pub const NAME: &'static str = "..";`
fn constant(name: &str, value: &str) -> String {
    format!("pub const {name}: &'static str = {};", str_literal(value))
}

/// e.g. `SELECT_FOLLOW_ONE_LEVEL`
fn select_name(prefix: &str, follow: ReadFollow) -> String {
    format!("{prefix}_{}", follow.variant_name().to_shouty_snake_case())
}

/// A function matching on its `follow` argument.
fn follow_fn(name: &str, read_follow: &str, ret: &str, arms: &Snippet) -> Snippet {
    block(
        format!("pub fn {name}(follow: {read_follow}) -> {ret} {{"),
        &block("match follow {", arms, "}"),
        "}",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(select_name("SELECT", ReadFollow::NoFollow), "SELECT_NO_FOLLOW");
        assert_eq!(
            select_name("SELECT_BY_PK", ReadFollow::FollowOneLevel),
            "SELECT_BY_PK_FOLLOW_ONE_LEVEL"
        );
        assert_eq!(
            constant("TABLE", "user"),
            "pub const TABLE: &'static str = \"user\";"
        );
    }
}
