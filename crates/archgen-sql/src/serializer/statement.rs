use super::{column_def::Definition, Comma, Delimited, Formatter, NewLine, Placeholder, ToSql};

use crate::stmt::{self, Statement};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Filter(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let schema = f.serializer.schema;
        let table = schema.table(self.table);
        let name = &table.sql_name;
        let if_not_exists = if self.if_not_exists {
            "IF NOT EXISTS "
        } else {
            ""
        };
        let definitions = Definition::for_table(schema, table, self.foreign_keys);

        fmt!(f, "CREATE TABLE " if_not_exists name " (" NewLine);
        for (index, definition) in definitions.iter().enumerate() {
            fmt!(f, "    " definition);
            if index < definitions.len() - 1 {
                fmt!(f, ",");
            }
            fmt!(f, NewLine);
        }
        fmt!(f, ")");
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &f.serializer.table(self.table).sql_name;
        fmt!(f, "DELETE FROM " name);
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &f.serializer.table(self.table).sql_name;
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        fmt!(f, "DROP TABLE " if_exists name);
    }
}

impl ToSql for &stmt::Filter {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.columns.is_empty() {
            return;
        }
        let comparisons = self.columns.iter().map(|column| (column, "=?"));
        fmt!(f, "WHERE " Delimited(comparisons, self.joiner.delimiter()));
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = f.serializer.table(self.table);
        let name = &table.sql_name;
        let keyword = self.ignore.keyword();
        let columns = Comma(table.columns());
        let params = Comma((0..table.column_count()).map(|_| Placeholder));

        fmt!(f, keyword name " (" columns ")" NewLine "VALUES (" params ")");
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let schema = f.serializer.schema;
        let name = &schema.table(self.table).sql_name;
        let columns = Comma(schema.select_columns(self.table, self.follow));

        fmt!(f, "SELECT " columns NewLine "FROM " name);

        for join in schema.joins(self.table, self.follow) {
            let to = &join.to.sql_name;
            let alias = join.alias.as_ref().map(|alias| (" AS ", alias));
            let from_column = join.from_column();
            let to_column = join.referenced_column();
            fmt!(f, NewLine "LEFT JOIN " to alias " ON " from_column " = " to_column);
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &f.serializer.table(self.table).sql_name;
        let assignments = Comma(self.columns.iter().map(|column| (column, "=?")));
        fmt!(f, "UPDATE " name NewLine "SET " assignments);
    }
}
