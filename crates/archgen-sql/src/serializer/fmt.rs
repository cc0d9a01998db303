use super::{Formatter, NewLine, Placeholder};
use archgen_core::schema::{Column, PrefixedColumn};

macro_rules! fmt {
    ($f:expr, $( $fragments:expr )*) => {{
        $(
            $fragments.to_sql($f);
        )*
    }};
}

pub(super) trait ToSql {
    fn to_sql(self, f: &mut Formatter<'_>);
}

impl ToSql for &str {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

impl ToSql for &String {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(self);
    }
}

impl ToSql for &Column {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push_str(&self.name);
    }
}

impl ToSql for PrefixedColumn<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(table) = &self.table {
            let table: &str = table;
            fmt!(f, table ".");
        }
        fmt!(f, self.column);
    }
}

impl ToSql for NewLine {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.end_line();
    }
}

impl ToSql for Placeholder {
    fn to_sql(self, f: &mut Formatter<'_>) {
        f.dst.push('?');
    }
}

impl<T: ToSql> ToSql for Option<T> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(inner) = self {
            inner.to_sql(f);
        }
    }
}

impl<A: ToSql, B: ToSql> ToSql for (A, B) {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0 self.1);
    }
}
