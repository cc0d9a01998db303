mod adapter;
mod imports;
mod row;
mod table;
mod values;

use imports::Imports;

use crate::output::{self, SourceFile, HEADER};
use crate::GenConfig;

use archgen_core::model::{naming, TypeRef};
use archgen_core::schema::{AdapterHandle, TableArch};
use archgen_core::Schema;
use std::path::PathBuf;
use std_util::{Indent, Snippet};
use tracing::debug;

struct Expand<'a> {
    /// The resolved schema being emitted
    schema: &'a Schema,

    config: &'a GenConfig,
}

/// Where a generated type lives.
struct Location {
    /// Module segments below the generated root.
    modules: Vec<String>,

    /// File and module name of the unit.
    stem: String,

    /// Name of the generated type.
    name: String,
}

pub(crate) fn schema(schema: &Schema, config: &GenConfig) -> Vec<SourceFile> {
    let expand = Expand { schema, config };

    let mut files = vec![];
    for table in schema.tables() {
        files.push(expand.table_unit(table));
    }
    for handle in schema.adapters() {
        files.push(expand.adapter_unit(handle));
    }

    let modules = output::module_files(&files);
    files.extend(modules);
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

impl Expand<'_> {
    fn table_location(&self, table: &TableArch) -> Location {
        Location::new(&table.model, &table.accessor)
    }

    fn adapter_location(&self, handle: &AdapterHandle) -> Location {
        Location::new(handle.ty(), &handle.adapter_name())
    }

    /// Assembles a unit: header, imports, then the body.
    fn unit(&self, location: &Location, imports: &Imports, body: Snippet) -> SourceFile {
        let path = location.file();
        debug!(path = %path.display(), "expanded unit");

        let content = Snippet::new()
            .line(HEADER)
            .line("")
            .append(&imports.to_snippet())
            .line("")
            .append(&body);

        SourceFile {
            path,
            content: format!("{}\n", content.join_lines()),
        }
    }
}

impl Location {
    fn new(ty: &TypeRef, name: &str) -> Location {
        let modules = match ty.module() {
            Some(module) => module
                .trim_start_matches("crate::")
                .split("::")
                .filter(|segment| !segment.is_empty() && *segment != "crate")
                .map(str::to_string)
                .collect(),
            None => vec![],
        };

        Location {
            modules,
            stem: naming::file_stem(name),
            name: name.to_string(),
        }
    }

    fn file(&self) -> PathBuf {
        let mut path: PathBuf = self.modules.iter().collect();
        path.push(format!("{}.rs", self.stem));
        path
    }

    /// Full path of the generated type.
    fn rust_path(&self, config: &GenConfig) -> String {
        let mut path = config.generated_root();
        for module in &self.modules {
            path.push_str("::");
            path.push_str(module);
        }
        format!("{path}::{}::{}", self.stem, self.name)
    }
}

/// Full path of a declared type inside the crate.
fn crate_path(ty: &TypeRef) -> String {
    let path = ty.path();
    if path.starts_with("crate::") {
        path.to_string()
    } else {
        format!("crate::{path}")
    }
}

/// A Rust string literal holding `text`.
fn str_literal(text: &str) -> String {
    format!("{text:?}")
}

/// Column offset expression relative to `start`.
fn offset(base: &str, index: usize) -> String {
    if index == 0 {
        base.to_string()
    } else {
        format!("{base} + {index}")
    }
}

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

/// A column name usable as a Rust identifier.
fn ident(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Places `expr` after `prefix` and before `suffix`, keeping the lines of a
/// multi-line expression at their relative indentation.
fn wrap(prefix: &str, expr: &Snippet, suffix: &str) -> Snippet {
    let lines = expr.as_lines();
    match lines {
        [] => Snippet::new().line(format!("{prefix}{suffix}")),
        [line] => Snippet::new().line(format!("{prefix}{line}{suffix}")),
        [first, middle @ .., last] => Snippet::new()
            .line(format!("{prefix}{first}"))
            .lines(middle.iter().cloned())
            .line(format!("{last}{suffix}")),
    }
}

/// A function or block: `open`, the indented body, then `close`.
fn block(open: impl Into<String>, body: &Snippet, close: &str) -> Snippet {
    Snippet::new()
        .line(open)
        .append_indented(body, Indent(1))
        .line(close)
}
