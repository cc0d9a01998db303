use super::row::to_field;
use super::values::{fill, to_value};
use super::{block, crate_path, ident, offset, str_literal, Expand, Imports};
use crate::output::SourceFile;

use archgen_core::model::{naming, AdapterRef};
use archgen_core::schema::{adapter_columns, AdapterHandle, PojoArch, PojoFieldKind, StorageType};
use std_util::Snippet;

/// One column-level parameter of `create_instance`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Param {
    /// Column name, also used as the parameter name.
    pub(super) name: String,

    pub(super) ty: StorageType,

    /// The column is nullable and the parameter an `Option`.
    pub(super) optional: bool,
}

impl Param {
    pub(super) fn new(name: impl Into<String>, ty: StorageType, optional: bool) -> Param {
        Param {
            name: name.into(),
            ty,
            optional,
        }
    }

    fn rust_type(&self) -> String {
        if self.optional {
            format!("Option<{}>", self.ty.rust_type())
        } else {
            self.ty.rust_type().to_string()
        }
    }
}

/// The parameters of a generated adapter, one per column of `pojo`.
pub(super) fn pojo_params(pojo: &PojoArch) -> Vec<Param> {
    let mut params = vec![];
    push_pojo_params(pojo, None, &mut params);
    params
}

fn push_pojo_params(pojo: &PojoArch, prefix: Option<&str>, out: &mut Vec<Param>) {
    for field in &pojo.fields {
        let name = match prefix {
            Some(prefix) => naming::compound(prefix, &field.sql_name),
            None => field.sql_name.clone(),
        };

        match &field.kind {
            PojoFieldKind::Native(ty) => out.push(Param::new(name, *ty, field.is_optional())),
            PojoFieldKind::Mapper(mapper) => {
                out.push(Param::new(name, mapper.storage(), field.is_optional()))
            }
            PojoFieldKind::Adapter(adapter) => out.extend(
                adapter_columns(&name, adapter)
                    .into_iter()
                    .map(|column| Param::new(column.name, column.ty, false)),
            ),
            PojoFieldKind::Nested(handle) => push_pojo_params(&handle.pojo, Some(&name), out),
        }
    }
}

/// The parameters of an existing adapter.
pub(super) fn adapter_params(adapter: &AdapterRef) -> Vec<Param> {
    adapter
        .columns
        .iter()
        .map(|column| Param::new(column.name.clone(), column.ty, false))
        .collect()
}

/// How a unit names the type at `path`. Single-segment paths are already in
/// scope.
pub(super) fn use_path(imports: &mut Imports, path: &str) -> String {
    if path.contains("::") {
        imports.import(path)
    } else {
        path.to_string()
    }
}

impl Expand<'_> {
    pub(super) fn adapter_unit(&self, handle: &AdapterHandle) -> SourceFile {
        let location = self.adapter_location(handle);
        let name = handle.adapter_name();
        let pojo = &handle.pojo;
        let params = pojo_params(pojo);

        let mut imports = Imports::new(&self.config.runtime, &name);
        let ty = imports.import(&crate_path(&pojo.ty));

        let columns = std_util::join::comma(params.iter().map(|param| str_literal(&param.name)));
        let items = Snippet::new()
            .line(format!(
                "pub const COLUMNS: [&'static str; {}] = [{columns}];",
                params.len()
            ))
            .line("")
            .append(&self.create_instance_fn(pojo, &ty, &params, &mut imports))
            .line("")
            .append(&self.fill_values_fn(pojo, &ty, &mut imports))
            .line("")
            .append(&to_new_values_fn(&ty, params.len(), &mut imports));

        let body = Snippet::new()
            .line(format!("pub struct {name};"))
            .line("")
            .append(&block(format!("impl {name} {{"), &items, "}"));

        self.unit(&location, &imports, body)
    }

    /// Builds the structure from one argument per column.
    fn create_instance_fn(
        &self,
        pojo: &PojoArch,
        ty: &str,
        params: &[Param],
        imports: &mut Imports,
    ) -> Snippet {
        let mut fields = Snippet::new();
        let mut next = 0;

        for field in &pojo.fields {
            let count = field.column_count();
            let args: Vec<_> = params[next..next + count]
                .iter()
                .map(|param| ident(&param.name))
                .collect();
            next += count;

            let name = ident(&field.name);
            let value = match &field.kind {
                PojoFieldKind::Native(_) => args[0].clone(),
                PojoFieldKind::Mapper(mapper) => {
                    to_field(mapper, &args[0], field.is_optional(), imports)
                }
                PojoFieldKind::Adapter(adapter) => {
                    let path = use_path(imports, &adapter.path);
                    format!("{path}::create_instance({})", args.join(", "))
                }
                PojoFieldKind::Nested(handle) => {
                    let path = imports.import(&self.adapter_location(handle).rust_path(self.config));
                    format!("{path}::create_instance({})", args.join(", "))
                }
            };

            if value == name {
                fields.push(format!("{name},"));
            } else {
                fields.push(format!("{name}: {value},"));
            }
        }

        let mut signature = Snippet::new().line("pub fn create_instance(");
        for param in params {
            signature.push(format!("    {}: {},", ident(&param.name), param.rust_type()));
        }
        signature.push(format!(") -> {ty} {{"));

        signature
            .append_indented(&block(format!("{ty} {{"), &fields, "}"), std_util::Indent(1))
            .line("}")
    }

    /// Writes the columns of `param` into `array` from `start` on.
    fn fill_values_fn(&self, pojo: &PojoArch, ty: &str, imports: &mut Imports) -> Snippet {
        let value = imports.runtime("Value");

        let mut body = Snippet::new();
        let mut index = 0;

        for field in &pojo.fields {
            let place = format!("param.{}", ident(&field.name));
            let slot = offset("start", index);

            match &field.kind {
                PojoFieldKind::Native(_) => {
                    imports.runtime("ToValue");
                    body.push(format!("array[{slot}] = {place}.to_value();"));
                }
                PojoFieldKind::Mapper(mapper) => {
                    imports.runtime("ToValue");
                    let stored = to_value(mapper, &place, field.is_optional());
                    body.push(format!("array[{slot}] = {stored};"));
                }
                PojoFieldKind::Adapter(adapter) => {
                    let path = use_path(imports, &adapter.path);
                    body = body.append(&fill(&path, &place, false, "array", &slot));
                }
                PojoFieldKind::Nested(handle) => {
                    let path = imports.import(&self.adapter_location(handle).rust_path(self.config));
                    body = body.append(&fill(&path, &place, false, "array", &slot));
                }
            }

            index += field.column_count();
        }

        block(
            format!("pub fn fill_values(param: &{ty}, array: &mut [{value}], start: usize) {{"),
            &body,
            "}",
        )
    }
}

/// A fresh parameter array holding the columns of `param`.
fn to_new_values_fn(ty: &str, column_count: usize, imports: &mut Imports) -> Snippet {
    let value = imports.runtime("Value");

    let body = Snippet::new()
        .line(format!("let mut array = vec![{value}::Null; {column_count}];"))
        .line("Self::fill_values(param, &mut array, 0);")
        .line("array");

    block(
        format!("pub fn to_new_values(param: &{ty}) -> Vec<{value}> {{"),
        &body,
        "}",
    )
}
