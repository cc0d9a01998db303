//! Reads model declarations out of Rust sources.

mod attr;
use attr::{FieldAttr, StructAttr};

mod error;
use error::ErrorSet;

mod ty;
use ty::{Declared, Scope, Uses};

use anyhow::Context;
use archgen_core::model::{Bridge, FieldDescriptor, InlineMapper, ModelCatalog, ModelDecl};
use archgen_core::Result;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use syn::ext::IdentExt;
use tracing::debug;

/// A Rust source file and the module it is compiled as.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,

    /// Module path relative to the crate root, e.g. `model::music`. Empty
    /// for the crate root.
    pub module: String,

    pub text: String,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>, module: impl Into<String>, text: impl Into<String>) -> Source {
        Source {
            path: path.into(),
            module: module.into(),
            text: text.into(),
        }
    }

    /// Reads the file at `path`.
    pub fn read(path: impl AsRef<Path>, module: impl Into<String>) -> Result<Source> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Source::new(path, module, text))
    }
}

/// A declaration found while walking a file.
struct Item<'a, T> {
    source: &'a Source,
    module: String,
    item: &'a T,
}

#[derive(Default)]
struct Items<'a> {
    structs: Vec<Item<'a, syn::ItemStruct>>,
    enums: Vec<Item<'a, syn::ItemEnum>>,
    uses: Uses,
}

/// Parses `sources` and describes every struct they declare.
///
/// Structs marked `#[archgen(model)]` become table models, other structs are
/// available as nested structures. Fields whose type is a unit-only enum are
/// stored through its variant index. Types that can never be stored, such as
/// generic structs or enums carrying data, are recorded so that using them
/// fails with a precise reason.
pub fn parse_sources(sources: &[Source]) -> Result<ModelCatalog> {
    let files = sources
        .iter()
        .map(|source| {
            syn::parse_file(&source.text).map_err(|err| {
                let start = err.span().start();
                archgen_core::Error::from_args(format_args!(
                    "failed to parse `{}`: {}:{}: {err}",
                    source.path.display(),
                    start.line,
                    start.column + 1
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut items = Items::default();
    for (source, file) in sources.iter().zip(&files) {
        walk(source, &source.module, &file.items, &mut items);
    }

    let mut declared = Declared::default();
    for item in &items.structs {
        declared.insert(ty::join(&item.module, &item.item.ident.unraw().to_string()));
    }
    for item in &items.enums {
        declared.insert(ty::join(&item.module, &item.item.ident.unraw().to_string()));
    }

    // Unit-only enums and their variants, by path
    let mut enums = IndexMap::new();
    let mut catalog = ModelCatalog::new();

    for item in &items.enums {
        let path = ty::join(&item.module, &item.item.ident.unraw().to_string());
        let unit = item
            .item
            .variants
            .iter()
            .all(|variant| matches!(variant.fields, syn::Fields::Unit));

        if unit {
            let variants: Vec<String> = item
                .item
                .variants
                .iter()
                .map(|variant| variant.ident.to_string())
                .collect();
            enums.insert(path, variants);
        } else {
            let reason = format!(
                "enum `{}` has variants with data, which cannot be stored",
                item.item.ident
            );
            catalog.unsupported(path.as_str(), reason);
        }
    }

    for item in &items.structs {
        let scope = Scope {
            module: &item.module,
            uses: items.uses.get(&item.module),
            declared: &declared,
        };

        let mut errs = ErrorSet::new();
        if let Some(decl) = struct_decl(item, &scope, &enums, &mut catalog, &mut errs) {
            debug!(ty = %decl.ty, model = decl.model, fields = decl.fields.len(), "parsed struct");
            catalog.insert(decl)?;
        }
        errs.into_result(&item.source.path)?;
    }

    Ok(catalog)
}

fn walk<'a>(source: &'a Source, module: &str, items: &'a [syn::Item], out: &mut Items<'a>) {
    for item in items {
        match item {
            syn::Item::Struct(item) => out.structs.push(Item {
                source,
                module: module.to_string(),
                item,
            }),
            syn::Item::Enum(item) => out.enums.push(Item {
                source,
                module: module.to_string(),
                item,
            }),
            syn::Item::Use(item) => {
                let uses = out.uses.entry(module.to_string()).or_default();
                ty::collect_use(module, &item.tree, &mut vec![], uses);
            }
            syn::Item::Mod(item) => {
                if let Some((_, items)) = &item.content {
                    let module = ty::join(module, &item.ident.unraw().to_string());
                    walk(source, &module, items, out);
                }
            }
            _ => {}
        }
    }
}

/// Describes one struct. Structs that cannot be described are recorded in
/// `catalog` as unsupported, or reported if they are marked as models.
fn struct_decl(
    item: &Item<'_, syn::ItemStruct>,
    scope: &Scope<'_>,
    enums: &IndexMap<String, Vec<String>>,
    catalog: &mut ModelCatalog,
    errs: &mut ErrorSet,
) -> Option<ModelDecl> {
    let ast = item.item;
    let path = ty::join(&item.module, &ast.ident.unraw().to_string());

    let attr = match StructAttr::from_ast(&ast.attrs) {
        Ok(attr) => attr,
        Err(err) => {
            errs.push(err);
            return None;
        }
    };

    let unsupported = if !ast.generics.params.is_empty() {
        Some((
            syn::Error::new_spanned(&ast.generics, "model structs cannot be generic"),
            "generic structs cannot be stored",
        ))
    } else if !matches!(ast.fields, syn::Fields::Named(_)) {
        Some((
            syn::Error::new_spanned(&ast.ident, "model structs must have named fields"),
            "only structs with named fields can be stored",
        ))
    } else {
        None
    };

    if let Some((err, reason)) = unsupported {
        match attr {
            Some(_) => errs.push(err),
            None => catalog.unsupported(path.as_str(), reason),
        }
        return None;
    }

    let attr = attr.unwrap_or_default();
    let mut decl = ModelDecl::new(path.as_str());
    decl.model = attr.model;
    decl.table = attr.table;
    decl.accessor = attr.accessor;
    decl.keys = attr.keys.iter().map(|key| scope.canonical_path(key)).collect();
    decl.bridge = attr.bridge.map(|(left, right)| Bridge {
        left: left.unraw().to_string(),
        right: right.unraw().to_string(),
    });

    for field in &ast.fields {
        match field_descriptor(field, scope, enums) {
            Ok(descriptor) => decl.fields.push(descriptor),
            Err(err) => errs.push(err),
        }
    }

    Some(decl)
}

fn field_descriptor(
    field: &syn::Field,
    scope: &Scope<'_>,
    enums: &IndexMap<String, Vec<String>>,
) -> syn::Result<FieldDescriptor> {
    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(field, "model fields must be named"));
    };

    let attr = FieldAttr::from_ast(&field.attrs)?;
    let mut descriptor = FieldDescriptor::new(ident.unraw().to_string(), scope.canonical(&field.ty));

    descriptor.nullable |= attr.nullable;
    descriptor.primary_key = attr.primary_key;
    descriptor.unique = attr.unique;
    descriptor.column = attr.column;
    descriptor.defaults = attr.defaults;

    descriptor.inline_mapper = match attr.mapper {
        Some((path, storage)) => Some(InlineMapper::Path { path, storage }),
        None => enums
            .get(descriptor.ty.value_type().path())
            .map(|variants| InlineMapper::Ordinal {
                variants: variants.clone(),
            }),
    };

    Ok(descriptor)
}
