use archgen_core::model::{TypeRef, TypeShape};
use indexmap::{IndexMap, IndexSet};
use quote::ToTokens;

/// Every type declared across the parsed sources, by crate-relative path.
#[derive(Debug, Default)]
pub(super) struct Declared {
    paths: IndexSet<String>,
}

/// `use` declarations of every module: module path, then imported name to
/// crate-relative or external path.
pub(super) type Uses = IndexMap<String, IndexMap<String, String>>;

/// Name resolution as seen from one module.
pub(super) struct Scope<'a> {
    pub(super) module: &'a str,
    pub(super) uses: Option<&'a IndexMap<String, String>>,
    pub(super) declared: &'a Declared,
}

impl Declared {
    pub(super) fn insert(&mut self, path: String) {
        self.paths.insert(path);
    }

    fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// The only declared type called `name`.
    fn unique_by_name(&self, name: &str) -> Option<&str> {
        let mut found = self
            .paths
            .iter()
            .filter(|path| path.rsplit("::").next() == Some(name));
        match (found.next(), found.next()) {
            (Some(path), None) => Some(path),
            _ => None,
        }
    }
}

/// `module::name`, or `name` at the crate root.
pub(super) fn join(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

/// Makes a path written in `module` relative to the crate root. Paths not
/// starting with `crate`, `self` or `super` are returned as written.
pub(super) fn absolute(module: &str, segments: &[String]) -> String {
    let mut base: Vec<&str> = module.split("::").filter(|s| !s.is_empty()).collect();

    let rest = match segments.first().map(String::as_str) {
        Some("crate") => &segments[1..],
        Some("self") => {
            let rest = &segments[1..];
            return join_all(&base, rest);
        }
        Some("super") => {
            let mut rest = segments;
            while rest.first().map(String::as_str) == Some("super") {
                base.pop();
                rest = &rest[1..];
            }
            return join_all(&base, rest);
        }
        _ => return segments.join("::"),
    };

    rest.join("::")
}

fn join_all(base: &[&str], rest: &[String]) -> String {
    base.iter()
        .copied()
        .chain(rest.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("::")
}

/// Records the names a `use` tree brings into `module`. Glob imports are
/// ignored.
pub(super) fn collect_use(
    module: &str,
    tree: &syn::UseTree,
    prefix: &mut Vec<String>,
    out: &mut IndexMap<String, String>,
) {
    match tree {
        syn::UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(module, &path.tree, prefix, out);
            prefix.pop();
        }
        syn::UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last() {
                    out.insert(last.clone(), absolute(module, prefix));
                }
            } else {
                prefix.push(ident.clone());
                out.insert(ident, absolute(module, prefix));
                prefix.pop();
            }
        }
        syn::UseTree::Rename(rename) => {
            let ident = rename.ident.to_string();
            let path = if ident == "self" {
                absolute(module, prefix)
            } else {
                prefix.push(ident);
                let path = absolute(module, prefix);
                prefix.pop();
                path
            };
            out.insert(rename.rename.to_string(), path);
        }
        syn::UseTree::Glob(_) => {}
        syn::UseTree::Group(group) => {
            for tree in &group.items {
                collect_use(module, tree, prefix, out);
            }
        }
    }
}

impl Scope<'_> {
    /// The type as a [`TypeRef`], with paths made crate-relative.
    pub(super) fn canonical(&self, ty: &syn::Type) -> TypeRef {
        match ty {
            syn::Type::Path(path) if path.qself.is_none() => self.canonical_path(&path.path),
            syn::Type::Paren(paren) => self.canonical(&paren.elem),
            syn::Type::Group(group) => self.canonical(&group.elem),
            syn::Type::Array(_) => opaque(TypeShape::Array, ty),
            syn::Type::Slice(_) => opaque(TypeShape::Slice, ty),
            syn::Type::Tuple(_) => opaque(TypeShape::Tuple, ty),
            syn::Type::Reference(_) => opaque(TypeShape::Reference, ty),
            syn::Type::TraitObject(_) => opaque(TypeShape::TraitObject, ty),
            _ => opaque(TypeShape::Other, ty),
        }
    }

    pub(super) fn canonical_path(&self, path: &syn::Path) -> TypeRef {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();

        let args = match path.segments.last().map(|segment| &segment.arguments) {
            Some(syn::PathArguments::AngleBracketed(args)) => args
                .args
                .iter()
                .filter_map(|arg| match arg {
                    syn::GenericArgument::Type(ty) => Some(self.canonical(ty)),
                    _ => None,
                })
                .collect(),
            _ => vec![],
        };

        TypeRef::generic(self.resolve(&segments), args)
    }

    /// Resolves a path as written in this module.
    ///
    /// A single name is looked up among the module's own declarations, then
    /// its `use` declarations, then the declarations of the whole crate if
    /// the name is unique there. Unknown names, such as `String` or `i32`,
    /// are kept as written.
    fn resolve(&self, segments: &[String]) -> String {
        match segments {
            [] => String::new(),
            [first, ..] if matches!(first.as_str(), "crate" | "self" | "super") => {
                absolute(self.module, segments)
            }
            [name] => {
                let local = join(self.module, name);
                if self.declared.contains(&local) {
                    local
                } else if let Some(path) = self.uses.and_then(|uses| uses.get(name)) {
                    path.clone()
                } else if let Some(path) = self.declared.unique_by_name(name) {
                    path.to_string()
                } else {
                    name.clone()
                }
            }
            [first, rest @ ..] => {
                if let Some(path) = self.uses.and_then(|uses| uses.get(first)) {
                    let mut segments = vec![path.clone()];
                    segments.extend(rest.iter().cloned());
                    return segments.join("::");
                }
                let local = join(self.module, &segments.join("::"));
                if self.declared.contains(&local) {
                    local
                } else {
                    segments.join("::")
                }
            }
        }
    }
}

fn opaque(shape: TypeShape, ty: &syn::Type) -> TypeRef {
    TypeRef::opaque(shape, ty.to_token_stream().to_string())
}
