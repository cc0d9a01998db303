use super::Snippet;

use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Every runtime item generated code may name. Crate types with these names
/// are never imported under their short name.
const RUNTIME_ITEMS: &[&str] = &[
    "Flavor",
    "ForeignInt",
    "ForeignLong",
    "ForeignObj",
    "ReadFollow",
    "Row",
    "RowError",
    "ToValue",
    "Value",
];

/// Collects the `use` declarations of one generated unit.
///
/// Types are referred to by their last segment when that name is free in the
/// unit, and by their full path otherwise.
pub(super) struct Imports {
    /// Path of the runtime crate
    runtime: String,

    /// Runtime items used by the unit
    runtime_items: BTreeSet<&'static str>,

    /// Imported name to full path
    names: IndexMap<String, String>,

    /// Names defined by the unit itself
    reserved: Vec<String>,
}

impl Imports {
    pub(super) fn new(runtime: &str, own_name: &str) -> Imports {
        Imports {
            runtime: runtime.to_string(),
            runtime_items: BTreeSet::new(),
            names: IndexMap::new(),
            reserved: vec![own_name.to_string()],
        }
    }

    /// Uses an item of the runtime crate.
    pub(super) fn runtime(&mut self, item: &'static str) -> &'static str {
        debug_assert!(RUNTIME_ITEMS.contains(&item), "unknown runtime item `{item}`");
        self.runtime_items.insert(item);
        item
    }

    /// Uses the type at `path`, returning how the unit refers to it.
    pub(super) fn import(&mut self, path: &str) -> String {
        let name = path.rsplit("::").next().unwrap_or(path);

        if let Some(existing) = self.names.get(name) {
            return if existing == path {
                name.to_string()
            } else {
                path.to_string()
            };
        }

        if RUNTIME_ITEMS.contains(&name) || self.reserved.iter().any(|reserved| reserved == name) {
            return path.to_string();
        }

        self.names.insert(name.to_string(), path.to_string());
        name.to_string()
    }

    /// The `use` lines, runtime first, then sorted crate paths.
    pub(super) fn to_snippet(&self) -> Snippet {
        let mut lines = Snippet::new();

        match self.runtime_items.len() {
            0 => {}
            1 => {
                let item = self.runtime_items.iter().next().copied().unwrap_or_default();
                lines.push(format!("use {}::{item};", self.runtime));
            }
            _ => {
                let items = std_util::join::comma(&self.runtime_items);
                lines.push(format!("use {}::{{{items}}};", self.runtime));
            }
        }

        let paths: BTreeSet<_> = self.names.values().collect();
        for path in paths {
            lines.push(format!("use {path};"));
        }

        lines
    }
}
