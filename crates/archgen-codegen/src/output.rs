use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One generated file, its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// What [`write_files`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

/// First line of every generated file.
pub(crate) const HEADER: &str = "// @generated by archgen. Do not edit.";

/// Writes `files` under `out_dir`, skipping files whose content is already
/// up to date.
pub fn write_files(out_dir: &Path, files: &[SourceFile]) -> anyhow::Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for file in files {
        let path = out_dir.join(&file.path);

        if let Ok(existing) = fs::read_to_string(&path) {
            if existing == file.content {
                debug!(path = %path.display(), "unchanged");
                summary.unchanged.push(path);
                continue;
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(path = %path.display(), "wrote");
        summary.written.push(path);
    }

    Ok(summary)
}

/// A `mod.rs` for every directory holding generated units, declaring its
/// files and subdirectories in sorted order.
pub(crate) fn module_files(units: &[SourceFile]) -> Vec<SourceFile> {
    let mut dirs: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();

    for unit in units {
        let mut dir = PathBuf::new();
        if let Some(parent) = unit.path.parent() {
            for component in parent.components() {
                let name = component.as_os_str().to_string_lossy().into_owned();
                dirs.entry(dir.clone()).or_default().insert(name.clone());
                dir.push(name);
            }
        }
        if let Some(stem) = unit.path.file_stem() {
            dirs.entry(dir)
                .or_default()
                .insert(stem.to_string_lossy().into_owned());
        }
    }

    dirs.into_iter()
        .map(|(dir, children)| {
            let mut content = format!("{HEADER}\n\n");
            for child in children {
                content.push_str(&format!("pub mod {child};\n"));
            }
            SourceFile {
                path: dir.join("mod.rs"),
                content,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn unit(path: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from(path),
            content: String::new(),
        }
    }

    #[test]
    fn module_tree() {
        let files = module_files(&[
            unit("model/user_table.rs"),
            unit("model/geo/point_adapter.rs"),
            unit("model/song_table.rs"),
            unit("tag_table.rs"),
        ]);

        let rendered: Vec<_> = files
            .iter()
            .map(|file| (file.path.to_string_lossy().into_owned(), file.content.clone()))
            .collect();

        assert_eq!(
            rendered,
            [
                (
                    "mod.rs".to_string(),
                    format!("{HEADER}\n\npub mod model;\npub mod tag_table;\n")
                ),
                (
                    "model/mod.rs".to_string(),
                    format!("{HEADER}\n\npub mod geo;\npub mod song_table;\npub mod user_table;\n")
                ),
                (
                    "model/geo/mod.rs".to_string(),
                    format!("{HEADER}\n\npub mod point_adapter;\n")
                ),
            ]
        );
    }
}
