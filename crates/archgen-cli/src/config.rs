use anyhow::{Context, Result};
use archgen_codegen::GenConfig;
use archgen_core::model::{AdapterRef, MapperRef, Registry};
use archgen_core::schema::StorageType;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Contents of `archgen.toml`.
///
/// Relative paths are resolved against the directory holding the file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory receiving the generated tree.
    pub out_dir: PathBuf,

    /// Module path of the generated tree inside the crate.
    pub generated_module: String,

    /// Crate path of the runtime types generated code names.
    pub runtime: String,

    /// Rust files to read model declarations from.
    #[serde(rename = "source")]
    pub sources: Vec<SourceConfig>,

    #[serde(rename = "model")]
    pub models: Vec<ModelConfig>,

    /// Nested structures to generate adapters for even when no model uses
    /// them.
    #[serde(rename = "pojo")]
    pub pojos: Vec<PojoConfig>,

    #[serde(rename = "mapper")]
    pub mappers: Vec<MapperConfig>,

    #[serde(rename = "adapter")]
    pub adapters: Vec<AdapterConfig>,

    /// Directory of the configuration file
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub path: PathBuf,

    /// Module the file is compiled as, e.g. `model::music`.
    #[serde(default)]
    pub module: String,
}

/// A table model. Options given here override the struct's attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Crate-relative path of the model type, e.g. `model::User`.
    pub name: String,

    pub table: Option<String>,

    pub accessor: Option<String>,

    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PojoConfig {
    pub name: String,
}

/// An existing mapper converting `ty` to one column.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapperConfig {
    pub ty: String,
    pub path: String,
    pub storage: StorageType,
}

/// An existing adapter converting `ty` to several columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdapterConfig {
    pub ty: String,
    pub path: String,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub name: String,
    pub storage: StorageType,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("src/generated"),
            generated_module: "generated".to_string(),
            runtime: "archgen_runtime".to_string(),
            sources: vec![],
            models: vec![],
            pojos: vec![],
            mappers: vec![],
            adapters: vec![],
            base_dir: PathBuf::new(),
        }
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        Ok(config)
    }
}

impl Config {
    /// Default name of the configuration file.
    pub const FILE_NAME: &'static str = "archgen.toml";

    /// Reads the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Config = contents
            .parse()
            .with_context(|| format!("invalid configuration in {}", path.display()))?;

        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// `path` relative to the configuration file.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.resolve(&self.out_dir)
    }

    pub fn gen_config(&self) -> GenConfig {
        GenConfig::new()
            .out_dir(self.out_dir())
            .generated_module(&self.generated_module)
            .runtime(&self.runtime)
    }

    /// The existing mappers and adapters, in declaration order.
    pub fn registry(&self) -> Registry {
        let mut registry = Registry::new();

        for mapper in &self.mappers {
            registry = registry.mapper(
                mapper.ty.as_str(),
                MapperRef {
                    path: mapper.path.clone(),
                    storage: mapper.storage,
                },
            );
        }

        for adapter in &self.adapters {
            let columns = adapter
                .columns
                .iter()
                .fold(AdapterRef::new(adapter.path.as_str()), |adapter, column| {
                    adapter.column(column.name.as_str(), column.storage)
                });
            registry = registry.adapter(adapter.ty.as_str(), columns);
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgen_core::model::{AdapterLocator, TypeRef};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.out_dir, PathBuf::from("src/generated"));
        assert_eq!(config.generated_module, "generated");
        assert_eq!(config.runtime, "archgen_runtime");
        assert!(config.sources.is_empty());
    }

    #[test]
    fn full() {
        let config: Config = r#"
            out_dir = "gen"
            generated_module = "db::gen"
            runtime = "crate::rt"

            [[source]]
            path = "src/model.rs"
            module = "model"

            [[model]]
            name = "model::User"
            table = "users"
            keys = ["legacy::User"]

            [[pojo]]
            name = "geo::Point"

            [[mapper]]
            ty = "model::Tags"
            path = "crate::mappers::Tags"
            storage = "string"

            [[adapter]]
            ty = "geo::Range"
            path = "crate::adapters::Range"
            columns = [
                { name = "low", storage = "int" },
                { name = "high", storage = "int" },
            ]
        "#
        .parse()
        .unwrap();

        assert_eq!(config.out_dir, PathBuf::from("gen"));
        assert_eq!(config.sources[0].module, "model");
        assert_eq!(config.models[0].table.as_deref(), Some("users"));
        assert_eq!(config.models[0].accessor, None);
        assert_eq!(config.models[0].keys, ["legacy::User"]);
        assert_eq!(config.pojos[0].name, "geo::Point");

        let generated = config.gen_config();
        assert_eq!(generated.generated_module, "db::gen");
        assert_eq!(generated.runtime, "crate::rt");

        let registry = config.registry();
        let mapper = registry.find_mapper(&TypeRef::from("model::Tags")).unwrap();
        assert_eq!(mapper.storage, StorageType::String);

        let adapter = registry.find_adapter(&TypeRef::from("geo::Range")).unwrap();
        assert_eq!(adapter.path, "crate::adapters::Range");
        assert_eq!(adapter.columns.len(), 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = "out = \"gen\"".parse::<Config>().unwrap_err();
        assert!(err.to_string().contains("unknown field `out`"), "{err}");

        let err = r#"
            [[mapper]]
            ty = "model::Tags"
            path = "Tags"
            storage = "text"
        "#
        .parse::<Config>()
        .unwrap_err();
        assert!(err.to_string().contains("unknown variant `text`"), "{err}");
    }

    #[test]
    fn paths_are_relative_to_the_file() {
        let config = Config {
            base_dir: PathBuf::from("project"),
            ..Config::default()
        };
        assert_eq!(config.out_dir(), PathBuf::from("project/src/generated"));
    }
}
