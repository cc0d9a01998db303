use crate::Config;

use anyhow::Result;
use archgen_codegen::{parse_sources, Source};
use archgen_core::model::{ModelCatalog, ModelDecl, ModelInput, RunInputs, TypeRef};
use archgen_core::schema::ArchFactory;
use archgen_core::Schema;
use tracing::{debug, info};

/// Parses every configured source file.
pub fn load_catalog(config: &Config) -> Result<ModelCatalog> {
    let sources = config
        .sources
        .iter()
        .map(|source| Source::read(config.resolve(&source.path), source.module.as_str()))
        .collect::<archgen_core::Result<Vec<_>>>()?;

    let catalog = parse_sources(&sources)?;
    info!(
        sources = sources.len(),
        types = catalog.len(),
        "parsed sources"
    );
    Ok(catalog)
}

/// The tables and nested structures to resolve.
///
/// Structs marked as models come first, in declaration order. Each
/// `[[model]]` entry then either overrides the options of a declared model or
/// adds a table for a struct that carries no attribute.
pub fn run_inputs(config: &Config, catalog: &ModelCatalog) -> RunInputs {
    let mut inputs = catalog
        .models()
        .fold(RunInputs::new(), |inputs, decl| inputs.model(decl.to_input()));

    for model in &config.models {
        let ty = model_type(catalog, &model.name);

        let index = match inputs.models.iter().position(|input| input.model == ty) {
            Some(index) => index,
            None => {
                let input = catalog
                    .get(&ty)
                    .map(ModelDecl::to_input)
                    .unwrap_or_else(|| ModelInput::new(ty.clone()));
                inputs.models.push(input);
                inputs.models.len() - 1
            }
        };

        let input = &mut inputs.models[index];
        if let Some(table) = &model.table {
            input.sql_name = table.clone();
        }
        if let Some(accessor) = &model.accessor {
            input.accessor = accessor.clone();
        }
        if !model.keys.is_empty() {
            input.keys = model
                .keys
                .iter()
                .map(|key| TypeRef::from(key.as_str()))
                .collect();
        }
        debug!(model = %input.model, table = %input.sql_name, "configured model");
    }

    for pojo in &config.pojos {
        inputs = inputs.pojo(model_type(catalog, &pojo.name));
    }

    inputs
}

/// Reads the sources and resolves the schema they describe.
pub fn resolve(config: &Config) -> Result<Schema> {
    let catalog = load_catalog(config)?;
    let inputs = run_inputs(config, &catalog);
    let registry = config.registry();

    let schema = ArchFactory::new(&catalog, &registry).build(&inputs)?;
    info!(
        tables = schema.tables().len(),
        adapters = schema.adapters().len(),
        "resolved schema"
    );
    Ok(schema)
}

/// A configured type name. Unqualified names are looked up among the
/// declarations.
fn model_type(catalog: &ModelCatalog, name: &str) -> TypeRef {
    let ty = TypeRef::from(name);
    if name.contains("::") || catalog.get(&ty).is_some() {
        return ty;
    }
    match catalog.find_by_name(name) {
        Some(decl) => decl.ty.clone(),
        None => ty,
    }
}
