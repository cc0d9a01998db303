use super::{naming, TypeRef};

/// A model that becomes one table.
///
/// The model is registered under its own type and under every additional
/// lookup key, so foreign references may name any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInput {
    /// Table name.
    pub sql_name: String,

    /// Name of the generated accessor type.
    pub accessor: String,

    /// The model type.
    pub model: TypeRef,

    /// Extra types the model is known under.
    pub keys: Vec<TypeRef>,

    /// Set for link tables joining two other models.
    pub bridge: Option<Bridge>,
}

/// The two foreign-key fields of a many-to-many link table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bridge {
    pub left: String,
    pub right: String,
}

impl ModelInput {
    /// Creates an input with names derived from the model type name.
    pub fn new(model: impl Into<TypeRef>) -> ModelInput {
        let model = model.into();
        ModelInput {
            sql_name: naming::table_name(model.name()),
            accessor: naming::accessor_name(model.name()),
            model,
            keys: vec![],
            bridge: None,
        }
    }

    pub fn sql_name(mut self, name: impl Into<String>) -> ModelInput {
        self.sql_name = name.into();
        self
    }

    pub fn accessor(mut self, name: impl Into<String>) -> ModelInput {
        self.accessor = name.into();
        self
    }

    pub fn key(mut self, key: impl Into<TypeRef>) -> ModelInput {
        self.keys.push(key.into());
        self
    }

    pub fn bridge(mut self, left: impl Into<String>, right: impl Into<String>) -> ModelInput {
        self.bridge = Some(Bridge {
            left: left.into(),
            right: right.into(),
        });
        self
    }

    /// The model type followed by the extra keys.
    pub fn lookup_keys(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::once(&self.model).chain(self.keys.iter())
    }

    /// Short name used in diagnostics.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }
}

/// Everything one run resolves: tables in order, then standalone nested
/// structures.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub models: Vec<ModelInput>,
    pub pojos: Vec<TypeRef>,
}

impl RunInputs {
    pub fn new() -> RunInputs {
        RunInputs::default()
    }

    pub fn model(mut self, input: ModelInput) -> RunInputs {
        self.models.push(input);
        self
    }

    pub fn pojo(mut self, ty: impl Into<TypeRef>) -> RunInputs {
        self.pojos.push(ty.into());
        self
    }
}
