use crate::model::{AdapterLocator, Introspect, ModelInput, RunInputs, TypeRef};
use crate::schema::{AdapterHandle, PojoArch, TableArch, TableField, TableId};
use crate::{bail, Error, Result, Schema};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use tracing::trace;

/// State of one resolution run.
///
/// Owns the table registry, the nested structure memo, and the cursor
/// recording what is being processed. Closing the context consumes it, so a
/// closed context cannot be used again.
pub(super) struct RunContext<'a> {
    pub(super) inputs: &'a RunInputs,

    pub(super) introspect: &'a dyn Introspect,

    pub(super) locator: &'a dyn AdapterLocator,

    /// Tables as they are built, indexed by `TableId`.
    tables: Vec<TableArch>,

    /// Maps every lookup key to its table. Identifiers are reserved in the
    /// shallow pass, before any table has fields.
    table_lookup: IndexMap<TypeRef, TableId>,

    /// Nested structures built so far, in completion order.
    pojos: IndexMap<TypeRef, Arc<PojoArch>>,

    /// Nested structures currently being built.
    building: IndexSet<TypeRef>,

    /// Primary keys derived from shallow tables, checked once every table
    /// is initialized.
    predictions: Vec<Prediction>,

    cursor: Cursor,
}

/// A primary key read from a shallow table's descriptors.
pub(super) struct Prediction {
    pub(super) referencing: String,
    pub(super) referencing_field: String,
    pub(super) table: TableId,
    pub(super) field: String,
    pub(super) ty: TypeRef,
}

/// The model and field last entered.
#[derive(Debug, Default)]
pub(super) struct Cursor {
    model: Option<String>,
    field: Option<String>,
}

impl<'a> RunContext<'a> {
    pub(super) fn new(
        inputs: &'a RunInputs,
        introspect: &'a dyn Introspect,
        locator: &'a dyn AdapterLocator,
    ) -> RunContext<'a> {
        RunContext {
            inputs,
            introspect,
            locator,
            tables: vec![],
            table_lookup: IndexMap::new(),
            pojos: IndexMap::new(),
            building: IndexSet::new(),
            predictions: vec![],
            cursor: Cursor::default(),
        }
    }

    /// Registers a shallow table under every lookup key of `input`.
    pub(super) fn register(&mut self, input: &ModelInput) -> Result<TableId> {
        let id = TableId(self.tables.len());

        for key in input.lookup_keys() {
            if let Some(existing) = self.table_lookup.get(key) {
                bail!(
                    "duplicate model registered under key `{key}`: `{}` and `{}`",
                    self.tables[existing.0].model,
                    input.model
                );
            }
        }

        for key in input.lookup_keys() {
            self.table_lookup.insert(key.clone(), id);
        }
        self.tables.push(TableArch::shallow(id, input));
        trace!(table = %input.sql_name, ?id, "registered shallow table");
        Ok(id)
    }

    pub(super) fn table_for(&self, ty: &TypeRef) -> Option<&TableArch> {
        self.table_lookup.get(ty).map(|id| &self.tables[id.0])
    }

    /// The input a table was registered from.
    pub(super) fn input(&self, id: TableId) -> &'a ModelInput {
        &self.inputs.models[id.0]
    }

    /// Initializes the table registered from the `index`-th input and
    /// validates it.
    pub(super) fn initialize(&mut self, index: usize, fields: Vec<TableField>) -> Result<()> {
        let input = &self.inputs.models[index];
        super::verify::verify_table(input, &fields)?;

        let table = &mut self.tables[index];
        table.initialize(fields);
        trace!(table = %table.sql_name, "initialized table");
        Ok(())
    }

    pub(super) fn predict(&mut self, prediction: Prediction) {
        self.predictions.push(prediction);
    }

    /// Confirms every primary key derived from a shallow table against the
    /// table as finally resolved.
    pub(super) fn verify_predictions(&mut self) -> Result<()> {
        for prediction in &self.predictions {
            let table = &self.tables[prediction.table.0];
            let actual = table
                .primary_key()
                .map(|pk| (pk.name.as_str(), pk.value_ty()));

            if actual != Some((prediction.field.as_str(), &prediction.ty)) {
                let actual = match actual {
                    Some((name, ty)) => format!("`{name}: {ty}`"),
                    None => "no primary key".to_string(),
                };
                self.cursor.model = Some(prediction.referencing.clone());
                self.cursor.field = Some(prediction.referencing_field.clone());
                return Err(Error::structural_model(format!(
                    "primary key of `{}` was derived as `{}: {}` while resolving `{}`, \
                     but the completed table has {actual}",
                    table.model_name(),
                    prediction.field,
                    prediction.ty,
                    prediction.referencing,
                )));
            }
        }
        Ok(())
    }

    /// Returns the memoized structure for `ty`, building it on first use.
    pub(super) fn pojo_or_build(
        &mut self,
        ty: &TypeRef,
        build: impl FnOnce(&mut RunContext<'a>) -> Result<PojoArch>,
    ) -> Result<Arc<PojoArch>> {
        if let Some(pojo) = self.pojos.get(ty) {
            trace!(%ty, "reusing nested structure");
            return Ok(pojo.clone());
        }

        if !self.building.insert(ty.clone()) {
            bail!("nested structure `{ty}` contains itself");
        }
        let built = build(self);
        self.building.shift_remove(ty);

        let pojo = Arc::new(built?);
        self.pojos.insert(ty.clone(), pojo.clone());
        trace!(%ty, "built nested structure");
        Ok(pojo)
    }

    pub(super) fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub(super) fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Ends the run, handing over the resolved tables and adapters.
    pub(super) fn close(self) -> Schema {
        let adapters = self.pojos.into_values().map(AdapterHandle::new).collect();
        Schema::new(self.tables, adapters, self.table_lookup)
    }
}

impl Cursor {
    pub(super) fn enter_model(&mut self, model: &str) {
        self.model = Some(model.to_string());
        self.field = None;
    }

    pub(super) fn enter_field(&mut self, field: &str) {
        self.field = Some(field.to_string());
    }

    pub(super) fn leave_field(&mut self) {
        self.field = None;
    }

    pub(super) fn clear(&mut self) {
        self.model = None;
        self.field = None;
    }

    /// Attaches the recorded model and field to `err`.
    pub(super) fn wrap(&self, err: Error) -> Error {
        match &self.model {
            Some(model) => err.context(Error::processing(model.clone(), self.field.as_deref())),
            None => err,
        }
    }
}
