mod context;
use context::RunContext;

mod foreign;
mod pojo;
mod primary_key;
mod resolve;
mod table;
mod verify;

use crate::model::{AdapterLocator, Introspect, RunInputs};
use crate::{Result, Schema};
use tracing::{debug, info};

/// Turns model inputs into a validated [`Schema`].
///
/// The build runs in three passes:
///
/// 1. Every model is registered as a shallow table under all of its lookup
///    keys, so any table can be referenced before it is resolved.
/// 2. Every model, in input order, has its fields resolved and its table
///    initialized and validated.
/// 3. Every standalone nested structure is resolved.
///
/// Any failure aborts the run. The error names the model, and the field when
/// known, that was being processed.
pub struct ArchFactory<'a> {
    introspect: &'a dyn Introspect,
    locator: &'a dyn AdapterLocator,
}

impl<'a> ArchFactory<'a> {
    pub fn new(introspect: &'a dyn Introspect, locator: &'a dyn AdapterLocator) -> ArchFactory<'a> {
        ArchFactory {
            introspect,
            locator,
        }
    }

    pub fn build(&self, inputs: &RunInputs) -> Result<Schema> {
        let mut cx = RunContext::new(inputs, self.introspect, self.locator);

        match build_passes(&mut cx, inputs) {
            Ok(()) => {
                let schema = cx.close();
                info!(
                    tables = schema.tables().len(),
                    adapters = schema.adapters().len(),
                    "resolved schema"
                );
                Ok(schema)
            }
            Err(err) => Err(cx.cursor().wrap(err)),
        }
    }
}

fn build_passes(cx: &mut RunContext<'_>, inputs: &RunInputs) -> Result<()> {
    debug!(models = inputs.models.len(), "shallow pass");
    for input in &inputs.models {
        cx.cursor_mut().enter_model(input.model_name());
        cx.register(input)?;
    }

    debug!("completion pass");
    for (index, input) in inputs.models.iter().enumerate() {
        cx.cursor_mut().enter_model(input.model_name());
        let fields = table::build_fields(cx, input)?;
        cx.cursor_mut().leave_field();
        cx.initialize(index, fields)?;
    }
    cx.cursor_mut().clear();
    cx.verify_predictions()?;

    debug!(pojos = inputs.pojos.len(), "nested structure pass");
    for ty in &inputs.pojos {
        cx.cursor_mut().enter_model(ty.name());
        pojo::build(cx, ty)?;
    }
    cx.cursor_mut().clear();

    Ok(())
}
