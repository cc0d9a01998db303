use super::context::RunContext;
use super::resolve::{resolve, Resolved, Scope};
use crate::model::TypeRef;
use crate::schema::{PojoArch, PojoField, PojoFieldKind};
use crate::{bail, ensure, Result};
use std::sync::Arc;

/// Returns the nested structure for `ty`, built at most once per run.
pub(super) fn build(cx: &mut RunContext<'_>, ty: &TypeRef) -> Result<Arc<PojoArch>> {
    cx.pojo_or_build(ty, |cx| {
        let descriptors = cx.introspect.fields(ty)?;
        ensure!(!descriptors.is_empty(), "nested structure `{ty}` has no fields");

        let mut fields = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let kind = match resolve(cx, Scope::Pojo(ty), descriptor)? {
                Resolved::ForeignKey(_) => {
                    unreachable!("foreign keys are rejected inside nested structures")
                }
                Resolved::Native(storage) => PojoFieldKind::Native(storage),
                Resolved::HasMapper(mapper) | Resolved::InlineMapper(mapper) => {
                    PojoFieldKind::Mapper(mapper)
                }
                Resolved::HasAdapter(adapter) => {
                    if descriptor.ty.is_option() {
                        bail!(
                            "field `{}` of nested structure `{}` is optional and stored through \
                             adapter `{}`, which is not supported",
                            descriptor.name,
                            ty.name(),
                            adapter.path
                        );
                    }
                    PojoFieldKind::Adapter(adapter)
                }
                Resolved::Pojo(handle) => {
                    if descriptor.ty.is_option() {
                        bail!(
                            "field `{}` of nested structure `{}` is an optional nested structure, \
                             which is not supported",
                            descriptor.name,
                            ty.name()
                        );
                    }
                    PojoFieldKind::Nested(handle)
                }
            };

            fields.push(PojoField {
                name: descriptor.name.clone(),
                sql_name: descriptor.sql_name(),
                ty: descriptor.ty.clone(),
                kind,
            });
        }

        Ok(PojoArch {
            ty: ty.clone(),
            fields,
        })
    })
}
