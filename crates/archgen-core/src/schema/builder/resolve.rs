use super::context::RunContext;
use super::{foreign, pojo};
use crate::model::{AdapterRef, FieldDescriptor, InlineMapper, ModelInput, TypeRef, TypeShape};
use crate::schema::{AdapterHandle, ForeignKey, MapperApi, StorageType};
use crate::{bail, ensure, Result};

/// Where the field being resolved is declared.
#[derive(Debug, Clone, Copy)]
pub(super) enum Scope<'a> {
    Table(&'a ModelInput),
    Pojo(&'a TypeRef),
}

/// How a field is stored. Tested in declaration order; the first match wins.
#[derive(Debug)]
pub(super) enum Resolved {
    ForeignKey(ForeignKey),
    HasMapper(MapperApi),
    Native(StorageType),
    InlineMapper(MapperApi),
    HasAdapter(AdapterRef),
    Pojo(AdapterHandle),
}

impl Scope<'_> {
    fn owner(&self) -> &str {
        match self {
            Scope::Table(input) => input.model_name(),
            Scope::Pojo(ty) => ty.name(),
        }
    }
}

/// Classifies one field.
///
/// Every field resolves to some variant: whatever is not stored another way
/// is treated as a nested structure. Types that cannot be nested fail here
/// with their own error instead.
pub(super) fn resolve(
    cx: &mut RunContext<'_>,
    scope: Scope<'_>,
    field: &FieldDescriptor,
) -> Result<Resolved> {
    let ty = field.ty.value_type();

    if foreign::is_reference(ty) {
        return match scope {
            Scope::Table(input) => foreign::resolve(cx, input, field).map(Resolved::ForeignKey),
            Scope::Pojo(owner) => bail!(
                "field `{}` of nested structure `{}` is a foreign key; \
                 foreign keys are only allowed on models",
                field.name,
                owner.name()
            ),
        };
    }

    ensure!(
        !field.nullable || field.ty.is_option(),
        "nullable field `{}` of `{}` must be declared as `Option<{}>`",
        field.name,
        scope.owner(),
        field.ty
    );

    if let Some(mapper) = cx.locator.find_mapper(ty) {
        return Ok(Resolved::HasMapper(mapper.into()));
    }

    if let Some(storage) = StorageType::from_native(ty) {
        return Ok(Resolved::Native(storage));
    }

    if let Some(inline) = &field.inline_mapper {
        return inline_mapper(scope, field, inline).map(Resolved::InlineMapper);
    }

    if let Some(adapter) = cx.locator.find_adapter(ty) {
        ensure!(
            !adapter.columns.is_empty(),
            "adapter `{}` for `{ty}` declares no columns",
            adapter.path
        );
        return Ok(Resolved::HasAdapter(adapter));
    }

    check_nestable(scope, field, ty)?;
    let pojo = pojo::build(cx, ty)?;
    Ok(Resolved::Pojo(AdapterHandle::new(pojo)))
}

fn inline_mapper(scope: Scope<'_>, field: &FieldDescriptor, inline: &InlineMapper) -> Result<MapperApi> {
    Ok(match inline {
        InlineMapper::Ordinal { variants } => {
            ensure!(
                !variants.is_empty(),
                "field `{}` of `{}` has type `{}`, an enum without variants",
                field.name,
                scope.owner(),
                field.ty
            );
            MapperApi::Ordinal {
                ty: field.ty.value_type().clone(),
                variants: variants.clone(),
            }
        }
        InlineMapper::Path { path, storage } => MapperApi::Path {
            path: path.clone(),
            storage: *storage,
        },
    })
}

const COLLECTIONS: &[&str] = &[
    "Vec",
    "VecDeque",
    "LinkedList",
    "HashMap",
    "HashSet",
    "BTreeMap",
    "BTreeSet",
    "BinaryHeap",
];

const POINTERS: &[&str] = &["Box", "Rc", "Arc", "Cell", "RefCell", "Mutex", "RwLock"];

/// Rejects types that cannot be flattened into columns.
fn check_nestable(scope: Scope<'_>, field: &FieldDescriptor, ty: &TypeRef) -> Result<()> {
    let reason = match ty.shape() {
        TypeShape::Path if ty.is_option() => Some("nested `Option` cannot be stored"),
        TypeShape::Path if COLLECTIONS.contains(&ty.name()) => {
            Some("collections cannot be stored in columns")
        }
        TypeShape::Path if POINTERS.contains(&ty.name()) => {
            Some("wrapper types cannot be stored in columns")
        }
        TypeShape::Path => None,
        TypeShape::Array | TypeShape::Slice => Some("collections cannot be stored in columns"),
        TypeShape::Tuple => Some("tuples cannot be stored in columns"),
        TypeShape::Reference => Some("references cannot be stored in columns"),
        TypeShape::TraitObject => Some("trait objects cannot be stored in columns"),
        TypeShape::Other => Some("the type is not supported"),
    };

    match reason {
        Some(reason) => bail!(
            "field `{}` of `{}` has unsupported type `{}`: {reason}",
            field.name,
            scope.owner(),
            field.ty
        ),
        None => Ok(()),
    }
}
