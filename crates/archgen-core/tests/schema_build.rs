use archgen_core::model::*;
use archgen_core::schema::*;
use archgen_core::{Error, Schema};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std_util::assert_err;

fn build_with(
    catalog: &ModelCatalog,
    registry: &Registry,
    inputs: RunInputs,
) -> Result<Schema, Error> {
    ArchFactory::new(catalog, registry).build(&inputs)
}

fn build(catalog: &ModelCatalog, models: &[&str]) -> Result<Schema, Error> {
    let mut inputs = RunInputs::new();
    for model in models {
        inputs = inputs.model(ModelInput::new(*model));
    }
    build_with(catalog, &Registry::new(), inputs)
}

fn column_names(table: &TableArch) -> Vec<&str> {
    table.columns().map(|column| column.name.as_str()).collect()
}

fn point() -> ModelDecl {
    ModelDecl::new("geo::Point")
        .field(FieldDescriptor::new("x", "i32"))
        .field(FieldDescriptor::new("y", "i32"))
}

#[test]
fn default_names_and_column_order() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::BlogPost")
            .field(FieldDescriptor::new("id", "i64"))
            .field(FieldDescriptor::new("title", "String"))
            .field(FieldDescriptor::new("viewCount", "i32"))
            .field(FieldDescriptor::new("body", "Option<String>")),
    );
    let schema = build(&catalog, &["model::BlogPost"]).unwrap();

    let table = &schema.tables()[0];
    assert!(table.is_initialized());
    assert_eq!(table.sql_name, "blog_post");
    assert_eq!(table.accessor, "BlogPostTable");
    assert_eq!(column_names(table), ["id", "title", "view_count", "body"]);
    assert_eq!(table.primary_key().unwrap().name, "id");

    let body = table.field("body").unwrap();
    assert!(body.nullable);
    assert!(body.is_optional());
    assert_eq!(body.kind, FieldKind::Native);
    assert_eq!(body.columns[0].ty, StorageType::String);
}

#[test]
fn explicit_names_and_column_override() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User")
            .field(FieldDescriptor::new("email", "String").primary_key())
            .field(FieldDescriptor::new("name", "String").column("display_name")),
    );
    let inputs = RunInputs::new().model(
        ModelInput::new("model::User")
            .sql_name("accounts")
            .accessor("Accounts"),
    );
    let schema = build_with(&catalog, &Registry::new(), inputs).unwrap();

    let table = &schema.tables()[0];
    assert_eq!(table.sql_name, "accounts");
    assert_eq!(table.accessor, "Accounts");
    assert_eq!(column_names(table), ["email", "display_name"]);
    assert_eq!(table.primary_key().unwrap().name, "email");
}

#[test]
fn duplicate_registration() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User").field(FieldDescriptor::new("id", "i32")),
    );
    let err = assert_err!(build(&catalog, &["model::User", "model::User"]));

    assert!(err.root().is_structural_model());
    assert_eq!(
        err.to_string(),
        "processing model `User`: invalid model: duplicate model registered under key \
         `model::User`: `model::User` and `model::User`"
    );
}

#[test]
fn duplicate_lookup_key_across_models() {
    let catalog = ModelCatalog::new()
        .with(ModelDecl::new("model::User").field(FieldDescriptor::new("id", "i32")))
        .with(ModelDecl::new("model::Admin").field(FieldDescriptor::new("id", "i32")));
    let inputs = RunInputs::new()
        .model(ModelInput::new("model::User").key("model::Person"))
        .model(ModelInput::new("model::Admin").key("model::Person"));
    let err = assert_err!(build_with(&catalog, &Registry::new(), inputs));

    assert_eq!(err.model_context(), Some(("Admin", None)));
    assert!(err.to_string().contains("under key `model::Person`"));
}

#[test]
fn classification_order() {
    let catalog = ModelCatalog::new().with(point()).with(
        ModelDecl::new("model::Place")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("visits", "i64"))
            .field(
                FieldDescriptor::new("status", "model::Status").inline_mapper(
                    InlineMapper::Ordinal {
                        variants: vec!["Open".into(), "Closed".into()],
                    },
                ),
            )
            .field(FieldDescriptor::new("tags", "model::Tags").inline_mapper(
                InlineMapper::Path {
                    path: "crate::mappers::Tags".into(),
                    storage: StorageType::String,
                },
            ))
            .field(FieldDescriptor::new("area", "geo::Area"))
            .field(FieldDescriptor::new("location", "geo::Point")),
    );
    let registry = Registry::new()
        .mapper(
            "i64",
            MapperRef {
                path: "crate::mappers::Counter".into(),
                storage: StorageType::Long,
            },
        )
        .adapter(
            "geo::Area",
            AdapterRef::new("crate::adapters::AreaAdapter")
                .column("width", StorageType::Double)
                .column("height", StorageType::Double),
        );
    let inputs = RunInputs::new().model(ModelInput::new("model::Place"));
    let schema = build_with(&catalog, &registry, inputs).unwrap();

    let table = &schema.tables()[0];
    let kind = |name: &str| table.field(name).unwrap().kind.clone();

    assert_eq!(kind("id"), FieldKind::Native);
    assert!(matches!(kind("visits"), FieldKind::Mapper(MapperApi::Path { path, .. }) if path == "crate::mappers::Counter"));
    assert!(matches!(kind("status"), FieldKind::Mapper(MapperApi::Ordinal { .. })));
    assert!(matches!(kind("tags"), FieldKind::Mapper(MapperApi::Path { path, .. }) if path == "crate::mappers::Tags"));
    assert!(matches!(kind("area"), FieldKind::Adapter(_)));
    assert!(matches!(kind("location"), FieldKind::Nested(_)));

    assert_eq!(
        column_names(table),
        [
            "id",
            "visits",
            "status",
            "tags",
            "area_width",
            "area_height",
            "location_x",
            "location_y"
        ]
    );
    assert_eq!(table.field("status").unwrap().columns[0].ty, StorageType::Int);
}

#[test]
fn nested_structure_is_shared() {
    let catalog = ModelCatalog::new()
        .with(point())
        .with(
            ModelDecl::new("model::Shop")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("entrance", "geo::Point"))
                .field(FieldDescriptor::new("exit", "geo::Point")),
        )
        .with(
            ModelDecl::new("model::Park")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("center", "Option<geo::Point>")),
        );
    let inputs = RunInputs::new()
        .model(ModelInput::new("model::Shop"))
        .model(ModelInput::new("model::Park"))
        .pojo("geo::Point");
    let schema = build_with(&catalog, &Registry::new(), inputs).unwrap();

    let pojo_of = |model: &str, field: &str| {
        let table = schema.table_for(&model.into()).unwrap();
        match &table.field(field).unwrap().kind {
            FieldKind::Nested(handle) => handle.pojo.clone(),
            kind => panic!("expected nested field; actual={kind:?}"),
        }
    };

    let entrance = pojo_of("model::Shop", "entrance");
    assert!(Arc::ptr_eq(&entrance, &pojo_of("model::Shop", "exit")));
    assert!(Arc::ptr_eq(&entrance, &pojo_of("model::Park", "center")));

    assert_eq!(schema.adapters().len(), 1);
    assert!(Arc::ptr_eq(&schema.adapters()[0].pojo, &entrance));
    assert_eq!(schema.adapters()[0].adapter_name(), "PointAdapter");

    let park = schema.table_for(&"model::Park".into()).unwrap();
    assert_eq!(column_names(park), ["id", "center_x", "center_y"]);
    assert!(park.field("center").unwrap().nullable);
}

#[test]
fn deeply_nested_structures() {
    let catalog = ModelCatalog::new()
        .with(point())
        .with(
            ModelDecl::new("geo::Segment")
                .field(FieldDescriptor::new("from", "geo::Point"))
                .field(FieldDescriptor::new("to", "geo::Point")),
        )
        .with(
            ModelDecl::new("model::Road")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("span", "geo::Segment")),
        );
    let schema = build(&catalog, &["model::Road"]).unwrap();

    assert_eq!(
        column_names(&schema.tables()[0]),
        ["id", "span_from_x", "span_from_y", "span_to_x", "span_to_y"]
    );

    let names: Vec<_> = schema.adapters().iter().map(|a| a.adapter_name()).collect();
    assert_eq!(names, ["PointAdapter", "SegmentAdapter"]);
}

#[test]
fn standalone_nested_structure() {
    let catalog = ModelCatalog::new().with(point());
    let inputs = RunInputs::new().pojo("geo::Point");
    let schema = build_with(&catalog, &Registry::new(), inputs).unwrap();

    assert!(schema.tables().is_empty());
    assert_eq!(schema.adapters().len(), 1);
    assert_eq!(schema.adapters()[0].pojo.column_count(), 2);
}

#[test]
fn unsupported_collection_inside_nested_structure() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Profile")
                .field(FieldDescriptor::new("bio", "String"))
                .field(FieldDescriptor::new("tags", "Vec<String>")),
        )
        .with(
            ModelDecl::new("model::User")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("profile", "model::Profile")),
        );
    let err = assert_err!(build(&catalog, &["model::User"]));

    assert_eq!(err.model_context(), Some(("User", Some("profile"))));
    assert!(err.to_string().ends_with(
        "field `tags` of `Profile` has unsupported type `Vec<String>`: \
         collections cannot be stored in columns"
    ));
}

#[test]
fn unsupported_shapes_on_table() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new(
                "pair",
                TypeRef::opaque(TypeShape::Tuple, "(i32, i32)"),
            )),
    );
    let err = assert_err!(build(&catalog, &["model::User"]));
    assert!(err.to_string().contains("tuples cannot be stored in columns"));
}

#[test]
fn nested_structure_containing_itself() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Tree")
                .field(FieldDescriptor::new("value", "i32"))
                .field(FieldDescriptor::new("child", "model::Tree")),
        )
        .with(
            ModelDecl::new("model::Forest")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("tree", "model::Tree")),
        );
    let err = assert_err!(build(&catalog, &["model::Forest"]));
    assert!(err.to_string().contains("nested structure `model::Tree` contains itself"));
}

#[test]
fn foreign_key_inside_nested_structure() {
    let catalog = ModelCatalog::new()
        .with(ModelDecl::new("model::User").field(FieldDescriptor::new("id", "i32")))
        .with(
            ModelDecl::new("model::Audit")
                .field(FieldDescriptor::new("by", "ForeignInt<model::User>")),
        )
        .with(
            ModelDecl::new("model::Doc")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("audit", "model::Audit")),
        );
    let err = assert_err!(build(&catalog, &["model::User", "model::Doc"]));
    assert!(err
        .to_string()
        .contains("field `by` of nested structure `Audit` is a foreign key"));
}

#[test]
fn optional_adapter_inside_nested_structure() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Place")
                .field(FieldDescriptor::new("name", "String"))
                .field(FieldDescriptor::new("spot", "Option<geo::Point>")),
        )
        .with(
            ModelDecl::new("model::Trip")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("start", "model::Place")),
        );
    let registry = Registry::new().adapter(
        "geo::Point",
        AdapterRef::new("crate::geo::PointAdapter")
            .column("x", StorageType::Int)
            .column("y", StorageType::Int),
    );
    let inputs = RunInputs::new().model(ModelInput::new("model::Trip"));
    let err = assert_err!(build_with(&catalog, &registry, inputs));
    assert!(err.to_string().contains(
        "field `spot` of nested structure `Place` is optional and stored through adapter \
         `crate::geo::PointAdapter`, which is not supported"
    ));
}

#[test]
fn nullable_requires_option() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("nick", "String").nullable()),
    );
    let err = assert_err!(build(&catalog, &["model::User"]));
    assert!(err
        .to_string()
        .contains("nullable field `nick` of `User` must be declared as `Option<String>`"));
}

#[test]
fn several_primary_keys() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("user_id", "i32")),
    );
    let err = assert_err!(build(&catalog, &["model::User"]));
    assert_eq!(err.model_context(), Some(("User", None)));
    assert!(err
        .to_string()
        .contains("model `User` has several primary key fields: `id`, `user_id`"));
}

#[test]
fn overlapping_columns() {
    let catalog = ModelCatalog::new().with(point()).with(
        ModelDecl::new("model::Pin")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("at_x", "i32"))
            .field(FieldDescriptor::new("at", "geo::Point")),
    );
    let err = assert_err!(build(&catalog, &["model::Pin"]));
    assert!(err
        .to_string()
        .contains("column `at_x` is declared by both `at_x` and `at`"));
}

#[test]
fn defaults_must_cover_every_column() {
    let catalog = ModelCatalog::new().with(point()).with(
        ModelDecl::new("model::Pin")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("at", "geo::Point").default_value("0")),
    );
    let err = assert_err!(build(&catalog, &["model::Pin"]));
    assert!(err
        .to_string()
        .contains("field `at` declares 1 default value(s) for 2 column(s)"));
}

#[test]
fn bridge_table() {
    let catalog = ModelCatalog::new()
        .with(ModelDecl::new("model::User").field(FieldDescriptor::new("id", "i32")))
        .with(ModelDecl::new("model::Group").field(FieldDescriptor::new("id", "i32")))
        .with(
            ModelDecl::new("model::Membership")
                .field(FieldDescriptor::new("user", "ForeignInt<model::User>"))
                .field(FieldDescriptor::new("group", "ForeignInt<model::Group>"))
                .field(FieldDescriptor::new("role", "String")),
        );

    let inputs = RunInputs::new()
        .model(ModelInput::new("model::User"))
        .model(ModelInput::new("model::Group"))
        .model(ModelInput::new("model::Membership").bridge("user", "group"));
    let schema = build_with(&catalog, &Registry::new(), inputs).unwrap();
    let membership = schema.table_for(&"model::Membership".into()).unwrap();
    assert!(membership.primary_key().is_none());
    assert_eq!(column_names(membership), ["user_id", "group_id", "role"]);

    let inputs = RunInputs::new()
        .model(ModelInput::new("model::User"))
        .model(ModelInput::new("model::Group"))
        .model(ModelInput::new("model::Membership").bridge("user", "role"));
    let err = assert_err!(build_with(&catalog, &Registry::new(), inputs));
    assert!(err
        .to_string()
        .contains("bridge field `role` of `Membership` must be a foreign key"));
}

#[test]
fn introspection_failure_carries_model() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::User")
            .field(FieldDescriptor::new("id", "i32"))
            .field(FieldDescriptor::new("avatar", "media::Image")),
    );
    let err = assert_err!(build(&catalog, &["model::User"]));

    assert!(err.root().is_introspection());
    assert_eq!(err.model_context(), Some(("User", Some("avatar"))));
}

#[test]
fn optional_nesting_needs_a_required_column() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Note")
                .field(FieldDescriptor::new("text", "Option<String>"))
                .field(FieldDescriptor::new("pinned", "Option<bool>")),
        )
        .with(
            ModelDecl::new("model::Task")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("note", "model::Note"))
                .field(FieldDescriptor::new("review", "Option<model::Note>")),
        );
    let inputs = RunInputs::new().model(ModelInput::new("model::Task"));
    let err = assert_err!(build_with(&catalog, &Registry::new(), inputs));

    assert!(err.root().is_structural_model());
    assert_eq!(err.model_context(), Some(("Task", Some("review"))));
    assert!(err.to_string().contains(
        "optional field `review` of `Task` nests `model::Note`, whose columns are all nullable"
    ));
}
