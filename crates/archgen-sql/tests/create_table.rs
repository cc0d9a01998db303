use archgen_core::model::*;
use archgen_core::schema::{ArchFactory, StorageType, TableArch};
use archgen_core::Schema;
use archgen_sql::{Flavor, Serializer, Statement};

use pretty_assertions::assert_eq;

fn schema() -> Schema {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::User")
                .field(FieldDescriptor::new("user_id", "i32"))
                .field(FieldDescriptor::new("name", "String"))
                .field(FieldDescriptor::new("avatar", "Option<Vec<u8>>")),
        )
        .with(
            ModelDecl::new("model::Song")
                .field(FieldDescriptor::new("song_id", "i64"))
                .field(FieldDescriptor::new("author", "ForeignInt<model::User>"))
                .field(
                    FieldDescriptor::new("title", "String")
                        .unique()
                        .default_value("'untitled'"),
                )
                .field(FieldDescriptor::new("spot", "model::Point").unique()),
        );
    let registry = Registry::new().adapter(
        "model::Point",
        AdapterRef::new("crate::adapter::PointAdapter")
            .column("x", StorageType::Int)
            .column("y", StorageType::Int),
    );
    let inputs = RunInputs::new()
        .model(ModelInput::new("model::User"))
        .model(ModelInput::new("model::Song"));
    ArchFactory::new(&catalog, &registry).build(&inputs).unwrap()
}

fn table<'a>(schema: &'a Schema, name: &str) -> &'a TableArch {
    schema.table_for(&TypeRef::from(name)).unwrap()
}

fn create(schema: &Schema, name: &str, flavor: Flavor) -> String {
    Serializer::new(schema, flavor)
        .serialize(&Statement::create_table(table(schema, name)))
        .join_lines()
}

#[test]
fn create_user_per_flavor() {
    let schema = schema();

    assert_eq!(
        create(&schema, "model::User", Flavor::Sqlite),
        "CREATE TABLE IF NOT EXISTS user (\n    \
         user_id INTEGER NOT NULL PRIMARY KEY,\n    \
         name VARCHAR NOT NULL,\n    \
         avatar BLOB\n\
         )"
    );
    assert_eq!(
        create(&schema, "model::User", Flavor::Mysql),
        "CREATE TABLE IF NOT EXISTS user (\n    \
         user_id INTEGER NOT NULL PRIMARY KEY AUTO_INCREMENT,\n    \
         name VARCHAR(4096) NOT NULL,\n    \
         avatar BLOB\n\
         )"
    );
    assert_eq!(
        create(&schema, "model::User", Flavor::Postgresql),
        "CREATE TABLE IF NOT EXISTS user (\n    \
         user_id INTEGER NOT NULL PRIMARY KEY,\n    \
         name VARCHAR NOT NULL,\n    \
         avatar BYTEA\n\
         )"
    );
}

#[test]
fn create_song_with_constraints() {
    let schema = schema();

    assert_eq!(
        create(&schema, "model::Song", Flavor::Sqlite),
        "CREATE TABLE IF NOT EXISTS song (\n    \
         song_id INTEGER NOT NULL PRIMARY KEY,\n    \
         author_id INTEGER NOT NULL,\n    \
         title VARCHAR NOT NULL DEFAULT ('untitled') UNIQUE,\n    \
         spot_x INTEGER NOT NULL,\n    \
         spot_y INTEGER NOT NULL,\n    \
         UNIQUE (spot_x, spot_y),\n    \
         FOREIGN KEY(author_id) REFERENCES user(user_id)\n\
         )"
    );
    assert_eq!(
        create(&schema, "model::Song", Flavor::Mysql),
        "CREATE TABLE IF NOT EXISTS song (\n    \
         song_id BIGINT NOT NULL PRIMARY KEY AUTO_INCREMENT,\n    \
         author_id INTEGER NOT NULL,\n    \
         title VARCHAR(4096) NOT NULL DEFAULT ('untitled') UNIQUE,\n    \
         spot_x INTEGER NOT NULL,\n    \
         spot_y INTEGER NOT NULL,\n    \
         UNIQUE (spot_x, spot_y),\n    \
         FOREIGN KEY(author_id) REFERENCES user(user_id)\n\
         )"
    );
}

#[test]
fn drop_table() {
    let schema = schema();
    let sql = Serializer::sqlite(&schema)
        .serialize(&Statement::drop_table_if_exists(table(&schema, "model::Song")));
    assert_eq!(sql.join_lines(), "DROP TABLE IF EXISTS song");
}
