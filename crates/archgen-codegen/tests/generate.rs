use archgen_codegen::{generate, write_files, GenConfig, SourceFile};
use archgen_core::model::*;
use archgen_core::schema::ArchFactory;
use archgen_core::Schema;

use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn user() -> ModelDecl {
    ModelDecl::new("model::User")
        .field(FieldDescriptor::new("user_id", "i32"))
        .field(FieldDescriptor::new("name", "String"))
}

fn music() -> Schema {
    let catalog = ModelCatalog::new().with(user()).with(
        ModelDecl::new("model::Song")
            .field(FieldDescriptor::new("song_id", "i32"))
            .field(FieldDescriptor::new("author", "ForeignInt<model::User>"))
            .field(FieldDescriptor::new(
                "producer",
                "Option<ForeignInt<model::User>>",
            )),
    );
    let inputs = RunInputs::new()
        .model(ModelInput::new("model::User"))
        .model(ModelInput::new("model::Song"));
    ArchFactory::new(&catalog, &Registry::new())
        .build(&inputs)
        .unwrap()
}

fn places() -> Schema {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Point")
                .field(FieldDescriptor::new("x", "f64"))
                .field(FieldDescriptor::new("y", "Option<f64>")),
        )
        .with(
            ModelDecl::new("model::Place")
                .field(FieldDescriptor::new("place_id", "i32"))
                .field(FieldDescriptor::new("at", "model::Point"))
                .field(FieldDescriptor::new("bounds", "Option<model::Point>")),
        );
    let inputs = RunInputs::new().model(ModelInput::new("model::Place"));
    ArchFactory::new(&catalog, &Registry::new())
        .build(&inputs)
        .unwrap()
}

fn file<'a>(files: &'a [SourceFile], path: &str) -> &'a str {
    match files.iter().find(|file| file.path == PathBuf::from(path)) {
        Some(file) => &file.content,
        None => panic!("no file `{path}` among {:?}", paths(files)),
    }
}

fn paths(files: &[SourceFile]) -> Vec<String> {
    files
        .iter()
        .map(|file| file.path.to_string_lossy().replace('\\', "/"))
        .collect()
}

#[test]
fn file_layout() {
    let files = generate(&music(), &GenConfig::new());

    assert_eq!(
        paths(&files),
        [
            "mod.rs",
            "model/mod.rs",
            "model/song_table.rs",
            "model/user_table.rs",
        ]
    );
    assert_eq!(
        file(&files, "model/mod.rs"),
        "// @generated by archgen. Do not edit.\n\npub mod song_table;\npub mod user_table;\n"
    );
}

#[test]
fn table_accessor() {
    let files = generate(&music(), &GenConfig::new());

    let expected = r#"// @generated by archgen. Do not edit.

use archgen_runtime::{Flavor, ReadFollow, Row, RowError, ToValue, Value};
use crate::model::User;

pub struct UserTable;

impl UserTable {
    pub const TABLE: &'static str = "user";
    pub const COLUMNS: [&'static str; 2] = ["user_id", "name"];
    pub const PRIMARY_KEY: &'static str = "user_id";
    pub const COLUMN_COUNT: usize = 2;

    pub const INSERT: &'static str = "INSERT INTO user (user_id, name) VALUES (?, ?)";
    pub const INSERT_IGNORE: &'static str = "INSERT IGNORE INTO user (user_id, name) VALUES (?, ?)";
    pub const INSERT_OR_IGNORE: &'static str = "INSERT OR IGNORE INTO user (user_id, name) VALUES (?, ?)";
    pub const UPDATE_BY_PK: &'static str = "UPDATE user SET name=? WHERE user_id=?";
    pub const DELETE_BY_PK: &'static str = "DELETE FROM user WHERE user_id=?";
    pub const DELETE_ALL: &'static str = "DELETE FROM user";
    pub const SELECT_NO_FOLLOW: &'static str = "SELECT user_id, name FROM user";
    pub const SELECT_FOLLOW_ONE_LEVEL: &'static str = "SELECT user.user_id, user.name FROM user";
    pub const SELECT_FOLLOW_ALL: &'static str = "SELECT user.user_id, user.name FROM user";
    pub const SELECT_BY_PK_NO_FOLLOW: &'static str = "SELECT user_id, name FROM user WHERE user_id=?";
    pub const SELECT_BY_PK_FOLLOW_ONE_LEVEL: &'static str = "SELECT user.user_id, user.name FROM user WHERE user.user_id=?";
    pub const SELECT_BY_PK_FOLLOW_ALL: &'static str = "SELECT user.user_id, user.name FROM user WHERE user.user_id=?";
    pub const DROP_TABLE: &'static str = "DROP TABLE IF EXISTS user";

    pub fn select(follow: ReadFollow) -> &'static str {
        match follow {
            ReadFollow::NoFollow => Self::SELECT_NO_FOLLOW,
            ReadFollow::FollowOneLevel => Self::SELECT_FOLLOW_ONE_LEVEL,
            ReadFollow::FollowAll => Self::SELECT_FOLLOW_ALL,
        }
    }

    pub fn select_by_pk(follow: ReadFollow) -> &'static str {
        match follow {
            ReadFollow::NoFollow => Self::SELECT_BY_PK_NO_FOLLOW,
            ReadFollow::FollowOneLevel => Self::SELECT_BY_PK_FOLLOW_ONE_LEVEL,
            ReadFollow::FollowAll => Self::SELECT_BY_PK_FOLLOW_ALL,
        }
    }

    pub fn column_count(follow: ReadFollow) -> usize {
        match follow {
            ReadFollow::NoFollow => 2,
            ReadFollow::FollowOneLevel => 2,
            ReadFollow::FollowAll => 2,
        }
    }

    pub fn create_table(flavor: Flavor) -> &'static str {
        match flavor {
            Flavor::Sqlite => "CREATE TABLE IF NOT EXISTS user (\n    user_id INTEGER NOT NULL PRIMARY KEY,\n    name VARCHAR NOT NULL\n)",
            Flavor::Mysql => "CREATE TABLE IF NOT EXISTS user (\n    user_id INTEGER NOT NULL PRIMARY KEY AUTO_INCREMENT,\n    name VARCHAR(4096) NOT NULL\n)",
            Flavor::Postgresql => "CREATE TABLE IF NOT EXISTS user (\n    user_id INTEGER NOT NULL PRIMARY KEY,\n    name VARCHAR NOT NULL\n)",
        }
    }

    pub fn values(param: &User) -> Vec<Value> {
        vec![
            param.user_id.to_value(),
            param.name.to_value(),
        ]
    }

    pub fn values_for_update(param: &User) -> Vec<Value> {
        vec![
            param.name.to_value(),
            param.user_id.to_value(),
        ]
    }

    pub fn from_row(
        row: &Row,
        _follow: ReadFollow,
        start: &mut usize,
    ) -> Result<User, RowError> {
        Ok(User {
            user_id: row.get_i32(start)?,
            name: row.get_string(start)?,
        })
    }
}
"#;

    assert_eq!(file(&files, "model/user_table.rs"), expected);
}

#[test]
fn foreign_keys_read_every_follow_policy() {
    let files = generate(&music(), &GenConfig::new());
    let song = file(&files, "model/song_table.rs");

    assert!(song.starts_with(
        "// @generated by archgen. Do not edit.\n\n\
         use archgen_runtime::{Flavor, ForeignInt, ReadFollow, Row, RowError, ToValue, Value};\n\
         use crate::generated::model::user_table::UserTable;\n\
         use crate::model::Song;\n"
    ));

    let from_row = r#"    pub fn from_row(
        row: &Row,
        follow: ReadFollow,
        start: &mut usize,
    ) -> Result<Song, RowError> {
        Ok(Song {
            song_id: row.get_i32(start)?,
            author: match follow {
                ReadFollow::NoFollow => ForeignInt::of_id(row.get_i32(start)?),
                ReadFollow::FollowOneLevel => {
                    let id = row.get_i32(start)?;
                    ForeignInt::of_entity(id, UserTable::from_row(row, ReadFollow::NoFollow, start)?)
                }
                ReadFollow::FollowAll => {
                    let id = row.get_i32(start)?;
                    ForeignInt::of_entity(id, UserTable::from_row(row, ReadFollow::FollowAll, start)?)
                }
            },
            producer: match follow {
                ReadFollow::NoFollow => match row.get_opt_i32(start)? {
                    Some(id) if id != 0 => Some(ForeignInt::of_id(id)),
                    _ => None,
                }
                ReadFollow::FollowOneLevel => match row.get_opt_i32(start)? {
                    Some(id) if id != 0 => Some(ForeignInt::of_entity(id, UserTable::from_row(row, ReadFollow::NoFollow, start)?)),
                    _ => {
                        *start += 2;
                        None
                    }
                }
                ReadFollow::FollowAll => match row.get_opt_i32(start)? {
                    Some(id) if id != 0 => Some(ForeignInt::of_entity(id, UserTable::from_row(row, ReadFollow::FollowAll, start)?)),
                    _ => {
                        *start += 2;
                        None
                    }
                }
            },
        })
    }
"#;
    assert!(song.contains(from_row), "{song}");

    let column_count = r#"    pub fn column_count(follow: ReadFollow) -> usize {
        match follow {
            ReadFollow::NoFollow => 3,
            ReadFollow::FollowOneLevel => 7,
            ReadFollow::FollowAll => 7,
        }
    }
"#;
    assert!(song.contains(column_count), "{song}");

    assert!(song.contains(
        "    pub const SELECT_FOLLOW_ONE_LEVEL: &'static str = \"SELECT song.song_id, song.author_id, \
         user.user_id, user.name, song.producer_id, user_2.user_id, user_2.name FROM song \
         LEFT JOIN user ON song.author_id = user.user_id \
         LEFT JOIN user AS user_2 ON song.producer_id = user_2.user_id\";\n"
    ), "{song}");
}

#[test]
fn nested_structures() {
    let files = generate(&places(), &GenConfig::new());

    assert_eq!(
        paths(&files),
        [
            "mod.rs",
            "model/mod.rs",
            "model/place_table.rs",
            "model/point_adapter.rs",
        ]
    );

    let expected = r#"// @generated by archgen. Do not edit.

use archgen_runtime::{ToValue, Value};
use crate::model::Point;

pub struct PointAdapter;

impl PointAdapter {
    pub const COLUMNS: [&'static str; 2] = ["x", "y"];

    pub fn create_instance(
        x: f64,
        y: Option<f64>,
    ) -> Point {
        Point {
            x,
            y,
        }
    }

    pub fn fill_values(param: &Point, array: &mut [Value], start: usize) {
        array[start] = param.x.to_value();
        array[start + 1] = param.y.to_value();
    }

    pub fn to_new_values(param: &Point) -> Vec<Value> {
        let mut array = vec![Value::Null; 2];
        Self::fill_values(param, &mut array, 0);
        array
    }
}
"#;
    assert_eq!(file(&files, "model/point_adapter.rs"), expected);

    let place = file(&files, "model/place_table.rs");
    assert!(place.contains("use crate::generated::model::point_adapter::PointAdapter;\n"));

    let values = r#"    pub fn values(param: &Place) -> Vec<Value> {
        let mut array = vec![
            param.place_id.to_value(),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
        ];
        PointAdapter::fill_values(&param.at, &mut array, 1);
        if let Some(value) = &param.bounds {
            PointAdapter::fill_values(value, &mut array, 3);
        }
        array
    }
"#;
    assert!(place.contains(values), "{place}");

    let reads = r#"            at: PointAdapter::create_instance(row.get_f64(start)?, row.get_opt_f64(start)?),
            bounds: if row.is_null(*start) && row.is_null(*start + 1) {
                *start += 2;
                None
            } else {
                Some(PointAdapter::create_instance(row.get_f64(start)?, row.get_opt_f64(start)?))
            },
"#;
    assert!(place.contains(reads), "{place}");
}

#[test]
fn optional_structure_with_a_nullable_first_column() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Spot")
                .field(FieldDescriptor::new("x", "Option<f64>"))
                .field(FieldDescriptor::new("y", "f64")),
        )
        .with(
            ModelDecl::new("model::Mark")
                .field(FieldDescriptor::new("mark_id", "i32"))
                .field(FieldDescriptor::new("spot", "Option<model::Spot>")),
        );
    let inputs = RunInputs::new().model(ModelInput::new("model::Mark"));
    let schema = ArchFactory::new(&catalog, &Registry::new())
        .build(&inputs)
        .unwrap();

    let files = generate(&schema, &GenConfig::new());
    let mark = file(&files, "model/mark_table.rs");

    // `Some(Spot { x: None, y })` stores a null first column
    let values = r#"        if let Some(value) = &param.spot {
            SpotAdapter::fill_values(value, &mut array, 1);
        }
"#;
    assert!(mark.contains(values), "{mark}");

    let reads = r#"            spot: if row.is_null(*start) && row.is_null(*start + 1) {
                *start += 2;
                None
            } else {
                Some(SpotAdapter::create_instance(row.get_opt_f64(start)?, row.get_f64(start)?))
            },
"#;
    assert!(mark.contains(reads), "{mark}");
}

#[test]
fn follow_all_on_a_cycle_reads_one_level() {
    let catalog = ModelCatalog::new()
        .with(
            ModelDecl::new("model::Employee")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("team", "ForeignInt<model::Team>")),
        )
        .with(
            ModelDecl::new("model::Team")
                .field(FieldDescriptor::new("id", "i32"))
                .field(FieldDescriptor::new("lead", "ForeignInt<model::Employee>")),
        );
    let inputs = RunInputs::new()
        .model(ModelInput::new("model::Employee"))
        .model(ModelInput::new("model::Team"));
    let schema = ArchFactory::new(&catalog, &Registry::new())
        .build(&inputs)
        .unwrap();

    let files = generate(&schema, &GenConfig::new());
    let employee = file(&files, "model/employee_table.rs");

    let select = "SELECT employee.id, employee.team_id, team.id, team.lead_id FROM employee \
                  LEFT JOIN team ON employee.team_id = team.id";
    assert!(employee.contains(&format!(
        "    pub const SELECT_FOLLOW_ONE_LEVEL: &'static str = \"{select}\";\n"
    )), "{employee}");
    assert!(employee.contains(&format!(
        "    pub const SELECT_FOLLOW_ALL: &'static str = \"{select}\";\n"
    )), "{employee}");

    let column_count = r#"    pub fn column_count(follow: ReadFollow) -> usize {
        match follow {
            ReadFollow::NoFollow => 2,
            ReadFollow::FollowOneLevel => 4,
            ReadFollow::FollowAll => 4,
        }
    }
"#;
    assert!(employee.contains(column_count), "{employee}");

    let follow_all = r#"                ReadFollow::FollowAll => {
                    let id = row.get_i32(start)?;
                    ForeignInt::of_entity(id, TeamTable::from_row(row, ReadFollow::NoFollow, start)?)
                }
"#;
    assert!(employee.contains(follow_all), "{employee}");
}

#[test]
fn mapped_fields() {
    let catalog = ModelCatalog::new().with(
        ModelDecl::new("model::Device")
            .field(FieldDescriptor::new("device_id", "i64"))
            .field(
                FieldDescriptor::new("state", "model::State").inline_mapper(InlineMapper::Ordinal {
                    variants: vec!["On".into(), "Off".into()],
                }),
            )
            .field(FieldDescriptor::new("tags", "Option<model::Tags>")),
    );
    let registry = Registry::new().mapper(
        "model::Tags",
        MapperRef {
            path: "crate::mappers::TagsMapper".into(),
            storage: archgen_core::schema::StorageType::String,
        },
    );
    let inputs = RunInputs::new().model(ModelInput::new("model::Device"));
    let schema = ArchFactory::new(&catalog, &registry).build(&inputs).unwrap();

    let files = generate(&schema, &GenConfig::new());
    let device = file(&files, "model/device_table.rs");

    assert!(device.contains("use crate::model::State;\n"), "{device}");
    assert!(device.contains(
        "            state: [State::On, State::Off][row.get_i32(start)? as usize],\n"
    ));
    assert!(device.contains(
        "            tags: row.get_opt_string(start)?.map(|value| crate::mappers::TagsMapper::to_field(value)),\n"
    ));
    assert!(device.contains("            (param.state as i32).to_value(),\n"));
    assert!(device.contains(
        "            param.tags.as_ref().map(|value| crate::mappers::TagsMapper::to_storage(value)).to_value(),\n"
    ));
}

#[test]
fn generated_module_and_runtime_paths() {
    let config = GenConfig::new()
        .generated_module("db::tables")
        .runtime("crate::rt");
    let files = generate(&music(), &config);
    let song = file(&files, "model/song_table.rs");

    assert!(song.contains("use crate::rt::{Flavor, ForeignInt, ReadFollow, Row, RowError, ToValue, Value};\n"));
    assert!(song.contains("use crate::db::tables::model::user_table::UserTable;\n"));
}

#[test]
fn output_is_deterministic() {
    assert_eq!(
        generate(&music(), &GenConfig::new()),
        generate(&music(), &GenConfig::new())
    );
}

#[test]
fn writes_only_changed_files() {
    let dir = std::env::temp_dir().join(format!("archgen-write-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let files = generate(&music(), &GenConfig::new());

    let summary = write_files(&dir, &files).unwrap();
    assert_eq!(summary.written.len(), files.len());
    assert!(summary.unchanged.is_empty());
    assert_eq!(
        std::fs::read_to_string(dir.join("model/user_table.rs")).unwrap(),
        file(&files, "model/user_table.rs")
    );

    let summary = write_files(&dir, &files).unwrap();
    assert!(summary.written.is_empty());
    assert_eq!(summary.unchanged.len(), files.len());

    std::fs::remove_dir_all(&dir).unwrap();
}
