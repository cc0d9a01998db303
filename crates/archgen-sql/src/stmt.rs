mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod filter;
pub use filter::{Filter, Joiner};

mod insert;
pub use insert::{Ignore, Insert};

mod select;
pub use select::Select;

mod update;
pub use update::Update;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    DropTable(DropTable),
    Filter(Filter),
    Insert(Insert),
    Select(Select),
    Update(Update),
}
