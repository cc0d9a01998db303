mod ast;
pub use ast::{parse_sources, Source};

mod config;
pub use config::GenConfig;

mod expand;

mod output;
pub use output::{write_files, SourceFile, WriteSummary};

use archgen_core::Schema;

/// Generates every source unit for `schema`: one accessor per table, one
/// adapter per nested structure and a `mod.rs` per directory, sorted by
/// path.
pub fn generate(schema: &Schema, config: &GenConfig) -> Vec<SourceFile> {
    expand::schema(schema, config)
}
