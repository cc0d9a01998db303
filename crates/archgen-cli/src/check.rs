use crate::{pipeline, Config};

use anyhow::Result;
use archgen_core::schema::{AdapterHandle, TableArch};
use clap::Parser;
use console::style;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Path of the configuration file
    #[arg(short, long, default_value = "archgen.toml")]
    config: PathBuf,
}

impl CheckCommand {
    pub(crate) fn run(self) -> Result<()> {
        let config = Config::load(&self.config)?;
        let schema = pipeline::resolve(&config)?;

        println!();
        println!("  {}", style("Check Models").cyan().bold().underlined());
        println!();

        for table in schema.tables() {
            println!("  {} {}", style("✓").green().bold(), table_summary(table));
        }
        for handle in schema.adapters() {
            println!("  {} {}", style("✓").green().bold(), adapter_summary(handle));
        }

        println!();
        println!(
            "  {}",
            style(format!(
                "{} tables and {} adapters resolved",
                schema.tables().len(),
                schema.adapters().len()
            ))
            .green()
            .bold()
        );
        println!();

        Ok(())
    }
}

fn table_summary(table: &TableArch) -> String {
    let key = match table.primary_key() {
        Some(pk) => format!("primary key `{}`", pk.column().name),
        None => "no primary key".to_string(),
    };
    format!(
        "{} -> `{}` ({} columns, {key})",
        table.accessor,
        table.sql_name,
        table.column_count()
    )
}

fn adapter_summary(handle: &AdapterHandle) -> String {
    format!(
        "{} -> `{}` ({} columns)",
        handle.adapter_name(),
        handle.ty(),
        handle.pojo.column_count()
    )
}
