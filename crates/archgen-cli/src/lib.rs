mod check;
mod config;
mod generate;
mod pipeline;

pub use check::CheckCommand;
pub use config::*;
pub use generate::GenerateCommand;
pub use pipeline::{load_catalog, resolve, run_inputs};

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "archgen")]
#[command(about = "archgen - Resolves model structs into tables and generates their accessors")]
#[command(version)]
pub struct Cli {
    /// Log every resolution and generation step
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate table accessors and adapters
    Generate(GenerateCommand),

    /// Resolve the models and print the resulting tables
    Check(CheckCommand),
}

impl Cli {
    /// Log level used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Generate(cmd) => cmd.run(),
            Command::Check(cmd) => cmd.run(),
        }
    }
}
