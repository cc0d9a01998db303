use crate::{pipeline, Config};

use anyhow::Result;
use archgen_codegen::{generate, write_files};
use clap::Parser;
use console::style;
use std::path::PathBuf;

#[derive(Parser, Debug)]
pub struct GenerateCommand {
    /// Path of the configuration file
    #[arg(short, long, default_value = "archgen.toml")]
    config: PathBuf,

    /// List the files without writing them
    #[arg(long)]
    dry_run: bool,
}

impl GenerateCommand {
    pub(crate) fn run(self) -> Result<()> {
        let config = Config::load(&self.config)?;
        let schema = pipeline::resolve(&config)?;
        let gen_config = config.gen_config();
        let files = generate(&schema, &gen_config);

        println!();
        println!("  {}", style("Generate Sources").cyan().bold().underlined());
        println!();

        if self.dry_run {
            for file in &files {
                println!(
                    "  {} {}",
                    style("·").dim(),
                    gen_config.out_dir.join(&file.path).display()
                );
            }
            println!();
            println!(
                "  {}",
                style(format!("{} files would be written", files.len()))
                    .magenta()
                    .dim()
            );
            println!();
            return Ok(());
        }

        let summary = write_files(&gen_config.out_dir, &files)?;

        for path in &summary.written {
            println!(
                "  {} {}",
                style("✓").green().bold(),
                style(format!("Wrote {}", path.display())).dim()
            );
        }

        println!();
        println!(
            "  {}",
            style(format!(
                "{} written, {} unchanged",
                summary.written.len(),
                summary.unchanged.len()
            ))
            .green()
            .bold()
        );
        println!();

        Ok(())
    }
}
