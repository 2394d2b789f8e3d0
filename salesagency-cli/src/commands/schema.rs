//! Print the GraphQL schema (SDL)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct SchemaArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run_schema(args: SchemaArgs) -> Result<()> {
    let sdl = salesagency_server::sdl();
    match args.output {
        Some(path) => {
            std::fs::write(&path, sdl)
                .with_context(|| format!("Failed to write schema to {}", path.display()))?;
            tracing::info!(path = %path.display(), "schema written");
        }
        None => print!("{sdl}"),
    }
    Ok(())
}
