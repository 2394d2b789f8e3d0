//! salesagency CLI - run and manage the sales agency CRM API
//!
//! - `serve`: connect to Postgres, migrate and serve GraphQL over HTTP
//! - `migrate`: apply pending migrations
//! - `schema`: print the GraphQL SDL
//! - `config`: inspect the effective configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

use config::{AppConfig, DEFAULT_CONFIG_FILE};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "salesagency",
    author,
    version,
    about = "GraphQL API over the sales agency CRM database"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (TOML)
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the GraphQL HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply pending database migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Print the GraphQL schema (SDL)
    Schema(commands::schema::SchemaArgs),
    /// Inspect configuration (show, path)
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    let app_config = AppConfig::load(&cli.config)?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, app_config).await?,
        Commands::Migrate(args) => commands::run_migrate(args, app_config).await?,
        Commands::Schema(args) => commands::run_schema(args)?,
        Commands::Config(args) => config::run_config(args, &cli.config, &app_config)?,
    }
    Ok(())
}
