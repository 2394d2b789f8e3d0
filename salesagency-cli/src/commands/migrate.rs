//! Apply pending schema migrations and exit

use anyhow::{Context, Result};
use clap::Parser;

use salesagency_server::db;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides DATABASE_URL and the config file)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: AppConfig) -> Result<()> {
    let url = args
        .database_url
        .unwrap_or_else(|| config.database.url.clone());
    let pool = db::connect(&url, &config.pool_config())
        .await
        .context("Failed to create database pool")?;

    let result = db::migrate(&pool).await;
    db::close(&pool).await;
    result.context("Failed to apply migrations")?;

    println!("Migrations applied");
    Ok(())
}
