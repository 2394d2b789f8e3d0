//! HTTP server command
//!
//! Connects, applies pending migrations and serves the GraphQL API until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use salesagency_server::db;
use salesagency_server::http::{run_server, ServerConfig};

use crate::config::AppConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides HOST/PORT and the config file)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Database URL (overrides DATABASE_URL and the config file)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Skip applying pending migrations on startup
    #[arg(long)]
    pub no_migrate: bool,
}

impl ServeArgs {
    /// Apply flags on top of the loaded config.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(bind) = self.bind {
            config.server.host = bind.ip();
            config.server.port = bind.port();
        }
        if self.cors_permissive {
            config.server.cors_permissive = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, mut config: AppConfig) -> Result<()> {
    args.apply_to(&mut config);

    let pool = db::connect(&config.database.url, &config.pool_config())
        .await
        .context("Failed to create database pool")?;

    if args.no_migrate {
        tracing::info!("skipping migrations");
    } else {
        db::migrate(&pool).await.context("Failed to apply migrations")?;
    }

    let server = ServerConfig {
        bind_addr: config.bind_addr(),
        cors_permissive: config.server.cors_permissive,
    };
    tracing::info!("Starting salesagency server on {}", server.bind_addr);

    let result = run_server(pool.clone(), server).await;
    db::close(&pool).await;
    result.context("Server error")
}
