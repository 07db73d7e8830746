// ABOUTME: Recipe Buddy HTTP server binary
// ABOUTME: Loads configuration, builds the engine for the selected backend, and serves the API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Recipe Buddy Server Binary
//!
//! Starts the recipe search API. Configuration comes from the environment;
//! the command line can override the listen address and catalog location.

use anyhow::Result;
use clap::Parser;
use recipe_buddy::config::ServerConfig;
use recipe_buddy::logging;
use recipe_buddy::resources::ServerResources;
use recipe_buddy::server;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "recipe-buddy-server")]
#[command(about = "Recipe Buddy - natural-language recipe search API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the JSON catalog path (scan mode)
    #[arg(long)]
    recipes: Option<PathBuf>,

    /// Override the `SQLite` database URL (enables indexed mode)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(recipes) = args.recipes {
        config.recipes_path = recipes;
    }
    if let Some(url) = args.database_url {
        config.database_url = Some(url);
    }
    config.validate()?;

    info!("{}", config.summary());

    let resources = match ServerResources::from_config(config).await {
        Ok(resources) => Arc::new(resources),
        Err(e) => {
            error!("Failed to initialize recipe engine: {e:#}");
            return Err(e);
        }
    };

    server::run(resources).await
}
