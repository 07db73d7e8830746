// ABOUTME: Catalog import tool that loads a JSON recipe catalog into SQLite
// ABOUTME: Rebuilds the recipes table so the server can run in indexed mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use clap::Parser;
use recipe_buddy::data_loader::{load_catalog, CatalogStats};
use recipe_buddy::database::SqliteRecipeStore;
use recipe_buddy::logging;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

const BATCH_SIZE: usize = 500;

#[derive(Parser)]
#[command(name = "import-recipes")]
#[command(about = "Import a JSON recipe catalog into a SQLite database")]
struct Args {
    /// Path to the JSON catalog
    #[arg(long, default_value = "data/recipes.json")]
    recipes: PathBuf,

    /// Target database URL
    #[arg(long, default_value = "sqlite:data/recipes.db")]
    database_url: String,

    /// Append instead of dropping existing rows
    #[arg(long)]
    append: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let started = Instant::now();
    let recipes = load_catalog(&args.recipes)
        .await
        .with_context(|| format!("Failed to load {}", args.recipes.display()))?;
    let stats = CatalogStats::from_recipes(&recipes);
    info!(
        recipes = stats.total_recipes,
        categories = stats.unique_categories,
        "Catalog loaded"
    );

    let store = SqliteRecipeStore::connect(&args.database_url)
        .await
        .with_context(|| format!("Failed to open {}", args.database_url))?;
    if !args.append {
        store.reset().await?;
    }

    let mut imported = 0_u64;
    for batch in recipes.chunks(BATCH_SIZE) {
        imported += store.insert_recipes(batch).await?;
        info!("Imported {imported}/{} recipes", recipes.len());
    }

    info!(
        imported,
        elapsed_ms = started.elapsed().as_millis(),
        "Import complete"
    );
    Ok(())
}
