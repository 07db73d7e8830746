// ABOUTME: Centralized resource container shared by every HTTP handler
// ABOUTME: Builds parser, match strategy, similarity engine, planner, source, and cache once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server Resources
//!
//! Everything a request needs is constructed once and shared as `Arc` state.
//! Nothing is global: tests build their own container over a fixture catalog.

use crate::cache::memory::InMemoryCache;
use crate::cache::CacheProvider;
use crate::config::{BackendMode, ServerConfig};
use crate::data_loader::{load_catalog, CatalogStats};
use crate::database::SqliteRecipeStore;
use crate::spelling::VocabularySpellCorrector;
use anyhow::{Context, Result};
use recipe_core::errors::AppResult;
use recipe_core::models::Recipe;
use recipe_intelligence::{
    CatalogIndex, IndexedMatcher, InMemoryRecipeSource, MatchStrategy, MealPlanner, QueryParser,
    RecipeSource, ScanMatcher, SimilarityEngine,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Figures captured while the resources were built
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StartupStats {
    /// Backend serving the catalog
    pub backend: &'static str,
    /// Catalog figures
    pub catalog: CatalogStats,
    /// TF-IDF vocabulary size in scan mode
    pub tfidf_features: Option<usize>,
    /// Time spent building the resources
    pub load_time_ms: u64,
}

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Query parser with the vocabulary spelling corrector
    pub parser: Arc<QueryParser>,
    /// Ranking strategy selected by the backend
    pub matcher: Arc<dyn MatchStrategy>,
    /// Similar-recipe search
    pub similarity: Arc<SimilarityEngine>,
    /// Meal plan assembler
    pub meal_planner: Arc<MealPlanner>,
    /// Catalog access for lookups and listings
    pub source: Arc<dyn RecipeSource>,
    /// Response cache
    pub cache: InMemoryCache,
    /// Startup figures
    pub stats: StartupStats,
}

impl ServerResources {
    /// Build resources for the backend the configuration selects
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the catalog cannot be loaded
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        match (config.backend_mode(), config.database_url.clone()) {
            (BackendMode::Indexed, Some(url)) => {
                let store = SqliteRecipeStore::connect(&url)
                    .await
                    .with_context(|| format!("Failed to open recipe database {url}"))?;
                Ok(Self::indexed(config, store).await?)
            }
            _ => {
                let recipes = load_catalog(&config.recipes_path).await.with_context(|| {
                    format!("Failed to load catalog {}", config.recipes_path.display())
                })?;
                Ok(Self::scan(config, recipes).await?)
            }
        }
    }

    /// Scan mode over an in-memory catalog with a TF-IDF index
    ///
    /// # Errors
    ///
    /// Returns an error if the parser patterns fail to compile or the cache cannot start
    pub async fn scan(config: ServerConfig, recipes: Vec<Recipe>) -> AppResult<Self> {
        let started = Instant::now();
        let catalog = CatalogStats::from_recipes(&recipes);
        let corrector = VocabularySpellCorrector::new().learn_catalog(&recipes);
        let index = Arc::new(CatalogIndex::build(&recipes, config.tfidf_config()));
        let tfidf_features = Some(index.features());

        let memory = InMemoryRecipeSource::new(recipes);
        let matcher = ScanMatcher::new(memory.recipes(), config.matcher_settings()).with_index(index);
        let source: Arc<dyn RecipeSource> = Arc::new(memory);

        Self::assemble(config, corrector, Arc::new(matcher), source, catalog, tfidf_features, started)
            .await
    }

    /// Indexed mode over the SQLite store
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot report its size or titles, or the cache cannot start
    pub async fn indexed(config: ServerConfig, store: SqliteRecipeStore) -> AppResult<Self> {
        let started = Instant::now();
        let total_recipes = usize::try_from(store.count().await?).unwrap_or(usize::MAX);
        let unique_categories = store.category_counts().await?.len();
        let titles = store.titles().await?;
        let corrector =
            VocabularySpellCorrector::new().learn_titles(titles.iter().map(String::as_str));
        let catalog = CatalogStats {
            total_recipes,
            unique_categories,
            avg_ingredients: 0.0,
        };

        let source: Arc<dyn RecipeSource> = Arc::new(store);
        let matcher = IndexedMatcher::new(Arc::clone(&source), config.matcher_settings());

        Self::assemble(
            config,
            corrector,
            Arc::new(matcher),
            source,
            catalog,
            None,
            started,
        )
        .await
    }

    async fn assemble(
        config: ServerConfig,
        corrector: VocabularySpellCorrector,
        matcher: Arc<dyn MatchStrategy>,
        source: Arc<dyn RecipeSource>,
        catalog: CatalogStats,
        tfidf_features: Option<usize>,
        started: Instant,
    ) -> AppResult<Self> {
        let parser = QueryParser::new(Arc::new(corrector))?;
        let cache = InMemoryCache::new(config.cache_config()).await?;
        let similarity = SimilarityEngine::new(Arc::clone(&source));
        let meal_planner = MealPlanner::new(Arc::clone(&source), config.search.missing_nutrients);

        let stats = StartupStats {
            backend: source.backend(),
            catalog,
            tfidf_features,
            load_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(
            backend = stats.backend,
            mode = matcher.mode().as_str(),
            recipes = catalog.total_recipes,
            categories = catalog.unique_categories,
            tfidf_features = ?tfidf_features,
            load_time_ms = stats.load_time_ms,
            "Server resources ready"
        );

        Ok(Self {
            config: Arc::new(config),
            parser: Arc::new(parser),
            matcher,
            similarity: Arc::new(similarity),
            meal_planner: Arc::new(meal_planner),
            source,
            cache,
            stats,
        })
    }
}
