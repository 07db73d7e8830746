// ABOUTME: Health check, statistics, and API index route handlers
// ABOUTME: Reports backend mode, catalog figures, and response cache performance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! System routes for monitoring and discovery

use crate::cache::CacheProvider;
use crate::resources::ServerResources;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

/// Health, statistics, and index routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all system routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_index))
            .route("/health", get(Self::handle_health))
            .route("/stats", get(Self::handle_stats))
            .route("/cache/stats", get(Self::handle_cache_stats))
            .with_state(resources)
    }

    async fn handle_index(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "name": "Recipe Buddy",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Natural-language recipe search, similar recipes, and meal planning",
            "total_recipes": resources.stats.catalog.total_recipes,
            "endpoints": {
                "GET /": "This documentation",
                "GET /health": "Health check",
                "GET /stats": "Catalog statistics",
                "GET /cache/stats": "Response cache statistics",
                "POST /search": "Search recipes with a natural language query",
                "GET /search/simple": "Cached search with query parameters",
                "POST /parse": "Parse a query without searching",
                "GET /recipe/:id": "Recipe by id",
                "GET /random": "Random recipes",
                "GET /categories": "Categories with recipe counts",
                "GET /ingredients": "Recognized ingredients",
                "GET /api/recipes/:id/similar": "Recipes similar to a recipe",
                "POST /api/meal-plan": "Generate a meal plan",
                "GET /api/meal-plan/quick": "Three-day preset meal plan"
            },
            "example_queries": [
                "chicken without onion",
                "low calorie vegetarian pasta",
                "spicy indian curry with coconut milk",
                "high protein breakfast no eggs"
            ]
        }))
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "recipes_loaded": resources.stats.catalog.total_recipes,
            "backend": resources.stats.backend,
            "mode": resources.matcher.mode().as_str(),
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn handle_stats(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let stats = &resources.stats;
        Json(json!({
            "total_recipes": stats.catalog.total_recipes,
            "unique_categories": stats.catalog.unique_categories,
            "avg_ingredients_per_recipe": stats.catalog.avg_ingredients,
            "backend": stats.backend,
            "mode": resources.matcher.mode().as_str(),
            "tfidf_features": stats.tfidf_features,
            "load_time_ms": stats.load_time_ms
        }))
    }

    async fn handle_cache_stats(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let stats = resources.cache.stats().await;
        Json(json!({
            "cache": stats,
            "description": {
                "hits": "Number of successful cache retrievals",
                "misses": "Number of cache misses",
                "hit_rate": "Fraction of lookups served from cache",
                "entries": "Number of cached entries"
            }
        }))
    }
}
