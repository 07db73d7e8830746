// ABOUTME: Recipe lookup, listing, and similar-recipe route handlers
// ABOUTME: Serves single recipes, seeded random samples, category counts, and the ingredient list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use recipe_core::constants::similarity;
use recipe_core::models::{NutritionSnapshot, Recipe, SimilarRecipe};
use recipe_intelligence::vocabulary::INGREDIENTS;
use recipe_intelligence::CategoryCount;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default number of random recipes
const DEFAULT_RANDOM_COUNT: usize = 5;
/// Largest random sample
const MAX_RANDOM_COUNT: usize = 50;
/// Ingredients listed by `/ingredients`
const MAX_LISTED_INGREDIENTS: usize = 100;

/// Full recipe body of `GET /recipe/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDetail {
    /// Display title
    pub title: String,
    /// Description, falling back to the title
    pub description: String,
    /// Category labels
    pub categories: Vec<String>,
    /// All ingredient lines
    pub ingredients: Vec<String>,
    /// All direction steps
    pub directions: Vec<String>,
    /// Nutrition with missing values as zero
    pub nutrition: NutritionSnapshot,
}

/// Response of `GET /recipe/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Catalog identifier
    pub id: i64,
    /// Recipe body
    pub recipe: RecipeDetail,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        let description = recipe
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| recipe.title.clone());
        let nutrition = recipe.nutrition_snapshot();
        Self {
            id: recipe.id,
            recipe: RecipeDetail {
                title: recipe.title,
                description,
                categories: recipe.categories,
                ingredients: recipe.ingredients,
                directions: recipe.directions,
                nutrition,
            },
        }
    }
}

/// Query string of `GET /random`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RandomParams {
    /// Sample size, at most 50
    pub count: Option<usize>,
    /// Permutation seed; random when absent
    pub seed: Option<u64>,
}

/// Entry of a random sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomRecipe {
    /// Catalog identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Category labels
    pub categories: Vec<String>,
    /// Calories when known
    pub calories: Option<f64>,
    /// Protein when known
    pub protein: Option<f64>,
}

/// Response of `GET /random`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomResponse {
    /// Sample size
    pub count: usize,
    /// Sampled recipes
    pub recipes: Vec<RandomRecipe>,
}

/// Response of `GET /categories`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    /// Distinct categories
    pub total_categories: usize,
    /// Categories, most frequent first
    pub categories: Vec<CategoryCount>,
}

/// Response of `GET /ingredients`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientsResponse {
    /// Recognized ingredients
    pub total_ingredients: usize,
    /// First recognized ingredients
    pub ingredients: Vec<String>,
}

/// Query string of `GET /api/recipes/:id/similar`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimilarParams {
    /// Result cap, at most 20
    pub limit: Option<usize>,
    /// Minimum combined score in [0, 1]
    pub min_score: Option<f64>,
}

/// Response of `GET /api/recipes/:id/similar`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarResponse {
    /// Seed recipe
    pub recipe_id: i64,
    /// Similar recipes, best first
    pub similar_recipes: Vec<SimilarRecipe>,
    /// Number of results
    pub count: usize,
    /// Hint when nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Recipe routes
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/recipe/:id", get(Self::handle_get))
            .route("/random", get(Self::handle_random))
            .route("/categories", get(Self::handle_categories))
            .route("/ingredients", get(Self::handle_ingredients))
            .route("/api/recipes/:id/similar", get(Self::handle_similar))
            .with_state(resources)
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<RecipeResponse>> {
        let recipe = resources
            .source
            .by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;
        Ok(Json(recipe.into()))
    }

    async fn handle_random(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<RandomParams>,
    ) -> AppResult<Json<RandomResponse>> {
        let count = params
            .count
            .unwrap_or(DEFAULT_RANDOM_COUNT)
            .min(MAX_RANDOM_COUNT);
        let seed = params.seed.unwrap_or_else(rand::random);

        let recipes: Vec<RandomRecipe> = resources
            .source
            .random_recipes(count, seed)
            .await?
            .into_iter()
            .map(|recipe| RandomRecipe {
                id: recipe.id,
                calories: recipe.nutrition.calories,
                protein: recipe.nutrition.protein,
                title: recipe.title,
                categories: recipe.categories,
            })
            .collect();

        Ok(Json(RandomResponse {
            count: recipes.len(),
            recipes,
        }))
    }

    async fn handle_categories(
        State(resources): State<Arc<ServerResources>>,
    ) -> AppResult<Json<CategoriesResponse>> {
        let categories = resources.source.category_counts().await?;
        Ok(Json(CategoriesResponse {
            total_categories: categories.len(),
            categories,
        }))
    }

    async fn handle_ingredients() -> Json<IngredientsResponse> {
        Json(IngredientsResponse {
            total_ingredients: INGREDIENTS.len(),
            ingredients: INGREDIENTS
                .iter()
                .take(MAX_LISTED_INGREDIENTS)
                .map(|i| (*i).to_owned())
                .collect(),
        })
    }

    async fn handle_similar(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
        Query(params): Query<SimilarParams>,
    ) -> AppResult<Json<SimilarResponse>> {
        let limit = params
            .limit
            .unwrap_or(similarity::DEFAULT_LIMIT)
            .min(similarity::MAX_LIMIT);
        let min_score = params.min_score.unwrap_or(similarity::DEFAULT_MIN_SCORE);

        if resources.source.by_id(id).await?.is_none() {
            return Err(AppError::not_found(format!("Recipe {id}")));
        }
        let similar = resources
            .similarity
            .find_similar(id, limit, min_score)
            .await?;

        let message = similar
            .is_empty()
            .then(|| "No similar recipes found. Try lowering min_score.".to_owned());
        Ok(Json(SimilarResponse {
            recipe_id: id,
            count: similar.len(),
            similar_recipes: similar,
            message,
        }))
    }
}
