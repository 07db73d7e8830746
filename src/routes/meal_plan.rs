// ABOUTME: Meal plan route handlers for custom and preset plans
// ABOUTME: Validates request ranges, seeds the planner RNG, and returns the assembled plan
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recipe_core::constants::meal_plan;
use recipe_core::models::{MealPlan, MealPlanRequest, NutritionGoals, Preferences};
use recipe_intelligence::QuickDiet;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Body of `POST /api/meal-plan`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MealPlanBody {
    /// Number of days in 1..=7, default 7
    pub days: Option<u32>,
    /// Meals per day in 2..=4, default 3
    pub meals_per_day: Option<u32>,
    /// Dietary flags
    #[serde(default)]
    pub preferences: Preferences,
    /// Daily targets
    pub nutrition_goals: Option<NutritionGoals>,
    /// Variety weight in [0, 1], default 0.7
    pub variety_weight: Option<f64>,
    /// First plan date, default today (UTC)
    pub start_date: Option<NaiveDate>,
    /// RNG seed for a reproducible plan
    pub seed: Option<u64>,
}

impl MealPlanBody {
    /// Reject out-of-range values and build the planner request
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for days, meals per day, or variety weight outside their ranges
    pub fn into_request(self) -> AppResult<MealPlanRequest> {
        let days = self.days.unwrap_or(meal_plan::MAX_DAYS);
        if !(meal_plan::MIN_DAYS..=meal_plan::MAX_DAYS).contains(&days) {
            return Err(AppError::value_out_of_range("days", days, "[1, 7]"));
        }
        let meals_per_day = self.meals_per_day.unwrap_or(3);
        if !(meal_plan::MIN_MEALS_PER_DAY..=meal_plan::MAX_MEALS_PER_DAY).contains(&meals_per_day) {
            return Err(AppError::value_out_of_range(
                "meals_per_day",
                meals_per_day,
                "[2, 4]",
            ));
        }

        let mut request = MealPlanRequest::new(days, meals_per_day)
            .with_preferences(self.preferences)
            .with_variety_weight(
                self.variety_weight
                    .unwrap_or(meal_plan::DEFAULT_VARIETY_WEIGHT),
            );
        if let Some(goals) = self.nutrition_goals {
            request = request.with_goals(goals);
        }
        if let Some(start_date) = self.start_date {
            request = request.with_start_date(start_date);
        }
        request.validate()?;
        Ok(request)
    }
}

/// Query string of `GET /api/meal-plan/quick`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickPlanParams {
    /// vegetarian, `high_protein`, `low_carb`, or balanced
    pub diet: Option<String>,
    /// Daily calorie target, default 2000
    pub calories: Option<f64>,
    /// RNG seed for a reproducible plan
    pub seed: Option<u64>,
}

/// Meal plan routes
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    /// Create all meal plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/meal-plan", post(Self::handle_generate))
            .route("/api/meal-plan/quick", get(Self::handle_quick))
            .with_state(resources)
    }

    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<MealPlanBody>,
    ) -> AppResult<Json<MealPlan>> {
        let seed = body.seed;
        let request = body.into_request()?;
        Self::generate(&resources, &request, seed).await
    }

    async fn handle_quick(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<QuickPlanParams>,
    ) -> AppResult<Json<MealPlan>> {
        let diet = params
            .diet
            .as_deref()
            .map_or(QuickDiet::Balanced, QuickDiet::parse);
        let calories = params.calories.unwrap_or(meal_plan::DEFAULT_CALORIES);
        let request = diet.request(calories);
        request.validate()?;
        Self::generate(&resources, &request, params.seed).await
    }

    async fn generate(
        resources: &ServerResources,
        request: &MealPlanRequest,
        seed: Option<u64>,
    ) -> AppResult<Json<MealPlan>> {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let plan = resources
            .meal_planner
            .generate_plan(request, &mut rng)
            .await?;

        info!(
            days = plan.days.len(),
            recipes = plan.summary.total_recipes,
            seed,
            "Meal plan generated"
        );
        Ok(Json(plan))
    }
}
