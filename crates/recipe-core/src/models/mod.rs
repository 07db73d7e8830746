// ABOUTME: Data model re-exports for recipes, queries, search results, and meal plans
// ABOUTME: Every type here is plain data with serde support
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Meal plan requests, preferences, goals, and plan output
pub mod meal_plan;
/// Nutrients, nutrition records, and bounds
pub mod nutrition;
/// Parsed query and meal types
pub mod query;
/// Recipe and recipe summary
pub mod recipe;
/// Search options and results
pub mod search;

pub use meal_plan::{
    meal_slots, DayPlan, GoalAchievement, MealPlan, MealPlanRequest, NutritionGoals,
    NutritionTotals, PlanSummary, PlannedMeal, Preferences,
};
pub use nutrition::{
    MissingNutrientPolicy, Nutrient, NutrientBound, Nutrition, NutritionConstraints,
    NutritionSnapshot,
};
pub use query::{MealType, ParsedQuery, SpellingCorrection};
pub use recipe::{build_search_text, truncate_chars, Recipe, RecipeSummary};
pub use search::{round_to, ScoredMatch, SearchOptions, SearchPage, SimilarRecipe};
