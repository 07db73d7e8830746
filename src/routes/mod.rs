// ABOUTME: Route module organization for the Recipe Buddy HTTP API
// ABOUTME: Groups search, recipe, meal plan, and system endpoints over shared server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for Recipe Buddy
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the engine held in [`crate::resources::ServerResources`].

/// Health, statistics, and API index routes
pub mod health;
/// Meal plan routes
pub mod meal_plan;
/// Recipe lookup, listing, and similarity routes
pub mod recipes;
/// Search and parse routes
pub mod search;

pub use health::HealthRoutes;
pub use meal_plan::MealPlanRoutes;
pub use recipes::RecipeRoutes;
pub use search::SearchRoutes;

use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;

/// Every API route merged into one router
pub fn router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(SearchRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .merge(MealPlanRoutes::routes(Arc::clone(resources)))
}
