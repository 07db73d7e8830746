// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides a fixture catalog and resource builders for both backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::too_many_arguments,
    clippy::unwrap_used
)]
//! Shared test utilities for `recipe_buddy`

use anyhow::Result;
use recipe_buddy::config::ServerConfig;
use recipe_buddy::database::SqliteRecipeStore;
use recipe_buddy::resources::ServerResources;
use recipe_core::models::{Nutrient, Nutrition, Recipe};
use std::env;
use std::sync::{Arc, Once};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

fn recipe(
    id: i64,
    title: &str,
    ingredients: &[&str],
    categories: &[&str],
    calories: f64,
    protein: f64,
    fat: f64,
    sodium: f64,
    sugar: f64,
) -> Recipe {
    Recipe::new(id, title)
        .with_ingredients(ingredients.iter().copied())
        .with_categories(categories.iter().copied())
        .with_directions(["Prepare the ingredients.", "Cook and serve."])
        .with_nutrition(
            Nutrition::default()
                .with(Nutrient::Calories, calories)
                .with(Nutrient::Protein, protein)
                .with(Nutrient::Fat, fat)
                .with(Nutrient::Sodium, sodium)
                .with(Nutrient::Sugar, sugar),
        )
}

/// Small catalog covering every meal slot, exclusions, and missing nutrition
#[rustfmt::skip]
pub fn sample_catalog() -> Vec<Recipe> {
    vec![
        recipe(1, "Chicken Curry", &["500 g chicken thigh", "1 onion", "2 tbsp curry powder", "1 can coconut milk"], &["Dinner", "Indian"], 520.0, 35.0, 22.0, 700.0, 6.0),
        recipe(2, "Lemon Garlic Chicken", &["2 chicken breast", "1 lemon", "3 cloves garlic", "olive oil"], &["Dinner", "Healthy"], 380.0, 42.0, 12.0, 420.0, 2.0),
        recipe(3, "French Onion Soup", &["4 onions", "butter", "beef stock", "bread", "gruyere cheese"], &["Lunch", "Soup"], 450.0, 14.0, 20.0, 900.0, 8.0),
        recipe(4, "Chicken Fried Rice", &["2 cups rice", "1 cup chicken", "2 egg", "peas", "soy sauce"], &["Dinner", "Quick"], 560.0, 28.0, 16.0, 980.0, 4.0),
        recipe(5, "Spinach Omelette", &["3 eggs", "spinach", "cheese"], &["Breakfast", "Vegetarian"], 320.0, 22.0, 24.0, 480.0, 2.0),
        recipe(6, "Banana Oat Pancakes", &["1 banana", "oats", "milk", "1 egg"], &["Breakfast", "Vegetarian"], 410.0, 12.0, 9.0, 300.0, 18.0),
        recipe(7, "Greek Yogurt Parfait", &["yogurt", "blueberry", "honey", "oats"], &["Breakfast", "Vegetarian"], 290.0, 18.0, 6.0, 90.0, 22.0),
        Recipe::new(8, "Mystery Breakfast Hash")
            .with_ingredients(["potatoes", "peppers", "onion"])
            .with_categories(["Breakfast"])
            .with_nutrition(Nutrition::default().with(Nutrient::Calories, 430.0)),
        recipe(9, "Salmon Quinoa Bowl", &["salmon fillet", "quinoa", "cucumber", "avocado"], &["Lunch", "Healthy"], 540.0, 36.0, 24.0, 380.0, 3.0),
        recipe(10, "Lentil Soup", &["lentils", "carrots", "celery", "cumin"], &["Lunch", "Vegetarian", "Soup"], 360.0, 19.0, 6.0, 650.0, 7.0),
        recipe(11, "Tofu Stir Fry", &["tofu", "broccoli", "soy sauce", "ginger"], &["Dinner", "Vegetarian", "Vegan"], 400.0, 24.0, 15.0, 820.0, 9.0),
        recipe(12, "Beef Tacos", &["ground beef", "tortillas", "tomato", "lettuce", "cheddar"], &["Dinner", "Mexican"], 610.0, 32.0, 30.0, 890.0, 5.0),
        recipe(13, "Turkey Avocado Wrap", &["turkey", "avocado", "lettuce", "tortilla"], &["Lunch", "Quick"], 470.0, 30.0, 18.0, 760.0, 3.0),
        recipe(14, "Chickpea Salad", &["chickpeas", "cucumber", "tomatoes", "feta", "olive oil"], &["Lunch", "Vegetarian"], 390.0, 15.0, 19.0, 520.0, 6.0),
        recipe(15, "Grilled Shrimp Skewers", &["shrimp", "garlic", "lemon", "paprika"], &["Dinner", "Grilled"], 310.0, 34.0, 10.0, 640.0, 1.0),
        recipe(16, "Apple Cinnamon Oatmeal", &["oats", "apple", "cinnamon", "milk"], &["Breakfast", "Vegetarian"], 340.0, 11.0, 7.0, 120.0, 19.0),
        recipe(17, "Hummus Veggie Snack", &["chickpeas", "carrots", "cucumber"], &["Snack", "Vegetarian"], 210.0, 8.0, 10.0, 310.0, 4.0),
        recipe(18, "Trail Mix Snack", &["almonds", "walnuts", "raisins"], &["Snack"], 260.0, 7.0, 18.0, 40.0, 12.0),
        recipe(19, "Baked Cod with Herbs", &["cod", "parsley", "lemon", "butter"], &["Dinner", "Baked"], 330.0, 38.0, 12.0, 460.0, 1.0),
        recipe(20, "Chicken Caesar Sandwich", &["chicken", "lettuce", "parmesan", "bread"], &["Lunch"], 520.0, 34.0, 22.0, 1100.0, 4.0),
        Recipe::new(21, "Vegetable Soup")
            .with_ingredients(["carrots", "celery", "potatoes", "tomatoes"])
            .with_categories(["Lunch", "Vegetarian"]),
    ]
}

/// Configuration with defaults and no environment lookups
pub fn test_config() -> ServerConfig {
    ServerConfig::default()
}

/// Scan-mode resources over the sample catalog
pub async fn scan_resources() -> Result<Arc<ServerResources>> {
    init_test_logging();
    let resources = ServerResources::scan(test_config(), sample_catalog()).await?;
    Ok(Arc::new(resources))
}

/// In-memory `SQLite` store loaded with the sample catalog
pub async fn sample_store() -> Result<SqliteRecipeStore> {
    init_test_logging();
    let store = SqliteRecipeStore::connect("sqlite::memory:").await?;
    store.insert_recipes(&sample_catalog()).await?;
    Ok(store)
}

/// Indexed-mode resources over the sample catalog
pub async fn indexed_resources() -> Result<Arc<ServerResources>> {
    let store = sample_store().await?;
    let mut config = test_config();
    config.database_url = Some("sqlite::memory:".to_owned());
    let resources = ServerResources::indexed(config, store).await?;
    Ok(Arc::new(resources))
}

/// Recipe ids of a slice of results in order
pub fn ids<T, F>(items: &[T], id: F) -> Vec<i64>
where
    F: Fn(&T) -> i64,
{
    items.iter().map(id).collect()
}
