// ABOUTME: Recipe catalog entry and its client-facing summary
// ABOUTME: Builds the lower-cased search text used by every substring filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::{Nutrition, NutritionSnapshot};
use crate::constants::summary;
use serde::{Deserialize, Serialize};

/// A catalog recipe. Recipes are immutable once loaded; only their owning
/// recipe source constructs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Catalog identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Ingredient lines in recipe order
    pub ingredients: Vec<String>,
    /// Direction steps in recipe order
    pub directions: Vec<String>,
    /// Category labels
    pub categories: Vec<String>,
    /// Nutrition record
    pub nutrition: Nutrition,
    /// Lower-cased title (twice), ingredients, and categories
    pub search_text: String,
}

impl Recipe {
    /// Create a recipe with only an id and title
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        let mut recipe = Self {
            id,
            title: title.into(),
            description: None,
            ingredients: Vec::new(),
            directions: Vec::new(),
            categories: Vec::new(),
            nutrition: Nutrition::default(),
            search_text: String::new(),
        };
        recipe.refresh_search_text();
        recipe
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the ingredient lines
    #[must_use]
    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self.refresh_search_text();
        self
    }

    /// Set the direction steps
    #[must_use]
    pub fn with_directions<I, S>(mut self, directions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directions = directions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the category labels
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self.refresh_search_text();
        self
    }

    /// Set the nutrition record
    #[must_use]
    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Replace the derived search text with a stored value
    #[must_use]
    pub fn with_search_text(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into().to_lowercase();
        self
    }

    fn refresh_search_text(&mut self) {
        self.search_text = build_search_text(&self.title, &self.ingredients, &self.categories);
    }

    /// Lower-cased title
    #[must_use]
    pub fn title_lower(&self) -> String {
        self.title.to_lowercase()
    }

    /// Whether a lower-cased needle occurs in the title or the search text
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.search_text.contains(needle) || self.title_lower().contains(needle)
    }

    /// Client-facing summary with truncated lists
    #[must_use]
    pub fn summary(&self) -> RecipeSummary {
        let description = self
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.title);

        RecipeSummary {
            id: self.id,
            title: self.title.clone(),
            description: truncate_chars(description, summary::DESCRIPTION_CHARS),
            ingredients: self.ingredients.iter().take(summary::INGREDIENTS).cloned().collect(),
            directions: self.directions.iter().take(summary::DIRECTIONS).cloned().collect(),
            categories: self.categories.iter().take(summary::CATEGORIES).cloned().collect(),
        }
    }

    /// Nutrition snapshot with missing values as zero
    #[must_use]
    pub fn nutrition_snapshot(&self) -> NutritionSnapshot {
        self.nutrition.snapshot()
    }
}

/// Truncated view of a recipe returned by search, similarity, and plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    /// Catalog identifier
    pub id: i64,
    /// Display title
    pub title: String,
    /// Description (falls back to the title), at most 150 characters
    pub description: String,
    /// First ingredients
    pub ingredients: Vec<String>,
    /// First directions
    pub directions: Vec<String>,
    /// First categories
    pub categories: Vec<String>,
}

/// Build the lower-cased search text for a recipe.
///
/// The title is repeated so that title terms weigh more in substring and
/// term-frequency based matching.
#[must_use]
pub fn build_search_text(title: &str, ingredients: &[String], categories: &[String]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(2 + ingredients.len() + categories.len());
    parts.push(title);
    parts.push(title);
    parts.extend(ingredients.iter().map(String::as_str));
    parts.extend(categories.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Truncate to at most `max_chars` characters without splitting a code point
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::nutrition::Nutrient;

    fn sample() -> Recipe {
        Recipe::new(7, "Garlic Chicken Pasta")
            .with_ingredients(["2 chicken breasts", "8 oz pasta", "3 cloves garlic"])
            .with_categories(["Dinner", "Italian"])
            .with_nutrition(Nutrition::default().with(Nutrient::Calories, 540.0))
    }

    #[test]
    fn test_search_text_is_lowercase_and_weights_title() {
        let recipe = sample();
        assert_eq!(recipe.search_text.matches("garlic chicken pasta").count(), 2);
        assert!(recipe.search_text.contains("8 oz pasta"));
        assert!(recipe.search_text.contains("italian"));
        assert!(!recipe.search_text.contains("Dinner"));
    }

    #[test]
    fn test_mentions_checks_title_and_search_text() {
        let recipe = sample();
        assert!(recipe.mentions("cloves"));
        assert!(recipe.mentions("garlic chicken"));
        assert!(!recipe.mentions("onion"));
    }

    #[test]
    fn test_summary_falls_back_to_title() {
        let summary = sample().summary();
        assert_eq!(summary.description, "Garlic Chicken Pasta");
        assert_eq!(summary.ingredients.len(), 3);
        assert_eq!(summary.categories, vec!["Dinner", "Italian"]);
    }

    #[test]
    fn test_summary_truncates_lists_and_description() {
        let recipe = Recipe::new(1, "Long")
            .with_description("x".repeat(400))
            .with_ingredients((0..20).map(|i| format!("ingredient {i}")))
            .with_directions((0..8).map(|i| format!("step {i}")))
            .with_categories((0..9).map(|i| format!("cat {i}")));
        let summary = recipe.summary();

        assert_eq!(summary.description.chars().count(), 150);
        assert_eq!(summary.ingredients.len(), 10);
        assert_eq!(summary.directions.len(), 3);
        assert_eq!(summary.categories.len(), 5);
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("jalapeño poppers", 8), "jalapeño");
    }
}
