// ABOUTME: JSON catalog loader converting raw recipe dumps into Recipe values
// ABOUTME: Handles text-or-object list items, quantity/unit prefixes, and two nutrition layouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Catalog Loading
//!
//! Raw catalogs come from recipe dumps with a few layout variants:
//!
//! - list items are plain strings or `{"text": ...}` objects
//! - directions live under `instructions` or `directions`
//! - optional `quantity` and `unit` arrays are prefixed onto ingredient lines
//! - nutrition is either `nutr_values_per100g` (salt in grams, converted to
//!   sodium milligrams) or summed from `nutr_per_ingredient`; otherwise unknown

use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{round_to, Nutrition, Recipe};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// List item that is either a bare string or an object with a `text` field
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TextItem {
    Plain(String),
    Object { text: String },
}

impl TextItem {
    fn into_text(self) -> String {
        match self {
            Self::Plain(text) | Self::Object { text } => text,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Per100g {
    energy: Option<f64>,
    protein: Option<f64>,
    fat: Option<f64>,
    salt: Option<f64>,
    sugars: Option<f64>,
    saturates: Option<f64>,
}

impl Per100g {
    const fn is_empty(&self) -> bool {
        self.energy.is_none()
            && self.protein.is_none()
            && self.fat.is_none()
            && self.salt.is_none()
            && self.sugars.is_none()
            && self.saturates.is_none()
    }
}

#[derive(Debug, Default, Deserialize)]
struct PerIngredient {
    nrg: Option<f64>,
    pro: Option<f64>,
    fat: Option<f64>,
    sod: Option<f64>,
    sug: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    id: Option<i64>,
    title: Option<String>,
    desc: Option<String>,
    ingredients: Option<Vec<TextItem>>,
    instructions: Option<Vec<TextItem>>,
    directions: Option<Vec<TextItem>>,
    categories: Option<Vec<Option<String>>>,
    quantity: Option<Vec<TextItem>>,
    unit: Option<Vec<TextItem>>,
    nutr_values_per100g: Option<Per100g>,
    nutr_per_ingredient: Option<Vec<PerIngredient>>,
}

impl RawRecipe {
    fn into_recipe(self, fallback_id: i64) -> Recipe {
        let nutrition = self.nutrition();
        let ingredients = ingredient_lines(
            self.ingredients.unwrap_or_default(),
            self.quantity.unwrap_or_default(),
            self.unit.unwrap_or_default(),
        );
        let directions: Vec<String> = self
            .instructions
            .or(self.directions)
            .unwrap_or_default()
            .into_iter()
            .map(TextItem::into_text)
            .collect();
        let categories: Vec<String> = self
            .categories
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        let mut recipe = Recipe::new(self.id.unwrap_or(fallback_id), self.title.unwrap_or_default())
            .with_ingredients(ingredients)
            .with_directions(directions)
            .with_categories(categories)
            .with_nutrition(nutrition);
        if let Some(desc) = self.desc.filter(|d| !d.trim().is_empty()) {
            recipe = recipe.with_description(desc);
        }
        recipe
    }

    fn nutrition(&self) -> Nutrition {
        let rounded = |value: f64| round_to(value, 1);

        if let Some(per100g) = self.nutr_values_per100g.as_ref().filter(|n| !n.is_empty()) {
            return Nutrition {
                calories: Some(rounded(per100g.energy.unwrap_or_default())),
                protein: Some(rounded(per100g.protein.unwrap_or_default())),
                fat: Some(rounded(per100g.fat.unwrap_or_default())),
                sodium: Some(rounded(per100g.salt.unwrap_or_default() * 1000.0)),
                sugar: Some(rounded(per100g.sugars.unwrap_or_default())),
                saturates: Some(rounded(per100g.saturates.unwrap_or_default())),
            };
        }

        match self.nutr_per_ingredient.as_deref() {
            Some(parts) if !parts.is_empty() => {
                let sum = |field: fn(&PerIngredient) -> Option<f64>| {
                    Some(rounded(parts.iter().filter_map(field).sum()))
                };
                Nutrition {
                    calories: sum(|p| p.nrg),
                    protein: sum(|p| p.pro),
                    fat: sum(|p| p.fat),
                    sodium: sum(|p| p.sod),
                    sugar: sum(|p| p.sug),
                    saturates: None,
                }
            }
            _ => Nutrition::default(),
        }
    }
}

/// Prefix ingredient lines with their quantity and unit when both lists are present
fn ingredient_lines(
    ingredients: Vec<TextItem>,
    quantities: Vec<TextItem>,
    units: Vec<TextItem>,
) -> Vec<String> {
    let lines = ingredients.into_iter().map(TextItem::into_text);
    if quantities.is_empty() || units.is_empty() {
        return lines.collect();
    }

    let quantities: Vec<String> = quantities.into_iter().map(TextItem::into_text).collect();
    let units: Vec<String> = units.into_iter().map(TextItem::into_text).collect();
    lines
        .enumerate()
        .map(|(i, line)| {
            let quantity = quantities.get(i).map_or("", String::as_str);
            let unit = units.get(i).map_or("", String::as_str);
            if quantity.is_empty() && unit.is_empty() {
                line
            } else {
                format!("{quantity} {unit} {line}").trim().to_owned()
            }
        })
        .collect()
}

/// Parse a raw JSON catalog. Recipes without an id get their 1-based position.
///
/// # Errors
///
/// Returns a serialization error if the text is not a JSON array of recipe objects
pub fn parse_catalog(json: &str) -> AppResult<Vec<Recipe>> {
    let raw: Vec<RawRecipe> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .zip(1_i64..)
        .map(|(recipe, position)| recipe.into_recipe(position))
        .collect())
}

/// Read and parse a JSON catalog file
///
/// # Errors
///
/// Returns a not-found error if the file is missing, a storage error if it
/// cannot be read, or a serialization error if it is malformed
pub async fn load_catalog(path: &Path) -> AppResult<Vec<Recipe>> {
    let contents = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            AppError::not_found(format!("Recipe catalog {}", path.display()))
        } else {
            AppError::storage(format!("Failed to read {}: {e}", path.display()))
        }
    })?;

    let recipes = parse_catalog(&contents)?;
    info!(path = %path.display(), recipes = recipes.len(), "Loaded recipe catalog");
    Ok(recipes)
}

/// Catalog statistics reported at startup and by `/stats`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of recipes
    pub total_recipes: usize,
    /// Distinct category labels
    pub unique_categories: usize,
    /// Mean ingredient lines per recipe, one decimal
    pub avg_ingredients: f64,
}

impl CatalogStats {
    /// Compute statistics over a loaded catalog
    #[must_use]
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let categories: HashSet<&str> = recipes
            .iter()
            .flat_map(|r| r.categories.iter().map(String::as_str))
            .collect();
        let total_ingredients: usize = recipes.iter().map(|r| r.ingredients.len()).sum();
        let avg_ingredients = if recipes.is_empty() {
            0.0
        } else {
            round_to(total_ingredients as f64 / recipes.len() as f64, 1)
        };

        Self {
            total_recipes: recipes.len(),
            unique_categories: categories.len(),
            avg_ingredients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_items_and_directions_fallback() {
        let recipes = parse_catalog(
            r#"[{"title": "Toast", "ingredients": ["bread", {"text": "butter"}],
                 "directions": ["Toast the bread"]}]"#,
        )
        .unwrap();
        let toast = &recipes[0];

        assert_eq!(toast.id, 1);
        assert_eq!(toast.ingredients, vec!["bread", "butter"]);
        assert_eq!(toast.directions, vec!["Toast the bread"]);
        assert_eq!(toast.nutrition, Nutrition::default());
    }

    #[test]
    fn test_per100g_converts_salt_to_sodium() {
        let recipes = parse_catalog(
            r#"[{"id": 9, "title": "Soup", "instructions": [{"text": "Simmer"}],
                 "nutr_values_per100g": {"energy": 81.26, "protein": 3.04, "fat": 1.0,
                                         "salt": 0.456, "sugars": 2.0, "saturates": 0.33}}]"#,
        )
        .unwrap();
        let soup = &recipes[0];

        assert_eq!(soup.id, 9);
        assert_eq!(soup.directions, vec!["Simmer"]);
        assert_eq!(soup.nutrition.calories, Some(81.3));
        assert_eq!(soup.nutrition.sodium, Some(456.0));
        assert_eq!(soup.nutrition.saturates, Some(0.3));
    }

    #[test]
    fn test_per_ingredient_sums() {
        let recipes = parse_catalog(
            r#"[{"title": "Salad", "nutr_per_ingredient": [
                   {"nrg": 100.04, "pro": 2.0, "fat": 1.0, "sod": 10.0, "sug": 3.0},
                   {"nrg": 50.0, "pro": 1.5}]}]"#,
        )
        .unwrap();
        let nutrition = recipes[0].nutrition;

        assert_eq!(nutrition.calories, Some(150.0));
        assert_eq!(nutrition.protein, Some(3.5));
        assert_eq!(nutrition.sodium, Some(10.0));
        assert_eq!(nutrition.saturates, None);
    }

    #[test]
    fn test_quantity_and_unit_prefix() {
        let recipes = parse_catalog(
            r#"[{"title": "Rice", "ingredients": [{"text": "rice"}, {"text": "salt"}],
                 "quantity": [{"text": "2"}, {"text": ""}],
                 "unit": [{"text": "cup"}, {"text": ""}]}]"#,
        )
        .unwrap();
        assert_eq!(recipes[0].ingredients, vec!["2 cup rice", "salt"]);
    }

    #[test]
    fn test_malformed_catalog_is_an_error() {
        assert!(parse_catalog(r#"{"title": "not a list"}"#).is_err());
    }

    #[test]
    fn test_catalog_stats() {
        let recipes = vec![
            Recipe::new(1, "A").with_ingredients(["x", "y"]).with_categories(["Dinner"]),
            Recipe::new(2, "B").with_ingredients(["z"]).with_categories(["Dinner", "Quick"]),
            Recipe::new(3, "C"),
        ];
        let stats = CatalogStats::from_recipes(&recipes);
        assert_eq!(stats.total_recipes, 3);
        assert_eq!(stats.unique_categories, 2);
        assert!((stats.avg_ingredients - 1.0).abs() < f64::EPSILON);
        assert!((CatalogStats::from_recipes(&[]).avg_ingredients).abs() < f64::EPSILON);
    }
}
