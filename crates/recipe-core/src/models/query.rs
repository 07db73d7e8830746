// ABOUTME: Structured form of a natural-language recipe query
// ABOUTME: Meal types, spelling corrections, and nutrient constraints extracted by the parser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::{NutrientBound, NutritionConstraints};
use super::Nutrient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Meal slot a recipe is suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// Morning meal
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// Sweet course
    Dessert,
    /// Small between-meal dish
    Snack,
    /// Beverage
    Drink,
}

impl MealType {
    /// Convert to the search keyword / wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Dessert => "dessert",
            Self::Snack => "snack",
            Self::Drink => "drink",
        }
    }

    /// Parse a wire name
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "dessert" => Some(Self::Dessert),
            "snack" => Some(Self::Snack),
            "drink" => Some(Self::Drink),
            _ => None,
        }
    }

    /// Whether this is breakfast, lunch, or dinner
    #[must_use]
    pub const fn is_main_meal(&self) -> bool {
        matches!(self, Self::Breakfast | Self::Lunch | Self::Dinner)
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single spelling correction applied to the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingCorrection {
    /// Word as typed
    pub original: String,
    /// Word after correction
    pub corrected: String,
}

impl SpellingCorrection {
    /// Create a correction pair
    #[must_use]
    pub fn new(original: impl Into<String>, corrected: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            corrected: corrected.into(),
        }
    }
}

/// Structured interpretation of a recipe query.
///
/// An ingredient never appears in both `ingredients` and `excluded_ingredients`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Query as received
    pub original_query: String,
    /// Query after spelling correction, when any correction was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
    /// Corrections applied, in text order
    #[serde(default)]
    pub spelling_corrections: Vec<SpellingCorrection>,
    /// Dish name from the curated dish list
    #[serde(default)]
    pub dish_name: Option<String>,
    /// Required ingredients, first-seen order
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Excluded ingredients, first-seen order
    #[serde(default)]
    pub excluded_ingredients: Vec<String>,
    /// Category keys
    #[serde(default)]
    pub categories: Vec<String>,
    /// Meal type
    #[serde(default)]
    pub meal_type: Option<MealType>,
    /// Nutrient constraints
    #[serde(default)]
    pub nutrition: NutritionConstraints,
}

impl ParsedQuery {
    /// Empty query for the given text
    #[must_use]
    pub fn empty(original_query: impl Into<String>) -> Self {
        Self {
            original_query: original_query.into(),
            ..Self::default()
        }
    }

    /// Text the query terms were extracted from
    #[must_use]
    pub fn effective_query(&self) -> &str {
        self.corrected_query
            .as_deref()
            .unwrap_or(&self.original_query)
    }

    /// Whether any constraint or preference was extracted
    #[must_use]
    pub fn has_terms(&self) -> bool {
        self.dish_name.is_some()
            || !self.ingredients.is_empty()
            || !self.excluded_ingredients.is_empty()
            || !self.categories.is_empty()
            || self.meal_type.is_some()
            || !self.nutrition.is_empty()
    }

    /// Bound declared for one nutrient
    #[must_use]
    pub fn bound(&self, nutrient: Nutrient) -> Option<&NutrientBound> {
        self.nutrition.get(&nutrient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_round_trip() {
        for meal in [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Dessert,
            MealType::Snack,
            MealType::Drink,
        ] {
            assert_eq!(MealType::parse(meal.as_str()), Some(meal));
        }
        assert!(MealType::Lunch.is_main_meal());
        assert!(!MealType::Snack.is_main_meal());
    }

    #[test]
    fn test_empty_query_has_no_terms() {
        let parsed = ParsedQuery::empty("   ");
        assert!(!parsed.has_terms());
        assert_eq!(parsed.effective_query(), "   ");
    }

    #[test]
    fn test_parsed_query_serializes_nutrition_by_name() {
        let mut parsed = ParsedQuery::empty("high protein");
        parsed
            .nutrition
            .insert(Nutrient::Protein, NutrientBound::at_least(15.0));
        let json = serde_json::to_value(&parsed).unwrap();

        assert_eq!(json["nutrition"]["protein"]["min"], 15.0);
        assert!(json.get("corrected_query").is_none());
    }
}
