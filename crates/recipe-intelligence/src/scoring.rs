// ABOUTME: Rule-based relevance scoring shared by every match strategy
// ABOUTME: Pure functions over a Recipe and a ParsedQuery: points breakdown and match reasons
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scoring awards raw points (nominally 0 to 100, not clamped) for:
//!
//! | Signal | Points |
//! |---|---|
//! | dish name: exact title / first word / last word / interior word | 100 / 60 / 65 / 55 |
//! | dish name: phrase in title / substring of title / search text only | 50 / 35 / 20 |
//! | required ingredient in title | 15 + position bonus 10, 8, 5, 2 (5 if not a whole word) |
//! | required ingredient in search text | +10 |
//! | dish and an ingredient both in title | +20, +10 more if within 2 words |
//! | category in search text | 12 each |
//! | meal type in search text | 15 |
//! | nutrition constraint declared | 20 each |

use recipe_core::constants::scoring;
use recipe_core::constants::search::{MAX_MATCH_REASONS, REASON_CATEGORIES, REASON_INGREDIENTS};
use recipe_core::models::{ParsedQuery, Recipe};

/// Points per scoring component
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    /// Dish-name tier
    pub dish: f64,
    /// Required ingredients in title and search text
    pub ingredients: f64,
    /// Dish plus ingredient in title, and proximity
    pub combo: f64,
    /// Categories found
    pub categories: f64,
    /// Meal type found
    pub meal_type: f64,
    /// Declared nutrition constraints
    pub nutrition: f64,
}

impl ScoreBreakdown {
    /// Raw rule score
    #[must_use]
    pub fn total(&self) -> f64 {
        self.dish + self.ingredients + self.combo + self.categories + self.meal_type + self.nutrition
    }

    /// Rule score divided by 100
    #[must_use]
    pub fn normalized(&self) -> f64 {
        normalize(self.total())
    }
}

/// Published rank key for a raw rule score
#[must_use]
pub fn normalize(raw: f64) -> f64 {
    raw / scoring::NORMALIZATION_DIVISOR
}

/// Lower-cased title split into words with edge punctuation removed
struct TitleWords {
    lower: String,
    words: Vec<String>,
}

impl TitleWords {
    fn new(title: &str) -> Self {
        let lower = title.to_lowercase();
        let words = lower
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(str::to_owned)
            .collect();
        Self { lower, words }
    }

    fn position(&self, term: &str) -> Option<usize> {
        self.words.iter().position(|word| word == term)
    }

    fn normalized(&self) -> String {
        self.words.join(" ")
    }
}

/// Score a recipe against a parsed query
#[must_use]
pub fn score_recipe(recipe: &Recipe, query: &ParsedQuery) -> ScoreBreakdown {
    let title = TitleWords::new(&recipe.title);
    let search_text = recipe.search_text.as_str();
    let dish = query.dish_name.as_deref().map(str::to_lowercase);
    let ingredients: Vec<String> = query.ingredients.iter().map(|i| i.to_lowercase()).collect();

    let mut breakdown = ScoreBreakdown {
        dish: dish
            .as_deref()
            .map_or(0.0, |dish| dish_points(&title, search_text, dish)),
        ..ScoreBreakdown::default()
    };

    for ingredient in &ingredients {
        if title.lower.contains(ingredient.as_str()) {
            let bonus = match title.position(ingredient) {
                Some(0) => scoring::INGREDIENT_POSITION_FIRST,
                Some(1) => scoring::INGREDIENT_POSITION_SECOND,
                Some(2) => scoring::INGREDIENT_POSITION_THIRD,
                Some(_) => scoring::INGREDIENT_POSITION_LATER,
                None => scoring::INGREDIENT_PARTIAL_WORD,
            };
            breakdown.ingredients += scoring::INGREDIENT_IN_TITLE + bonus;
        }
        if search_text.contains(ingredient.as_str()) {
            breakdown.ingredients += scoring::INGREDIENT_IN_SEARCH_TEXT;
        }
    }

    if let Some(dish) = dish.as_deref() {
        breakdown.combo = combo_points(&title, dish, &ingredients);
    }

    let category_hits = query
        .categories
        .iter()
        .filter(|category| search_text.contains(category.to_lowercase().as_str()))
        .count();
    breakdown.categories = category_hits as f64 * scoring::CATEGORY_MATCH;

    if query
        .meal_type
        .is_some_and(|meal| search_text.contains(meal.as_str()))
    {
        breakdown.meal_type = scoring::MEAL_TYPE_MATCH;
    }

    breakdown.nutrition = query.nutrition.len() as f64 * scoring::NUTRITION_CONSTRAINT;
    breakdown
}

fn dish_points(title: &TitleWords, search_text: &str, dish: &str) -> f64 {
    let normalized = title.normalized();
    if normalized == dish || title.lower.trim() == dish {
        return scoring::DISH_EXACT_TITLE;
    }
    if format!(" {normalized} ").contains(&format!(" {dish} ")) {
        return match title.position(dish) {
            Some(0) => scoring::DISH_FIRST_WORD,
            Some(p) if p + 1 == title.words.len() => scoring::DISH_LAST_WORD,
            Some(_) => scoring::DISH_INTERIOR_WORD,
            None => scoring::DISH_PHRASE,
        };
    }
    if title.lower.contains(dish) {
        return scoring::DISH_TITLE_SUBSTRING;
    }
    if search_text.contains(dish) {
        return scoring::DISH_SEARCH_TEXT;
    }
    0.0
}

fn combo_points(title: &TitleWords, dish: &str, ingredients: &[String]) -> f64 {
    let any_in_title = ingredients
        .iter()
        .any(|ingredient| title.lower.contains(ingredient.as_str()));
    if !title.lower.contains(dish) || !any_in_title {
        return 0.0;
    }

    let close = title.position(dish).is_some_and(|dish_at| {
        ingredients.iter().any(|ingredient| {
            title
                .position(ingredient)
                .is_some_and(|at| at.abs_diff(dish_at) <= scoring::PROXIMITY_WINDOW)
        })
    });
    if close {
        scoring::COMBO_TITLE + scoring::COMBO_PROXIMITY
    } else {
        scoring::COMBO_TITLE
    }
}

/// Up to three human-readable reasons built from the scoring signals
#[must_use]
pub fn match_reasons(recipe: &Recipe, query: &ParsedQuery) -> Vec<String> {
    let title = recipe.title_lower();
    let mut reasons = Vec::with_capacity(MAX_MATCH_REASONS);

    if let Some(dish) = query.dish_name.as_deref() {
        if title.contains(dish.to_lowercase().as_str()) {
            reasons.push(format!("Matches '{dish}' dish type"));
        }
    }

    let ingredients: Vec<&str> = query
        .ingredients
        .iter()
        .filter(|ingredient| recipe.mentions(ingredient.to_lowercase().as_str()))
        .take(REASON_INGREDIENTS)
        .map(String::as_str)
        .collect();
    if !ingredients.is_empty() {
        reasons.push(format!("Contains: {}", ingredients.join(", ")));
    }

    let categories: Vec<&str> = query
        .categories
        .iter()
        .filter(|category| recipe.search_text.contains(category.to_lowercase().as_str()))
        .take(REASON_CATEGORIES)
        .map(String::as_str)
        .collect();
    if !categories.is_empty() {
        reasons.push(format!("Category: {}", categories.join(", ")));
    }

    if reasons.is_empty() {
        reasons.push("Semantic similarity match".to_owned());
    }
    reasons.truncate(MAX_MATCH_REASONS);
    reasons
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::models::{MealType, Nutrient, NutrientBound};

    fn query_with(dish: Option<&str>, ingredients: &[&str]) -> ParsedQuery {
        let mut query = ParsedQuery::empty("test");
        query.dish_name = dish.map(str::to_owned);
        query.ingredients = ingredients.iter().map(|i| (*i).to_owned()).collect();
        query
    }

    fn dish_score(title: &str, dish: &str) -> f64 {
        score_recipe(&Recipe::new(1, title), &query_with(Some(dish), &[])).dish
    }

    #[test]
    fn test_dish_tiers() {
        assert!((dish_score("Lasagna", "lasagna") - 100.0).abs() < f64::EPSILON);
        assert!((dish_score("Curry with Rice", "curry") - 60.0).abs() < f64::EPSILON);
        assert!((dish_score("Green Thai Curry", "curry") - 65.0).abs() < f64::EPSILON);
        assert!((dish_score("Easy Curry Bowl", "curry") - 55.0).abs() < f64::EPSILON);
        assert!((dish_score("Shrimp Pad Thai", "pad thai") - 50.0).abs() < f64::EPSILON);
        assert!((dish_score("Pancakes", "pancake") - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dish_in_search_text_only() {
        let recipe = Recipe::new(1, "Weeknight Special").with_categories(["Soup"]);
        let score = score_recipe(&recipe, &query_with(Some("soup"), &[]));
        assert!((score.dish - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_trailing_punctuation_still_counts_as_word() {
        assert!((dish_score("Best Ever Curry!", "curry") - 65.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingredient_position_and_search_text_bonus() {
        let recipe = Recipe::new(1, "Chicken Tikka").with_ingredients(["chicken thighs"]);
        let score = score_recipe(&recipe, &query_with(None, &["chicken"]));
        // 15 + 10 in title, +10 in search text
        assert!((score.ingredients - 35.0).abs() < f64::EPSILON);

        let partial = Recipe::new(2, "Chickenless Stew").with_ingredients(["tofu"]);
        let score = score_recipe(&partial, &query_with(None, &["chicken"]));
        assert!((score.ingredients - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_combo_with_proximity() {
        let recipe = Recipe::new(1, "Chicken Curry").with_ingredients(["chicken"]);
        let score = score_recipe(&recipe, &query_with(Some("curry"), &["chicken"]));
        assert!((score.combo - 30.0).abs() < f64::EPSILON);

        let far = Recipe::new(2, "Chicken and Mango with Spiced Curry");
        let score = score_recipe(&far, &query_with(Some("curry"), &["chicken"]));
        assert!((score.combo - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_category_meal_and_nutrition_points() {
        let recipe = Recipe::new(1, "Veggie Omelette").with_categories(["Breakfast", "Vegetarian", "Quick"]);
        let mut query = ParsedQuery::empty("quick vegetarian breakfast high protein");
        query.categories = vec!["vegetarian".to_owned(), "quick".to_owned(), "vegan".to_owned()];
        query.meal_type = Some(MealType::Breakfast);
        query.nutrition.insert(Nutrient::Protein, NutrientBound::at_least(15.0));

        let score = score_recipe(&recipe, &query);
        assert!((score.categories - 24.0).abs() < f64::EPSILON);
        assert!((score.meal_type - 15.0).abs() < f64::EPSILON);
        assert!((score.nutrition - 20.0).abs() < f64::EPSILON);
        assert!((score.normalized() - 0.59).abs() < 1e-9);
    }

    #[test]
    fn test_adding_satisfied_ingredient_never_lowers_score() {
        let recipe = Recipe::new(1, "Garlic Butter Salmon").with_ingredients(["salmon", "garlic", "butter"]);
        let base = score_recipe(&recipe, &query_with(None, &["salmon"])).total();
        let more = score_recipe(&recipe, &query_with(None, &["salmon", "garlic"])).total();
        assert!(more >= base);
    }

    #[test]
    fn test_match_reasons() {
        let recipe = Recipe::new(1, "Chicken Curry")
            .with_ingredients(["chicken", "rice"])
            .with_categories(["indian"]);
        let mut query = query_with(Some("curry"), &["chicken", "rice"]);
        query.categories = vec!["indian".to_owned()];

        let reasons = match_reasons(&recipe, &query);
        assert_eq!(
            reasons,
            vec![
                "Matches 'curry' dish type".to_owned(),
                "Contains: chicken, rice".to_owned(),
                "Category: indian".to_owned(),
            ]
        );

        let fallback = match_reasons(&recipe, &ParsedQuery::empty("anything"));
        assert_eq!(fallback, vec!["Semantic similarity match".to_owned()]);
    }
}
