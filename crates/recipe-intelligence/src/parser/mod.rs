// ABOUTME: Natural-language query parser producing a structured ParsedQuery
// ABOUTME: Dish, exclusion, inclusion, meal type, category, and nutrition extraction in fixed order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Query Parser
//!
//! Extraction runs in a fixed order over the lower-cased (and optionally
//! spell-corrected) text:
//!
//! 1. dish name: first curated dish found as a substring
//! 2. exclusions: the ordered [`negation::NEGATION_RULES`]
//! 3. inclusions: curated ingredients present in the text and not negated by
//!    a marker in the preceding 30 characters
//! 4. meal type (first match) and categories (all matches)
//! 5. nutrition bounds: numeric patterns, then modifiers
//!
//! Parsing never fails; text with nothing recognisable yields an empty query.

/// Negation rule list
pub mod negation;
/// Nutrition rule list
pub mod nutrition;

use crate::correction::{NoopCorrector, SpellingCorrector};
use crate::vocabulary::{
    is_dish_name, CATEGORY_SYNONYMS, DISH_NAMES, INGREDIENTS, MEAL_TYPE_SYNONYMS,
    NEGATION_MARKERS,
};
use negation::NegationRules;
use nutrition::NutritionRules;
use recipe_core::constants::search::{MAX_PARSED_INGREDIENTS, NEGATION_WINDOW_CHARS};
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{MealType, ParsedQuery};
use regex::Regex;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

/// Query parser service, built once and shared across requests
pub struct QueryParser {
    corrector: Arc<dyn SpellingCorrector>,
    negation: NegationRules,
    nutrition: NutritionRules,
    negation_markers: Regex,
}

impl QueryParser {
    /// Create a parser backed by a spelling corrector
    ///
    /// # Errors
    ///
    /// Returns an internal error if a built-in pattern fails to compile
    pub fn new(corrector: Arc<dyn SpellingCorrector>) -> AppResult<Self> {
        let mut markers: Vec<&str> = NEGATION_MARKERS.to_vec();
        markers.sort_by_key(|marker| Reverse(marker.len()));
        let alternation = markers
            .iter()
            .map(|marker| regex::escape(marker))
            .collect::<Vec<_>>()
            .join("|");
        // Markers match whole words only, so "no" never negates inside "noodles"
        let negation_markers = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .map_err(|e| AppError::internal(format!("Invalid negation marker pattern: {e}")))?;

        Ok(Self {
            corrector,
            negation: NegationRules::compile()?,
            nutrition: NutritionRules::compile()?,
            negation_markers,
        })
    }

    /// Create a parser that never corrects spelling
    ///
    /// # Errors
    ///
    /// Returns an internal error if a built-in pattern fails to compile
    pub fn without_correction() -> AppResult<Self> {
        Self::new(Arc::new(NoopCorrector))
    }

    /// Parse a query. `apply_correction` routes the text through the spelling corrector first.
    #[must_use]
    pub fn parse(&self, text: &str, apply_correction: bool) -> ParsedQuery {
        let mut parsed = ParsedQuery::empty(text);
        if text.trim().is_empty() {
            return parsed;
        }

        let working = if apply_correction {
            let correction = self.corrector.correct(text);
            if !correction.corrections.is_empty() {
                parsed.corrected_query = Some(correction.text.clone());
                parsed.spelling_corrections = correction.corrections;
            }
            correction.text
        } else {
            text.to_owned()
        };
        let lower = working.to_lowercase();

        parsed.dish_name = extract_dish_name(&lower);

        let excluded = self.negation.excluded_ingredients(&lower);
        parsed.ingredients = self.included_ingredients(&lower, &excluded);
        parsed.excluded_ingredients = excluded.into_iter().take(MAX_PARSED_INGREDIENTS).collect();

        parsed.meal_type = extract_meal_type(&lower);
        parsed.categories = extract_categories(&lower);
        parsed.nutrition = self.nutrition.extract(&lower);

        debug!(
            query = %text,
            dish = ?parsed.dish_name,
            ingredients = ?parsed.ingredients,
            excluded = ?parsed.excluded_ingredients,
            meal_type = ?parsed.meal_type,
            categories = ?parsed.categories,
            nutrients = parsed.nutrition.len(),
            "Parsed query"
        );
        parsed
    }

    /// Curated ingredients present in the text that are neither excluded nor
    /// preceded by a negation marker
    fn included_ingredients(&self, text: &str, excluded: &[String]) -> Vec<String> {
        let mut included: Vec<String> = Vec::new();
        for ingredient in INGREDIENTS {
            if included.len() >= MAX_PARSED_INGREDIENTS {
                break;
            }
            if is_dish_name(ingredient) {
                continue;
            }
            let Some(position) = text.find(ingredient) else {
                continue;
            };
            let window = lookbehind(text, position, NEGATION_WINDOW_CHARS);
            let negated = self.negation_markers.is_match(window)
                || excluded.iter().any(|e| e == ingredient);
            if !negated && !included.iter().any(|i| i == ingredient) {
                included.push((*ingredient).to_owned());
            }
        }
        included
    }
}

fn extract_dish_name(text: &str) -> Option<String> {
    DISH_NAMES
        .iter()
        .find(|dish| text.contains(*dish))
        .map(|dish| (*dish).to_owned())
}

fn extract_meal_type(text: &str) -> Option<MealType> {
    MEAL_TYPE_SYNONYMS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(meal_type, _)| *meal_type)
}

fn extract_categories(text: &str) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for (category, keywords) in CATEGORY_SYNONYMS {
        if keywords.iter().any(|keyword| text.contains(keyword))
            && !categories.iter().any(|c| c == category)
        {
            categories.push((*category).to_owned());
        }
    }
    categories
}

/// Up to `chars` characters immediately before byte offset `end`
fn lookbehind(text: &str, end: usize, chars: usize) -> &str {
    let head = text.get(..end).unwrap_or_default();
    if chars == 0 {
        return "";
    }
    let start = head
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(index, _)| index);
    head.get(start..).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::Correction;
    use recipe_core::models::{Nutrient, NutrientBound, SpellingCorrection};

    fn parser() -> QueryParser {
        QueryParser::without_correction().unwrap()
    }

    struct FixedCorrector;

    impl SpellingCorrector for FixedCorrector {
        fn correct(&self, text: &str) -> Correction {
            Correction {
                text: text.replace("chiken", "chicken"),
                corrections: vec![SpellingCorrection::new("chiken", "chicken")],
            }
        }
    }

    #[test]
    fn test_empty_text_yields_empty_query() {
        let parsed = parser().parse("", true);
        assert!(!parsed.has_terms());
        assert!(parsed.corrected_query.is_none());
    }

    #[test]
    fn test_chicken_without_onion() {
        let parsed = parser().parse("chicken without onion", false);
        assert!(parsed.ingredients.contains(&"chicken".to_owned()));
        assert!(parsed.excluded_ingredients.contains(&"onion".to_owned()));
        assert!(!parsed.ingredients.contains(&"onion".to_owned()));
    }

    #[test]
    fn test_high_protein_breakfast_no_eggs() {
        let parsed = parser().parse("high protein breakfast no eggs", false);
        assert_eq!(parsed.meal_type, Some(MealType::Breakfast));
        assert_eq!(
            parsed.bound(Nutrient::Protein),
            Some(&NutrientBound::at_least(15.0))
        );
        assert_eq!(parsed.nutrition.len(), 1);
        assert!(parsed.excluded_ingredients.contains(&"eggs".to_owned()));
        assert!(parsed.excluded_ingredients.contains(&"egg".to_owned()));
        assert!(parsed.ingredients.is_empty());
    }

    #[test]
    fn test_dish_name_first_in_list_wins() {
        let parsed = parser().parse("chicken curry pizza", false);
        assert_eq!(parsed.dish_name.as_deref(), Some("pizza"));
    }

    #[test]
    fn test_dish_names_are_not_ingredients() {
        let parsed = parser().parse("pasta with garlic", false);
        assert_eq!(parsed.dish_name.as_deref(), Some("pasta"));
        assert_eq!(parsed.ingredients, vec!["garlic".to_owned()]);
    }

    #[test]
    fn test_negation_window_rejects_nearby_marker() {
        let parsed = parser().parse("beef stew, no mushrooms or carrots", false);
        assert!(parsed.ingredients.contains(&"beef".to_owned()));
        assert!(!parsed.ingredients.contains(&"carrots".to_owned()));
    }

    #[test]
    fn test_marker_must_be_a_whole_word() {
        let parsed = parser().parse("noodles with chicken", false);
        assert!(parsed.ingredients.contains(&"chicken".to_owned()));
    }

    #[test]
    fn test_categories_keep_all_matches() {
        let parsed = parser().parse("quick spicy vegetarian curry", false);
        assert_eq!(parsed.categories, vec!["vegetarian", "quick", "spicy", "curry", "indian"]);
    }

    #[test]
    fn test_excluded_and_included_are_disjoint() {
        let parsed = parser().parse("salmon with rice, hold the rice", false);
        for ingredient in &parsed.ingredients {
            assert!(!parsed.excluded_ingredients.contains(ingredient));
        }
        assert!(parsed.excluded_ingredients.contains(&"rice".to_owned()));
        assert!(parsed.ingredients.contains(&"salmon".to_owned()));
    }

    #[test]
    fn test_correction_applied_when_requested() {
        let parser = QueryParser::new(Arc::new(FixedCorrector)).unwrap();
        let parsed = parser.parse("chiken soup", true);
        assert_eq!(parsed.original_query, "chiken soup");
        assert_eq!(parsed.corrected_query.as_deref(), Some("chicken soup"));
        assert!(parsed.ingredients.contains(&"chicken".to_owned()));

        let uncorrected = parser.parse("chiken soup", false);
        assert!(uncorrected.corrected_query.is_none());
        assert!(uncorrected.ingredients.is_empty());
    }

    #[test]
    fn test_parse_is_idempotent_without_correction() {
        let parser = parser();
        let first = parser.parse("low fat chicken salad without cheese", false);
        let second = parser.parse(first.effective_query(), false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookbehind_counts_characters() {
        let text = "jalapeño and chicken";
        let position = text.find("chicken").unwrap();
        assert_eq!(lookbehind(text, position, 5), " and ");
        assert_eq!(lookbehind(text, position, 100), "jalapeño and ");
    }
}
