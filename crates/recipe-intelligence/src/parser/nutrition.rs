// ABOUTME: Numeric and modifier rules that turn nutrition phrases into nutrient bounds
// ABOUTME: Modifiers only fill a bound that no explicit numeric rule already set
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::vocabulary::nutrient_for_word;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{Nutrient, NutrientBound, NutritionConstraints};
use regex::Regex;

/// Which end of a bound a rule sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    /// Lower bound
    Min,
    /// Upper bound
    Max,
}

impl BoundSide {
    fn slot(self, bound: &mut NutrientBound) -> &mut Option<f64> {
        match self {
            Self::Min => &mut bound.min,
            Self::Max => &mut bound.max,
        }
    }
}

const GRAM_NUTRIENTS: &str = r"\s*(?:grams?|g)?\s*(?:of\s+)?(protein|fat|sodium|sugar)";
const CALORIE_UNITS: &str = r"\s*(calories?|kcal|cal)\b";
const NUMBER: &str = r"(\d+(?:\.\d+)?)";

/// Numeric patterns: capture 1 is the value, capture 2 the nutrient word
const NUMERIC_RULES: &[(&str, &str, BoundSide)] = &[
    (r"at least\s*", GRAM_NUTRIENTS, BoundSide::Min),
    (r"at least\s*", CALORIE_UNITS, BoundSide::Min),
    (r"(?:more than|over)\s*", GRAM_NUTRIENTS, BoundSide::Min),
    (r"(?:more than|over)\s*", CALORIE_UNITS, BoundSide::Min),
    (r"(?:less than|under)\s*", GRAM_NUTRIENTS, BoundSide::Max),
    (r"(?:less than|under)\s*", CALORIE_UNITS, BoundSide::Max),
];

/// A qualitative phrase that implies a bound
#[derive(Debug, Clone, Copy)]
pub struct NutritionModifier {
    /// Substrings that trigger the modifier
    pub phrases: &'static [&'static str],
    /// Whole words that trigger the modifier
    pub tokens: &'static [&'static str],
    /// Nutrient constrained
    pub nutrient: Nutrient,
    /// End of the bound set
    pub side: BoundSide,
    /// Implied value
    pub value: f64,
}

/// Modifier table in evaluation order
pub const NUTRITION_MODIFIERS: &[NutritionModifier] = &[
    NutritionModifier {
        phrases: &["high protein", "high-protein", "protein rich"],
        tokens: &[],
        nutrient: Nutrient::Protein,
        side: BoundSide::Min,
        value: 15.0,
    },
    NutritionModifier {
        phrases: &["high calorie", "high-calorie", "calorie rich"],
        tokens: &[],
        nutrient: Nutrient::Calories,
        side: BoundSide::Min,
        value: 400.0,
    },
    NutritionModifier {
        phrases: &["high fat", "high-fat"],
        tokens: &[],
        nutrient: Nutrient::Fat,
        side: BoundSide::Min,
        value: 15.0,
    },
    NutritionModifier {
        phrases: &["low protein", "low-protein"],
        tokens: &[],
        nutrient: Nutrient::Protein,
        side: BoundSide::Max,
        value: 10.0,
    },
    NutritionModifier {
        phrases: &["low fat", "low-fat"],
        tokens: &[],
        nutrient: Nutrient::Fat,
        side: BoundSide::Max,
        value: 10.0,
    },
    NutritionModifier {
        phrases: &["low calorie", "low-calorie"],
        tokens: &["light"],
        nutrient: Nutrient::Calories,
        side: BoundSide::Max,
        value: 300.0,
    },
    NutritionModifier {
        phrases: &["low sodium", "low-sodium", "low salt"],
        tokens: &[],
        nutrient: Nutrient::Sodium,
        side: BoundSide::Max,
        value: 400.0,
    },
    NutritionModifier {
        phrases: &["low sugar", "low-sugar", "sugar free", "sugar-free"],
        tokens: &[],
        nutrient: Nutrient::Sugar,
        side: BoundSide::Max,
        value: 5.0,
    },
];

impl NutritionModifier {
    fn fires(&self, text: &str) -> bool {
        self.phrases.iter().any(|phrase| text.contains(phrase))
            || text
                .split_whitespace()
                .any(|word| self.tokens.contains(&word))
    }
}

/// Compiled nutrition extraction rules
pub struct NutritionRules {
    numeric: Vec<(Regex, BoundSide)>,
}

impl NutritionRules {
    /// Compile the numeric patterns
    ///
    /// # Errors
    ///
    /// Returns an internal error if a pattern fails to compile
    pub fn compile() -> AppResult<Self> {
        let numeric = NUMERIC_RULES
            .iter()
            .map(|(prefix, suffix, side)| {
                Regex::new(&format!("{prefix}{NUMBER}{suffix}"))
                    .map(|regex| (regex, *side))
                    .map_err(|e| AppError::internal(format!("Invalid nutrition pattern: {e}")))
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { numeric })
    }

    /// Extract nutrient bounds from lower-cased text
    #[must_use]
    pub fn extract(&self, text: &str) -> NutritionConstraints {
        let mut constraints = NutritionConstraints::new();

        for (regex, side) in &self.numeric {
            for captures in regex.captures_iter(text) {
                let value = captures.get(1).and_then(|m| m.as_str().parse::<f64>().ok());
                let nutrient = captures.get(2).and_then(|m| nutrient_for_word(m.as_str()));
                if let (Some(value), Some(nutrient)) = (value, nutrient) {
                    *side.slot(constraints.entry(nutrient).or_default()) = Some(value);
                }
            }
        }

        for modifier in NUTRITION_MODIFIERS {
            if modifier.fires(text) {
                let slot = modifier.side.slot(constraints.entry(modifier.nutrient).or_default());
                slot.get_or_insert(modifier.value);
            }
        }

        constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> NutritionConstraints {
        NutritionRules::compile().unwrap().extract(text)
    }

    #[test]
    fn test_numeric_minimum() {
        let constraints = extract("at least 30g protein");
        assert_eq!(constraints[&Nutrient::Protein], NutrientBound::at_least(30.0));
    }

    #[test]
    fn test_numeric_calorie_maximum() {
        let constraints = extract("dinner under 500 calories");
        assert_eq!(constraints[&Nutrient::Calories], NutrientBound::at_most(500.0));
    }

    #[test]
    fn test_bounds_on_same_nutrient_merge() {
        let constraints = extract("more than 10 g of fat but less than 40 grams fat");
        assert_eq!(constraints[&Nutrient::Fat], NutrientBound::between(10.0, 40.0));
    }

    #[test]
    fn test_modifier_never_overrides_explicit_value() {
        let constraints = extract("high protein meal with at least 40 g protein");
        assert_eq!(constraints[&Nutrient::Protein], NutrientBound::at_least(40.0));
    }

    #[test]
    fn test_modifier_fills_other_bound() {
        let constraints = extract("low calorie lunch over 100 cal");
        assert_eq!(
            constraints[&Nutrient::Calories],
            NutrientBound::between(100.0, 300.0)
        );
    }

    #[test]
    fn test_light_requires_whole_word() {
        assert!(extract("light salad").contains_key(&Nutrient::Calories));
        assert!(extract("delightful salad").is_empty());
    }

    #[test]
    fn test_sugar_free() {
        assert_eq!(extract("sugar free cake")[&Nutrient::Sugar], NutrientBound::at_most(5.0));
    }
}
