// ABOUTME: Meal plan request, preferences, nutrition goals, and plan output types
// ABOUTME: Validation and clamping rules for plan parameters live with the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::{Nutrient, NutritionSnapshot};
use super::query::MealType;
use super::recipe::RecipeSummary;
use crate::constants::meal_plan;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dietary preference flags for a meal plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Only recipes tagged vegetarian
    pub vegetarian: bool,
    /// Protein floor on every meal
    pub high_protein: bool,
    /// Per-meal sugar cap
    pub low_carb: bool,
    /// Exclude dairy keywords
    pub no_dairy: bool,
    /// Exclude gluten keywords
    pub no_gluten: bool,
    /// Exclude nut keywords
    pub no_nuts: bool,
}

impl Preferences {
    /// Ingredient keywords excluded by the active flags, in flag order
    #[must_use]
    pub fn excluded_keywords(&self) -> Vec<&'static str> {
        let mut keywords = Vec::new();
        if self.no_dairy {
            keywords.extend_from_slice(meal_plan::DAIRY_KEYWORDS);
        }
        if self.no_gluten {
            keywords.extend_from_slice(meal_plan::GLUTEN_KEYWORDS);
        }
        if self.no_nuts {
            keywords.extend_from_slice(meal_plan::NUT_KEYWORDS);
        }
        keywords
    }
}

/// Daily nutrition targets keyed by nutrient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NutritionGoals(pub BTreeMap<Nutrient, f64>);

impl Default for NutritionGoals {
    fn default() -> Self {
        Self(BTreeMap::from([
            (Nutrient::Calories, meal_plan::DEFAULT_CALORIES),
            (Nutrient::Protein, meal_plan::DEFAULT_PROTEIN),
            (Nutrient::Fat, meal_plan::DEFAULT_FAT),
            (Nutrient::Sodium, meal_plan::DEFAULT_SODIUM),
        ]))
    }
}

impl NutritionGoals {
    /// Goals from explicit targets
    #[must_use]
    pub fn new(targets: impl IntoIterator<Item = (Nutrient, f64)>) -> Self {
        Self(targets.into_iter().collect())
    }

    /// Target for one nutrient
    #[must_use]
    pub fn target(&self, nutrient: Nutrient) -> Option<f64> {
        self.0.get(&nutrient).copied()
    }

    /// Daily calorie target, falling back to the default
    #[must_use]
    pub fn daily_calories(&self) -> f64 {
        self.target(Nutrient::Calories)
            .unwrap_or(meal_plan::DEFAULT_CALORIES)
    }

    /// Reject negative or non-finite targets
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first offending nutrient
    pub fn validate(&self) -> AppResult<()> {
        for (nutrient, target) in &self.0 {
            if !target.is_finite() || *target < 0.0 {
                return Err(AppError::value_out_of_range(
                    &format!("nutrition_goals.{nutrient}"),
                    target,
                    "[0, inf)",
                ));
            }
        }
        Ok(())
    }
}

/// Parameters for generating a meal plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    /// Number of days, clamped to 1..=7
    pub days: u32,
    /// Meals per day, clamped to 2..=4
    pub meals_per_day: u32,
    /// Dietary flags
    #[serde(default)]
    pub preferences: Preferences,
    /// Daily targets; defaults apply when absent
    #[serde(default)]
    pub nutrition_goals: Option<NutritionGoals>,
    /// Preference for new ingredients over randomness, in [0, 1]
    pub variety_weight: f64,
    /// First plan date; today (UTC) when absent
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Default for MealPlanRequest {
    fn default() -> Self {
        Self {
            days: 7,
            meals_per_day: 3,
            preferences: Preferences::default(),
            nutrition_goals: None,
            variety_weight: meal_plan::DEFAULT_VARIETY_WEIGHT,
            start_date: None,
        }
    }
}

impl MealPlanRequest {
    /// Request for a number of days and meals with default preferences
    #[must_use]
    pub fn new(days: u32, meals_per_day: u32) -> Self {
        Self {
            days,
            meals_per_day,
            ..Self::default()
        }
    }

    /// Set the preferences
    #[must_use]
    pub const fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Set the nutrition goals
    #[must_use]
    pub fn with_goals(mut self, goals: NutritionGoals) -> Self {
        self.nutrition_goals = Some(goals);
        self
    }

    /// Set the variety weight
    #[must_use]
    pub const fn with_variety_weight(mut self, variety_weight: f64) -> Self {
        self.variety_weight = variety_weight;
        self
    }

    /// Set the first plan date
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Days clamped to the supported range
    #[must_use]
    pub fn clamped_days(&self) -> u32 {
        self.days.clamp(meal_plan::MIN_DAYS, meal_plan::MAX_DAYS)
    }

    /// Meals per day clamped to the supported range
    #[must_use]
    pub fn clamped_meals_per_day(&self) -> u32 {
        self.meals_per_day
            .clamp(meal_plan::MIN_MEALS_PER_DAY, meal_plan::MAX_MEALS_PER_DAY)
    }

    /// Goals in effect for this request
    #[must_use]
    pub fn effective_goals(&self) -> NutritionGoals {
        self.nutrition_goals.clone().unwrap_or_default()
    }

    /// Validate values that are rejected rather than clamped
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a variety weight outside [0, 1] or invalid goals
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.variety_weight) {
            return Err(AppError::value_out_of_range(
                "variety_weight",
                self.variety_weight,
                "[0, 1]",
            ));
        }
        if let Some(goals) = &self.nutrition_goals {
            goals.validate()?;
        }
        Ok(())
    }
}

/// Meal slots for a number of meals per day
#[must_use]
pub fn meal_slots(meals_per_day: u32) -> &'static [MealType] {
    match meals_per_day {
        0..=2 => &[MealType::Breakfast, MealType::Dinner],
        3 => &[MealType::Breakfast, MealType::Lunch, MealType::Dinner],
        _ => &[
            MealType::Breakfast,
            MealType::Snack,
            MealType::Lunch,
            MealType::Dinner,
        ],
    }
}

/// A recipe placed in a meal slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    /// Recipe summary
    pub recipe: RecipeSummary,
    /// Nutrition values with missing data as zero
    pub nutrition: NutritionSnapshot,
    /// Slot meal type
    pub meal_type: MealType,
    /// One-based slot index within the day
    pub meal_number: u32,
}

/// Nutrition totals over a set of meals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams
    pub fat: f64,
    /// Sodium in milligrams
    pub sodium: f64,
    /// Sugar in grams
    pub sugar: f64,
}

impl NutritionTotals {
    /// Add one meal's nutrition
    pub fn add(&mut self, snapshot: &NutritionSnapshot) {
        self.calories += snapshot.calories;
        self.protein += snapshot.protein;
        self.fat += snapshot.fat;
        self.sodium += snapshot.sodium;
        self.sugar += snapshot.sugar;
    }

    /// Read one nutrient; saturates are not totalled
    #[must_use]
    pub const fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Sodium => self.sodium,
            Nutrient::Sugar => self.sugar,
            Nutrient::Saturates => 0.0,
        }
    }

    /// Apply a function to every total
    #[must_use]
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            fat: f(self.fat),
            sodium: f(self.sodium),
            sugar: f(self.sugar),
        }
    }
}

/// One day of a meal plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// One-based day index
    pub day: u32,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Meals in slot order; skipped slots are absent
    pub meals: Vec<PlannedMeal>,
    /// Totals for the day, one decimal
    pub daily_totals: NutritionTotals,
}

/// Goal progress for one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalAchievement {
    /// Daily target
    pub target: f64,
    /// Daily average achieved
    pub actual: f64,
    /// `actual / target * 100`, one decimal
    pub achievement: f64,
}

/// Plan-wide nutrition summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Totals across all placed meals, one decimal
    pub total_nutrition: NutritionTotals,
    /// Totals divided by the number of days, one decimal
    pub daily_average: NutritionTotals,
    /// Progress for every goal with a positive target
    pub goal_achievement: BTreeMap<Nutrient, GoalAchievement>,
    /// Meals placed
    pub total_recipes: usize,
}

/// A generated multi-day meal plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    /// Days in order
    #[serde(rename = "meal_plan")]
    pub days: Vec<DayPlan>,
    /// Nutrition summary
    pub summary: PlanSummary,
    /// Preferences used
    pub preferences: Preferences,
    /// Goals used
    pub nutrition_goals: NutritionGoals,
    /// Generation timestamp
    pub generated_at: DateTime<Utc>,
}

impl MealPlan {
    /// Recipe ids in plan order
    #[must_use]
    pub fn recipe_ids(&self) -> Vec<i64> {
        self.days
            .iter()
            .flat_map(|day| day.meals.iter().map(|meal| meal.recipe.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_slots_by_count() {
        assert_eq!(meal_slots(2), &[MealType::Breakfast, MealType::Dinner]);
        assert_eq!(meal_slots(3).len(), 3);
        assert_eq!(meal_slots(4)[1], MealType::Snack);
    }

    #[test]
    fn test_days_and_meals_are_clamped() {
        let request = MealPlanRequest::new(12, 1);
        assert_eq!(request.clamped_days(), 7);
        assert_eq!(request.clamped_meals_per_day(), 2);
        assert_eq!(MealPlanRequest::new(0, 9).clamped_days(), 1);
        assert_eq!(MealPlanRequest::new(0, 9).clamped_meals_per_day(), 4);
    }

    #[test]
    fn test_variety_weight_out_of_range_is_rejected() {
        assert!(MealPlanRequest::new(3, 3).with_variety_weight(1.2).validate().is_err());
        assert!(MealPlanRequest::new(3, 3).with_variety_weight(-0.1).validate().is_err());
        assert!(MealPlanRequest::new(3, 3).with_variety_weight(0.0).validate().is_ok());
    }

    #[test]
    fn test_invalid_goals_are_rejected() {
        let goals = NutritionGoals::new([(Nutrient::Calories, f64::NAN)]);
        let error = MealPlanRequest::new(3, 3).with_goals(goals).validate().unwrap_err();
        assert!(error.message.contains("calories"));
    }

    #[test]
    fn test_default_goals() {
        let goals = NutritionGoals::default();
        assert_eq!(goals.target(Nutrient::Sodium), Some(2300.0));
        assert_eq!(goals.target(Nutrient::Sugar), None);
        assert!((NutritionGoals::new([]).daily_calories() - 2000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_excluded_keywords_follow_flags() {
        let preferences = Preferences {
            no_dairy: true,
            no_nuts: true,
            ..Preferences::default()
        };
        let keywords = preferences.excluded_keywords();
        assert!(keywords.contains(&"cheese"));
        assert!(keywords.contains(&"cashew"));
        assert!(!keywords.contains(&"flour"));
    }
}
