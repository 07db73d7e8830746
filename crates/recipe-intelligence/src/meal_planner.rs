// ABOUTME: Multi-day meal plan assembly under calorie, protein, and dietary constraints
// ABOUTME: Slots are filled in order; variety pressure and randomness come from an injected RNG
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal Planner
//!
//! Each slot queries the [`RecipeSource`] for recipes of the slot's meal type
//! within a per-meal calorie band, then picks one by blending an ingredient
//! variety score with randomness. Slot state (used recipe ids, ingredient
//! usage, the day's calories) is threaded through in slot order, so later
//! picks depend on earlier ones.
//!
//! The RNG is a parameter: a seeded generator reproduces a plan exactly.

use crate::source::{CandidateFilter, CandidateOrder, RecipeSource};
use chrono::{Days, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use recipe_core::constants::meal_plan::{
    CALORIE_BAND_HIGH, CALORIE_BAND_LOW, CANDIDATE_LIMIT, HIGH_PROTEIN_GOAL,
    HIGH_PROTEIN_MEAL_MIN, LOW_CARB_SUGAR_MAX, MAIN_MEAL_PROTEIN_MIN, MAIN_WORD_MIN_LEN,
    MIN_MEAL_CALORIES, RANDOM_SELECTION_THRESHOLD, RELAXED_CANDIDATE_LIMIT, REPEAT_PENALTY,
    VARIETY_INGREDIENTS, VEGETARIAN_MARKER,
};
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{
    meal_slots, round_to, DayPlan, GoalAchievement, MealPlan, MealPlanRequest, MealType,
    MissingNutrientPolicy, Nutrient, NutrientBound, NutritionGoals, NutritionTotals, PlanSummary,
    PlannedMeal, Preferences, Recipe,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Preset diets for quick plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickDiet {
    /// Vegetarian recipes only
    Vegetarian,
    /// Protein floor on every meal
    HighProtein,
    /// Sugar cap on every meal
    LowCarb,
    /// No dietary flags
    #[default]
    Balanced,
}

impl QuickDiet {
    /// Parse a diet name; unknown names fall back to balanced
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "vegetarian" => Self::Vegetarian,
            "high_protein" => Self::HighProtein,
            "low_carb" => Self::LowCarb,
            _ => Self::Balanced,
        }
    }

    const fn daily_protein(self) -> f64 {
        match self {
            Self::Vegetarian => 60.0,
            Self::HighProtein => 150.0,
            Self::LowCarb => 100.0,
            Self::Balanced => 75.0,
        }
    }

    /// Three-day, three-meal request for this diet
    #[must_use]
    pub fn request(self, daily_calories: f64) -> MealPlanRequest {
        let preferences = Preferences {
            vegetarian: self == Self::Vegetarian,
            high_protein: self == Self::HighProtein,
            low_carb: self == Self::LowCarb,
            ..Preferences::default()
        };
        MealPlanRequest::new(3, 3)
            .with_preferences(preferences)
            .with_goals(NutritionGoals::new([
                (Nutrient::Calories, daily_calories),
                (Nutrient::Protein, self.daily_protein()),
            ]))
    }
}

/// Per-plan selection state, updated strictly in slot order
#[derive(Default)]
struct PlanState {
    used_ids: HashSet<i64>,
    ingredient_usage: HashMap<String, u32>,
}

impl PlanState {
    fn record(&mut self, recipe: &Recipe) {
        self.used_ids.insert(recipe.id);
        for word in main_ingredient_words(recipe) {
            *self.ingredient_usage.entry(word).or_insert(0) += 1;
        }
    }

    fn variety_score(&self, recipe: &Recipe) -> f64 {
        main_ingredient_words(recipe)
            .iter()
            .map(|word| {
                if self.ingredient_usage.contains_key(word) {
                    -REPEAT_PENALTY
                } else {
                    1.0
                }
            })
            .sum()
    }
}

/// Assembles meal plans from a recipe source
pub struct MealPlanner {
    source: Arc<dyn RecipeSource>,
    missing_nutrients: MissingNutrientPolicy,
}

impl MealPlanner {
    /// Create a planner; `missing_nutrients` governs the protein and sugar bounds
    #[must_use]
    pub fn new(source: Arc<dyn RecipeSource>, missing_nutrients: MissingNutrientPolicy) -> Self {
        Self {
            source,
            missing_nutrients,
        }
    }

    /// Generate a plan.
    ///
    /// Days and meals per day are clamped to their supported ranges. A slot
    /// with no admissible recipe, even after relaxing to the meal type alone,
    /// is left empty.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an invalid variety weight or goals, or the
    /// recipe source's error unchanged
    pub async fn generate_plan<R: Rng + Send>(
        &self,
        request: &MealPlanRequest,
        rng: &mut R,
    ) -> AppResult<MealPlan> {
        request.validate()?;

        let days = request.clamped_days();
        let slots = meal_slots(request.clamped_meals_per_day());
        let goals = request.effective_goals();
        let daily_calories = goals.daily_calories();
        let meal_target = daily_calories / slots.len() as f64;
        let start_date = request
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut state = PlanState::default();
        let mut day_plans = Vec::with_capacity(days as usize);
        let mut total = NutritionTotals::default();

        for day in 1..=days {
            let mut meals = Vec::with_capacity(slots.len());
            let mut day_totals = NutritionTotals::default();

            for (slot, meal_type) in slots.iter().enumerate() {
                let remaining = daily_calories - day_totals.calories;
                let filter = self
                    .slot_filter(*meal_type, request, &goals, meal_target, remaining)
                    .ordered(CandidateOrder::Seeded(rng.gen()));

                let Some(recipe) = self
                    .pick(&filter, *meal_type, &mut state, request.variety_weight, rng, day)
                    .await?
                else {
                    warn!(day, meal_type = %meal_type, "No recipe available, skipping slot");
                    continue;
                };

                let nutrition = recipe.nutrition_snapshot();
                day_totals.add(&nutrition);
                total.add(&nutrition);
                meals.push(PlannedMeal {
                    recipe: recipe.summary(),
                    nutrition,
                    meal_type: *meal_type,
                    meal_number: slot as u32 + 1,
                });
            }

            day_plans.push(DayPlan {
                day,
                date: plan_date(start_date, day)?,
                meals,
                daily_totals: day_totals.map(|v| round_to(v, 1)),
            });
        }

        let summary = summarize(total, days, &goals, state.used_ids.len());
        info!(
            days,
            meals = summary.total_recipes,
            backend = self.source.backend(),
            "Generated meal plan"
        );

        Ok(MealPlan {
            days: day_plans,
            summary,
            preferences: request.preferences,
            nutrition_goals: goals,
            generated_at: Utc::now(),
        })
    }

    fn slot_filter(
        &self,
        meal_type: MealType,
        request: &MealPlanRequest,
        goals: &NutritionGoals,
        meal_target: f64,
        remaining: f64,
    ) -> CandidateFilter {
        let preferences = &request.preferences;
        let mut filter = CandidateFilter::default()
            .require(meal_type.as_str())
            .with_missing_nutrients(self.missing_nutrients)
            .with_positive_calories();

        if remaining > 0.0 {
            let low = (meal_target * CALORIE_BAND_LOW).max(MIN_MEAL_CALORIES);
            let high = remaining.min(meal_target * CALORIE_BAND_HIGH);
            filter = filter.bound(Nutrient::Calories, NutrientBound::between(low, high));
        }

        let mut protein_floor = None;
        if meal_type.is_main_meal()
            && goals
                .target(Nutrient::Protein)
                .is_some_and(|p| p >= HIGH_PROTEIN_GOAL)
        {
            protein_floor = Some(MAIN_MEAL_PROTEIN_MIN);
        }
        if preferences.high_protein {
            protein_floor = Some(HIGH_PROTEIN_MEAL_MIN);
        }
        if let Some(floor) = protein_floor {
            filter = filter.bound(Nutrient::Protein, NutrientBound::at_least(floor));
        }

        if preferences.vegetarian {
            filter = filter.require(VEGETARIAN_MARKER);
        }
        if preferences.low_carb {
            filter = filter.bound(Nutrient::Sugar, NutrientBound::at_most(LOW_CARB_SUGAR_MAX));
        }
        for keyword in preferences.excluded_keywords() {
            filter = filter.exclude(keyword);
        }
        filter
    }

    /// Candidates for a slot, relaxing to the meal type alone when none match
    async fn pick<R: Rng + Send>(
        &self,
        filter: &CandidateFilter,
        meal_type: MealType,
        state: &mut PlanState,
        variety_weight: f64,
        rng: &mut R,
        day: u32,
    ) -> AppResult<Option<Recipe>> {
        let mut candidates = self
            .source
            .search_candidates(filter, &state.used_ids, CANDIDATE_LIMIT)
            .await?;

        if candidates.is_empty() {
            warn!(day, meal_type = %meal_type, "No candidates under constraints, relaxing to meal type");
            let relaxed = CandidateFilter::default()
                .require(meal_type.as_str())
                .ordered(filter.order);
            candidates = self
                .source
                .search_candidates(&relaxed, &state.used_ids, RELAXED_CANDIDATE_LIMIT)
                .await?;
        }

        debug!(day, meal_type = %meal_type, candidates = candidates.len(), "Slot candidates");
        let chosen = select(&candidates, state, variety_weight, rng).cloned();
        if let Some(recipe) = &chosen {
            state.record(recipe);
        }
        Ok(chosen)
    }
}

/// Uniform pick below the variety threshold, otherwise the best blended score
fn select<'a, R: Rng>(
    candidates: &'a [Recipe],
    state: &PlanState,
    variety_weight: f64,
    rng: &mut R,
) -> Option<&'a Recipe> {
    if variety_weight < RANDOM_SELECTION_THRESHOLD {
        return candidates.choose(rng);
    }

    let mut best = None;
    let mut best_score = f64::NEG_INFINITY;
    for candidate in candidates {
        let score = state.variety_score(candidate).mul_add(
            variety_weight,
            rng.gen::<f64>() * (1.0 - variety_weight),
        );
        if score > best_score {
            best_score = score;
            best = Some(candidate);
        }
    }
    best
}

/// Main word of each of the first ingredients: the first word longer than
/// four characters, or the first word when none is
fn main_ingredient_words(recipe: &Recipe) -> Vec<String> {
    recipe
        .ingredients
        .iter()
        .take(VARIETY_INGREDIENTS)
        .filter_map(|ingredient| {
            let lower = ingredient.to_lowercase();
            let mut words = lower.split_whitespace();
            let first = words.clone().next()?;
            let main = words
                .find(|word| word.chars().count() > MAIN_WORD_MIN_LEN)
                .unwrap_or(first);
            Some(main.to_owned())
        })
        .collect()
}

fn plan_date(start: NaiveDate, day: u32) -> AppResult<String> {
    start
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| AppError::invalid_input(format!("Plan date out of range for day {day}")))
}

fn summarize(
    total: NutritionTotals,
    days: u32,
    goals: &NutritionGoals,
    total_recipes: usize,
) -> PlanSummary {
    let daily_average = total.map(|v| round_to(v / f64::from(days.max(1)), 1));
    let goal_achievement: BTreeMap<Nutrient, GoalAchievement> = goals
        .0
        .iter()
        .filter(|(_, target)| **target > 0.0)
        .map(|(nutrient, target)| {
            let actual = daily_average.get(*nutrient);
            (
                *nutrient,
                GoalAchievement {
                    target: *target,
                    actual,
                    achievement: round_to(actual / target * 100.0, 1),
                },
            )
        })
        .collect();

    PlanSummary {
        total_nutrition: total.map(|v| round_to(v, 1)),
        daily_average,
        goal_achievement,
        total_recipes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryRecipeSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use recipe_core::models::Nutrition;

    const MAINS: [&str; 6] = ["chicken", "salmon", "tofu", "lentils", "beef", "mushrooms"];

    fn catalog() -> Vec<Recipe> {
        let meal_types = ["breakfast", "lunch", "dinner", "snack"];
        (1..=40)
            .map(|id: i64| {
                let meal = meal_types[(id as usize) % meal_types.len()];
                let main = MAINS[(id as usize) % MAINS.len()];
                let mut categories = vec![meal.to_owned()];
                if id % 3 == 0 {
                    categories.push("Vegetarian".to_owned());
                }
                Recipe::new(id, format!("{main} {meal} bowl {id}"))
                    .with_ingredients([format!("200 g {main}"), "1 cup spinach".to_owned()])
                    .with_categories(categories)
                    .with_nutrition(
                        Nutrition::default()
                            .with(Nutrient::Calories, 400.0 + (id % 5) as f64 * 60.0)
                            .with(Nutrient::Protein, 10.0 + (id % 4) as f64 * 8.0)
                            .with(Nutrient::Fat, 12.0)
                            .with(Nutrient::Sodium, 350.0)
                            .with(Nutrient::Sugar, 8.0),
                    )
            })
            .collect()
    }

    fn planner() -> MealPlanner {
        MealPlanner::new(
            Arc::new(InMemoryRecipeSource::new(catalog())),
            MissingNutrientPolicy::Reject,
        )
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_plans_are_reproducible() {
        let request = MealPlanRequest::new(3, 3).with_start_date(start());
        let first = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(7))
            .await
            .unwrap();
        let second = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(7))
            .await
            .unwrap();
        assert_eq!(first.recipe_ids(), second.recipe_ids());
        assert_eq!(first.days, second.days);
    }

    #[tokio::test]
    async fn test_no_recipe_repeats_within_a_plan() {
        let request = MealPlanRequest::new(5, 4).with_start_date(start());
        let plan = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(11))
            .await
            .unwrap();
        let ids = plan.recipe_ids();
        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(plan.summary.total_recipes, ids.len());
    }

    #[tokio::test]
    async fn test_slots_follow_meal_type_order_and_dates_advance() {
        let request = MealPlanRequest::new(2, 3).with_start_date(start());
        let plan = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(plan.days.len(), 2);
        assert_eq!(plan.days[0].date, "2025-03-30");
        assert_eq!(plan.days[1].date, "2025-03-31");
        let types: Vec<MealType> = plan.days[0].meals.iter().map(|m| m.meal_type).collect();
        assert_eq!(types, vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]);
        for meal in &plan.days[0].meals {
            assert!(meal.recipe.title.contains(meal.meal_type.as_str()));
        }
    }

    #[tokio::test]
    async fn test_vegetarian_preference_is_honoured() {
        let preferences = Preferences {
            vegetarian: true,
            ..Preferences::default()
        };
        let request = MealPlanRequest::new(1, 3)
            .with_preferences(preferences)
            .with_start_date(start());
        let plan = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(5))
            .await
            .unwrap();
        for meal in &plan.days[0].meals {
            assert!(meal.recipe.id % 3 == 0, "recipe {} is not vegetarian", meal.recipe.id);
        }
    }

    #[tokio::test]
    async fn test_unsatisfiable_constraints_relax_to_meal_type() {
        let goals = NutritionGoals::new([(Nutrient::Calories, 2000.0)]);
        let preferences = Preferences {
            no_dairy: true,
            ..Preferences::default()
        };
        // every recipe lists cheese, so the no-dairy exclusion empties the constrained pool
        let source = InMemoryRecipeSource::new(
            catalog()
                .into_iter()
                .map(|recipe| {
                    let ingredients: Vec<String> = recipe
                        .ingredients
                        .iter()
                        .map(|i| i.replace("spinach", "cheese"))
                        .collect();
                    recipe.with_ingredients(ingredients)
                })
                .collect(),
        );
        let planner = MealPlanner::new(Arc::new(source), MissingNutrientPolicy::Reject);
        let request = MealPlanRequest::new(1, 2)
            .with_preferences(preferences)
            .with_goals(goals)
            .with_start_date(start());
        let plan = planner
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(1))
            .await
            .unwrap();
        assert_eq!(plan.days[0].meals.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_meal_type_skips_slot() {
        let recipes: Vec<Recipe> = catalog()
            .into_iter()
            .filter(|r| !r.title.contains("breakfast"))
            .collect();
        let planner = MealPlanner::new(
            Arc::new(InMemoryRecipeSource::new(recipes)),
            MissingNutrientPolicy::Reject,
        );
        let request = MealPlanRequest::new(1, 2).with_start_date(start());
        let plan = planner
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(2))
            .await
            .unwrap();
        let types: Vec<MealType> = plan.days[0].meals.iter().map(|m| m.meal_type).collect();
        assert_eq!(types, vec![MealType::Dinner]);
        assert_eq!(plan.days[0].meals[0].meal_number, 2);
    }

    #[tokio::test]
    async fn test_summary_reports_goal_achievement() {
        let request = MealPlanRequest::new(2, 2).with_start_date(start());
        let plan = planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(9))
            .await
            .unwrap();
        let calories = plan.summary.goal_achievement[&Nutrient::Calories];
        assert!((calories.target - 2000.0).abs() < f64::EPSILON);
        assert!((calories.actual - plan.summary.daily_average.calories).abs() < f64::EPSILON);
        let expected = round_to(calories.actual / 2000.0 * 100.0, 1);
        assert!((calories.achievement - expected).abs() < 1e-9);
        assert!(!plan.summary.goal_achievement.contains_key(&Nutrient::Sugar));
    }

    #[tokio::test]
    async fn test_invalid_variety_weight_is_rejected() {
        let request = MealPlanRequest::new(1, 2).with_variety_weight(2.0);
        assert!(planner()
            .generate_plan(&request, &mut ChaCha8Rng::seed_from_u64(0))
            .await
            .is_err());
    }

    #[test]
    fn test_main_ingredient_word() {
        let recipe = Recipe::new(1, "x").with_ingredients(["2 cups basmati rice", "1 egg", ""]);
        assert_eq!(main_ingredient_words(&recipe), vec!["basmati", "1"]);
    }

    #[test]
    fn test_variety_score_penalises_repeats() {
        let mut state = PlanState::default();
        let first = Recipe::new(1, "a").with_ingredients(["chicken thighs", "garlic cloves"]);
        assert!((state.variety_score(&first) - 2.0).abs() < f64::EPSILON);
        state.record(&first);
        let second = Recipe::new(2, "b").with_ingredients(["chicken breast", "fresh basil"]);
        assert!((state.variety_score(&second) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_quick_diet_presets() {
        let request = QuickDiet::parse("high_protein").request(1800.0);
        assert!(request.preferences.high_protein);
        assert_eq!(request.days, 3);
        let goals = request.effective_goals();
        assert_eq!(goals.target(Nutrient::Protein), Some(150.0));
        assert_eq!(goals.target(Nutrient::Calories), Some(1800.0));
        assert_eq!(QuickDiet::parse("keto"), QuickDiet::Balanced);
    }
}
