// ABOUTME: Recipe source seam, candidate filter specification, and seeded ordering
// ABOUTME: Sources may filter in a database or in memory; the filter semantics are shared
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory recipe source
pub mod memory;

pub use memory::InMemoryRecipeSource;

use recipe_core::errors::AppResult;
use recipe_core::models::{
    MissingNutrientPolicy, Nutrient, NutrientBound, NutritionConstraints, ParsedQuery, Recipe,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Modulus of the seeded permutation (a prime, `2^31 - 1`)
pub const SEEDED_ORDER_MODULUS: i64 = 2_147_483_647;

/// Order in which a source returns admitted candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateOrder {
    /// The source's natural retrieval order (ascending id)
    #[default]
    Natural,
    /// A deterministic pseudo-random permutation keyed by the seed
    Seeded(u64),
}

/// Hard-filter specification handed to a [`RecipeSource`].
///
/// Checks run in a fixed order: excluded terms, nutrient bounds, positive
/// calories, required terms, then any-of terms. All terms are lower-cased
/// substrings matched against the title or the search text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    /// Reject candidates mentioning any of these
    pub excluded_terms: Vec<String>,
    /// Inclusive nutrient bounds
    pub nutrient_bounds: NutritionConstraints,
    /// How a bound treats a missing nutrient value
    pub missing_nutrients: MissingNutrientPolicy,
    /// Require known, strictly positive calories
    pub require_positive_calories: bool,
    /// Require every one of these
    pub required_terms: Vec<String>,
    /// Require at least one of these, when non-empty
    pub any_terms: Vec<String>,
    /// Result order
    pub order: CandidateOrder,
}

impl CandidateFilter {
    /// Filter equivalent to the hard filters of a parsed query: exclusions,
    /// nutrient bounds, required ingredients, then the dish name
    #[must_use]
    pub fn for_query(parsed: &ParsedQuery, policy: MissingNutrientPolicy) -> Self {
        let mut required_terms: Vec<String> =
            parsed.ingredients.iter().map(|i| i.to_lowercase()).collect();
        if let Some(dish) = &parsed.dish_name {
            required_terms.push(dish.to_lowercase());
        }
        Self {
            excluded_terms: parsed
                .excluded_ingredients
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            nutrient_bounds: parsed.nutrition.clone(),
            missing_nutrients: policy,
            required_terms,
            ..Self::default()
        }
    }

    /// Add an excluded term
    #[must_use]
    pub fn exclude(mut self, term: &str) -> Self {
        self.excluded_terms.push(term.to_lowercase());
        self
    }

    /// Add a required term
    #[must_use]
    pub fn require(mut self, term: &str) -> Self {
        self.required_terms.push(term.to_lowercase());
        self
    }

    /// Require at least one of the given terms
    #[must_use]
    pub fn any_of<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_terms
            .extend(terms.into_iter().map(|t| t.as_ref().to_lowercase()));
        self
    }

    /// Set a bound on one nutrient, replacing any previous bound on it
    #[must_use]
    pub fn bound(mut self, nutrient: Nutrient, bound: NutrientBound) -> Self {
        self.nutrient_bounds.insert(nutrient, bound);
        self
    }

    /// Set the missing-nutrient policy
    #[must_use]
    pub const fn with_missing_nutrients(mut self, policy: MissingNutrientPolicy) -> Self {
        self.missing_nutrients = policy;
        self
    }

    /// Require positive calorie data
    #[must_use]
    pub const fn with_positive_calories(mut self) -> Self {
        self.require_positive_calories = true;
        self
    }

    /// Set the result order
    #[must_use]
    pub const fn ordered(mut self, order: CandidateOrder) -> Self {
        self.order = order;
        self
    }

    /// Whether no check is configured
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.excluded_terms.is_empty()
            && self.nutrient_bounds.values().all(NutrientBound::is_unbounded)
            && !self.require_positive_calories
            && self.required_terms.is_empty()
            && self.any_terms.is_empty()
    }

    /// Whether a recipe passes every check
    #[must_use]
    pub fn admits(&self, recipe: &Recipe) -> bool {
        if self.excluded_terms.iter().any(|term| recipe.mentions(term)) {
            return false;
        }
        let nutrients_ok = self.nutrient_bounds.iter().all(|(nutrient, bound)| {
            bound.admits(recipe.nutrition.get(*nutrient), self.missing_nutrients)
        });
        if !nutrients_ok {
            return false;
        }
        if self.require_positive_calories && !recipe.nutrition.has_positive_calories() {
            return false;
        }
        if !self.required_terms.iter().all(|term| recipe.mentions(term)) {
            return false;
        }
        self.any_terms.is_empty() || self.any_terms.iter().any(|term| recipe.mentions(term))
    }
}

/// Rank of a recipe id in the permutation keyed by `seed`.
///
/// `rank = (id * a + b) mod m` with `m = 2^31 - 1` and `(a, b)` from
/// [`seeded_coefficients`]. Because `m` is prime and `a` is non-zero the map is
/// injective over ids below `m`. SQL sources express the same formula in an
/// `ORDER BY` clause.
#[must_use]
pub fn seeded_rank(id: i64, seed: u64) -> i64 {
    let (a, b) = seeded_coefficients(seed);
    let rank = (i128::from(id) * i128::from(a) + i128::from(b))
        .rem_euclid(i128::from(SEEDED_ORDER_MODULUS));
    i64::try_from(rank).unwrap_or(SEEDED_ORDER_MODULUS)
}

/// Multiplier in `[1, m - 1]` and offset in `[0, m - 1]` derived from a seed
#[must_use]
pub fn seeded_coefficients(seed: u64) -> (i64, i64) {
    let modulus = SEEDED_ORDER_MODULUS.unsigned_abs();
    let mixed = splitmix64(seed);
    let a = mixed % (modulus - 1) + 1;
    let b = splitmix64(mixed) % modulus;
    (
        i64::try_from(a).unwrap_or(1),
        i64::try_from(b).unwrap_or(0),
    )
}

const fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Distinct category label with its recipe count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    /// Category label
    pub name: String,
    /// Recipes carrying the label
    pub count: u64,
}

/// Access to the recipe catalog.
///
/// Implementations borrow any connection they need per call and release it
/// before returning, on success and on error. Failures are reported as
/// `AppError` and propagated unchanged by the engine.
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    /// Short backend name for logs and stats
    fn backend(&self) -> &'static str;

    /// Look up one recipe
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn by_id(&self, id: i64) -> AppResult<Option<Recipe>>;

    /// Recipes admitted by `filter`, skipping `exclude_ids`, at most `limit`,
    /// in the order the filter asks for
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> AppResult<Vec<Recipe>>;

    /// Number of recipes in the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn count(&self) -> AppResult<u64>;

    /// `count` recipes in the permutation keyed by `seed`
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn random_recipes(&self, count: usize, seed: u64) -> AppResult<Vec<Recipe>> {
        let filter = CandidateFilter::default().ordered(CandidateOrder::Seeded(seed));
        self.search_candidates(&filter, &HashSet::new(), count).await
    }

    /// Category labels with counts, most frequent first, then by name
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::models::Nutrition;

    fn recipe(id: i64, title: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(id, title).with_ingredients(ingredients.iter().copied())
    }

    #[test]
    fn test_for_query_requires_ingredients_and_dish() {
        let mut parsed = ParsedQuery::empty("chicken curry");
        parsed.ingredients = vec!["chicken".to_owned()];
        parsed.dish_name = Some("curry".to_owned());
        parsed.excluded_ingredients = vec!["onion".to_owned()];

        let filter = CandidateFilter::for_query(&parsed, MissingNutrientPolicy::Reject);
        assert_eq!(filter.required_terms, vec!["chicken", "curry"]);

        assert!(filter.admits(&recipe(1, "Chicken Curry", &["chicken", "rice"])));
        assert!(!filter.admits(&recipe(2, "Chicken Curry", &["chicken", "onion"])));
        assert!(!filter.admits(&recipe(3, "Chicken Soup", &["chicken"])));
    }

    #[test]
    fn test_missing_nutrient_policy() {
        let bare = recipe(1, "Mystery Stew", &["beans"]);
        let reject = CandidateFilter::default().bound(Nutrient::Protein, NutrientBound::at_least(15.0));
        let admit = reject.clone().with_missing_nutrients(MissingNutrientPolicy::Admit);

        assert!(!reject.admits(&bare));
        assert!(admit.admits(&bare));

        let lean = bare.with_nutrition(Nutrition::default().with(Nutrient::Protein, 5.0));
        assert!(!admit.admits(&lean), "known values are always checked");
    }

    #[test]
    fn test_positive_calories_and_any_terms() {
        let filter = CandidateFilter::default()
            .with_positive_calories()
            .any_of(["garlic", "basil"]);
        let no_calories = recipe(1, "Pesto", &["basil"]);
        let zero = no_calories
            .clone()
            .with_nutrition(Nutrition::default().with(Nutrient::Calories, 0.0));
        let good = no_calories
            .clone()
            .with_nutrition(Nutrition::default().with(Nutrient::Calories, 300.0));

        assert!(!filter.admits(&no_calories));
        assert!(!filter.admits(&zero));
        assert!(filter.admits(&good));
        assert!(!filter.admits(&recipe(4, "Plain Rice", &["rice"])));
    }

    #[test]
    fn test_seeded_rank_is_a_permutation() {
        let ranks: HashSet<i64> = (1..=1000).map(|id| seeded_rank(id, 42)).collect();
        assert_eq!(ranks.len(), 1000);

        let first: Vec<i64> = (1..=20).map(|id| seeded_rank(id, 7)).collect();
        let again: Vec<i64> = (1..=20).map(|id| seeded_rank(id, 7)).collect();
        let other: Vec<i64> = (1..=20).map(|id| seeded_rank(id, 8)).collect();
        assert_eq!(first, again);
        assert_ne!(first, other);
    }

    #[test]
    fn test_seeded_coefficients_stay_in_range() {
        let (a, b) = seeded_coefficients(u64::MAX);
        assert!(a >= 1 && a < SEEDED_ORDER_MODULUS);
        assert!((0..SEEDED_ORDER_MODULUS).contains(&b));
    }
}
