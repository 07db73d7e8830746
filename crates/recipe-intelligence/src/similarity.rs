// ABOUTME: Similar-recipe search combining TF-IDF text similarity with nutrition distance
// ABOUTME: Candidates come from the recipe source via shared ingredient words and a calorie band
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Similarity Engine
//!
//! Candidate generation is seed-centric, so `similar(a, b)` need not equal
//! `similar(b, a)`: each direction fits its own TF-IDF space over a different
//! candidate set.

use crate::source::{CandidateFilter, RecipeSource};
use crate::tfidf::{TfIdfConfig, TfIdfModel};
use recipe_core::constants::similarity::{
    CALORIE_BAND_HIGH, CALORIE_BAND_LOW, CANDIDATE_MULTIPLIER, MAX_CANDIDATE_WORDS,
    MIN_WORD_LEN, NUTRITION_DISTANCE_SCALE, NUTRITION_REASON_THRESHOLD, NUTRITION_WEIGHT,
    SEED_INGREDIENTS, SIMILAR_CALORIES_DELTA, SIMILAR_PROTEIN_DELTA, TEXT_INGREDIENTS,
    TEXT_REASON_THRESHOLD, TEXT_WEIGHT, WORDS_PER_INGREDIENT,
};
use recipe_core::constants::search::{MAX_MATCH_REASONS, REASON_CATEGORIES, REASON_INGREDIENTS};
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{
    round_to, MissingNutrientPolicy, Nutrient, NutrientBound, NutritionSnapshot, Recipe,
    SimilarRecipe,
};
use std::collections::{BTreeSet, HashSet};
use std::iter;
use std::sync::Arc;
use tracing::debug;

/// Finds recipes close to a seed recipe
pub struct SimilarityEngine {
    source: Arc<dyn RecipeSource>,
}

impl SimilarityEngine {
    /// Create an engine over a recipe source
    #[must_use]
    pub fn new(source: Arc<dyn RecipeSource>) -> Self {
        Self { source }
    }

    /// Recipes similar to `recipe_id`, best first.
    ///
    /// An unknown seed yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when `limit` is zero or `min_score` is outside
    /// [0, 1], or the recipe source's error unchanged
    pub async fn find_similar(
        &self,
        recipe_id: i64,
        limit: usize,
        min_score: f64,
    ) -> AppResult<Vec<SimilarRecipe>> {
        if limit == 0 {
            return Err(AppError::value_out_of_range("limit", limit, "[1, inf)"));
        }
        if !(0.0..=1.0).contains(&min_score) {
            return Err(AppError::value_out_of_range("min_score", min_score, "[0, 1]"));
        }

        let Some(seed) = self.source.by_id(recipe_id).await? else {
            debug!(recipe_id, "Similarity seed not found");
            return Ok(Vec::new());
        };

        // No significant words leaves only the calorie band
        let filter = candidate_filter(&seed);
        let exclude_ids = HashSet::from([seed.id]);
        let candidates = self
            .source
            .search_candidates(&filter, &exclude_ids, limit.saturating_mul(CANDIDATE_MULTIPLIER))
            .await?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = iter::once(&seed)
            .chain(&candidates)
            .map(similarity_text)
            .collect();
        let (_, vectors) = TfIdfModel::fit_transform(TfIdfConfig::similarity(), &texts);
        let Some((seed_vector, candidate_vectors)) = vectors.split_first() else {
            return Ok(Vec::new());
        };
        let seed_nutrition = seed.nutrition_snapshot();

        let mut scored: Vec<(f64, SimilarRecipe)> = candidates
            .iter()
            .zip(candidate_vectors)
            .filter_map(|(candidate, vector)| {
                let text = seed_vector.cosine(vector);
                let nutrition =
                    nutrition_similarity(&seed_nutrition, &candidate.nutrition_snapshot());
                let combined = TEXT_WEIGHT.mul_add(text, NUTRITION_WEIGHT * nutrition);
                (combined >= min_score).then(|| {
                    let recipe = SimilarRecipe {
                        recipe: candidate.summary(),
                        similarity_score: round_to(combined, 3),
                        text_similarity: round_to(text, 3),
                        nutrition_similarity: round_to(nutrition, 3),
                        similarity_reasons: similarity_reasons(&seed, candidate, text, nutrition),
                        nutrition: candidate.nutrition_snapshot(),
                    };
                    (combined, recipe)
                })
            })
            .collect();

        // Rank on the full-precision score; rounding is for display only
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        let similar: Vec<SimilarRecipe> = scored
            .into_iter()
            .take(limit)
            .map(|(_, recipe)| recipe)
            .collect();

        debug!(
            recipe_id,
            candidates = candidates.len(),
            returned = similar.len(),
            "Similarity search complete"
        );
        Ok(similar)
    }
}

/// Lower-cased words longer than the minimum that do not start with a digit
fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| {
            word.chars().count() > MIN_WORD_LEN
                && !word.chars().next().is_some_and(|c| c.is_ascii_digit())
        })
}

/// Up to ten distinct significant words from the seed's first ingredients
fn candidate_words(seed: &Recipe) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for ingredient in seed.ingredients.iter().take(SEED_INGREDIENTS) {
        for word in significant_words(ingredient).take(WORDS_PER_INGREDIENT) {
            if !words.contains(&word) {
                words.push(word);
            }
        }
    }
    words.truncate(MAX_CANDIDATE_WORDS);
    words
}

fn candidate_filter(seed: &Recipe) -> CandidateFilter {
    let mut filter = CandidateFilter::default()
        .any_of(candidate_words(seed))
        .with_missing_nutrients(MissingNutrientPolicy::Reject);
    if let Some(calories) = seed.nutrition.calories.filter(|c| *c > 0.0) {
        filter = filter.bound(
            Nutrient::Calories,
            NutrientBound::between(calories * CALORIE_BAND_LOW, calories * CALORIE_BAND_HIGH),
        );
    }
    filter
}

/// Title three times, the first ingredients, and the categories
fn similarity_text(recipe: &Recipe) -> String {
    let mut parts: Vec<&str> = vec![recipe.title.as_str(); 3];
    parts.extend(recipe.ingredients.iter().take(TEXT_INGREDIENTS).map(String::as_str));
    parts.extend(recipe.categories.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

fn nutrition_vector(snapshot: &NutritionSnapshot) -> [f64; 4] {
    [
        snapshot.calories,
        snapshot.protein * 10.0,
        snapshot.fat * 10.0,
        snapshot.sodium / 10.0,
    ]
}

/// `exp(-distance / scale)` over the weighted nutrition vectors
fn nutrition_similarity(a: &NutritionSnapshot, b: &NutritionSnapshot) -> f64 {
    let distance = nutrition_vector(a)
        .iter()
        .zip(nutrition_vector(b))
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt();
    (-distance / NUTRITION_DISTANCE_SCALE).exp()
}

fn ingredient_words(recipe: &Recipe) -> BTreeSet<String> {
    recipe
        .ingredients
        .iter()
        .map(String::as_str)
        .flat_map(significant_words)
        .collect()
}

fn similarity_reasons(seed: &Recipe, candidate: &Recipe, text: f64, nutrition: f64) -> Vec<String> {
    let mut reasons = Vec::new();

    let candidate_words = ingredient_words(candidate);
    let shared: Vec<String> = ingredient_words(seed)
        .intersection(&candidate_words)
        .take(REASON_INGREDIENTS)
        .cloned()
        .collect();
    if !shared.is_empty() {
        reasons.push(format!("Shares ingredients: {}", shared.join(", ")));
    }

    let categories: Vec<&str> = seed
        .categories
        .iter()
        .filter(|category| candidate.categories.contains(category))
        .take(REASON_CATEGORIES)
        .map(String::as_str)
        .collect();
    if !categories.is_empty() {
        reasons.push(format!("Similar category: {}", categories.join(", ")));
    }

    if nutrition > NUTRITION_REASON_THRESHOLD {
        let seed_nutrition = seed.nutrition_snapshot();
        let candidate_nutrition = candidate.nutrition_snapshot();
        if (seed_nutrition.calories - candidate_nutrition.calories).abs() < SIMILAR_CALORIES_DELTA {
            reasons.push(format!(
                "Similar calories (~{:.0} cal)",
                candidate_nutrition.calories
            ));
        }
        if (seed_nutrition.protein - candidate_nutrition.protein).abs() < SIMILAR_PROTEIN_DELTA {
            reasons.push(format!("Similar protein (~{:.0}g)", candidate_nutrition.protein));
        }
    }

    if text > TEXT_REASON_THRESHOLD {
        reasons.push(format!("High text similarity ({:.0}%)", text * 100.0));
    }

    if reasons.is_empty() {
        reasons.push("Similar recipe profile".to_owned());
    }
    reasons.truncate(MAX_MATCH_REASONS);
    reasons
}
