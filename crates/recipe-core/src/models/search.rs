// ABOUTME: Search request options and ranked result types
// ABOUTME: Shared by both match strategies and the similarity engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::nutrition::NutritionSnapshot;
use super::recipe::{Recipe, RecipeSummary};
use crate::constants::search;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize, Serializer};

/// Pagination and ranking options for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Page size
    pub max_results: usize,
    /// Results skipped before the page starts
    pub offset: usize,
    /// Blend TF-IDF similarity into the score when an index is available
    pub use_semantic_index: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: search::DEFAULT_MAX_RESULTS,
            offset: 0,
            use_semantic_index: true,
        }
    }
}

impl SearchOptions {
    /// Options for a one-based page number
    #[must_use]
    pub fn page(max_results: usize, page: usize) -> Self {
        Self {
            max_results,
            offset: page.saturating_sub(1).saturating_mul(max_results),
            use_semantic_index: true,
        }
    }

    /// Set whether the semantic index is used
    #[must_use]
    pub const fn with_semantic_index(mut self, enabled: bool) -> Self {
        self.use_semantic_index = enabled;
        self
    }

    /// Reject page sizes outside `1..=limit`
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` when `max_results` is zero or above `limit`
    pub fn validate(&self, limit: usize) -> AppResult<()> {
        if self.max_results == 0 || self.max_results > limit {
            return Err(AppError::value_out_of_range(
                "max_results",
                self.max_results,
                &format!("[1, {limit}]"),
            ));
        }
        Ok(())
    }
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    /// Recipe summary
    pub recipe: RecipeSummary,
    /// Raw rule-based points
    pub rule_score: f64,
    /// Published rank key: `rule_score / 100`, or the hybrid blend. Ranking
    /// uses full precision; serialization rounds to three decimals.
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Cosine similarity when the hybrid blend was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_score: Option<f64>,
    /// Up to three human-readable reasons
    pub match_reasons: Vec<String>,
    /// Nutrition values with missing data as zero
    pub nutrition: NutritionSnapshot,
}

impl ScoredMatch {
    /// Build a match from a recipe and its scores
    #[must_use]
    pub fn new(recipe: &Recipe, rule_score: f64, score: f64, match_reasons: Vec<String>) -> Self {
        Self {
            recipe: recipe.summary(),
            rule_score,
            score,
            semantic_score: None,
            match_reasons,
            nutrition: recipe.nutrition_snapshot(),
        }
    }

    /// Attach the cosine similarity used in the hybrid blend
    #[must_use]
    pub fn with_semantic_score(mut self, semantic_score: f64) -> Self {
        self.semantic_score = Some(round_to(semantic_score, 3));
        self
    }
}

/// One page of ranked results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Results in rank order
    pub results: Vec<ScoredMatch>,
    /// Heuristic: the page is exactly `max_results` long. A full last page
    /// reports `true` and callers must not treat this as an exact count.
    pub has_more: bool,
    /// Candidates that passed the hard filters before pagination
    pub total_candidates: usize,
}

impl SearchPage {
    /// Slice ranked results into a page
    #[must_use]
    pub fn from_ranked(ranked: Vec<ScoredMatch>, options: &SearchOptions) -> Self {
        let total_candidates = ranked.len();
        let results: Vec<ScoredMatch> = ranked
            .into_iter()
            .skip(options.offset)
            .take(options.max_results)
            .collect();
        let has_more = options.max_results > 0 && results.len() == options.max_results;
        Self {
            results,
            has_more,
            total_candidates,
        }
    }
}

/// A recipe similar to a seed recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarRecipe {
    /// Recipe summary
    pub recipe: RecipeSummary,
    /// Combined similarity in [0, 1], three decimals
    pub similarity_score: f64,
    /// Text (TF-IDF cosine) component
    pub text_similarity: f64,
    /// Nutrition vector component
    pub nutrition_similarity: f64,
    /// Up to three reasons
    pub similarity_reasons: Vec<String>,
    /// Nutrition values with missing data as zero
    pub nutrition: NutritionSnapshot,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // signature fixed by serde
fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_to(*score, 3))
}

/// Round to a fixed number of decimals
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(n: usize) -> Vec<ScoredMatch> {
        (0..n)
            .map(|i| ScoredMatch::new(&Recipe::new(i as i64, format!("r{i}")), 10.0, 0.1, vec![]))
            .collect()
    }

    #[test]
    fn test_page_offsets_are_one_based() {
        let options = SearchOptions::page(20, 3);
        assert_eq!(options.offset, 40);
        assert_eq!(SearchOptions::page(20, 0).offset, 0);
    }

    #[test]
    fn test_has_more_is_exact_page_heuristic() {
        let full = SearchPage::from_ranked(matches(10), &SearchOptions::page(5, 2));
        assert_eq!(full.results.len(), 5);
        assert!(full.has_more, "a full last page still reports more");

        let partial = SearchPage::from_ranked(matches(7), &SearchOptions::page(5, 2));
        assert_eq!(partial.results.len(), 2);
        assert!(!partial.has_more);
        assert_eq!(partial.total_candidates, 7);
    }

    #[test]
    fn test_validate_rejects_out_of_range_page_size() {
        assert!(SearchOptions::page(0, 1).validate(100).is_err());
        assert!(SearchOptions::page(101, 1).validate(100).is_err());
        assert!(SearchOptions::page(100, 1).validate(100).is_ok());
    }

    #[test]
    fn test_score_rounded_only_when_serialized() {
        let scored = ScoredMatch::new(&Recipe::new(1, "Toast"), 12.3, 0.123_456, vec![]);
        assert!((scored.score - 0.123_456).abs() < f64::EPSILON);

        let json = serde_json::to_value(&scored).unwrap();
        assert!((json["score"].as_f64().unwrap() - 0.123).abs() < f64::EPSILON);
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(0.123_456, 3) - 0.123).abs() < f64::EPSILON);
        assert!((round_to(1234.56, 1) - 1234.6).abs() < 1e-9);
    }
}
