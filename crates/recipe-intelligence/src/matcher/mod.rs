// ABOUTME: Match strategy trait with indexed and scan implementations
// ABOUTME: Both apply the same hard filters and the shared scoring function before ranking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Match strategies
//!
//! - [`IndexedMatcher`] pushes the hard filters down to a [`crate::source::RecipeSource`]
//!   and scores the bounded candidate set it returns.
//! - [`ScanMatcher`] walks an in-memory catalog, optionally blending rule scores
//!   with TF-IDF similarity from a prebuilt [`CatalogIndex`].
//!
//! Ranking is a stable descending sort on the full-precision score, so exact ties keep the
//! source's natural retrieval order.

/// Source-filtered strategy
pub mod indexed;
/// In-memory scan strategy and its semantic index
pub mod scan;

pub use indexed::IndexedMatcher;
pub use scan::{CatalogIndex, ScanMatcher};

use crate::scoring::{match_reasons, score_recipe};
use recipe_core::constants::{hybrid, search};
use recipe_core::errors::AppResult;
use recipe_core::models::{
    MissingNutrientPolicy, ParsedQuery, Recipe, ScoredMatch, SearchOptions, SearchPage,
};
use serde::{Deserialize, Serialize};

/// Execution strategy behind a matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Hard filters evaluated by the recipe source
    Indexed,
    /// Hard filters evaluated over an in-memory catalog
    Scan,
}

impl MatchMode {
    /// Convert to string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Scan => "scan",
        }
    }
}

/// Tunables shared by both strategies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    /// How nutrient bounds treat missing values
    pub missing_nutrients: MissingNutrientPolicy,
    /// Indexed mode fetches `(offset + max_results) * candidate_multiplier` candidates
    pub candidate_multiplier: usize,
    /// Largest accepted page size
    pub max_results_limit: usize,
    /// Weight of the normalised rule score in the hybrid blend
    pub rule_weight: f64,
    /// Weight of the cosine similarity in the hybrid blend
    pub semantic_weight: f64,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            missing_nutrients: MissingNutrientPolicy::default(),
            candidate_multiplier: search::CANDIDATE_MULTIPLIER,
            max_results_limit: search::MAX_RESULTS_LIMIT,
            rule_weight: hybrid::RULE_WEIGHT,
            semantic_weight: hybrid::SEMANTIC_WEIGHT,
        }
    }
}

/// Ranks recipes for a parsed query
#[async_trait::async_trait]
pub trait MatchStrategy: Send + Sync {
    /// Strategy in use
    fn mode(&self) -> MatchMode;

    /// One page of ranked matches
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for an invalid page size, or the recipe
    /// source's error unchanged
    async fn search(&self, query: &ParsedQuery, options: &SearchOptions) -> AppResult<SearchPage>;
}

/// Rule-scored match, or `None` when the raw score is not positive
pub(crate) fn rule_match(recipe: &Recipe, query: &ParsedQuery) -> Option<ScoredMatch> {
    let breakdown = score_recipe(recipe, query);
    let raw = breakdown.total();
    (raw > 0.0).then(|| {
        ScoredMatch::new(recipe, raw, breakdown.normalized(), match_reasons(recipe, query))
    })
}

/// Stable sort by descending score
pub(crate) fn rank(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_stable_on_ties() {
        let mut matches: Vec<ScoredMatch> = [(1, 0.5), (2, 0.9), (3, 0.5), (4, 0.9)]
            .into_iter()
            .map(|(id, score)| ScoredMatch::new(&Recipe::new(id, "r"), score * 100.0, score, vec![]))
            .collect();
        rank(&mut matches);
        let ids: Vec<i64> = matches.iter().map(|m| m.recipe.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_rank_separates_scores_closer_than_display_precision() {
        let mut matches: Vec<ScoredMatch> = [(1, 0.412_31), (2, 0.412_38)]
            .into_iter()
            .map(|(id, score)| ScoredMatch::new(&Recipe::new(id, "r"), score * 100.0, score, vec![]))
            .collect();
        rank(&mut matches);
        let ids: Vec<i64> = matches.iter().map(|m| m.recipe.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_rule_match_drops_zero_scores() {
        let recipe = Recipe::new(1, "Plain Toast");
        assert!(rule_match(&recipe, &ParsedQuery::empty("nothing")).is_none());

        let mut query = ParsedQuery::empty("toast");
        query.ingredients = vec!["toast".to_owned()];
        let scored = rule_match(&recipe, &query).unwrap();
        assert!(scored.rule_score > 0.0);
        assert!((scored.score - scored.rule_score / 100.0).abs() < 1e-3);
    }
}
