// ABOUTME: Match strategy that delegates hard filtering to the recipe source
// ABOUTME: Scores a bounded candidate set with the shared rule scorer, then paginates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{rank, rule_match, MatchMode, MatchStrategy, MatcherSettings};
use crate::source::{CandidateFilter, RecipeSource};
use recipe_core::errors::AppResult;
use recipe_core::models::{ParsedQuery, ScoredMatch, SearchOptions, SearchPage};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Strategy for sources that filter server-side
pub struct IndexedMatcher {
    source: Arc<dyn RecipeSource>,
    settings: MatcherSettings,
}

impl IndexedMatcher {
    /// Create a matcher over a recipe source
    #[must_use]
    pub fn new(source: Arc<dyn RecipeSource>, settings: MatcherSettings) -> Self {
        Self { source, settings }
    }

    fn candidate_limit(&self, options: &SearchOptions) -> usize {
        options
            .offset
            .saturating_add(options.max_results)
            .saturating_mul(self.settings.candidate_multiplier.max(1))
    }
}

#[async_trait::async_trait]
impl MatchStrategy for IndexedMatcher {
    fn mode(&self) -> MatchMode {
        MatchMode::Indexed
    }

    async fn search(&self, query: &ParsedQuery, options: &SearchOptions) -> AppResult<SearchPage> {
        options.validate(self.settings.max_results_limit)?;

        let filter = CandidateFilter::for_query(query, self.settings.missing_nutrients);
        let limit = self.candidate_limit(options);
        let candidates = self
            .source
            .search_candidates(&filter, &HashSet::new(), limit)
            .await?;

        let mut matches: Vec<ScoredMatch> = candidates
            .iter()
            .filter_map(|recipe| rule_match(recipe, query))
            .collect();
        rank(&mut matches);

        debug!(
            backend = self.source.backend(),
            candidates = candidates.len(),
            scored = matches.len(),
            limit,
            "Indexed search complete"
        );
        Ok(SearchPage::from_ranked(matches, options))
    }
}
