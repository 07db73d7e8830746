// ABOUTME: Match strategy that scans an in-memory catalog, optionally blending TF-IDF similarity
// ABOUTME: Hard filters act as a 0/1 mask on the blended score; masked rows never reach ranking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{rank, rule_match, MatchMode, MatchStrategy, MatcherSettings};
use crate::scoring::{match_reasons, score_recipe};
use crate::source::CandidateFilter;
use crate::tfidf::{SparseVector, TfIdfConfig, TfIdfModel};
use rayon::prelude::*;
use recipe_core::constants::hybrid::FALLBACK_QUERY_TEXT;
use recipe_core::errors::AppResult;
use recipe_core::models::{ParsedQuery, Recipe, ScoredMatch, SearchOptions, SearchPage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// TF-IDF vectors for every catalog recipe, built once at startup
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    model: TfIdfModel,
    vectors: Vec<SparseVector>,
}

impl CatalogIndex {
    /// Fit the index over a catalog
    #[must_use]
    pub fn build(recipes: &[Recipe], config: TfIdfConfig) -> Self {
        let started = Instant::now();
        let texts: Vec<String> = recipes.par_iter().map(index_text).collect();
        let (model, vectors) = TfIdfModel::fit_transform(config, &texts);
        info!(
            recipes = recipes.len(),
            features = model.vocabulary_len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Built TF-IDF catalog index"
        );
        Self { model, vectors }
    }

    /// Number of terms in the index
    #[must_use]
    pub fn features(&self) -> usize {
        self.model.vocabulary_len()
    }

    fn similarities(&self, query_text: &str) -> Vec<f64> {
        let query = self.model.transform(query_text);
        self.vectors.iter().map(|v| v.cosine(&query)).collect()
    }
}

/// Title, ingredients, directions, and categories, lower-cased
fn index_text(recipe: &Recipe) -> String {
    let mut parts: Vec<&str> = vec![recipe.title.as_str()];
    parts.extend(recipe.ingredients.iter().map(String::as_str));
    parts.extend(recipe.directions.iter().map(String::as_str));
    parts.extend(recipe.categories.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Text compared against the index: dish, ingredients, and categories
fn semantic_query_text(query: &ParsedQuery) -> String {
    let parts: Vec<&str> = query
        .dish_name
        .iter()
        .chain(&query.ingredients)
        .chain(&query.categories)
        .map(String::as_str)
        .collect();
    if parts.is_empty() {
        FALLBACK_QUERY_TEXT.to_owned()
    } else {
        parts.join(" ")
    }
}

/// Strategy for an in-memory catalog
pub struct ScanMatcher {
    catalog: Arc<[Recipe]>,
    index: Option<Arc<CatalogIndex>>,
    settings: MatcherSettings,
}

impl ScanMatcher {
    /// Create a matcher without a semantic index
    #[must_use]
    pub fn new(catalog: Arc<[Recipe]>, settings: MatcherSettings) -> Self {
        Self {
            catalog,
            index: None,
            settings,
        }
    }

    /// Attach a prebuilt semantic index over the same catalog
    #[must_use]
    pub fn with_index(mut self, index: Arc<CatalogIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Whether hybrid scoring is available
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    fn hybrid_matches(
        &self,
        index: &CatalogIndex,
        query: &ParsedQuery,
        filter: &CandidateFilter,
    ) -> Vec<ScoredMatch> {
        let similarities = index.similarities(&semantic_query_text(query));
        let MatcherSettings {
            rule_weight,
            semantic_weight,
            ..
        } = self.settings;

        self.catalog
            .par_iter()
            .enumerate()
            .filter_map(|(position, recipe)| {
                let mask = if filter.admits(recipe) { 1.0 } else { 0.0 };
                let rule = score_recipe(recipe, query);
                let semantic = similarities.get(position).copied().unwrap_or_default();
                let combined = rule_weight.mul_add(rule.normalized(), semantic_weight * semantic) * mask;
                (combined > 0.0).then(|| {
                    ScoredMatch::new(recipe, rule.total(), combined, match_reasons(recipe, query))
                        .with_semantic_score(semantic)
                })
            })
            .collect()
    }

    fn rule_matches(&self, query: &ParsedQuery, filter: &CandidateFilter) -> Vec<ScoredMatch> {
        self.catalog
            .par_iter()
            .filter(|recipe| filter.admits(recipe))
            .filter_map(|recipe| rule_match(recipe, query))
            .collect()
    }
}

#[async_trait::async_trait]
impl MatchStrategy for ScanMatcher {
    fn mode(&self) -> MatchMode {
        MatchMode::Scan
    }

    async fn search(&self, query: &ParsedQuery, options: &SearchOptions) -> AppResult<SearchPage> {
        options.validate(self.settings.max_results_limit)?;

        let filter = CandidateFilter::for_query(query, self.settings.missing_nutrients);
        let hybrid = self.index.as_deref().filter(|_| options.use_semantic_index);
        let mut matches = match hybrid {
            Some(index) => self.hybrid_matches(index, query, &filter),
            None => self.rule_matches(query, &filter),
        };
        rank(&mut matches);

        debug!(
            catalog = self.catalog.len(),
            scored = matches.len(),
            hybrid = hybrid.is_some(),
            "Scan search complete"
        );
        Ok(SearchPage::from_ranked(matches, options))
    }
}
