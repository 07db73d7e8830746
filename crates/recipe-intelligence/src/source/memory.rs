// ABOUTME: Recipe source over an immutable in-memory catalog
// ABOUTME: Applies CandidateFilter::admits directly and orders by id or seeded permutation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{seeded_rank, CandidateFilter, CandidateOrder, CategoryCount, RecipeSource};
use recipe_core::errors::AppResult;
use recipe_core::models::Recipe;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Catalog held in memory and shared read-only between requests
#[derive(Debug, Clone)]
pub struct InMemoryRecipeSource {
    recipes: Arc<[Recipe]>,
}

impl InMemoryRecipeSource {
    /// Wrap a loaded catalog; catalog order is the natural order
    #[must_use]
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes: recipes.into(),
        }
    }

    /// Shared handle to the catalog
    #[must_use]
    pub fn recipes(&self) -> Arc<[Recipe]> {
        Arc::clone(&self.recipes)
    }

    /// Number of recipes
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait::async_trait]
impl RecipeSource for InMemoryRecipeSource {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn by_id(&self, id: i64) -> AppResult<Option<Recipe>> {
        Ok(self.recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> AppResult<Vec<Recipe>> {
        let admitted = self
            .recipes
            .iter()
            .filter(|r| !exclude_ids.contains(&r.id) && filter.admits(r));

        let candidates = match filter.order {
            CandidateOrder::Natural => admitted.take(limit).cloned().collect(),
            CandidateOrder::Seeded(seed) => {
                let mut ranked: Vec<&Recipe> = admitted.collect();
                ranked.sort_by_key(|r| (seeded_rank(r.id, seed), r.id));
                ranked.into_iter().take(limit).cloned().collect()
            }
        };
        Ok(candidates)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.recipes.len() as u64)
    }

    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for category in self.recipes.iter().flat_map(|r| r.categories.iter()) {
            let name = category.trim();
            if !name.is_empty() {
                *counts.entry(name).or_default() += 1;
            }
        }
        let mut categories: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(name, count)| CategoryCount {
                name: name.to_owned(),
                count,
            })
            .collect();
        // BTreeMap yields names in order, so the stable sort keeps name order on ties
        categories.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(categories)
    }
}
