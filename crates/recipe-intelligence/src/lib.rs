// ABOUTME: Recipe intelligence engine: query understanding, hybrid ranking, similarity, planning
// ABOUTME: Pure algorithms over a pluggable RecipeSource; no transport or storage concerns
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Recipe Intelligence
//!
//! The query-understanding and matching engine behind Recipe Buddy.
//!
//! - [`parser::QueryParser`] turns free text into a [`recipe_core::models::ParsedQuery`]
//! - [`matcher::MatchStrategy`] ranks recipes, either through a filtering
//!   [`source::RecipeSource`] ([`matcher::IndexedMatcher`]) or by scanning an in-memory
//!   catalog ([`matcher::ScanMatcher`]); both share [`scoring::score_recipe`]
//! - [`similarity::SimilarityEngine`] finds recipes close to a seed recipe
//! - [`meal_planner::MealPlanner`] assembles multi-day plans under nutrition constraints

/// Spelling corrector seam used by the parser
pub mod correction;
/// Match strategies (indexed and scan) behind one trait
pub mod matcher;
/// Multi-day meal plan assembly
pub mod meal_planner;
/// Natural-language query parser
pub mod parser;
/// Rule-based scoring and match reasons
pub mod scoring;
/// Similar-recipe search
pub mod similarity;
/// Recipe source trait, candidate filters, and the in-memory source
pub mod source;
/// TF-IDF vector space model
pub mod tfidf;
/// Static vocabulary tables
pub mod vocabulary;

pub use correction::{Correction, NoopCorrector, SpellingCorrector};
pub use matcher::{
    CatalogIndex, IndexedMatcher, MatchMode, MatchStrategy, MatcherSettings, ScanMatcher,
};
pub use meal_planner::{MealPlanner, QuickDiet};
pub use parser::QueryParser;
pub use similarity::SimilarityEngine;
pub use source::{
    CandidateFilter, CandidateOrder, CategoryCount, InMemoryRecipeSource, RecipeSource,
};
pub use tfidf::TfIdfConfig;
