// ABOUTME: Search and parse route handlers for natural-language recipe queries
// ABOUTME: Full JSON search, cached GET search, and a parse-only debugging endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Search routes
//!
//! `has_next` is the page-is-full heuristic reported by the engine; a full
//! last page reports `true`.

use crate::cache::{CacheKey, CacheProvider};
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use recipe_core::models::{round_to, ParsedQuery, ScoredMatch, SearchOptions, SearchPage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Cache namespace for simple search responses
const SEARCH_CACHE_NAMESPACE: &str = "search";

/// Body of `POST /search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Natural-language query
    pub query: Option<String>,
    /// Page size, capped at the configured limit
    pub max_results: Option<usize>,
    /// One-based page number
    pub page: Option<usize>,
    /// Blend TF-IDF similarity when the backend has an index
    pub use_tfidf: Option<bool>,
}

/// Response of `POST /search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Query as sent
    pub query: String,
    /// Structured interpretation
    pub parsed_query: ParsedQuery,
    /// Results on this page
    pub results_count: usize,
    /// One-based page number
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// The page is full, so another may follow
    pub has_next: bool,
    /// A previous page exists
    pub has_prev: bool,
    /// Handler time in milliseconds
    pub query_time_ms: f64,
    /// Ranked results
    pub results: Vec<ScoredMatch>,
}

/// Query string of `GET /search/simple`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimpleSearchParams {
    /// Natural-language query
    pub q: Option<String>,
    /// Page size
    pub limit: Option<usize>,
    /// One-based page number
    pub page: Option<usize>,
}

/// Response of `GET /search/simple`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleSearchResponse {
    /// Query as sent
    pub query: String,
    /// Results on this page
    pub results_count: usize,
    /// One-based page number
    pub page: usize,
    /// Page size
    pub per_page: usize,
    /// The page is full, so another may follow
    pub has_next: bool,
    /// A previous page exists
    pub has_prev: bool,
    /// Handler time in milliseconds
    pub query_time_ms: f64,
    /// Ranked results
    pub results: Vec<ScoredMatch>,
    /// Served from the response cache
    pub cached: bool,
}

/// Body of `POST /parse`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParseRequest {
    /// Natural-language query
    pub query: Option<String>,
}

/// Response of `POST /parse`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResponse {
    /// Query as sent
    pub query: String,
    /// Structured interpretation
    pub parsed: ParsedQuery,
}

/// Search routes
pub struct SearchRoutes;

impl SearchRoutes {
    /// Create all search routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/search", post(Self::handle_search))
            .route("/search/simple", get(Self::handle_simple_search))
            .route("/parse", post(Self::handle_parse))
            .with_state(resources)
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SearchRequest>,
    ) -> AppResult<Json<SearchResponse>> {
        let started = Instant::now();
        let query = required_query(request.query, "query")?;
        let (per_page, page) = paging(&resources, request.max_results, request.page);
        let options = SearchOptions::page(per_page, page)
            .with_semantic_index(request.use_tfidf.unwrap_or(true));

        let parsed = resources
            .parser
            .parse(&query, resources.config.search.enable_spell_check);
        let SearchPage { results, has_more, total_candidates } =
            resources.matcher.search(&parsed, &options).await?;

        info!(
            query = %query,
            page,
            results = results.len(),
            total_candidates,
            "Search completed"
        );
        Ok(Json(SearchResponse {
            query,
            parsed_query: parsed,
            results_count: results.len(),
            page,
            per_page,
            has_next: has_more,
            has_prev: page > 1,
            query_time_ms: elapsed_ms(started),
            results,
        }))
    }

    async fn handle_simple_search(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<SimpleSearchParams>,
    ) -> AppResult<Json<SimpleSearchResponse>> {
        let started = Instant::now();
        let query = required_query(params.q, "q")?;
        let (per_page, page) = paging(&resources, params.limit, params.page);

        let limit_param = per_page.to_string();
        let page_param = page.to_string();
        let key = CacheKey::from_params(
            SEARCH_CACHE_NAMESPACE,
            &[
                ("query", query.as_str()),
                ("limit", limit_param.as_str()),
                ("page", page_param.as_str()),
            ],
        );
        if let Some(mut cached) = resources.cache.get::<SimpleSearchResponse>(&key).await? {
            debug!(key = %key, "Serving cached search");
            cached.cached = true;
            return Ok(Json(cached));
        }

        let parsed = resources
            .parser
            .parse(&query, resources.config.search.enable_spell_check);
        let page_result = resources
            .matcher
            .search(&parsed, &SearchOptions::page(per_page, page))
            .await?;

        let response = SimpleSearchResponse {
            query,
            results_count: page_result.results.len(),
            page,
            per_page,
            has_next: page_result.has_more,
            has_prev: page > 1,
            query_time_ms: elapsed_ms(started),
            results: page_result.results,
            cached: false,
        };
        resources
            .cache
            .set(&key, &response, resources.config.cache_config().search_ttl)
            .await?;
        Ok(Json(response))
    }

    async fn handle_parse(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<ParseRequest>,
    ) -> AppResult<Json<ParseResponse>> {
        let query = required_query(request.query, "query")?;
        let parsed = resources
            .parser
            .parse(&query, resources.config.search.enable_spell_check);
        Ok(Json(ParseResponse { query, parsed }))
    }
}

fn required_query(query: Option<String>, field: &str) -> AppResult<String> {
    query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::invalid_input(format!("Missing {field} parameter")))
}

/// Page size capped at the configured limit, and a page number of at least 1
fn paging(
    resources: &ServerResources,
    max_results: Option<usize>,
    page: Option<usize>,
) -> (usize, usize) {
    let search = &resources.config.search;
    let per_page = max_results
        .unwrap_or(search.default_max_results)
        .min(search.max_results_limit);
    (per_page, page.unwrap_or(1).max(1))
}

fn elapsed_ms(started: Instant) -> f64 {
    round_to(started.elapsed().as_secs_f64() * 1000.0, 2)
}
