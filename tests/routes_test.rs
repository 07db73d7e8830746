// ABOUTME: HTTP integration tests for every Recipe Buddy route
// ABOUTME: Drives the full router with middleware through tower oneshot requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;
mod helpers;

use axum::Router;
use common::{indexed_resources, scan_resources};
use helpers::axum_test::AxumTestRequest;
use recipe_buddy::server::build_router;
use serde_json::{json, Value};

async fn scan_app() -> Router {
    build_router(&scan_resources().await.unwrap())
}

fn result_ids(body: &Value, field: &str) -> Vec<i64> {
    body[field]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["recipe"]["id"].as_i64().unwrap())
        .collect()
}

fn plan_ids(plan: &Value) -> Vec<i64> {
    plan["meal_plan"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|day| day["meals"].as_array().unwrap().clone())
        .map(|meal| meal["recipe"]["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_index_health_and_stats() {
    let app = scan_app().await;

    let index: Value = AxumTestRequest::get("/").send(app.clone()).await.json();
    assert_eq!(index["total_recipes"], 21);
    assert!(index["endpoints"]["POST /search"].is_string());

    let health = AxumTestRequest::get("/health").send(app.clone()).await;
    assert_eq!(health.status(), 200);
    let health: Value = health.json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["mode"], "scan");

    let stats: Value = AxumTestRequest::get("/stats").send(app.clone()).await.json();
    assert_eq!(stats["unique_categories"], 13);
    assert_eq!(stats["backend"], "memory");

    let cache = AxumTestRequest::get("/cache/stats").send(app).await;
    assert_eq!(cache.status(), 200);
}

#[tokio::test]
async fn test_search_applies_exclusions() {
    for resources in [scan_resources().await.unwrap(), indexed_resources().await.unwrap()] {
        let response = AxumTestRequest::post("/search")
            .json(&json!({"query": "chicken without onion", "max_results": 10}))
            .send(build_router(&resources))
            .await;
        assert_eq!(response.status(), 200);

        let body: Value = response.json();
        let found = result_ids(&body, "results");
        assert!(!found.is_empty());
        assert!(!found.contains(&1));
        assert_eq!(body["results_count"], found.len());
        assert_eq!(body["page"], 1);
        assert_eq!(body["has_prev"], false);
        assert!(body["parsed_query"]["excluded_ingredients"]
            .as_array()
            .unwrap()
            .contains(&json!("onion")));
    }
}

#[tokio::test]
async fn test_search_rejects_bad_requests() {
    let app = scan_app().await;

    let missing = AxumTestRequest::post("/search")
        .json(&json!({}))
        .send(app.clone())
        .await;
    assert_eq!(missing.status(), 400);
    let body: Value = missing.json();
    assert_eq!(body["error"]["message"], "Missing query parameter");

    let blank = AxumTestRequest::post("/search")
        .json(&json!({"query": "   "}))
        .send(app.clone())
        .await;
    assert_eq!(blank.status(), 400);

    let zero = AxumTestRequest::post("/search")
        .json(&json!({"query": "chicken", "max_results": 0}))
        .send(app)
        .await;
    assert_eq!(zero.status(), 400);
}

#[tokio::test]
async fn test_oversized_page_is_capped() {
    let response = AxumTestRequest::post("/search")
        .json(&json!({"query": "vegetarian", "max_results": 5000}))
        .send(scan_app().await)
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["per_page"], 100);
}

#[tokio::test]
async fn test_simple_search_is_cached() {
    let app = scan_app().await;

    let first: Value = AxumTestRequest::get("/search/simple?q=lemon%20garlic&limit=5")
        .send(app.clone())
        .await
        .json();
    assert_eq!(first["cached"], false);
    assert_eq!(result_ids(&first, "results"), vec![2, 15]);

    let second: Value = AxumTestRequest::get("/search/simple?q=lemon%20garlic&limit=5")
        .send(app.clone())
        .await
        .json();
    assert_eq!(second["cached"], true);
    assert_eq!(result_ids(&second, "results"), vec![2, 15]);

    let stats: Value = AxumTestRequest::get("/cache/stats").send(app.clone()).await.json();
    assert_eq!(stats["cache"]["hits"], 1);

    let missing = AxumTestRequest::get("/search/simple").send(app).await;
    assert_eq!(missing.status(), 400);
    let body: Value = missing.json();
    assert_eq!(body["error"]["message"], "Missing q parameter");
}

#[tokio::test]
async fn test_parse_endpoint() {
    let response = AxumTestRequest::post("/parse")
        .json(&json!({"query": "high protein breakfast no eggs"}))
        .send(scan_app().await)
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json();
    assert_eq!(body["query"], "high protein breakfast no eggs");
    assert_eq!(body["parsed"]["meal_type"], "breakfast");
    assert!(body["parsed"]["excluded_ingredients"]
        .as_array()
        .unwrap()
        .contains(&json!("eggs")));
}

#[tokio::test]
async fn test_recipe_lookup() {
    let app = scan_app().await;

    let found = AxumTestRequest::get("/recipe/2").send(app.clone()).await;
    assert_eq!(found.status(), 200);
    let body: Value = found.json();
    assert_eq!(body["id"], 2);
    assert_eq!(body["recipe"]["title"], "Lemon Garlic Chicken");
    assert_eq!(body["recipe"]["nutrition"]["protein"], 42.0);

    let missing = AxumTestRequest::get("/recipe/999").send(app).await;
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_random_is_reproducible_with_seed() {
    let app = scan_app().await;

    let first: Value = AxumTestRequest::get("/random?count=4&seed=7")
        .send(app.clone())
        .await
        .json();
    let second: Value = AxumTestRequest::get("/random?count=4&seed=7")
        .send(app)
        .await
        .json();

    assert_eq!(first["count"], 4);
    assert_eq!(first["recipes"], second["recipes"]);
}

#[tokio::test]
async fn test_categories_and_ingredients() {
    let app = scan_app().await;

    let categories: Value = AxumTestRequest::get("/categories").send(app.clone()).await.json();
    assert_eq!(categories["total_categories"], 13);
    assert_eq!(categories["categories"][0]["name"], "Vegetarian");
    assert_eq!(categories["categories"][0]["count"], 9);

    let ingredients: Value = AxumTestRequest::get("/ingredients").send(app).await.json();
    let listed = ingredients["ingredients"].as_array().unwrap();
    assert!(!listed.is_empty());
    assert!(listed.len() <= 100);
    assert_eq!(listed[0], "chicken");
}

#[tokio::test]
async fn test_similar_recipes_route() {
    let app = scan_app().await;

    let response = AxumTestRequest::get("/api/recipes/2/similar?limit=3")
        .send(app.clone())
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["recipe_id"], 2);
    let similar = result_ids(&body, "similar_recipes");
    assert!(similar.len() <= 3);
    assert!(!similar.contains(&2));
    assert_eq!(body["count"], similar.len());

    let missing = AxumTestRequest::get("/api/recipes/999/similar").send(app.clone()).await;
    assert_eq!(missing.status(), 404);

    let invalid = AxumTestRequest::get("/api/recipes/2/similar?min_score=2")
        .send(app)
        .await;
    assert_eq!(invalid.status(), 400);
}

#[tokio::test]
async fn test_meal_plan_is_reproducible_with_seed() {
    let app = scan_app().await;
    let body = json!({
        "days": 2,
        "meals_per_day": 3,
        "start_date": "2025-03-30",
        "seed": 42
    });

    let first = AxumTestRequest::post("/api/meal-plan").json(&body).send(app.clone()).await;
    assert_eq!(first.status(), 200);
    let first: Value = first.json();
    let second: Value = AxumTestRequest::post("/api/meal-plan")
        .json(&body)
        .send(app)
        .await
        .json();

    let days = first["meal_plan"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["date"], "2025-03-30");
    assert_eq!(days[1]["date"], "2025-03-31");
    assert_eq!(plan_ids(&first), plan_ids(&second));

    let ids = plan_ids(&first);
    let mut unique = ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn test_meal_plan_rejects_out_of_range_values() {
    let app = scan_app().await;

    for body in [
        json!({"days": 30}),
        json!({"days": 0}),
        json!({"meals_per_day": 6}),
        json!({"variety_weight": 1.5}),
    ] {
        let response = AxumTestRequest::post("/api/meal-plan").json(&body).send(app.clone()).await;
        assert_eq!(response.status(), 400, "{body}");
    }
}

#[tokio::test]
async fn test_quick_meal_plan() {
    let response = AxumTestRequest::get("/api/meal-plan/quick?diet=vegetarian&seed=3")
        .send(scan_app().await)
        .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json();
    assert_eq!(body["meal_plan"].as_array().unwrap().len(), 3);
    assert_eq!(body["preferences"]["vegetarian"], true);
}
