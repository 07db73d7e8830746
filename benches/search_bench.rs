// ABOUTME: Criterion benchmarks for query parsing, ranking, and meal planning
// ABOUTME: Compares rule-only and hybrid scan ranking over a synthetic catalog
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the recipe engine.
//!
//! Measures parser throughput, scan ranking with and without the TF-IDF
//! blend, similar-recipe search, and meal plan generation.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    clippy::cast_precision_loss,
    missing_docs
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use recipe_buddy::config::ServerConfig;
use recipe_buddy::resources::ServerResources;
use recipe_core::models::{MealPlanRequest, Nutrient, Nutrition, Recipe, SearchOptions};
use recipe_intelligence::QueryParser;
use tokio::runtime::Runtime;

const MAINS: [&str; 8] = [
    "chicken", "salmon", "tofu", "beef", "lentils", "shrimp", "mushrooms", "turkey",
];
const SIDES: [&str; 6] = ["rice", "quinoa", "spinach", "potatoes", "broccoli", "pasta"];
const MEALS: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Snack"];

const QUERIES: [&str; 5] = [
    "chicken without onion",
    "high protein breakfast no eggs",
    "low calorie vegetarian pasta",
    "spicy salmon with rice under 500 calories",
    "quick tofu stir fry",
];

/// Synthetic catalog with every main, side, and meal combination represented
fn generate_catalog(count: usize) -> Vec<Recipe> {
    (0..count)
        .map(|index| {
            let main = MAINS[index % MAINS.len()];
            let side = SIDES[(index / MAINS.len()) % SIDES.len()];
            let meal = MEALS[index % MEALS.len()];
            let mut categories = vec![meal.to_owned()];
            if matches!(main, "tofu" | "lentils" | "mushrooms") {
                categories.push("Vegetarian".to_owned());
            }
            Recipe::new(index as i64 + 1, format!("{main} with {side} {index}"))
                .with_ingredients([format!("300 g {main}"), format!("1 cup {side}"), "garlic".to_owned()])
                .with_categories(categories)
                .with_nutrition(
                    Nutrition::default()
                        .with(Nutrient::Calories, (index % 9) as f64 * 70.0 + 250.0)
                        .with(Nutrient::Protein, (index % 7) as f64 * 6.0 + 8.0)
                        .with(Nutrient::Fat, 14.0)
                        .with(Nutrient::Sugar, (index % 5) as f64 * 4.0),
                )
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let parser = QueryParser::without_correction().unwrap();
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(QUERIES.len() as u64));
    group.bench_function("queries", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(parser.parse(black_box(query), false));
            }
        });
    });
    group.finish();
}

fn bench_scan_search(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("scan_search");

    for size in [500_usize, 5_000] {
        let resources = rt
            .block_on(ServerResources::scan(ServerConfig::default(), generate_catalog(size)))
            .unwrap();
        let parsed = resources.parser.parse("chicken with rice", false);

        for (label, semantic) in [("rule", false), ("hybrid", true)] {
            let options = SearchOptions::page(20, 1).with_semantic_index(semantic);
            group.bench_with_input(BenchmarkId::new(label, size), &options, |b, options| {
                b.iter(|| {
                    rt.block_on(async {
                        resources
                            .matcher
                            .search(black_box(&parsed), options)
                            .await
                            .unwrap()
                    })
                });
            });
        }
    }

    group.finish();
}

fn bench_similarity_and_planning(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let resources = rt
        .block_on(ServerResources::scan(ServerConfig::default(), generate_catalog(2_000)))
        .unwrap();
    let mut group = c.benchmark_group("engine");

    group.bench_function("similar_recipes", |b| {
        b.iter(|| {
            rt.block_on(async {
                resources
                    .similarity
                    .find_similar(black_box(42), 10, 0.1)
                    .await
                    .unwrap()
            })
        });
    });

    let request = MealPlanRequest::new(7, 3);
    group.bench_function("meal_plan_7x3", |b| {
        let mut seed = 0_u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rt.block_on(async {
                resources
                    .meal_planner
                    .generate_plan(black_box(&request), &mut rng)
                    .await
                    .unwrap()
            })
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_scan_search,
    bench_similarity_and_planning
);
criterion_main!(benches);
