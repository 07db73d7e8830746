// ABOUTME: Application constants for search, scoring, similarity, and meal planning
// ABOUTME: Central place for every tunable number used by the recipe engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants organized by domain. Values here are defaults; the server
//! configuration may override the ones marked as configurable.

/// Search request limits and parser caps
pub mod search {
    /// Default page size (configurable)
    pub const DEFAULT_MAX_RESULTS: usize = 20;
    /// Hard ceiling on the page size (configurable)
    pub const MAX_RESULTS_LIMIT: usize = 100;
    /// Maximum required or excluded ingredients kept on a parsed query
    pub const MAX_PARSED_INGREDIENTS: usize = 10;
    /// Characters inspected before an ingredient mention for negation markers
    pub const NEGATION_WINDOW_CHARS: usize = 30;
    /// Indexed mode fetches `(offset + max_results) * multiplier` candidates (configurable)
    pub const CANDIDATE_MULTIPLIER: usize = 10;
    /// Maximum match reasons attached to a result
    pub const MAX_MATCH_REASONS: usize = 3;
    /// Matched ingredients listed in a "Contains" reason
    pub const REASON_INGREDIENTS: usize = 3;
    /// Matched categories listed in a "Category" reason
    pub const REASON_CATEGORIES: usize = 2;
    /// Words of at most this many characters are never corrected
    pub const MIN_CORRECTABLE_WORD_LEN: usize = 3;
}

/// Rule-based scoring points
pub mod scoring {
    /// Title equals the dish name
    pub const DISH_EXACT_TITLE: f64 = 100.0;
    /// Dish name is the first title word
    pub const DISH_FIRST_WORD: f64 = 60.0;
    /// Dish name is the last title word
    pub const DISH_LAST_WORD: f64 = 65.0;
    /// Dish name is an interior title word
    pub const DISH_INTERIOR_WORD: f64 = 55.0;
    /// Multi-word dish name bounded by spaces in the title
    pub const DISH_PHRASE: f64 = 50.0;
    /// Dish name only as a substring of the title
    pub const DISH_TITLE_SUBSTRING: f64 = 35.0;
    /// Dish name only in the search text
    pub const DISH_SEARCH_TEXT: f64 = 20.0;
    /// Required ingredient found in the title
    pub const INGREDIENT_IN_TITLE: f64 = 15.0;
    /// Position bonus when the ingredient is the first title word
    pub const INGREDIENT_POSITION_FIRST: f64 = 10.0;
    /// Position bonus when the ingredient is the second title word
    pub const INGREDIENT_POSITION_SECOND: f64 = 8.0;
    /// Position bonus when the ingredient is the third title word
    pub const INGREDIENT_POSITION_THIRD: f64 = 5.0;
    /// Position bonus for later title words
    pub const INGREDIENT_POSITION_LATER: f64 = 2.0;
    /// Bonus when the ingredient is in the title but not a whole word
    pub const INGREDIENT_PARTIAL_WORD: f64 = 5.0;
    /// Required ingredient found in the search text
    pub const INGREDIENT_IN_SEARCH_TEXT: f64 = 10.0;
    /// Dish and at least one ingredient both in the title
    pub const COMBO_TITLE: f64 = 20.0;
    /// Dish and an ingredient within [`PROXIMITY_WINDOW`] title words
    pub const COMBO_PROXIMITY: f64 = 10.0;
    /// Maximum word distance for the proximity bonus
    pub const PROXIMITY_WINDOW: usize = 2;
    /// Per category found in the search text
    pub const CATEGORY_MATCH: f64 = 12.0;
    /// Meal type found in the search text
    pub const MEAL_TYPE_MATCH: f64 = 15.0;
    /// Per declared nutrition constraint
    pub const NUTRITION_CONSTRAINT: f64 = 20.0;
    /// Raw points are divided by this to produce the published score
    pub const NORMALIZATION_DIVISOR: f64 = 100.0;
}

/// Hybrid (rule + TF-IDF) ranking defaults
pub mod hybrid {
    /// Weight of the normalized rule score (configurable)
    pub const RULE_WEIGHT: f64 = 0.7;
    /// Weight of the cosine similarity (configurable)
    pub const SEMANTIC_WEIGHT: f64 = 0.3;
    /// Vocabulary cap for the catalog index (configurable)
    pub const TFIDF_MAX_FEATURES: usize = 1000;
    /// Terms must appear in at least this many documents (configurable)
    pub const TFIDF_MIN_DF: usize = 10;
    /// Terms appearing in more than this share of documents are dropped (configurable)
    pub const TFIDF_MAX_DF: f64 = 0.5;
    /// Query text used when the parsed query carries no terms
    pub const FALLBACK_QUERY_TEXT: &str = "recipe";
}

/// Similar-recipe search
pub mod similarity {
    /// Default number of similar recipes
    pub const DEFAULT_LIMIT: usize = 10;
    /// Maximum number of similar recipes per request
    pub const MAX_LIMIT: usize = 20;
    /// Default minimum combined score
    pub const DEFAULT_MIN_SCORE: f64 = 0.3;
    /// Seed ingredients inspected for candidate words
    pub const SEED_INGREDIENTS: usize = 5;
    /// Candidate words taken from a single ingredient
    pub const WORDS_PER_INGREDIENT: usize = 2;
    /// Total candidate words
    pub const MAX_CANDIDATE_WORDS: usize = 10;
    /// A significant word is longer than this
    pub const MIN_WORD_LEN: usize = 3;
    /// Candidates fetched per requested result
    pub const CANDIDATE_MULTIPLIER: usize = 10;
    /// Lower edge of the calorie band relative to the seed
    pub const CALORIE_BAND_LOW: f64 = 0.5;
    /// Upper edge of the calorie band relative to the seed
    pub const CALORIE_BAND_HIGH: f64 = 1.5;
    /// Weight of text similarity in the combined score
    pub const TEXT_WEIGHT: f64 = 0.7;
    /// Weight of nutrition similarity in the combined score
    pub const NUTRITION_WEIGHT: f64 = 0.3;
    /// Distance scale for `exp(-distance / scale)`
    pub const NUTRITION_DISTANCE_SCALE: f64 = 100.0;
    /// Ingredients of each recipe used to build its text
    pub const TEXT_INGREDIENTS: usize = 10;
    /// Vocabulary cap for the per-request index
    pub const TFIDF_MAX_FEATURES: usize = 1000;
    /// Nutrition similarity above which closeness reasons are given
    pub const NUTRITION_REASON_THRESHOLD: f64 = 0.7;
    /// Text similarity above which a percentage reason is given
    pub const TEXT_REASON_THRESHOLD: f64 = 0.5;
    /// Calorie difference treated as "similar"
    pub const SIMILAR_CALORIES_DELTA: f64 = 50.0;
    /// Protein difference treated as "similar"
    pub const SIMILAR_PROTEIN_DELTA: f64 = 5.0;
}

/// Meal plan assembly
pub mod meal_plan {
    /// Fewest days in a plan
    pub const MIN_DAYS: u32 = 1;
    /// Most days in a plan
    pub const MAX_DAYS: u32 = 7;
    /// Fewest meals per day
    pub const MIN_MEALS_PER_DAY: u32 = 2;
    /// Most meals per day
    pub const MAX_MEALS_PER_DAY: u32 = 4;
    /// Candidates fetched per slot
    pub const CANDIDATE_LIMIT: usize = 50;
    /// Candidates fetched per slot after relaxing constraints
    pub const RELAXED_CANDIDATE_LIMIT: usize = 20;
    /// Smallest calorie floor for a meal
    pub const MIN_MEAL_CALORIES: f64 = 50.0;
    /// Lower calorie band factor around the per-meal target
    pub const CALORIE_BAND_LOW: f64 = 0.7;
    /// Upper calorie band factor around the per-meal target
    pub const CALORIE_BAND_HIGH: f64 = 1.3;
    /// Protein floor when the high-protein preference is set
    pub const HIGH_PROTEIN_MEAL_MIN: f64 = 20.0;
    /// Daily protein goal that triggers a main-meal floor
    pub const HIGH_PROTEIN_GOAL: f64 = 100.0;
    /// Main-meal protein floor for high protein goals
    pub const MAIN_MEAL_PROTEIN_MIN: f64 = 15.0;
    /// Sugar cap per meal for the low-carb preference
    pub const LOW_CARB_SUGAR_MAX: f64 = 30.0;
    /// Below this variety weight the selection is uniformly random
    pub const RANDOM_SELECTION_THRESHOLD: f64 = 0.1;
    /// Penalty per repeated ingredient in the variety score
    pub const REPEAT_PENALTY: f64 = 0.5;
    /// Ingredients inspected for variety
    pub const VARIETY_INGREDIENTS: usize = 5;
    /// A main ingredient word is longer than this
    pub const MAIN_WORD_MIN_LEN: usize = 4;
    /// Default variety weight
    pub const DEFAULT_VARIETY_WEIGHT: f64 = 0.7;
    /// Default daily calories
    pub const DEFAULT_CALORIES: f64 = 2000.0;
    /// Default daily protein (g)
    pub const DEFAULT_PROTEIN: f64 = 75.0;
    /// Default daily fat (g)
    pub const DEFAULT_FAT: f64 = 65.0;
    /// Default daily sodium (mg)
    pub const DEFAULT_SODIUM: f64 = 2300.0;
    /// Keywords excluded by the no-dairy preference
    pub const DAIRY_KEYWORDS: &[&str] = &["milk", "cheese", "butter", "cream", "yogurt"];
    /// Keywords excluded by the no-gluten preference
    pub const GLUTEN_KEYWORDS: &[&str] = &["flour", "wheat", "bread", "pasta"];
    /// Keywords excluded by the no-nuts preference
    pub const NUT_KEYWORDS: &[&str] = &["peanut", "almond", "walnut", "cashew"];
    /// Search text marker required by the vegetarian preference
    pub const VEGETARIAN_MARKER: &str = "vegetarian";
}

/// Recipe summaries returned to clients
pub mod summary {
    /// Description characters kept
    pub const DESCRIPTION_CHARS: usize = 150;
    /// Ingredients kept
    pub const INGREDIENTS: usize = 10;
    /// Directions kept
    pub const DIRECTIONS: usize = 3;
    /// Categories kept
    pub const CATEGORIES: usize = 5;
}

/// Response cache defaults
pub mod cache {
    /// Maximum cached responses (configurable)
    pub const DEFAULT_MAX_ENTRIES: usize = 1000;
    /// Lifetime of a cached search response in seconds (configurable)
    pub const SEARCH_TTL_SECS: u64 = 300;
    /// Background cleanup period in seconds (configurable)
    pub const CLEANUP_INTERVAL_SECS: u64 = 60;
    /// Hex characters kept from the parameter digest
    pub const KEY_DIGEST_LEN: usize = 12;
}
