// ABOUTME: SQLite recipe store implementing the RecipeSource seam with sqlx
// ABOUTME: Translates candidate filters into parameterized SQL with LIKE ESCAPE and seeded ordering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use recipe_core::errors::{AppError, AppResult};
use recipe_core::models::{MissingNutrientPolicy, Nutrient, NutrientBound, Nutrition, Recipe};
use recipe_intelligence::source::{seeded_coefficients, SEEDED_ORDER_MODULUS};
use recipe_intelligence::{CandidateFilter, CandidateOrder, CategoryCount, RecipeSource};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::{debug, info};

const RECIPE_COLUMNS: &str = "id, title, description, ingredients, directions, categories, \
     calories, protein, fat, sodium, sugar, saturates, search_text";

/// Recipe catalog stored in SQLite
#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: SqlitePool,
}

impl SqliteRecipeStore {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a store from a `sqlite:` URL, creating the file if needed, and run migrations.
    ///
    /// In-memory databases are private to a connection, so they get a single-connection pool.
    ///
    /// # Errors
    ///
    /// Returns a database error if the URL is invalid or the connection fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true);
        let in_memory = database_url.contains(":memory:");
        let mut pool_options = SqlitePoolOptions::new().max_connections(if in_memory { 1 } else { 5 });
        if in_memory {
            // Closing the only connection would drop the database
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open recipe database: {e}")))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Pool handle for callers that need raw access
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the `recipes` table and its indexes
    ///
    /// # Errors
    ///
    /// Returns a database error if a statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                ingredients TEXT NOT NULL DEFAULT '[]',
                directions TEXT NOT NULL DEFAULT '[]',
                categories TEXT NOT NULL DEFAULT '[]',
                calories REAL,
                protein REAL,
                fat REAL,
                sodium REAL,
                sugar REAL,
                saturates REAL,
                search_text TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS idx_recipes_title ON recipes(title)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_calories ON recipes(calories)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_protein ON recipes(protein)",
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop and recreate the `recipes` table
    ///
    /// # Errors
    ///
    /// Returns a database error if a statement fails
    pub async fn reset(&self) -> AppResult<()> {
        sqlx::query("DROP TABLE IF EXISTS recipes")
            .execute(&self.pool)
            .await?;
        self.migrate().await
    }

    /// Insert or replace recipes in one transaction; returns the number written
    ///
    /// # Errors
    ///
    /// Returns a database or serialization error; nothing is written on error
    pub async fn insert_recipes(&self, recipes: &[Recipe]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for recipe in recipes {
            let nutrition = &recipe.nutrition;
            let result = sqlx::query(
                r"
                INSERT OR REPLACE INTO recipes (
                    id, title, description, ingredients, directions, categories,
                    calories, protein, fat, sodium, sugar, saturates, search_text
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                ",
            )
            .bind(recipe.id)
            .bind(&recipe.title)
            .bind(&recipe.description)
            .bind(serde_json::to_string(&recipe.ingredients)?)
            .bind(serde_json::to_string(&recipe.directions)?)
            .bind(serde_json::to_string(&recipe.categories)?)
            .bind(nutrition.calories)
            .bind(nutrition.protein)
            .bind(nutrition.fat)
            .bind(nutrition.sodium)
            .bind(nutrition.sugar)
            .bind(nutrition.saturates)
            .bind(&recipe.search_text)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        info!(recipes = written, "Stored recipes");
        Ok(written)
    }

    /// Every recipe title in id order
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn titles(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT title FROM recipes ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipe titles: {e}")))
    }
}

#[async_trait]
impl RecipeSource for SqliteRecipeStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn by_id(&self, id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe {id}: {e}")))?;

        row.map(|r| row_to_recipe(&r)).transpose()
    }

    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> AppResult<Vec<Recipe>> {
        let mut builder = candidate_query(filter, exclude_ids, limit);
        debug!(sql = builder.sql(), "Candidate query");

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to search recipes: {e}")))?;

        rows.iter().map(row_to_recipe).collect()
    }

    async fn count(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn category_counts(&self) -> AppResult<Vec<CategoryCount>> {
        let rows = sqlx::query(
            r"
            SELECT TRIM(c.value) AS name, COUNT(*) AS recipe_count
            FROM recipes, json_each(recipes.categories) AS c
            WHERE TRIM(c.value) <> ''
            GROUP BY TRIM(c.value)
            ORDER BY recipe_count DESC, name
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count categories: {e}")))?;

        rows.iter()
            .map(|row| {
                let count: i64 = row.try_get("recipe_count")?;
                Ok(CategoryCount {
                    name: row.try_get("name")?,
                    count: u64::try_from(count).unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Build the parameterized candidate query. Checks mirror `CandidateFilter::admits`.
fn candidate_query<'a>(
    filter: &'a CandidateFilter,
    exclude_ids: &HashSet<i64>,
    limit: usize,
) -> QueryBuilder<'a, Sqlite> {
    let mut builder: QueryBuilder<'a, Sqlite> =
        QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE 1 = 1"));

    for term in &filter.excluded_terms {
        builder.push(" AND NOT ");
        push_mentions(&mut builder, term);
    }

    for (nutrient, bound) in &filter.nutrient_bounds {
        push_bound(&mut builder, *nutrient, bound, filter.missing_nutrients);
    }

    if filter.require_positive_calories {
        builder.push(" AND calories IS NOT NULL AND calories > 0");
    }

    for term in &filter.required_terms {
        builder.push(" AND ");
        push_mentions(&mut builder, term);
    }

    if !filter.any_terms.is_empty() {
        builder.push(" AND (");
        for (index, term) in filter.any_terms.iter().enumerate() {
            if index > 0 {
                builder.push(" OR ");
            }
            push_mentions(&mut builder, term);
        }
        builder.push(")");
    }

    if !exclude_ids.is_empty() {
        let mut ids: Vec<i64> = exclude_ids.iter().copied().collect();
        ids.sort_unstable();
        builder.push(" AND id NOT IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
    }

    match filter.order {
        CandidateOrder::Natural => {
            builder.push(" ORDER BY id");
        }
        CandidateOrder::Seeded(seed) => {
            let (a, b) = seeded_coefficients(seed);
            builder.push(" ORDER BY ((id * ");
            builder.push_bind(a);
            builder.push(") + ");
            builder.push_bind(b);
            builder.push(") % ");
            builder.push_bind(SEEDED_ORDER_MODULUS);
            builder.push(", id");
        }
    }

    builder.push(" LIMIT ");
    builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    builder
}

/// `(search_text LIKE %term% OR LOWER(title) LIKE %term%)`
fn push_mentions(builder: &mut QueryBuilder<'_, Sqlite>, term: &str) {
    let pattern = format!("%{}%", escape_like(term));
    builder.push("(search_text LIKE ");
    builder.push_bind(pattern.clone());
    builder.push(r" ESCAPE '\' OR LOWER(title) LIKE ");
    builder.push_bind(pattern);
    builder.push(r" ESCAPE '\')");
}

fn push_bound(
    builder: &mut QueryBuilder<'_, Sqlite>,
    nutrient: Nutrient,
    bound: &NutrientBound,
    policy: MissingNutrientPolicy,
) {
    if bound.is_unbounded() {
        return;
    }
    // Column names come from the closed Nutrient enum, never from input
    let column = nutrient.as_str();
    builder.push(" AND (");
    builder.push(match policy {
        MissingNutrientPolicy::Reject => format!("{column} IS NOT NULL"),
        MissingNutrientPolicy::Admit => format!("{column} IS NULL OR ({column} IS NOT NULL"),
    });
    if let Some(min) = bound.min {
        builder.push(format!(" AND {column} >= "));
        builder.push_bind(min);
    }
    if let Some(max) = bound.max {
        builder.push(format!(" AND {column} <= "));
        builder.push_bind(max);
    }
    builder.push(match policy {
        MissingNutrientPolicy::Reject => ")",
        MissingNutrientPolicy::Admit => "))",
    });
}

/// Escape `LIKE` wildcards so terms match literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn json_list(row: &SqliteRow, column: &str) -> AppResult<Vec<String>> {
    let raw: String = row.try_get(column)?;
    Ok(serde_json::from_str(&raw)?)
}

fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
    let nutrition = Nutrition {
        calories: row.try_get("calories")?,
        protein: row.try_get("protein")?,
        fat: row.try_get("fat")?,
        sodium: row.try_get("sodium")?,
        sugar: row.try_get("sugar")?,
        saturates: row.try_get("saturates")?,
    };
    let title: String = row.try_get("title")?;
    let description: Option<String> = row.try_get("description")?;
    let search_text: String = row.try_get("search_text")?;

    let mut recipe = Recipe::new(row.try_get("id")?, title)
        .with_ingredients(json_list(row, "ingredients")?)
        .with_directions(json_list(row, "directions")?)
        .with_categories(json_list(row, "categories")?)
        .with_nutrition(nutrition)
        .with_search_text(search_text);
    if let Some(description) = description {
        recipe = recipe.with_description(description);
    }
    Ok(recipe)
}
