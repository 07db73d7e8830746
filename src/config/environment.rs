// ABOUTME: Environment configuration for the Recipe Buddy server
// ABOUTME: Parses ports, storage backend, search tuning, TF-IDF, hybrid weights, cache, and CORS settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::cache::CacheConfig;
use anyhow::{bail, Context, Result};
use recipe_core::constants::{cache, hybrid, search};
use recipe_core::models::MissingNutrientPolicy;
use recipe_intelligence::{MatcherSettings, TfIdfConfig};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;
/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default JSON catalog location
pub const DEFAULT_RECIPES_PATH: &str = "data/recipes.json";
/// Default request deadline in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Where recipes are served from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// SQLite store with pushed-down filters
    Indexed,
    /// In-memory catalog scan with optional TF-IDF blending
    Scan,
}

impl BackendMode {
    /// Name used in logs and the health endpoint
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Scan => "scan",
        }
    }
}

/// Search tuning
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Page size when the request omits one
    pub default_max_results: usize,
    /// Largest accepted page size
    pub max_results_limit: usize,
    /// Indexed-mode candidate multiplier
    pub candidate_multiplier: usize,
    /// How nutrient bounds treat missing values, for both strategies
    pub missing_nutrients: MissingNutrientPolicy,
    /// Apply the spelling corrector before parsing
    pub enable_spell_check: bool,
}

/// Catalog TF-IDF index settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfIdfSettings {
    /// Vocabulary cap
    pub max_features: usize,
    /// Minimum document count per term
    pub min_df: usize,
    /// Maximum document share per term
    pub max_df: f64,
}

/// Hybrid blend weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridConfig {
    /// Weight of the normalized rule score
    pub rule_weight: f64,
    /// Weight of the cosine similarity
    pub semantic_weight: f64,
}

/// Response cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Capacity before LRU eviction
    pub max_entries: usize,
    /// Search response lifetime
    pub ttl_secs: u64,
    /// Expired entry sweep period
    pub cleanup_interval_secs: u64,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Bind address
    pub host: String,
    /// `sqlite:` URL; selects indexed mode when set
    pub database_url: Option<String>,
    /// JSON catalog path for scan mode and import
    pub recipes_path: PathBuf,
    /// Search tuning
    pub search: SearchConfig,
    /// Catalog TF-IDF settings
    pub tfidf: TfIdfSettings,
    /// Hybrid blend weights
    pub hybrid: HybridConfig,
    /// Response cache settings
    pub cache: CacheSettings,
    /// HTTP request deadline in seconds
    pub request_timeout_secs: u64,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            host: DEFAULT_HOST.to_owned(),
            database_url: None,
            recipes_path: PathBuf::from(DEFAULT_RECIPES_PATH),
            search: SearchConfig {
                default_max_results: search::DEFAULT_MAX_RESULTS,
                max_results_limit: search::MAX_RESULTS_LIMIT,
                candidate_multiplier: search::CANDIDATE_MULTIPLIER,
                missing_nutrients: MissingNutrientPolicy::Reject,
                enable_spell_check: true,
            },
            tfidf: TfIdfSettings {
                max_features: hybrid::TFIDF_MAX_FEATURES,
                min_df: hybrid::TFIDF_MIN_DF,
                max_df: hybrid::TFIDF_MAX_DF,
            },
            hybrid: HybridConfig {
                rule_weight: hybrid::RULE_WEIGHT,
                semantic_weight: hybrid::SEMANTIC_WEIGHT,
            },
            cache: CacheSettings {
                max_entries: cache::DEFAULT_MAX_ENTRIES,
                ttl_secs: cache::SEARCH_TTL_SECS,
                cleanup_interval_secs: cache::CLEANUP_INTERVAL_SECS,
            },
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cors_origins: vec!["*".to_owned()],
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value is out of range
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let defaults = Self::default();

        let http_port = match env::var("HTTP_PORT").or_else(|_| env::var("PORT")) {
            Ok(port) => port.parse().context("Invalid HTTP_PORT value")?,
            Err(_) => defaults.http_port,
        };

        let config = Self {
            http_port,
            host: env::var("HOST").unwrap_or(defaults.host),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty()),
            recipes_path: env::var("RECIPES_PATH").map_or(defaults.recipes_path, PathBuf::from),
            search: SearchConfig {
                default_max_results: env_parse(
                    "SEARCH_DEFAULT_MAX_RESULTS",
                    defaults.search.default_max_results,
                )?,
                max_results_limit: env_parse(
                    "SEARCH_MAX_RESULTS_LIMIT",
                    defaults.search.max_results_limit,
                )?,
                candidate_multiplier: env_parse(
                    "SEARCH_CANDIDATE_MULTIPLIER",
                    defaults.search.candidate_multiplier,
                )?,
                missing_nutrients: env::var("SEARCH_MISSING_NUTRIENT_POLICY")
                    .map_or(defaults.search.missing_nutrients, |v| {
                        MissingNutrientPolicy::parse(&v)
                    }),
                enable_spell_check: env_parse(
                    "SEARCH_ENABLE_SPELL_CHECK",
                    defaults.search.enable_spell_check,
                )?,
            },
            tfidf: TfIdfSettings {
                max_features: env_parse("TFIDF_MAX_FEATURES", defaults.tfidf.max_features)?,
                min_df: env_parse("TFIDF_MIN_DF", defaults.tfidf.min_df)?,
                max_df: env_parse("TFIDF_MAX_DF", defaults.tfidf.max_df)?,
            },
            hybrid: HybridConfig {
                rule_weight: env_parse("HYBRID_RULE_WEIGHT", defaults.hybrid.rule_weight)?,
                semantic_weight: env_parse(
                    "HYBRID_SEMANTIC_WEIGHT",
                    defaults.hybrid.semantic_weight,
                )?,
            },
            cache: CacheSettings {
                max_entries: env_parse("CACHE_MAX_ENTRIES", defaults.cache.max_entries)?,
                ttl_secs: env_parse("CACHE_TTL_SECS", defaults.cache.ttl_secs)?,
                cleanup_interval_secs: env_parse(
                    "CACHE_CLEANUP_INTERVAL_SECS",
                    defaults.cache.cleanup_interval_secs,
                )?,
            },
            request_timeout_secs: env_parse(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            cors_origins: env::var("CORS_ORIGINS")
                .map_or(defaults.cors_origins, |origins| parse_origins(&origins)),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot honour
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.search.max_results_limit == 0 {
            bail!("SEARCH_MAX_RESULTS_LIMIT must be at least 1");
        }
        if !(1..=self.search.max_results_limit).contains(&self.search.default_max_results) {
            bail!(
                "SEARCH_DEFAULT_MAX_RESULTS must be within [1, {}]",
                self.search.max_results_limit
            );
        }
        for (name, weight) in [
            ("HYBRID_RULE_WEIGHT", self.hybrid.rule_weight),
            ("HYBRID_SEMANTIC_WEIGHT", self.hybrid.semantic_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                bail!("{name} must be within [0, 1], got {weight}");
            }
        }
        if !(self.tfidf.max_df > 0.0 && self.tfidf.max_df <= 1.0) {
            bail!("TFIDF_MAX_DF must be within (0, 1], got {}", self.tfidf.max_df);
        }
        if let Some(url) = &self.database_url {
            if !url.starts_with("sqlite:") {
                bail!("DATABASE_URL must be a sqlite: URL, got {url}");
            }
        }
        Ok(())
    }

    /// Backend selected by the presence of `DATABASE_URL`
    #[must_use]
    pub const fn backend_mode(&self) -> BackendMode {
        if self.database_url.is_some() {
            BackendMode::Indexed
        } else {
            BackendMode::Scan
        }
    }

    /// Matcher settings derived from the search and hybrid sections
    #[must_use]
    pub fn matcher_settings(&self) -> MatcherSettings {
        MatcherSettings {
            missing_nutrients: self.search.missing_nutrients,
            candidate_multiplier: self.search.candidate_multiplier,
            max_results_limit: self.search.max_results_limit,
            rule_weight: self.hybrid.rule_weight,
            semantic_weight: self.hybrid.semantic_weight,
        }
    }

    /// Catalog TF-IDF configuration
    #[must_use]
    pub const fn tfidf_config(&self) -> TfIdfConfig {
        TfIdfConfig::catalog()
            .with_max_features(self.tfidf.max_features)
            .with_document_frequency(self.tfidf.min_df, self.tfidf.max_df)
    }

    /// Response cache configuration
    #[must_use]
    pub const fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache.max_entries,
            search_ttl: Duration::from_secs(self.cache.ttl_secs),
            cleanup_interval: Duration::from_secs(self.cache.cleanup_interval_secs),
            enable_background_cleanup: true,
        }
    }

    /// One-line-per-setting summary for the startup log
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Recipe Buddy Configuration:\n\
             - Listen: {}:{}\n\
             - Backend: {}\n\
             - Catalog: {}\n\
             - Page size: {} (max {})\n\
             - Missing nutrients: {:?}\n\
             - Spell check: {}\n\
             - Hybrid weights: rule {} / semantic {}\n\
             - Cache: {} entries, {}s TTL\n\
             - Request timeout: {}s\n\
             - CORS origins: {}",
            self.host,
            self.http_port,
            self.backend_mode().as_str(),
            self.recipes_path.display(),
            self.search.default_max_results,
            self.search.max_results_limit,
            self.search.missing_nutrients,
            self.search.enable_spell_check,
            self.hybrid.rule_weight,
            self.hybrid.semantic_weight,
            self.cache.max_entries,
            self.cache.ttl_secs,
            self.request_timeout_secs,
            self.cors_origins.join(", "),
        )
    }
}

/// Parse a variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {key} value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

/// Parse comma-separated CORS origins
fn parse_origins(origins: &str) -> Vec<String> {
    if origins.trim() == "*" {
        return vec!["*".to_owned()];
    }
    origins
        .split(',')
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
