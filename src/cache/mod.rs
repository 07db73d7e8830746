// ABOUTME: Response cache abstraction with hashed request keys and hit/miss statistics
// ABOUTME: Pluggable provider trait; the server ships an in-memory LRU implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// In-memory cache implementation
pub mod memory;

use crate::errors::AppResult;
use recipe_core::constants::cache::{
    CLEANUP_INTERVAL_SECS, DEFAULT_MAX_ENTRIES, KEY_DIGEST_LEN, SEARCH_TTL_SECS,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// # Examples
///
/// ```rust,no_run
/// use recipe_buddy::cache::{CacheConfig, CacheKey, CacheProvider};
/// use recipe_buddy::cache::memory::InMemoryCache;
/// use std::time::Duration;
/// # async fn example() -> Result<(), recipe_buddy::errors::AppError> {
/// let cache = InMemoryCache::new(CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// })
/// .await?;
///
/// let key = CacheKey::from_params("search", &[("q", "chicken"), ("limit", "10")]);
/// cache.set(&key, &vec![1_i64, 2, 3], Duration::from_secs(60)).await?;
/// let ids: Option<Vec<i64>> = cache.get(&key).await?;
/// assert_eq!(ids, Some(vec![1, 2, 3]));
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve a live value; expired entries read as misses
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove all entries whose key matches a glob pattern (e.g. `search:*`)
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is invalid
    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Check if a live key exists
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Clear all cache entries
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;

    /// Counters and occupancy
    async fn stats(&self) -> CacheStats;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction
    pub max_entries: usize,
    /// Lifetime of a cached search response
    pub search_ttl: Duration,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (disable in tests that do not run a runtime)
    pub enable_background_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            search_ttl: Duration::from_secs(SEARCH_TTL_SECS),
            cleanup_interval: Duration::from_secs(CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// Cache key: a namespace plus a digest of the request parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Key family, e.g. `search`
    pub namespace: String,
    /// Leading hex characters of the SHA-256 parameter digest
    pub digest: String,
}

impl CacheKey {
    /// Key for a parameter set; parameter order does not matter
    #[must_use]
    pub fn from_params(namespace: &str, params: &[(&str, &str)]) -> Self {
        let mut sorted = params.to_vec();
        sorted.sort_unstable();
        let canonical = sorted
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let digest = hex::encode(Sha256::digest(canonical.as_bytes()));

        Self {
            namespace: namespace.to_owned(),
            digest: digest.chars().take(KEY_DIGEST_LEN).collect(),
        }
    }

    /// Pattern matching every key in a namespace
    #[must_use]
    pub fn namespace_pattern(namespace: &str) -> String {
        format!("{namespace}:*")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.digest)
    }
}

/// Cache counters reported by `/cache/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Live and expired entries currently held
    pub entries: usize,
    /// Capacity before eviction
    pub max_entries: usize,
    /// Successful lookups
    pub hits: u64,
    /// Failed lookups, including expired entries
    pub misses: u64,
    /// Stores
    pub sets: u64,
    /// `hits / (hits + misses)`, zero before any lookup
    pub hit_rate: f64,
}

impl CacheStats {
    /// Hit rate for a pair of counters
    #[must_use]
    pub fn rate(hits: u64, misses: u64) -> f64 {
        let lookups = hits + misses;
        if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let a = CacheKey::from_params("search", &[("q", "soup"), ("limit", "5")]);
        let b = CacheKey::from_params("search", &[("limit", "5"), ("q", "soup")]);
        assert_eq!(a, b);
        assert_eq!(a.digest.len(), 12);
        assert!(a.to_string().starts_with("search:"));
    }

    #[test]
    fn test_key_depends_on_values() {
        let a = CacheKey::from_params("search", &[("q", "soup"), ("page", "1")]);
        let b = CacheKey::from_params("search", &[("q", "soup"), ("page", "2")]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hit_rate() {
        assert!(CacheStats::rate(0, 0).abs() < f64::EPSILON);
        assert!((CacheStats::rate(3, 1) - 0.75).abs() < f64::EPSILON);
    }
}
