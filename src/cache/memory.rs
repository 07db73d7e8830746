// ABOUTME: In-memory cache implementation with LRU eviction and TTL support
// ABOUTME: Includes hit/miss counters and a background cleanup task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheConfig, CacheKey, CacheProvider, CacheStats};
use crate::errors::{AppError, AppResult};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};
use tokio::time;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Store = Arc<RwLock<LruCache<String, CacheEntry>>>;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
}

/// In-memory cache with LRU eviction and background cleanup
///
/// Clones share the store, the counters, and the cleanup task. The task stops
/// when the last clone is dropped.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Store,
    counters: Arc<Counters>,
    capacity: usize,
    shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl InMemoryCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    fn new_with_config(config: &CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let store: Store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = config.enable_background_cleanup.then(|| {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let store = Arc::clone(&store);
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => Self::cleanup_expired(&store).await,
                        _ = shutdown_rx.recv() => {
                            debug!("Cache cleanup task stopping");
                            break;
                        }
                    }
                }
            });
            Arc::new(shutdown_tx)
        });

        Self {
            store,
            counters: Arc::new(Counters::default()),
            capacity: capacity.get(),
            shutdown_tx,
        }
    }

    async fn cleanup_expired(store: &Store) {
        let mut guard = store.write().await;
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            guard.pop(key);
        }
        drop(guard);
        if !expired.is_empty() {
            debug!(removed = expired.len(), "Cleaned up expired cache entries");
        }
    }

    /// Live entry bytes, evicting the entry when expired
    async fn live_entry(&self, key: &str) -> Option<Vec<u8>> {
        let mut store = self.store.write().await;
        let expired = match store.get(key) {
            Some(entry) if !entry.is_expired() => return Some(entry.data.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            store.pop(key);
        }
        None
    }
}

#[async_trait::async_trait]
impl CacheProvider for InMemoryCache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        Ok(Self::new_with_config(&config))
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let entry = CacheEntry::new(serde_json::to_vec(value)?, ttl);
        self.store.write().await.push(key.to_string(), entry);
        self.counters.sets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let Some(data) = self.live_entry(&key.to_string()).await else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return Ok(None);
        };
        self.counters.hits.fetch_add(1, Ordering::Relaxed);
        Ok(Some(serde_json::from_slice(&data)?))
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        self.store.write().await.pop(&key.to_string());
        Ok(())
    }

    async fn invalidate_pattern(&self, pattern: &str) -> AppResult<u64> {
        let glob_pattern = glob::Pattern::new(pattern).map_err(|e| {
            AppError::invalid_input(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;

        let mut store = self.store.write().await;
        let matching: Vec<String> = store
            .iter()
            .filter(|(key, _)| glob_pattern.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &matching {
            store.pop(key);
        }
        drop(store);
        Ok(matching.len() as u64)
    }

    async fn exists(&self, key: &CacheKey) -> AppResult<bool> {
        Ok(self.live_entry(&key.to_string()).await.is_some())
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.store.write().await.clear();
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let entries = self.store.read().await.len();
        let hits = self.counters.hits.load(Ordering::Relaxed);
        let misses = self.counters.misses.load(Ordering::Relaxed);
        CacheStats {
            entries,
            max_entries: self.capacity,
            hits,
            misses,
            sets: self.counters.sets.load(Ordering::Relaxed),
            hit_rate: CacheStats::rate(hits, misses),
        }
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            if Arc::strong_count(&tx) == 1 {
                if let Err(e) = tx.try_send(()) {
                    debug!(error = ?e, "Cache shutdown signal not delivered");
                }
            }
        }
    }
}
