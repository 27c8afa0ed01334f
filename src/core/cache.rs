// src/core/cache.rs
//! In-process TTL cache for upstream search results

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::lead_search::{FetchResult, FilterSet};

pub const PREFIX_API_RESPONSE: &str = "api:response";

struct CacheEntry {
    value: FetchResult,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Search results keyed by a hash of the normalized filter set.
#[derive(Clone)]
pub struct SearchCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// `api:response:<md5 of the canonical filter JSON>`
    pub fn key_for(filters: &FilterSet) -> String {
        // Struct fields serialize in declaration order, so equal filter sets give equal JSON
        let canonical = serde_json::to_string(&filters.normalized()).unwrap_or_default();
        format!("{}:{:x}", PREFIX_API_RESPONSE, md5::compute(canonical.as_bytes()))
    }

    pub async fn get(&self, filters: &FilterSet) -> Option<FetchResult> {
        let key = Self::key_for(filters);

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if !entry.is_expired() => {
                    debug!("Cache HIT: {}", key);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    debug!("Cache MISS: {}", key);
                    return None;
                }
            }
        }

        debug!("Cache EXPIRED: {}", key);
        self.remove_if_expired(&key).await;
        None
    }

    /// A concurrent `set` may have refreshed the key since the read lock was released
    async fn remove_if_expired(&self, key: &str) -> bool {
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(CacheEntry::is_expired) {
            entries.remove(key);
            true
        } else {
            false
        }
    }

    /// Store a result; failures are never cached. Expired entries are purged on every write.
    pub async fn set(&self, filters: &FilterSet, value: &FetchResult) {
        if !value.success {
            return;
        }
        let key = Self::key_for(filters);
        debug!("Cache SET: {} (TTL: {}s)", key, self.ttl.as_secs());

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        if entries.len() < before {
            debug!("Cache purged {} expired entries", before - entries.len());
        }
        entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop every cached search; returns how many entries were removed
    pub async fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        if count > 0 {
            debug!("Cache invalidated: {} entries", count);
        }
        count
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
