// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Result Cache
//!
//! Caches identifier lists per [`SpatialQuery`], tagged with the index
//! generation they were computed against. Every commit bumps the
//! generation, so results from before a write are never served after it.
//!
//! # Flow
//!
//! ```text
//! Search query arrives
//!       │
//!       ▼
//! ┌──────────────────────────────┐
//! │  Cache lookup                │
//! │  key = hash(query)           │
//! │  check: same query and       │
//! │  cached generation == current│
//! └──────────────────────────────┘
//!       │
//!       ├─→ Hit + generation matches → return cached identifiers
//!       │
//!       └─→ Miss OR stale → execute, cache results
//! ```

use super::SpatialQuery;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

type CacheKey = u64;

#[derive(Clone, Debug)]
struct CacheEntry {
    /// Compared on lookup; the key is only a hash
    query: SpatialQuery,
    /// Index generation at time of caching
    generation: u64,
    identifiers: Vec<String>,
}

/// Query result cache with generation-based invalidation
pub struct SearchCache {
    cache: DashMap<CacheKey, CacheEntry>,
    /// Insertion order for eviction (oldest first)
    order: Mutex<VecDeque<CacheKey>>,
    /// 0 disables caching
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries dropped because the index moved on
    pub stale: u64,
    pub entry_count: usize,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

impl SearchCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_entries > 0
    }

    /// Cached identifiers when present and computed at `generation`.
    pub fn get(&self, query: &SpatialQuery, generation: u64) -> Option<Vec<String>> {
        self.get_keyed(Self::hash_query(query), query, generation)
    }

    pub fn insert(&self, query: &SpatialQuery, generation: u64, identifiers: Vec<String>) {
        self.insert_keyed(Self::hash_query(query), query, generation, identifiers);
    }

    fn get_keyed(&self, key: CacheKey, query: &SpatialQuery, generation: u64) -> Option<Vec<String>> {
        if !self.is_enabled() {
            return None;
        }

        if let Some(entry) = self.cache.get(&key) {
            if entry.query != *query {
                // Hash collision: a different query owns the slot
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            if entry.generation == generation {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.identifiers.clone());
            }
            self.stale.fetch_add(1, Ordering::Relaxed);
            drop(entry); // Release read lock before removing
            self.cache.remove(&key);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn insert_keyed(&self, key: CacheKey, query: &SpatialQuery, generation: u64, identifiers: Vec<String>) {
        if !self.is_enabled() {
            return;
        }

        if self.cache.len() >= self.max_entries && !self.cache.contains_key(&key) {
            let mut order = self.order.lock();
            while self.cache.len() >= self.max_entries {
                match order.pop_front() {
                    Some(old_key) => {
                        self.cache.remove(&old_key);
                    }
                    None => break,
                }
            }
        }

        let is_new = self
            .cache
            .insert(
                key,
                CacheEntry {
                    query: query.clone(),
                    generation,
                    identifiers,
                },
            )
            .is_none();
        if is_new {
            self.order.lock().push_back(key);
        }
    }

    pub fn stats(&self) -> SearchCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        SearchCacheStats {
            hits,
            misses,
            stale: self.stale.load(Ordering::Relaxed),
            entry_count: self.cache.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    pub fn clear(&self) {
        self.cache.clear();
        self.order.lock().clear();
    }

    fn hash_query(query: &SpatialQuery) -> u64 {
        // f64 envelopes rule out a derived Hash
        let mut hasher = DefaultHasher::new();
        format!("{query:?}").hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for SearchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCache")
            .field("max_entries", &self.max_entries)
            .field("entries", &self.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(text: &str) -> SpatialQuery {
        SpatialQuery::text(text)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cache_hit() {
        let cache = SearchCache::new(100);
        cache.insert(&query("Title:a"), 1, ids(&["r1", "r2"]));

        assert_eq!(cache.get(&query("Title:a"), 1), Some(ids(&["r1", "r2"])));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_cache_miss() {
        let cache = SearchCache::new(100);
        assert_eq!(cache.get(&query("Title:a"), 1), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_newer_generation_is_stale() {
        let cache = SearchCache::new(100);
        cache.insert(&query("Title:a"), 1, ids(&["r1"]));

        assert_eq!(cache.get(&query("Title:a"), 2), None);
        let stats = cache.stats();
        assert_eq!(stats.stale, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[test]
    fn test_colliding_key_is_not_served_for_another_query() {
        let cache = SearchCache::new(100);
        cache.insert_keyed(7, &query("Title:a"), 1, ids(&["r1"]));

        assert_eq!(cache.get_keyed(7, &query("Title:b"), 1), None);
        assert_eq!(cache.get_keyed(7, &query("Title:a"), 1), Some(ids(&["r1"])));

        // the later query takes the slot over
        cache.insert_keyed(7, &query("Title:b"), 1, ids(&["r2"]));
        assert_eq!(cache.get_keyed(7, &query("Title:b"), 1), Some(ids(&["r2"])));
        assert_eq!(cache.get_keyed(7, &query("Title:a"), 1), None);
        assert_eq!(cache.stats().entry_count, 1);
    }

    #[test]
    fn test_sort_is_part_of_the_key() {
        use crate::search::SortSpec;
        let cache = SearchCache::new(100);
        let sorted = query("Title:a").with_sort(Some(SortSpec {
            term: "Title".into(),
            ascending: false,
        }));
        cache.insert(&query("Title:a"), 1, ids(&["a", "b"]));
        cache.insert(&sorted, 1, ids(&["b", "a"]));

        assert_eq!(cache.get(&query("Title:a"), 1), Some(ids(&["a", "b"])));
        assert_eq!(cache.get(&sorted, 1), Some(ids(&["b", "a"])));
    }

    #[test]
    fn test_hit_rate() {
        let cache = SearchCache::new(100);
        cache.insert(&query("Title:a"), 1, ids(&["r1"]));

        cache.get(&query("Title:a"), 1);
        cache.get(&query("Title:a"), 1);
        cache.get(&query("Title:a"), 1);
        cache.get(&query("Title:b"), 1);

        let stats = cache.stats();
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_rate - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_eviction_oldest() {
        let cache = SearchCache::new(3);
        for n in 1..=3 {
            cache.insert(&query(&format!("n:{n}")), 1, ids(&["k"]));
        }
        assert_eq!(cache.stats().entry_count, 3);

        cache.insert(&query("n:4"), 1, ids(&["k4"]));
        assert_eq!(cache.stats().entry_count, 3);
        assert!(cache.get(&query("n:1"), 1).is_none());
        assert!(cache.get(&query("n:4"), 1).is_some());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = SearchCache::new(0);
        cache.insert(&query("Title:a"), 1, ids(&["r1"]));
        assert!(cache.get(&query("Title:a"), 1).is_none());
        assert_eq!(cache.stats().entry_count, 0);
        assert_eq!(cache.stats().misses, 0);
    }
}
