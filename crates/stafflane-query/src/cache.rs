//! Process-wide result cache, one instance per endpoint configuration.
//!
//! Keys are the normalized request parameters under a per-configuration
//! prefix, so all requests for the same configuration share entries. Uses
//! DashMap for concurrent access; the read-check-write sequence never
//! corrupts the map, and a duplicate execution racing on a miss is
//! acceptable (no singleflight).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use dashmap::DashMap;

use crate::config::CachePolicy;
use crate::page::Page;
use stafflane_core::EntityRecord;

pub type CachedPage = Page<EntityRecord>;

struct CacheEntry {
    page: CachedPage,
    inserted_at: Instant,
    seq: u64,
}

/// Cache statistics for monitoring.
#[derive(Debug, Default)]
struct CacheStatistics {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    insertions: AtomicU64,
}

/// A point-in-time snapshot of cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
    pub size: usize,
}

/// TTL-bounded result cache with coarse bulk eviction.
///
/// When the map is full, the oldest half of the entries (by insertion
/// sequence) is evicted in one O(n) pass before the new entry goes in.
/// Deliberately not a precise LRU; recency of access is never tracked.
pub struct ResultCache {
    entries: DashMap<String, CacheEntry>,
    policy: CachePolicy,
    seq: AtomicU64,
    stats: CacheStatistics,
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("enabled", &self.policy.enabled)
            .field("size", &self.entries.len())
            .field("max_entries", &self.policy.max_entries)
            .field("ttl", &self.policy.ttl)
            .finish()
    }
}

impl ResultCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            seq: AtomicU64::new(0),
            stats: CacheStatistics::default(),
        }
    }

    /// Create a disabled cache (no-op).
    pub fn disabled() -> Self {
        Self::new(CachePolicy::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.enabled
    }

    /// Deterministic key for a normalized parameter set.
    pub fn key(&self, parts: &[(String, String)]) -> String {
        let joined: Vec<String> = parts
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{}:{}", self.policy.key_prefix, joined.join("&"))
    }

    /// Look up a fresh entry. A stale entry counts as a miss and is
    /// removed by the lookup that observed it; there is no background
    /// sweeper.
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        if !self.policy.enabled {
            return None;
        }

        if let Some(entry) = self.entries.get(key) {
            if entry.inserted_at.elapsed() >= self.policy.ttl {
                drop(entry); // release read lock before removing
                self.entries.remove(key);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            return Some(entry.page.clone());
        }

        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: String, page: CachedPage) {
        if !self.policy.enabled {
            return;
        }

        if self.entries.len() >= self.policy.max_entries {
            self.evict_oldest_half();
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            CacheEntry {
                page,
                inserted_at: Instant::now(),
                seq,
            },
        );
        self.stats.insertions.fetch_add(1, Ordering::Relaxed);
    }

    fn evict_oldest_half(&self) {
        let mut by_age: Vec<(String, u64)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.seq))
            .collect();
        by_age.sort_by_key(|(_, seq)| *seq);

        let half = (by_age.len() / 2).max(1);
        for (key, _) in by_age.into_iter().take(half) {
            self.entries.remove(&key);
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits.load(Ordering::Relaxed),
            misses: self.stats.misses.load(Ordering::Relaxed),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            insertions: self.stats.insertions.load(Ordering::Relaxed),
            size: self.entries.len(),
        }
    }
}
