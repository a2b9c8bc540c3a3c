//! Markup caching
//!
//! Bounded in-memory store for fetched markup, shared across views.

use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

use lru::LruCache;

/// Default number of cached documents.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,

    /// Number of cache misses
    pub misses: u64,

    /// Current number of cached documents
    pub count: usize,
}

impl CacheStats {
    /// Get the hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Bounded key → markup store with insertion-order eviction.
///
/// Keys are raw location strings; no normalization is applied, so two
/// spellings of one address occupy two entries. Reads go through `peek`
/// and never promote an entry, so a full cache evicts the oldest-inserted
/// key rather than the least recently used one.
pub struct MarkupCache {
    entries: LruCache<String, String>,

    /// Cache statistics
    stats: CacheStats,
}

impl MarkupCache {
    /// Create a new cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap()),
            ),
            stats: CacheStats::default(),
        }
    }

    /// Get cached markup without promoting the entry
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.peek(key).cloned()
    }

    /// Insert markup, evicting the oldest-inserted entry when full
    pub fn set(&mut self, key: impl Into<String>, markup: impl Into<String>) {
        self.entries.put(key.into(), markup.into());
        self.stats.count = self.entries.len();
    }

    /// Check whether a key is cached
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Remove a single entry
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.pop(key).is_some();
        self.stats.count = self.entries.len();
        removed
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.count = 0;
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    /// Record a cache hit
    pub fn record_hit(&mut self) {
        self.stats.hits += 1;
    }

    /// Record a cache miss
    pub fn record_miss(&mut self) {
        self.stats.misses += 1;
    }
}

impl Default for MarkupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Cache handle shared by every view wired to the same store.
pub type SharedMarkupCache = Arc<RwLock<MarkupCache>>;

/// Create a shared cache with the given capacity.
pub fn shared_cache(capacity: usize) -> SharedMarkupCache {
    Arc::new(RwLock::new(MarkupCache::new(capacity)))
}
