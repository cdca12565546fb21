//! A bounded, optionally expiring cache for validation results.
//!
//! Entries are evicted least-recently-accessed first once `max_size` is
//! exceeded. Both [`Cache::get`] and [`Cache::has`] count as an access.

use crate::error::{Result, ShapeError};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default maximum number of entries.
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Size and lifetime limits for a [`Cache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum number of entries kept
    pub max_size: usize,
    /// Time-to-live of an entry, measured from when it was set
    pub duration: Option<Duration>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            duration: None,
        }
    }
}

impl CacheOptions {
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    inserted: Instant,
    last_access: u64,
}

#[derive(Debug)]
struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Monotonic access counter ordering entries by recency
    tick: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> CacheState<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(cache.key = %key, "Evicting least recently used cache entry");
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }
}

/// Counters describing a cache's current contents and history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries currently stored, including expired ones not yet purged
    pub total_entries: usize,
    /// Stored entries past their time-to-live
    pub expired_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// A thread-safe LRU cache with an optional per-entry time-to-live.
///
/// # Examples
///
/// ```rust
/// use shape_guard::cache::{Cache, CacheOptions};
///
/// let cache = Cache::new(CacheOptions::default().with_max_size(2)).unwrap();
/// cache.set("foo", 1);
/// cache.set("bar", 2);
/// cache.set("baz", 3);
///
/// assert_eq!(cache.get("foo"), None);
/// assert_eq!(cache.get("bar"), Some(2));
/// assert_eq!(cache.get("baz"), Some(3));
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    options: CacheOptions,
    state: Mutex<CacheState<V>>,
}

impl<V: Clone> Cache<V> {
    /// Creates an empty cache. Fails if `max_size` is zero.
    pub fn new(options: CacheOptions) -> Result<Self> {
        if options.max_size == 0 {
            return Err(ShapeError::invalid_argument(
                "max_size",
                "cache must hold at least one entry",
            ));
        }
        Ok(Self {
            options,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        })
    }

    pub fn options(&self) -> CacheOptions {
        self.options
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        self.options
            .duration
            .map_or(false, |ttl| now.duration_since(entry.inserted) >= ttl)
    }

    /// Looks up `key`, refreshing its recency. Expired entries are removed
    /// and reported as missing.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            Some(entry) => self.is_expired(entry, now),
            None => {
                state.misses += 1;
                return None;
            }
        };
        if expired {
            state.entries.remove(key);
            state.misses += 1;
            return None;
        }
        let tick = state.next_tick();
        state.hits += 1;
        state.entries.get_mut(key).map(|entry| {
            entry.last_access = tick;
            entry.value.clone()
        })
    }

    /// Whether a live entry exists for `key`. Refreshes its recency.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            Some(entry) => self.is_expired(entry, now),
            None => return false,
        };
        if expired {
            state.entries.remove(key);
            return false;
        }
        let tick = state.next_tick();
        if let Some(entry) = state.entries.get_mut(key) {
            entry.last_access = tick;
        }
        true
    }

    /// Stores `value` under `key`, evicting the least recently used entry
    /// when the cache is full.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut state = self.lock();
        let tick = state.next_tick();
        state.entries.insert(
            key,
            CacheEntry {
                value,
                inserted: Instant::now(),
                last_access: tick,
            },
        );
        while state.entries.len() > self.options.max_size {
            state.evict_least_recent();
        }
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry.
    pub fn remove_expired(&self) {
        let now = Instant::now();
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !self.is_expired(entry, now));
        let removed = before - state.entries.len();
        if removed > 0 {
            debug!(cache.removed = removed, "Removed expired cache entries");
        }
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let state = self.lock();
        let expired_entries = state
            .entries
            .values()
            .filter(|entry| self.is_expired(entry, now))
            .count();
        CacheStats {
            total_entries: state.entries.len(),
            expired_entries,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(max_size: usize) -> Cache<i32> {
        Cache::new(CacheOptions::default().with_max_size(max_size)).unwrap()
    }

    #[test]
    fn test_cache_basic_operations() {
        let cache = cache(10);
        cache.set("key", 42);
        assert_eq!(cache.get("key"), Some(42));
        assert!(cache.has("key"));
        assert_eq!(cache.get("missing"), None);
        assert!(!cache.has("missing"));

        cache.set("key", 7);
        assert_eq!(cache.get("key"), Some(7));
        assert_eq!(cache.len(), 1);

        assert!(cache.delete("key"));
        assert!(!cache.delete("key"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_evicts_oldest_insert() {
        let cache = cache(2);
        cache.set("foo", 1);
        cache.set("bar", 2);
        cache.set("baz", 3);
        assert_eq!(cache.get("foo"), None);
        assert_eq!(cache.get("bar"), Some(2));
        assert_eq!(cache.get("baz"), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_get_and_has_refresh_recency() {
        let cache = cache(2);
        cache.set("foo", 1);
        cache.set("bar", 2);
        assert_eq!(cache.get("foo"), Some(1));
        cache.set("baz", 3);
        assert!(cache.has("foo"));
        assert!(!cache.has("bar"));

        assert!(cache.has("baz"));
        cache.set("qux", 4);
        assert!(!cache.has("foo"));
        assert!(cache.has("baz"));
    }

    #[test]
    fn test_cache_expiration() {
        let cache: Cache<i32> =
            Cache::new(CacheOptions::default().with_duration(Duration::from_millis(50))).unwrap();
        cache.set("key", 42);
        assert_eq!(cache.get("key"), Some(42));
        assert_eq!(cache.stats().expired_entries, 0);

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(cache.stats().expired_entries, 1);
        assert!(!cache.has("key"));
        assert_eq!(cache.get("key"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_expired() {
        let cache: Cache<i32> =
            Cache::new(CacheOptions::default().with_duration(Duration::from_millis(30))).unwrap();
        cache.set("a", 1);
        std::thread::sleep(Duration::from_millis(50));
        cache.set("b", 2);
        cache.remove_expired();
        assert_eq!(cache.len(), 1);
        assert!(cache.has("b"));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let result = Cache::<i32>::new(CacheOptions::default().with_max_size(0));
        assert!(matches!(result, Err(ShapeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let cache = cache(4);
        cache.set("a", 1);
        cache.get("a");
        cache.get("b");
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
