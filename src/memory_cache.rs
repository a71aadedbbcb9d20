//! Stand-alone key/value cache with optional per-entry expiry.
//!
//! Nothing in the translation path depends on it; hosts use it to hold
//! expensive lookups (for example a whole dictionary table) between calls.
//! Capacity is bounded by recency: when full, the least recently used entry
//! is evicted. Expired entries are dropped the moment they are read, or in
//! bulk through [`MemoryCache::purge_expired`].

use std::num::NonZeroUsize;

use chrono::{DateTime, TimeDelta, Utc};
use lru::LruCache;
use parking_lot::Mutex;

use crate::config::CacheConfig;

pub trait Cache<V>: Send + Sync {
    fn get(&self, key: &str) -> Option<V>;

    /// Store `value`; `ttl_secs == 0` never expires.
    fn set(&self, key: &str, value: V, ttl_secs: u64);

    fn delete(&self, key: &str);

    fn clear(&self);
}

struct Item<V> {
    value: V,
    expires_at: Option<DateTime<Utc>>,
}

impl<V> Item<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

pub struct MemoryCache<V = String> {
    items: Mutex<LruCache<String, Item<V>>>,
    default_ttl_secs: u64,
}

impl<V: Clone + Send> MemoryCache<V> {
    /// Cache holding at most `max_entries` items; 0 means unbounded.
    pub fn new(max_entries: usize) -> Self {
        let items = match NonZeroUsize::new(max_entries) {
            Some(cap) => LruCache::new(cap),
            None => LruCache::unbounded(),
        };
        MemoryCache { items: Mutex::new(items), default_ttl_secs: 0 }
    }

    /// Capacity and default lifetime taken from `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        MemoryCache { default_ttl_secs: config.ttl_secs, ..Self::new(config.max_entries) }
    }

    /// Store `value` with the configured default lifetime.
    pub fn set_default(&self, key: &str, value: V) {
        self.set(key, value, self.default_ttl_secs);
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut items = self.items.lock();
        let expired: Vec<String> =
            items.iter().filter(|(_, item)| item.is_expired(now)).map(|(key, _)| key.clone()).collect();
        for key in &expired {
            items.pop(key);
        }
        expired.len()
    }

    /// Live and not-yet-purged entries.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, key: &str, value: V, expires_at: Option<DateTime<Utc>>) {
        self.items.lock().put(key.to_string(), Item { value, expires_at });
    }
}

impl<V: Clone + Send> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut items = self.items.lock();
        let item = items.get(key)?;
        if item.is_expired(Utc::now()) {
            items.pop(key);
            return None;
        }
        Some(item.value.clone())
    }

    fn set(&self, key: &str, value: V, ttl_secs: u64) {
        let expires_at = match ttl_secs {
            0 => None,
            secs => i64::try_from(secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .and_then(|ttl| Utc::now().checked_add_signed(ttl)),
        };
        self.insert(key, value, expires_at);
    }

    fn delete(&self, key: &str) {
        self.items.lock().pop(key);
    }

    fn clear(&self) {
        self.items.lock().clear();
    }
}

impl<V> std::fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("len", &self.items.lock().len())
            .field("default_ttl_secs", &self.default_ttl_secs)
            .finish()
    }
}
