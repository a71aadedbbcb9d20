//! Cache-then-query protocol shared by the DB-flavoured backends.
//!
//! ```text
//! lookup(key) ─ cache enabled? ── hit ──────────────────────────> label
//!                    │ miss / disabled
//!                    v
//!              query fn registered? ── no ──> TranslatorNotRegistered
//!                    │ yes
//!                    v
//!              run query ── Err ──> QueryFailed { backend, source }
//!                    │ Ok(label)
//!                    v
//!              cache enabled && !label.is_empty() ──> store
//! ```
//!
//! Disabling the cache suppresses both reads and writes but keeps existing
//! entries; only [`ResultCache::clear`] drops them.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::error::{Backend, BoxError, Error, Result};

/// Per-backend label cache with no expiry.
#[derive(Debug)]
pub struct ResultCache {
    entries: RwLock<HashMap<String, String>>,
    enabled: AtomicBool,
}

impl ResultCache {
    pub fn new(enabled: bool) -> Self {
        ResultCache { entries: RwLock::new(HashMap::new()), enabled: AtomicBool::new(enabled) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// Cached label, or `None` when missing or while the cache is disabled.
    pub fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        self.entries.read().get(key).cloned()
    }

    /// Store a label. Empty labels and writes while disabled are dropped.
    pub fn insert(&self, key: String, label: &str) {
        if !self.is_enabled() || label.is_empty() {
            return;
        }
        self.entries.write().insert(key, label.to_string());
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A registered query function plus its result cache.
pub struct QueryBackend<Q: ?Sized> {
    backend: Backend,
    query: RwLock<Option<Arc<Q>>>,
    cache: ResultCache,
}

impl<Q: ?Sized> QueryBackend<Q> {
    pub fn new(backend: Backend, cache_enabled: bool) -> Self {
        QueryBackend { backend, query: RwLock::new(None), cache: ResultCache::new(cache_enabled) }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Install (or replace) the query function.
    pub fn register(&self, query: Arc<Q>) {
        *self.query.write() = Some(query);
    }

    pub fn is_registered(&self) -> bool {
        self.query.read().is_some()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Serve `cache_key` from cache or run `run` against the registered query.
    pub fn lookup(&self, cache_key: String, run: impl FnOnce(&Q) -> Result<String, BoxError>) -> Result<String> {
        if let Some(label) = self.cache.get(&cache_key) {
            tracing::trace!(backend = %self.backend, key = %cache_key, "result cache hit");
            return Ok(label);
        }

        let query = self.query.read().clone().ok_or(Error::TranslatorNotRegistered(self.backend))?;
        let label = run(&*query).map_err(|source| Error::QueryFailed { backend: self.backend, source })?;
        tracing::trace!(backend = %self.backend, key = %cache_key, found = !label.is_empty(), "queried backend");

        self.cache.insert(cache_key, &label);
        Ok(label)
    }
}

impl<Q: ?Sized> std::fmt::Debug for QueryBackend<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBackend")
            .field("backend", &self.backend)
            .field("registered", &self.is_registered())
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    type Lookup = dyn Fn(&str) -> Result<String, BoxError> + Send + Sync;

    fn counting_backend(calls: Arc<AtomicUsize>) -> QueryBackend<Lookup> {
        let backend: QueryBackend<Lookup> = QueryBackend::new(Backend::Db, true);
        backend.register(Arc::new(move |key: &str| -> Result<String, BoxError> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(if key == "1" { "one".to_string() } else { String::new() })
        }));
        backend
    }

    #[test]
    fn second_lookup_is_served_from_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = counting_backend(calls.clone());

        assert_eq!(backend.lookup("k:1".into(), |q| q("1")).unwrap(), "one");
        assert_eq!(backend.lookup("k:1".into(), |q| q("1")).unwrap(), "one");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_labels_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = counting_backend(calls.clone());

        assert_eq!(backend.lookup("k:2".into(), |q| q("2")).unwrap(), "");
        assert_eq!(backend.lookup("k:2".into(), |q| q("2")).unwrap(), "");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(backend.cache().is_empty());
    }

    #[test]
    fn disabling_bypasses_without_evicting() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = counting_backend(calls.clone());

        backend.lookup("k:1".into(), |q| q("1")).unwrap();
        backend.cache().set_enabled(false);
        backend.lookup("k:1".into(), |q| q("1")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(backend.cache().len(), 1);

        backend.cache().set_enabled(true);
        backend.lookup("k:1".into(), |q| q("1")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        backend.cache().clear();
        backend.lookup("k:1".into(), |q| q("1")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn missing_query_function_is_reported() {
        let backend: QueryBackend<Lookup> = QueryBackend::new(Backend::DictTable, true);
        let err = backend.lookup("k".into(), |q| q("1")).unwrap_err();
        assert!(matches!(err, Error::TranslatorNotRegistered(Backend::DictTable)));
    }

    #[test]
    fn query_errors_are_wrapped_with_backend() {
        let backend: QueryBackend<Lookup> = QueryBackend::new(Backend::DictTableTwo, true);
        backend.register(Arc::new(|_: &str| -> Result<String, BoxError> { Err("timeout".into()) }));
        let err = backend.lookup("k".into(), |q| q("1")).unwrap_err();
        assert!(matches!(err, Error::QueryFailed { backend: Backend::DictTableTwo, .. }));
    }
}
