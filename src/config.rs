//! Engine tuning knobs.
//!
//! Defaults match what most hosts want; a host can deserialize a [`Config`]
//! from its own configuration file (every field is optional) or overlay the
//! `DICT_TRANS_*` environment variables with [`Config::from_env`].

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub performance: PerformanceConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Minimum batch length before the parallel path is taken.
    pub parallel_threshold: usize,
    /// Upper bound on batch worker threads.
    pub max_workers: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig { parallel_threshold: 10, max_workers: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Initial state of the DB result caches.
    pub enabled: bool,
    /// Default entry lifetime for [`MemoryCache`](crate::MemoryCache); 0 never expires.
    pub ttl_secs: u64,
    /// Capacity of [`MemoryCache`](crate::MemoryCache); 0 is unbounded.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { enabled: true, ttl_secs: 0, max_entries: 10_000 }
    }
}

const ENV_PARALLEL_THRESHOLD: &str = "DICT_TRANS_PARALLEL_THRESHOLD";
const ENV_MAX_WORKERS: &str = "DICT_TRANS_MAX_WORKERS";
const ENV_CACHE: &str = "DICT_TRANS_CACHE";
const ENV_CACHE_MAX_ENTRIES: &str = "DICT_TRANS_CACHE_MAX_ENTRIES";

impl Config {
    /// Defaults overlaid with any `DICT_TRANS_*` variables that are set.
    pub fn from_env() -> Result<Self> {
        Self::default().overlay(|name| std::env::var(name).ok())
    }

    fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = var(ENV_PARALLEL_THRESHOLD) {
            self.performance.parallel_threshold = parse_count(ENV_PARALLEL_THRESHOLD, &raw)?;
        }
        if let Some(raw) = var(ENV_MAX_WORKERS) {
            self.performance.max_workers = parse_count(ENV_MAX_WORKERS, &raw)?.max(1);
        }
        if let Some(raw) = var(ENV_CACHE) {
            self.cache.enabled = parse_switch(ENV_CACHE, &raw)?;
        }
        if let Some(raw) = var(ENV_CACHE_MAX_ENTRIES) {
            self.cache.max_entries = parse_count(ENV_CACHE_MAX_ENTRIES, &raw)?;
        }
        Ok(self)
    }
}

fn parse_count(name: &str, raw: &str) -> Result<usize> {
    raw.trim().parse().map_err(|_| Error::Config(format!("{name} must be a non-negative integer, got '{raw}'")))
}

fn parse_switch(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(Error::Config(format!("{name} must be 0/1/true/false, got '{raw}'"))),
    }
}
