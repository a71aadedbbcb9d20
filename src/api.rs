//! Process-wide convenience functions.
//!
//! Each function forwards to a lazily created default [`Engine`]. Hosts that
//! need isolation (tests, several tenants in one process) should create their
//! own `Engine` instead; nothing here is shared with such instances.

use std::any::Any;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::backends::{DbQuery, DictQuery, Translator};
use crate::engine::Engine;
use crate::error::{Backend, Result};
use crate::record::{Entry, Slot};
use crate::registry::Dict;

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::new);

/// The engine behind the top-level functions.
pub fn default_engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

pub fn translate<'a>(entry: impl Into<Entry<'a>>) -> Result<()> {
    DEFAULT_ENGINE.translate(entry)
}

pub fn translate_slice<'a>(entry: impl Into<Entry<'a>>) -> Result<()> {
    DEFAULT_ENGINE.translate_slice(entry)
}

pub fn batch_translate<'a>(entry: impl Into<Entry<'a>>, parallel: bool) -> Result<()> {
    DEFAULT_ENGINE.batch_translate(entry, parallel)
}

pub fn register_dict<I, K, V>(name: &str, mapping: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    DEFAULT_ENGINE.register_dict(name, mapping);
}

pub fn get_dict(name: &str) -> Option<Arc<Dict>> {
    DEFAULT_ENGINE.dict(name)
}

pub fn register_enum<I, K, V>(name: &str, mapping: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    DEFAULT_ENGINE.register_enum(name, mapping);
}

pub fn get_enum(name: &str) -> Option<Arc<Dict>> {
    DEFAULT_ENGINE.enum_table(name)
}

pub fn register_translator(tag: &str, translator: impl Translator + 'static) {
    DEFAULT_ENGINE.register_translator(tag, translator);
}

pub fn register_db_query(query: impl DbQuery + 'static) {
    DEFAULT_ENGINE.register_db_query(query);
}

pub fn register_dict_table_query(query: impl DictQuery + 'static) {
    DEFAULT_ENGINE.register_dict_table_query(query);
}

pub fn register_dict_table_two_query(query: impl DictQuery + 'static) {
    DEFAULT_ENGINE.register_dict_table_two_query(query);
}

pub fn register_unwrapper<T, F>(f: F)
where
    T: Any,
    F: for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync + 'static,
{
    DEFAULT_ENGINE.register_unwrapper::<T, F>(f);
}

/// Enable or disable the result cache of one DB backend flavour.
pub fn set_cache_enabled(backend: Backend, enabled: bool) {
    DEFAULT_ENGINE.result_cache(backend).set_enabled(enabled);
}

pub fn clear_cache(backend: Backend) {
    DEFAULT_ENGINE.result_cache(backend).clear();
}
