use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::batch;
use super::plan::{Binder, PlanCache};
use super::traverse::Walker;
use crate::backends::{
    DbQuery, DictQuery, EnumTranslator, MemoryDictTranslator, QueryBackend, ResultCache, Translator,
};
use crate::config::Config;
use crate::error::{Backend, Error, Result};
use crate::record::{Entry, Slot};
use crate::registry::{Dict, Registry};
use crate::unwrap::{FnUnwrapper, Unwrapper};

/// A self-contained translation engine.
///
/// Holds its own dictionaries, enum tables, custom translators, DB query
/// functions, result caches, type plans and unwrappers. Instances share
/// nothing with each other or with the process-wide default used by the
/// top-level functions.
pub struct Engine {
    binder: Binder,
    plans: PlanCache,
    unwrappers: RwLock<HashMap<TypeId, Arc<dyn Unwrapper>>>,
    config: Config,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// `config.cache.enabled` is the initial state of all three DB result caches.
    pub fn with_config(config: Config) -> Self {
        let registry = Arc::new(Registry::new());
        let cache_enabled = config.cache.enabled;
        let binder = Binder {
            memory: Arc::new(MemoryDictTranslator::new(registry.clone())),
            enums: Arc::new(EnumTranslator::new(registry.clone())),
            db: Arc::new(QueryBackend::new(Backend::Db, cache_enabled)),
            dict_table: Arc::new(QueryBackend::new(Backend::DictTable, cache_enabled)),
            dict_table_two: Arc::new(QueryBackend::new(Backend::DictTableTwo, cache_enabled)),
            registry,
        };
        Engine { binder, plans: PlanCache::default(), unwrappers: RwLock::new(HashMap::new()), config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.binder.registry
    }

    // --- Translation ---------------------------------------------------------

    /// Translate a record, a pointer to one, or a sequence of them, in place.
    pub fn translate<'a>(&self, entry: impl Into<Entry<'a>>) -> Result<()> {
        match self.resolve(entry.into())? {
            Slot::Sequence(items) => self.walker().sequence(items),
            slot => {
                let kind = slot.kind();
                let record = slot.into_record().ok_or(Error::NotStruct(kind))?;
                self.walker().record(record)
            }
        }
    }

    /// Translate every record of a sequence, in order.
    pub fn translate_slice<'a>(&self, entry: impl Into<Entry<'a>>) -> Result<()> {
        match self.resolve(entry.into())? {
            Slot::Sequence(items) => self.walker().sequence(items),
            other => Err(Error::NotSlice(other.kind())),
        }
    }

    /// Like [`translate_slice`](Self::translate_slice), optionally spreading
    /// large sequences over worker threads.
    pub fn batch_translate<'a>(&self, entry: impl Into<Entry<'a>>, parallel: bool) -> Result<()> {
        match self.resolve(entry.into())? {
            Slot::Sequence(items) => batch::run(&self.walker(), items, parallel, &self.config.performance),
            other => Err(Error::NotSlice(other.kind())),
        }
    }

    fn walker(&self) -> Walker<'_> {
        Walker { plans: &self.plans, binder: &self.binder }
    }

    fn resolve<'a>(&self, entry: Entry<'a>) -> Result<Slot<'a>> {
        match entry {
            Entry::Owned(kind) => Err(Error::NotPointer(kind)),
            Entry::Slot(slot) => Ok(slot),
            Entry::Wrapped(value) => {
                let unwrapper = self.unwrappers.read().get(&Any::type_id(&*value)).cloned();
                unwrapper.and_then(|unwrapper| unwrapper.unwrap(value)).ok_or(Error::NotStruct("unregistered wrapper"))
            }
        }
    }

    // --- Registration --------------------------------------------------------

    pub fn register_dict<I, K, V>(&self, name: &str, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.binder.registry.register_dict(name, mapping);
    }

    pub fn dict(&self, name: &str) -> Option<Arc<Dict>> {
        self.binder.registry.dict(name)
    }

    pub fn register_enum<I, K, V>(&self, name: &str, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.binder.registry.register_enum(name, mapping);
    }

    pub fn enum_table(&self, name: &str) -> Option<Arc<Dict>> {
        self.binder.registry.enum_table(name)
    }

    /// Register a translator for `translate:"tag"` fields.
    ///
    /// Only types whose plan is built afterwards pick it up.
    pub fn register_translator(&self, tag: &str, translator: impl Translator + 'static) {
        self.binder.registry.register_translator(tag, Arc::new(translator));
    }

    pub fn register_db_query(&self, query: impl DbQuery + 'static) {
        self.binder.db.register(Arc::new(query));
    }

    pub fn register_dict_table_query(&self, query: impl DictQuery + 'static) {
        self.binder.dict_table.register(Arc::new(query));
    }

    pub fn register_dict_table_two_query(&self, query: impl DictQuery + 'static) {
        self.binder.dict_table_two.register(Arc::new(query));
    }

    /// Teach the engine to look inside `T` when it is passed as [`Entry::wrapped`].
    pub fn register_unwrapper<T, F>(&self, f: F)
    where
        T: Any,
        F: for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync + 'static,
    {
        self.unwrappers.write().insert(TypeId::of::<T>(), Arc::new(FnUnwrapper::new(f)));
    }

    // --- Result caches -------------------------------------------------------

    pub fn result_cache(&self, backend: Backend) -> &ResultCache {
        match backend {
            Backend::Db => self.binder.db.cache(),
            Backend::DictTable => self.binder.dict_table.cache(),
            Backend::DictTableTwo => self.binder.dict_table_two.cache(),
        }
    }

    pub fn set_db_cache_enabled(&self, enabled: bool) {
        self.result_cache(Backend::Db).set_enabled(enabled);
    }

    pub fn clear_db_cache(&self) {
        self.result_cache(Backend::Db).clear();
    }

    pub fn set_dict_table_cache_enabled(&self, enabled: bool) {
        self.result_cache(Backend::DictTable).set_enabled(enabled);
    }

    pub fn clear_dict_table_cache(&self) {
        self.result_cache(Backend::DictTable).clear();
    }

    pub fn set_dict_table_two_cache_enabled(&self, enabled: bool) {
        self.result_cache(Backend::DictTableTwo).set_enabled(enabled);
    }

    pub fn clear_dict_table_two_cache(&self) {
        self.result_cache(Backend::DictTableTwo).clear();
    }

    /// Number of record types with a built plan.
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.binder.registry)
            .field("db", &self.binder.db)
            .field("dict_table", &self.binder.dict_table)
            .field("dict_table_two", &self.binder.dict_table_two)
            .field("plans", &self.plans.len())
            .field("unwrappers", &self.unwrappers.read().len())
            .field("config", &self.config)
            .finish()
    }
}
