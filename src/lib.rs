extern crate self as dict_trans;

#[macro_use]
mod macros;
mod api;
mod backends;
mod config;
mod engine;
mod error;
mod memory_cache;
mod record;
mod registry;
mod table_config;
mod unwrap;

pub use api::{
    batch_translate, clear_cache, default_engine, get_dict, get_enum, register_db_query, register_dict,
    register_dict_table_query, register_dict_table_two_query, register_enum, register_translator, register_unwrapper,
    set_cache_enabled, translate, translate_slice,
};
pub use backends::{
    DbQuery, DbTranslator, DictQuery, DictTableTranslator, EnumTranslator, FnTranslator, MemoryDictTranslator,
    QueryBackend, ResultCache, TableDictSource, Translator, TwoTableDictSource, translator_fn,
};
pub use config::{CacheConfig, Config, PerformanceConfig};
pub use engine::{DbTarget, Engine};
pub use error::{Backend, BoxError, Error, Result};
pub use memory_cache::{Cache, MemoryCache};
pub use record::{AsSlot, Entry, FieldDef, FieldValue, Slot, Translatable};
pub use registry::{Dict, Registry};
pub use table_config::{SqlExecutor, StatusField, TableConfig, TableFields};
