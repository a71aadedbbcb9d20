//! Named dictionaries, enum tables and custom translators.
//!
//! Registration overwrites: the last mapping registered under a name wins.
//! Lookups hand out `Arc`s, so a translation in flight keeps the mapping it
//! started with even if the name is re-registered concurrently. Register during
//! initialisation; registering while records are being translated is memory
//! safe but gives no ordering guarantee between the two.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::backends::Translator;

/// Flat code → label mapping.
pub type Dict = HashMap<String, String>;

#[derive(Default)]
pub struct Registry {
    dicts: RwLock<HashMap<String, Arc<Dict>>>,
    enums: RwLock<HashMap<String, Arc<Dict>>>,
    translators: RwLock<HashMap<String, Arc<dyn Translator>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_dict<I, K, V>(&self, name: &str, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.dicts.write().insert(name.to_string(), Arc::new(collect(mapping)));
    }

    pub fn dict(&self, name: &str) -> Option<Arc<Dict>> {
        self.dicts.read().get(name).cloned()
    }

    pub fn register_enum<I, K, V>(&self, name: &str, mapping: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.enums.write().insert(name.to_string(), Arc::new(collect(mapping)));
    }

    pub fn enum_table(&self, name: &str) -> Option<Arc<Dict>> {
        self.enums.read().get(name).cloned()
    }

    pub fn register_translator(&self, tag: &str, translator: Arc<dyn Translator>) {
        self.translators.write().insert(tag.to_string(), translator);
    }

    pub fn translator(&self, tag: &str) -> Option<Arc<dyn Translator>> {
        self.translators.read().get(tag).cloned()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("dicts", &self.dicts.read().keys().collect::<Vec<_>>())
            .field("enums", &self.enums.read().keys().collect::<Vec<_>>())
            .field("translators", &self.translators.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

fn collect<I, K, V>(mapping: I) -> Dict
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    mapping.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
