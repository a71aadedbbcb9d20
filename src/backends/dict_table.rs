use std::sync::Arc;

use super::{QueryBackend, Translator};
use crate::error::BoxError;
use crate::table_config::{SqlExecutor, TableConfig};
use crate::{FieldValue, Result};

/// Host-supplied `(dictionary type, key) -> label` lookup.
///
/// Backs both `dictTable` and `dictTableTwo`; each tag has its own registered
/// function and result cache. An empty label means "no such entry".
pub trait DictQuery: Send + Sync {
    fn query_dict(&self, dict_type: &str, dict_key: &str) -> Result<String, BoxError>;
}

impl<F> DictQuery for F
where
    F: Fn(&str, &str) -> Result<String, BoxError> + Send + Sync,
{
    fn query_dict(&self, dict_type: &str, dict_key: &str) -> Result<String, BoxError> {
        self(dict_type, dict_key)
    }
}

/// A `dictTable`/`dictTableTwo` tag bound to its dictionary type.
#[derive(Debug)]
pub struct DictTableTranslator {
    backend: Arc<QueryBackend<dyn DictQuery>>,
    dict_type: String,
}

impl DictTableTranslator {
    pub fn new(backend: Arc<QueryBackend<dyn DictQuery>>, dict_type: impl Into<String>) -> Self {
        DictTableTranslator { backend, dict_type: dict_type.into() }
    }
}

impl Translator for DictTableTranslator {
    fn translate(&self, value: &FieldValue, _field: &str, _tag: &str) -> Result<String> {
        let key = value.to_string();
        self.backend.lookup(format!("{}:{}", self.dict_type, key), |q| q.query_dict(&self.dict_type, &key))
    }
}

/// Ready-made [`DictQuery`] over a single dictionary table.
///
/// Runs [`TableConfig::build_query_with_key`] through `executor`; a missing
/// row yields an empty label.
#[derive(Debug)]
pub struct TableDictSource<E> {
    executor: E,
    config: TableConfig,
}

impl<E: SqlExecutor> TableDictSource<E> {
    /// Adapter over `sys_dict` with the default column layout.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, TableConfig::default_single("sys_dict"))
    }

    pub fn with_config(executor: E, config: TableConfig) -> Self {
        TableDictSource { executor, config }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }
}

impl<E: SqlExecutor> DictQuery for TableDictSource<E> {
    fn query_dict(&self, dict_type: &str, dict_key: &str) -> Result<String, BoxError> {
        let (sql, args) = self.config.build_query_with_key(dict_type, dict_key);
        Ok(self.executor.query_value(&sql, &args)?.unwrap_or_default())
    }
}
