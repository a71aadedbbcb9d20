use std::sync::Arc;

use super::{QueryBackend, Translator};
use crate::engine::DbTarget;
use crate::error::BoxError;
use crate::{FieldValue, Result};

/// Host-supplied lookup for `db` tags: `SELECT value_field FROM table WHERE key_field = key`.
pub trait DbQuery: Send + Sync {
    fn query(&self, table: &str, key_field: &str, value_field: &str, key: &FieldValue) -> Result<String, BoxError>;
}

impl<F> DbQuery for F
where
    F: Fn(&str, &str, &str, &FieldValue) -> Result<String, BoxError> + Send + Sync,
{
    fn query(&self, table: &str, key_field: &str, value_field: &str, key: &FieldValue) -> Result<String, BoxError> {
        self(table, key_field, value_field, key)
    }
}

/// A `db` tag bound to its parsed target.
#[derive(Debug)]
pub struct DbTranslator {
    backend: Arc<QueryBackend<dyn DbQuery>>,
    target: DbTarget,
}

impl DbTranslator {
    pub fn new(backend: Arc<QueryBackend<dyn DbQuery>>, target: DbTarget) -> Self {
        DbTranslator { backend, target }
    }
}

impl Translator for DbTranslator {
    fn translate(&self, value: &FieldValue, _field: &str, _tag: &str) -> Result<String> {
        let DbTarget { table, key_field, value_field } = &self.target;
        self.backend.lookup(self.target.cache_key(value), |db| db.query(table, key_field, value_field, value))
    }
}
