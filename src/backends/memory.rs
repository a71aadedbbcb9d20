use std::sync::Arc;

use super::Translator;
use crate::registry::Registry;
use crate::{FieldValue, Result};

/// `dict:"name"` lookups in the registry's in-memory dictionaries.
///
/// Lenient by contract: a non-string or empty source, an unknown dictionary or
/// an absent key all produce an empty label, never an error.
#[derive(Debug, Clone)]
pub struct MemoryDictTranslator {
    registry: Arc<Registry>,
}

impl MemoryDictTranslator {
    pub fn new(registry: Arc<Registry>) -> Self {
        MemoryDictTranslator { registry }
    }
}

impl Translator for MemoryDictTranslator {
    fn translate(&self, value: &FieldValue, _field: &str, tag: &str) -> Result<String> {
        let Some(key) = value.as_str().filter(|key| !key.is_empty()) else {
            return Ok(String::new());
        };
        let name = tag.split(',').next().unwrap_or(tag);
        let Some(dict) = self.registry.dict(name) else {
            return Ok(String::new());
        };
        Ok(dict.get(key).cloned().unwrap_or_default())
    }
}
