use std::sync::Arc;

use super::Translator;
use crate::registry::Registry;
use crate::{Error, FieldValue, Result};

/// `enum:"name"` lookups. Keys are strings or the decimal form of an integer.
#[derive(Debug, Clone)]
pub struct EnumTranslator {
    registry: Arc<Registry>,
}

impl EnumTranslator {
    pub fn new(registry: Arc<Registry>) -> Self {
        EnumTranslator { registry }
    }
}

impl Translator for EnumTranslator {
    fn translate(&self, value: &FieldValue, _field: &str, tag: &str) -> Result<String> {
        let table = self.registry.enum_table(tag).ok_or_else(|| Error::EnumNotFound(tag.to_string()))?;

        let key = match value {
            FieldValue::Str(s) => s.clone(),
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Uint(v) => v.to_string(),
            other => return Err(Error::UnsupportedValueKind(other.kind())),
        };

        Ok(table.get(&key).cloned().unwrap_or_default())
    }
}
