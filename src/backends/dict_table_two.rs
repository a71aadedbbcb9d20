use super::DictQuery;
use crate::error::BoxError;
use crate::table_config::{SqlExecutor, TableConfig};

/// Ready-made [`DictQuery`] over a type table plus a data table.
///
/// A lookup first checks that the dictionary type exists and is enabled in the
/// type table; an unknown type resolves to an empty label without touching the
/// data table.
#[derive(Debug)]
pub struct TwoTableDictSource<E> {
    executor: E,
    type_table: TableConfig,
    data_table: TableConfig,
}

impl<E: SqlExecutor> TwoTableDictSource<E> {
    /// Adapter over `sys_dict_type` and `sys_dict_data` with the default columns.
    pub fn new(executor: E) -> Self {
        Self::with_config(
            executor,
            TableConfig::default_dict_type("sys_dict_type"),
            TableConfig::default_dict_data("sys_dict_data"),
        )
    }

    pub fn with_config(executor: E, type_table: TableConfig, data_table: TableConfig) -> Self {
        TwoTableDictSource { executor, type_table, data_table }
    }
}

impl<E: SqlExecutor> DictQuery for TwoTableDictSource<E> {
    fn query_dict(&self, dict_type: &str, dict_key: &str) -> Result<String, BoxError> {
        let (sql, args) = self.type_table.build_type_check_query(dict_type);
        if self.executor.query_count(&sql, &args)? == 0 {
            tracing::trace!(dict_type, "dictionary type missing or disabled");
            return Ok(String::new());
        }

        let (sql, args) = self.data_table.build_query_with_key(dict_type, dict_key);
        Ok(self.executor.query_value(&sql, &args)?.unwrap_or_default())
    }
}
