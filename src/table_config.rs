//! Declarative shape of dictionary tables and the SQL built from it.
//!
//! The engine itself never runs SQL. These builders feed the store adapters
//! (`TableDictSource`, `TwoTableDictSource`), which hand the statements to a
//! host-provided [`SqlExecutor`]. Statements use `?` placeholders; arguments
//! are returned positionally.
//!
//! ```text
//! build_query("sex")                 SELECT dict_value FROM sys_dict WHERE dict_type = ? AND status = ?
//! build_query_with_key("sex", "1")   ... WHERE dict_type = ? AND dict_key = ? AND status = ?
//! build_type_check_query("sex")      SELECT COUNT(1) FROM sys_dict_type WHERE dict_type_code = ? AND status = ?
//! ```

use serde::Deserialize;

use crate::error::BoxError;

/// Executes statements produced by [`TableConfig`] against a real store.
pub trait SqlExecutor: Send + Sync {
    /// First column of the first row, or `None` when no row matched.
    fn query_value(&self, sql: &str, args: &[String]) -> Result<Option<String>, BoxError>;

    /// Single integer result of a `COUNT` statement.
    fn query_count(&self, sql: &str, args: &[String]) -> Result<i64, BoxError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableConfig {
    pub table_name: String,
    pub fields: TableFields,
    #[serde(default)]
    pub status_field: Option<StatusField>,
    #[serde(default)]
    pub sort_field: Option<String>,
}

/// Column names. Empty names are left out of the generated `WHERE` clause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableFields {
    pub type_field: String,
    pub key_field: String,
    pub value_field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusField {
    pub field_name: String,
    pub enabled_value: String,
    pub disabled_value: String,
}

impl Default for StatusField {
    fn default() -> Self {
        StatusField { field_name: "status".into(), enabled_value: "1".into(), disabled_value: "0".into() }
    }
}

impl TableConfig {
    /// Single dictionary table: `dict_type`, `dict_key`, `dict_value`, `status`.
    pub fn default_single(table_name: &str) -> Self {
        TableConfig {
            table_name: table_name.to_string(),
            fields: TableFields {
                type_field: "dict_type".into(),
                key_field: "dict_key".into(),
                value_field: "dict_value".into(),
            },
            status_field: Some(StatusField::default()),
            sort_field: None,
        }
    }

    /// Type table of a two-table dictionary. It has no key column.
    pub fn default_dict_type(table_name: &str) -> Self {
        TableConfig {
            table_name: table_name.to_string(),
            fields: TableFields {
                type_field: "dict_type_code".into(),
                key_field: String::new(),
                value_field: "dict_type_name".into(),
            },
            status_field: Some(StatusField::default()),
            sort_field: None,
        }
    }

    /// Data table of a two-table dictionary.
    pub fn default_dict_data(table_name: &str) -> Self {
        TableConfig {
            table_name: table_name.to_string(),
            fields: TableFields {
                type_field: "dict_type_code".into(),
                key_field: "dict_key".into(),
                value_field: "dict_value".into(),
            },
            status_field: Some(StatusField::default()),
            sort_field: None,
        }
    }

    /// All values of one dictionary type.
    pub fn build_query(&self, dict_type: &str) -> (String, Vec<String>) {
        let mut query = format!("SELECT {} FROM {}", self.fields.value_field, self.table_name);
        let mut clauses = Clauses::default();
        clauses.push(&self.fields.type_field, dict_type);
        self.push_status(&mut clauses);
        let args = clauses.finish(&mut query);

        if let Some(sort) = self.sort_field.as_deref().filter(|s| !s.is_empty()) {
            query.push_str(" ORDER BY ");
            query.push_str(sort);
        }
        (query, args)
    }

    /// The value of one key within a dictionary type.
    pub fn build_query_with_key(&self, dict_type: &str, dict_key: &str) -> (String, Vec<String>) {
        let mut query = format!("SELECT {} FROM {}", self.fields.value_field, self.table_name);
        let mut clauses = Clauses::default();
        clauses.push(&self.fields.type_field, dict_type);
        clauses.push(&self.fields.key_field, dict_key);
        self.push_status(&mut clauses);
        let args = clauses.finish(&mut query);
        (query, args)
    }

    /// Counts enabled rows of a dictionary type.
    pub fn build_type_check_query(&self, dict_type_code: &str) -> (String, Vec<String>) {
        let mut query = format!("SELECT COUNT(1) FROM {}", self.table_name);
        let mut clauses = Clauses::default();
        clauses.push(&self.fields.type_field, dict_type_code);
        self.push_status(&mut clauses);
        let args = clauses.finish(&mut query);
        (query, args)
    }

    fn push_status(&self, clauses: &mut Clauses) {
        if let Some(status) = &self.status_field {
            clauses.push(&status.field_name, &status.enabled_value);
        }
    }
}

#[derive(Default)]
struct Clauses {
    columns: Vec<String>,
    args: Vec<String>,
}

impl Clauses {
    fn push(&mut self, column: &str, arg: &str) {
        if column.is_empty() {
            return;
        }
        self.columns.push(format!("{column} = ?"));
        self.args.push(arg.to_string());
    }

    fn finish(self, query: &mut String) -> Vec<String> {
        if !self.columns.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.columns.join(" AND "));
        }
        self.args
    }
}
