//! Lookup backends.
//!
//! Every backend implements the one [`Translator`] capability: given a field's
//! current value, its declared name and the tag argument, produce a label (an
//! empty label means "leave the target alone") or fail. The engine binds a
//! translator to each tagged field once, when the type plan is built, and never
//! looks at which backend it is afterwards.
//!
//! ```text
//!            Translator
//!   ┌──────────┬──────────┬───────────┬──────────────────────────────┐
//!   memory     enum       custom      db / dictTable / dictTableTwo
//!   (Registry) (Registry) (user fn)   QueryBackend = query fn + ResultCache
//! ```
//!
//! ## Responsibilities by module
//!
//! - `memory.rs`: `dict` tag, plain map lookup in the registry.
//! - `enums.rs`: `enum` tag, string/integer keys, strict about missing tables.
//! - `custom.rs`: `translate` tag, user functions passed through verbatim.
//! - `query.rs`: the shared cache-then-query protocol of DB-flavoured backends.
//! - `db.rs`: `db` tag, `(table, key field, value field, value)` queries.
//! - `dict_table.rs`: `dictTable`/`dictTableTwo` tags, `(type, key)` queries,
//!   plus the single-table store adapter.
//! - `dict_table_two.rs`: the two-table store adapter (type check, then data).

#[path = "backends/custom.rs"]
mod custom;
#[path = "backends/db.rs"]
mod db;
#[path = "backends/dict_table.rs"]
mod dict_table;
#[path = "backends/dict_table_two.rs"]
mod dict_table_two;
#[path = "backends/enums.rs"]
mod enums;
#[path = "backends/memory.rs"]
mod memory;
#[path = "backends/query.rs"]
mod query;

use crate::{FieldValue, Result};

pub use custom::{FnTranslator, translator_fn};
pub use db::{DbQuery, DbTranslator};
pub use dict_table::{DictQuery, DictTableTranslator, TableDictSource};
pub use dict_table_two::TwoTableDictSource;
pub use enums::EnumTranslator;
pub use memory::MemoryDictTranslator;
pub use query::{QueryBackend, ResultCache};

/// The translation capability shared by every backend.
pub trait Translator: Send + Sync {
    /// Resolve `value` of field `field` using the tag argument `tag`.
    fn translate(&self, value: &FieldValue, field: &str, tag: &str) -> Result<String>;
}
