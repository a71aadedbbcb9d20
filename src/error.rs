//! Error type shared by the engine and every backend.

use std::fmt;

/// Boxed error returned by user-supplied query functions and custom translators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The DB-flavoured backends. Each owns its own query function and result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// `db:"table:key:value"` lookups.
    Db,
    /// `dictTable:"type"` lookups against a single dictionary table.
    DictTable,
    /// `dictTableTwo:"type"` lookups against a type table plus a data table.
    DictTableTwo,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Db => "database",
            Backend::DictTable => "dict table",
            Backend::DictTableTwo => "dict table two",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The entry value was passed by value and cannot be written back.
    #[error("dict-trans: value must be a mutable reference (got {0} by value)")]
    NotPointer(&'static str),

    /// The entry resolved to something that is neither a record nor a sequence.
    #[error("dict-trans: value must be a struct (got {0})")]
    NotStruct(&'static str),

    /// A sequence-only entry point was given something else.
    #[error("dict-trans: value must be a slice (got {0})")]
    NotSlice(&'static str),

    #[error("{0} translator not registered")]
    TranslatorNotRegistered(Backend),

    #[error("unsupported enum value type: {0}")]
    UnsupportedValueKind(&'static str),

    #[error("enum '{0}' not found")]
    EnumNotFound(String),

    #[error("{backend} query failed: {source}")]
    QueryFailed {
        backend: Backend,
        #[source]
        source: BoxError,
    },

    #[error("translator '{tag}' failed: {source}")]
    Custom {
        tag: String,
        #[source]
        source: BoxError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
