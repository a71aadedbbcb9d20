//! Record model: how the engine sees a struct without runtime reflection.
//!
//! A record type describes itself once through [`Translatable::fields`] (field
//! names in declaration order plus a struct-tag string per field) and hands out
//! mutable per-field views ([`Slot`]) on demand. The `translatable!` macro
//! writes both for a plain struct.
//!
//! ```text
//! struct User { sex: String, sex_name: String, dept: Option<Box<Dept>> }
//!
//! fields()      -> [ FieldDef { name: "sex",  tag: r#"dict:"sex" dictField:"sex_name""# },
//!                    FieldDef { name: "sex_name", tag: "" },
//!                    FieldDef { name: "dept", tag: "" } ]
//! field_mut(0)  -> Slot::Text(&mut self.sex)
//! field_mut(2)  -> Slot::Pointer(Some(&mut *dept))  |  Slot::Pointer(None)
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name; passed to translators and matched by `dictField`.
    pub name: &'static str,
    /// Raw struct-tag string, e.g. `enum:"priority" dictField:"priority_name"`.
    pub tag: &'static str,
}

/// A record type the engine can walk.
///
/// Implementations are normally generated by `translatable!`. Hand-written
/// implementations must keep `fields()` and `field_mut()` aligned: index `i`
/// in both refers to the same field, and `fields()` must return the same slice
/// on every call.
pub trait Translatable: Send + 'static {
    fn fields(&self) -> &'static [FieldDef];

    fn field_mut(&mut self, index: usize) -> Option<Slot<'_>>;

    /// Identity used to key the type plan cache.
    fn type_key(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Mutable view of a single field.
pub enum Slot<'a> {
    Text(&'a mut String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Record(&'a mut dyn Translatable),
    /// An optional boxed record; `None` is a null pointer.
    Pointer(Option<&'a mut dyn Translatable>),
    /// Element views of a sequence. Empty when the element type cannot hold
    /// records (see [`AsSlot::HOLDS_RECORDS`]).
    Sequence(Vec<Slot<'a>>),
    /// Anything else; carries a kind name for diagnostics.
    Opaque(&'static str),
}

impl<'a> Slot<'a> {
    /// Kind name used in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Text(_) => "string",
            Slot::Int(_) => "int",
            Slot::Uint(_) => "uint",
            Slot::Float(_) => "float",
            Slot::Bool(_) => "bool",
            Slot::Record(_) => "struct",
            Slot::Pointer(_) => "pointer",
            Slot::Sequence(_) => "slice",
            Slot::Opaque(kind) => *kind,
        }
    }

    /// Snapshot of the current value, as handed to translators.
    pub fn value(&self) -> FieldValue {
        match self {
            Slot::Text(s) => FieldValue::Str((**s).clone()),
            Slot::Int(v) => FieldValue::Int(*v),
            Slot::Uint(v) => FieldValue::Uint(*v),
            Slot::Float(v) => FieldValue::Float(*v),
            Slot::Bool(v) => FieldValue::Bool(*v),
            other => FieldValue::Other(other.kind()),
        }
    }

    /// The record this slot ultimately points at, if any.
    pub(crate) fn into_record(self) -> Option<&'a mut dyn Translatable> {
        match self {
            Slot::Record(record) => Some(record),
            Slot::Pointer(pointee) => pointee,
            _ => None,
        }
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Record(record) => write!(f, "Record({})", record.type_name()),
            Slot::Pointer(Some(record)) => write!(f, "Pointer({})", record.type_name()),
            Slot::Pointer(None) => f.write_str("Pointer(nil)"),
            Slot::Sequence(items) => write!(f, "Sequence(len={})", items.len()),
            other => write!(f, "{:?}", other.value()),
        }
    }
}

/// Owned source value passed to a translator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Other(&'static str),
}

impl FieldValue {
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Uint(_) => "uint",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Other(kind) => *kind,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Stringified form used as lookup key for table-backed dictionaries.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => f.write_str(s),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Uint(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::Other(kind) => write!(f, "<{kind}>"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

// --- Field type mapping -----------------------------------------------------

/// Maps a Rust field type onto a [`Slot`].
pub trait AsSlot {
    /// Whether a value of this type can contain a record. Sequences of types
    /// that cannot are exposed without element views, so walking a large
    /// `Vec<u8>` costs nothing.
    const HOLDS_RECORDS: bool = true;

    fn as_slot(&mut self) -> Slot<'_>;
}

impl AsSlot for String {
    const HOLDS_RECORDS: bool = false;

    fn as_slot(&mut self) -> Slot<'_> {
        Slot::Text(self)
    }
}

macro_rules! int_slots {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl AsSlot for $ty {
                const HOLDS_RECORDS: bool = false;

                fn as_slot(&mut self) -> Slot<'_> {
                    Slot::$variant(*self as $wide)
                }
            }
        )*
    };
}

int_slots!(Int as i64: i8, i16, i32, i64, isize);
int_slots!(Uint as u64: u8, u16, u32, u64, usize);
int_slots!(Float as f64: f32, f64);

impl AsSlot for bool {
    const HOLDS_RECORDS: bool = false;

    fn as_slot(&mut self) -> Slot<'_> {
        Slot::Bool(*self)
    }
}

impl<T: Translatable> AsSlot for T {
    fn as_slot(&mut self) -> Slot<'_> {
        Slot::Record(self)
    }
}

impl<T: Translatable> AsSlot for Option<Box<T>> {
    fn as_slot(&mut self) -> Slot<'_> {
        Slot::Pointer(self.as_deref_mut().map(|record| record as &mut dyn Translatable))
    }
}

fn sequence<T: AsSlot>(items: &mut [T]) -> Slot<'_> {
    if !T::HOLDS_RECORDS {
        return Slot::Sequence(Vec::new());
    }
    Slot::Sequence(items.iter_mut().map(AsSlot::as_slot).collect())
}

impl<T: AsSlot> AsSlot for Vec<T> {
    const HOLDS_RECORDS: bool = T::HOLDS_RECORDS;

    fn as_slot(&mut self) -> Slot<'_> {
        sequence(self)
    }
}

impl<T: AsSlot> AsSlot for [T] {
    const HOLDS_RECORDS: bool = T::HOLDS_RECORDS;

    fn as_slot(&mut self) -> Slot<'_> {
        sequence(self)
    }
}

// --- Entry values -----------------------------------------------------------

/// Argument of the top-level `translate*` operations.
pub enum Entry<'a> {
    /// A value handed over by value; nothing can be written back.
    Owned(&'static str),
    Slot(Slot<'a>),
    /// A wrapper type resolved through a registered unwrapper.
    Wrapped(&'a mut dyn Any),
}

impl<'a> Entry<'a> {
    /// Route `value` through the unwrapper registered for `T`.
    pub fn wrapped<T: Any>(value: &'a mut T) -> Self {
        Entry::Wrapped(value)
    }
}

impl<'a, T: AsSlot + ?Sized> From<&'a mut T> for Entry<'a> {
    fn from(value: &'a mut T) -> Self {
        Entry::Slot(value.as_slot())
    }
}

macro_rules! owned_entries {
    ($($ty:ty => $kind:literal),* $(,)?) => {
        $(
            impl From<$ty> for Entry<'_> {
                fn from(_: $ty) -> Self {
                    Entry::Owned($kind)
                }
            }
        )*
    };
}

owned_entries!(
    i8 => "i8", i16 => "i16", i32 => "i32", i64 => "i64", isize => "isize",
    u8 => "u8", u16 => "u16", u32 => "u32", u64 => "u64", usize => "usize",
    f32 => "f32", f64 => "f64", bool => "bool", String => "String", &str => "&str",
);
