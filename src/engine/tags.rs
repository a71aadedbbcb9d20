//! Struct-tag parsing.
//!
//! Each field carries one raw tag string in the conventional
//! `key:"value" key2:"value2"` layout. This module splits it into a [`TagSet`]
//! and understands the one structured argument, the `db` lookup target.
//!
//! ## Tag vocabulary
//!
//! Translation tags, highest priority first (the first one present on a field
//! decides its binding):
//!
//! | tag            | argument                                      |
//! |----------------|-----------------------------------------------|
//! | `translate`    | registered custom tag, optional `,extra` data |
//! | `db`           | `table:key:value` or `table=..,key=..,value=..` |
//! | `dictTableTwo` | dictionary type code (two-table store)        |
//! | `dictTable`    | dictionary type code (single table)           |
//! | `enum`         | enum table name                               |
//! | `dict`         | in-memory dictionary name                     |
//!
//! `dictField` names the sibling field that receives the label.

/// Translation tag kinds in binding priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Translate,
    Db,
    DictTableTwo,
    DictTable,
    Enum,
    Dict,
}

impl TagKind {
    pub const PRIORITY: [TagKind; 6] =
        [TagKind::Translate, TagKind::Db, TagKind::DictTableTwo, TagKind::DictTable, TagKind::Enum, TagKind::Dict];

    pub fn key(self) -> &'static str {
        match self {
            TagKind::Translate => "translate",
            TagKind::Db => "db",
            TagKind::DictTableTwo => "dictTableTwo",
            TagKind::DictTable => "dictTable",
            TagKind::Enum => "enum",
            TagKind::Dict => "dict",
        }
    }

    fn mask(self) -> TagMask {
        match self {
            TagKind::Translate => TagMask::TRANSLATE,
            TagKind::Db => TagMask::DB,
            TagKind::DictTableTwo => TagMask::DICT_TABLE_TWO,
            TagKind::DictTable => TagMask::DICT_TABLE,
            TagKind::Enum => TagMask::ENUM,
            TagKind::Dict => TagMask::DICT,
        }
    }
}

pub const DICT_FIELD: &str = "dictField";

bitflags::bitflags! {
    /// Which recognised tags are present on a field.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TagMask: u8 {
        const TRANSLATE      = 1 << 0;
        const DB             = 1 << 1;
        const DICT_TABLE_TWO = 1 << 2;
        const DICT_TABLE     = 1 << 3;
        const ENUM           = 1 << 4;
        const DICT           = 1 << 5;
        const DICT_FIELD     = 1 << 6;

        const TRANSLATION = Self::TRANSLATE.bits()
            | Self::DB.bits()
            | Self::DICT_TABLE_TWO.bits()
            | Self::DICT_TABLE.bits()
            | Self::ENUM.bits()
            | Self::DICT.bits();
    }
}

/// Parsed `key:"value"` pairs of one field. Empty values count as absent.
#[derive(Debug, Clone, Default)]
pub struct TagSet {
    pairs: Vec<(&'static str, String)>,
    mask: TagMask,
}

impl TagSet {
    pub fn parse(raw: &'static str) -> Self {
        let mut set = TagSet::default();
        if raw.is_empty() {
            return set;
        }

        for caps in regex!(r#"([A-Za-z_][A-Za-z0-9_]*):"((?:[^"\\]|\\.)*)""#).captures_iter(raw) {
            let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let value = value.as_str().replace("\\\"", "\"");
            if value.is_empty() || set.pairs.iter().any(|(k, _)| *k == key.as_str()) {
                continue;
            }
            let key = key.as_str();
            if let Some(kind) = TagKind::PRIORITY.iter().find(|kind| kind.key() == key) {
                set.mask |= kind.mask();
            } else if key == DICT_FIELD {
                set.mask |= TagMask::DICT_FIELD;
            }
            set.pairs.push((key, value));
        }
        set
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    pub fn mask(&self) -> TagMask {
        self.mask
    }

    /// The highest-priority translation tag present, with its argument.
    pub fn primary(&self) -> Option<(TagKind, &str)> {
        if !self.mask.intersects(TagMask::TRANSLATION) {
            return None;
        }
        TagKind::PRIORITY.iter().find_map(|kind| self.get(kind.key()).map(|arg| (*kind, arg)))
    }

    pub fn target(&self) -> Option<&str> {
        if !self.mask.contains(TagMask::DICT_FIELD) {
            return None;
        }
        self.get(DICT_FIELD)
    }
}

/// Coordinates of a `db` tag lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTarget {
    pub table: String,
    pub key_field: String,
    pub value_field: String,
}

impl DbTarget {
    /// Parse either the compact `table:key:value` form or the explicit
    /// `table=..,key=..,value=..` form. Returns `None` unless all three parts
    /// are present.
    pub fn parse(tag: &str) -> Option<Self> {
        let (mut table, mut key_field, mut value_field) = ("", "", "");

        if tag.contains(':') && !tag.contains('=') {
            let parts: Vec<&str> = tag.split(':').collect();
            if let [t, k, v] = parts.as_slice() {
                (table, key_field, value_field) = (t.trim(), k.trim(), v.trim());
            }
        } else {
            for part in tag.split(',') {
                let Some(caps) = regex!(r"^\s*(table|key|value)=(.*?)\s*$").captures(part) else {
                    continue;
                };
                let value = caps.get(2).map_or("", |m| m.as_str());
                match caps.get(1).map(|m| m.as_str()) {
                    Some("table") => table = value,
                    Some("key") => key_field = value,
                    Some("value") => value_field = value,
                    _ => {}
                }
            }
        }

        if table.is_empty() || key_field.is_empty() || value_field.is_empty() {
            return None;
        }
        Some(DbTarget { table: table.to_string(), key_field: key_field.to_string(), value_field: value_field.to_string() })
    }

    /// Composite result-cache key for `value`.
    pub fn cache_key(&self, value: &impl std::fmt::Display) -> String {
        format!("{}:{}:{}:{}", self.table, self.key_field, self.value_field, value)
    }
}
