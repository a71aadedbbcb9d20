//! Per-type translation plans.
//!
//! A [`TypePlan`] is everything the traversal needs to know about a record
//! type: which fields carry a translation tag, the translator bound to each,
//! the argument to pass it, and where the label goes. Plans are derived once
//! per type from the static field table and shared by every later call.
//!
//! ## Invariants
//!
//! - `FieldPlan::index` and `FieldPlan::target` index into the same
//!   `fields()` table the plan was built from.
//! - `TypePlan::fields` is sorted by `index`.
//! - A built plan never changes; re-registering a translator only affects
//!   types whose plan has not been built yet.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::tags::{DbTarget, TagKind, TagMask, TagSet};
use crate::backends::{DbQuery, DbTranslator, DictQuery, DictTableTranslator, QueryBackend, Translator};
use crate::record::{Slot, Translatable};
use crate::registry::Registry;

// --- Plans -------------------------------------------------------------------

/// One translated field.
#[derive(Clone)]
pub(crate) struct FieldPlan {
    pub index: usize,
    pub name: &'static str,
    pub translator: Arc<dyn Translator>,
    /// Tag argument handed to the translator verbatim.
    pub tag_arg: String,
    /// `dictField` argument as written.
    pub target_name: Option<String>,
    /// Index of the string field receiving the label; `None` computes and discards.
    pub target: Option<usize>,
}

#[derive(Clone, Default)]
pub(crate) struct TypePlan {
    pub type_name: &'static str,
    pub fields: Vec<FieldPlan>,
}

impl TypePlan {
    pub fn field(&self, index: usize) -> Option<&FieldPlan> {
        self.fields.binary_search_by_key(&index, |f| f.index).ok().map(|pos| &self.fields[pos])
    }

    /// Derive the plan for `record`'s type.
    ///
    /// `record` is only inspected (field table and slot kinds), never mutated.
    pub fn build(record: &mut dyn Translatable, binder: &Binder) -> Self {
        let defs = record.fields();
        let mut fields = Vec::new();

        for (index, def) in defs.iter().enumerate() {
            let tags = TagSet::parse(def.tag);
            if !tags.mask().intersects(TagMask::TRANSLATION) {
                continue;
            }
            let Some((kind, arg)) = tags.primary() else {
                continue;
            };
            let Some(translator) = binder.bind(kind, arg) else {
                tracing::trace!(field = def.name, tag = kind.key(), arg, "tag has no usable translator");
                continue;
            };
            let target_name = tags.target().map(str::to_string);
            let target = target_name.as_deref().and_then(|name| resolve_target(record, name));
            fields.push(FieldPlan { index, name: def.name, translator, tag_arg: arg.to_string(), target_name, target });
        }

        TypePlan { type_name: record.type_name(), fields }
    }
}

/// Exact name first, then the first case-insensitive match; only string fields qualify.
fn resolve_target(record: &mut dyn Translatable, name: &str) -> Option<usize> {
    let defs = record.fields();
    let mut is_text = |index: usize| matches!(record.field_mut(index), Some(Slot::Text(_)));

    if let Some(index) = defs.iter().position(|def| def.name == name) {
        if is_text(index) {
            return Some(index);
        }
    }
    (0..defs.len()).find(|&index| defs[index].name.eq_ignore_ascii_case(name) && is_text(index))
}

// --- Binding -----------------------------------------------------------------

/// Everything a tag can be bound to.
pub(crate) struct Binder {
    pub registry: Arc<Registry>,
    pub memory: Arc<dyn Translator>,
    pub enums: Arc<dyn Translator>,
    pub db: Arc<QueryBackend<dyn DbQuery>>,
    pub dict_table: Arc<QueryBackend<dyn DictQuery>>,
    pub dict_table_two: Arc<QueryBackend<dyn DictQuery>>,
}

impl Binder {
    fn bind(&self, kind: TagKind, arg: &str) -> Option<Arc<dyn Translator>> {
        match kind {
            TagKind::Translate => self.registry.translator(arg.split(',').next().unwrap_or(arg)),
            TagKind::Db => {
                let target = DbTarget::parse(arg)?;
                Some(Arc::new(DbTranslator::new(self.db.clone(), target)))
            }
            TagKind::DictTableTwo => Some(Arc::new(DictTableTranslator::new(self.dict_table_two.clone(), arg))),
            TagKind::DictTable => Some(Arc::new(DictTableTranslator::new(self.dict_table.clone(), arg))),
            TagKind::Enum => Some(self.enums.clone()),
            TagKind::Dict => Some(self.memory.clone()),
        }
    }
}

// --- Cache -------------------------------------------------------------------

/// Plans keyed by record type, built at most once per type.
#[derive(Default)]
pub(crate) struct PlanCache {
    plans: RwLock<HashMap<TypeId, Arc<TypePlan>>>,
}

impl PlanCache {
    pub fn get_or_build(&self, record: &mut dyn Translatable, binder: &Binder) -> Arc<TypePlan> {
        let key = record.type_key();
        if let Some(plan) = self.plans.read().get(&key) {
            return plan.clone();
        }

        let mut plans = self.plans.write();
        if let Some(plan) = plans.get(&key) {
            return plan.clone();
        }
        let plan = Arc::new(TypePlan::build(record, binder));
        tracing::debug!(type_name = plan.type_name, fields = plan.fields.len(), "built type plan");
        plans.insert(key, plan.clone());
        plan
    }

    pub fn len(&self) -> usize {
        self.plans.read().len()
    }
}
