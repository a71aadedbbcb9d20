//! Recursive application of type plans.
//!
//! ```text
//! record(r)
//!   plan = plans.get_or_build(r)
//!   for each field i, in declaration order:
//!     Record / Pointer(Some) ──> record(child)
//!     Sequence              ──> each element that is a record or non-nil pointer
//!     plan has field i      ──> translate current value, write label to target
//! ```
//!
//! Nested records are finished before the field that holds them is
//! translated. The first translator error aborts the walk; fields already
//! written stay written.

use super::plan::{Binder, FieldPlan, PlanCache};
use crate::error::Result;
use crate::record::{Slot, Translatable};

pub(crate) struct Walker<'e> {
    pub plans: &'e PlanCache,
    pub binder: &'e Binder,
}

impl Walker<'_> {
    pub fn record(&self, record: &mut dyn Translatable) -> Result<()> {
        let plan = self.plans.get_or_build(record, self.binder);

        for index in 0..record.fields().len() {
            if let Some(slot) = record.field_mut(index) {
                self.nested(slot)?;
            }
            if let Some(field) = plan.field(index) {
                self.apply(record, field)?;
            }
        }
        Ok(())
    }

    /// Translate every record element; nil pointers and scalars are skipped.
    pub fn sequence(&self, items: Vec<Slot<'_>>) -> Result<()> {
        for item in items {
            if let Some(record) = item.into_record() {
                self.record(record)?;
            }
        }
        Ok(())
    }

    fn nested(&self, slot: Slot<'_>) -> Result<()> {
        match slot {
            Slot::Sequence(items) => self.sequence(items),
            other => match other.into_record() {
                Some(record) => self.record(record),
                None => Ok(()),
            },
        }
    }

    fn apply(&self, record: &mut dyn Translatable, field: &FieldPlan) -> Result<()> {
        let Some(value) = record.field_mut(field.index).map(|slot| slot.value()) else {
            return Ok(());
        };

        let label = field.translator.translate(&value, field.name, &field.tag_arg)?;
        if label.is_empty() {
            return Ok(());
        }

        if let Some(Slot::Text(text)) = field.target.and_then(|target| record.field_mut(target)) {
            tracing::trace!(field = field.name, target = ?field.target_name, %value, label = %label, "translated field");
            *text = label;
        }
        Ok(())
    }
}
