//! Field-resolution engine.
//!
//! This module is the *public entry point* for translating records: it turns
//! a record type's struct tags into an executable plan, walks records applying
//! that plan, and fans large batches out over worker threads.
//!
//! ## How the parts work together
//!
//! ```text
//! Translatable::fields()  ──┐
//!                           │  TagSet::parse + Binder::bind     (tags.rs, plan.rs)
//!                           └───────────────┬──────────────
//!                                           │  once per type, cached in PlanCache
//!                                           v
//! entry ── Engine::resolve ──────────── TypePlan
//!          (unwrap wrappers,                │
//!           reject by-value input)          v
//!                                 Walker::record / sequence  (traverse.rs)
//!                                   - nested records first
//!                                   - translator(value, field, tag arg)
//!                                   - non-empty label -> target string field
//!                                           │
//!                  batch::run (batch.rs) ───┘  chunks on scoped threads
//! ```
//!
//! ## Responsibilities by module
//!
//! - `tags.rs`: struct-tag parsing, tag priority, `db` target parsing.
//! - `plan.rs`: `TypePlan` construction, translator binding, the plan cache.
//! - `traverse.rs`: recursive in-place application of plans.
//! - `batch.rs`: sequential/parallel batch dispatch.
//! - `manager.rs`: the [`Engine`] that owns registry, backends and caches.
//!
//! ## Invariants
//!
//! - A plan is built at most once per record type per engine and never
//!   changes afterwards.
//! - A field is bound by the highest-priority translation tag present on it,
//!   even when that binding fails; lower-priority tags are never consulted.
//! - Labels are only ever written into string fields of the record that owns
//!   the source field.
//!
//! ## Debugging
//!
//! Plan construction and batch partitioning emit `tracing` debug events;
//! per-field translations and result-cache hits are traced at `trace` level.

#[path = "engine/batch.rs"]
mod batch;
#[path = "engine/manager.rs"]
mod manager;
#[path = "engine/plan.rs"]
mod plan;
#[path = "engine/tags.rs"]
mod tags;
#[path = "engine/traverse.rs"]
mod traverse;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use manager::Engine;
pub use tags::DbTarget;
