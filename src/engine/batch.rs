//! Batch translation over a sequence of records.
//!
//! Small batches (or callers that ask for it) run sequentially on the calling
//! thread. Larger batches are cut into contiguous chunks, one per worker, and
//! walked on scoped threads:
//!
//! ```text
//! items:   [0 1 2 3 4 5 6 7 8 9 10 11]      len = 12, max_workers = 5
//! workers: min(5, 12) = 5, chunk = ceil(12 / 5) = 3
//! chunks:  [0 1 2] [3 4 5] [6 7 8] [9 10 11] (4 threads)
//! ```
//!
//! Every worker stops at its own first error; all workers are joined before
//! returning, and the error from the earliest chunk wins. Records are
//! translated in place, so element order never changes.

use super::traverse::Walker;
use crate::config::PerformanceConfig;
use crate::error::Result;
use crate::record::Slot;

pub(crate) fn run(walker: &Walker<'_>, items: Vec<Slot<'_>>, parallel: bool, perf: &PerformanceConfig) -> Result<()> {
    let len = items.len();
    if len == 0 {
        return Ok(());
    }
    if !parallel || len < perf.parallel_threshold {
        return walker.sequence(items);
    }

    let workers = perf.max_workers.clamp(1, len);
    let chunk_size = len.div_ceil(workers);
    tracing::debug!(len, workers, chunk_size, "partitioned batch");

    let mut chunks = Vec::with_capacity(workers);
    let mut rest = items.into_iter();
    loop {
        let chunk: Vec<Slot<'_>> = rest.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }

    let results: Vec<Result<()>> = std::thread::scope(|s| {
        let tasks: Vec<_> = chunks.into_iter().map(|chunk| s.spawn(move || walker.sequence(chunk))).collect();
        tasks.into_iter().map(|task| task.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))).collect()
    });
    results.into_iter().collect()
}
