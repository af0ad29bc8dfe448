//! The brute-force reverse-hash search.
//!
//! A search enumerates the Cartesian product of the slot generators,
//! hashing every rendered candidate and recording the ones that land in
//! the target set. Product spaces routinely exceed 1e9 leaves, so the
//! traversal is an explicit-stack DFS: recursion depth would be harmless
//! (bounded by the slot count) but the iteration state must be compact and
//! allocation-light.
//!
//! Parallel searches split only the outermost dimension into disjoint
//! partitions, one OS thread each. Workers share the read-only target set
//! and a progress sink; there is no work stealing, so a skewed partition
//! finishes late while the others idle. Termination is by exhaustion or by
//! the cooperative cancellation flag, checked at every leaf.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info};

use dvdbnd_names::{GameVersion, hash_path};

use crate::candidates::Candidates;
use crate::progress::ProgressSink;
use crate::template::Template;
use crate::{Result, SearchError};

/// Leaves between progress reports.
pub const DEFAULT_REPORT_INTERVAL: u64 = 100_000;

/// Shared, read-only state for one search run.
pub struct SearchContext<'a> {
    /// Hash parameters to search under.
    pub version: GameVersion,
    /// Sink for worker progress reports.
    pub progress: &'a dyn ProgressSink,
    /// Cooperative cancellation flag, checked at every leaf.
    pub cancel: &'a AtomicBool,
    /// Leaves between progress reports.
    pub report_interval: u64,
}

impl<'a> SearchContext<'a> {
    /// Context with the default reporting cadence.
    pub fn new(
        version: GameVersion,
        progress: &'a dyn ProgressSink,
        cancel: &'a AtomicBool,
    ) -> Self {
        Self {
            version,
            progress,
            cancel,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

/// Search the whole candidate space on the calling thread.
pub fn search_sequential(
    targets: &HashSet<u64>,
    template: &Template,
    generators: &[Box<dyn Candidates>],
    ctx: &SearchContext<'_>,
) -> Result<Vec<String>> {
    if template.slots() != generators.len() {
        return Err(SearchError::GeneratorCountMismatch {
            placeholders: template.slots(),
            generators: generators.len(),
        });
    }

    let generators: Vec<&dyn Candidates> = generators.iter().map(Box::as_ref).collect();
    Ok(run_partition(0, targets, template, &generators, ctx))
}

/// Search with one worker thread per outer partition.
///
/// `outer_parts` are disjoint slices of slot 0's sequence (see
/// [`NumberRange::split`](crate::candidates::NumberRange::split)); the
/// remaining slots take `inner` whole. Results are the union of the
/// workers' outputs, collected only after every worker has exhausted its
/// partition.
pub fn search_parallel(
    targets: &HashSet<u64>,
    template: &Template,
    outer_parts: &[Box<dyn Candidates>],
    inner: &[Box<dyn Candidates>],
    ctx: &SearchContext<'_>,
) -> Result<Vec<String>> {
    let slots = template.slots();
    if slots != 1 + inner.len() {
        return Err(SearchError::GeneratorCountMismatch {
            placeholders: slots,
            generators: 1 + inner.len(),
        });
    }

    info!("Spawning {} search workers", outer_parts.len());

    let worker_results = thread::scope(|s| {
        let handles: Vec<_> = outer_parts
            .iter()
            .enumerate()
            .map(|(worker, outer)| {
                s.spawn(move || {
                    let mut generators: Vec<&dyn Candidates> = Vec::with_capacity(slots);
                    generators.push(outer.as_ref());
                    generators.extend(inner.iter().map(Box::as_ref));
                    run_partition(worker, targets, template, &generators, ctx)
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(worker, handle)| {
                handle
                    .join()
                    .map_err(|_| SearchError::WorkerPanicked(worker))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(worker_results.into_iter().flatten().collect())
}

/// Depth-first product traversal of one partition.
fn run_partition(
    worker: usize,
    targets: &HashSet<u64>,
    template: &Template,
    generators: &[&dyn Candidates],
    ctx: &SearchContext<'_>,
) -> Vec<String> {
    let slots = generators.len();
    let total = generators
        .iter()
        .map(|g| g.resolved_len())
        .fold(1u64, u64::saturating_mul);

    let mut results = Vec::new();
    let mut leaves = 0u64;

    if slots == 0 {
        // Degenerate template: a single fixed candidate.
        let path = template.part(0);
        if targets.contains(&hash_path(path, ctx.version)) {
            results.push(path.to_string());
        }
        ctx.progress.report(worker, 1, 1);
        return results;
    }

    // One frame per slot: the live iterator plus the candidate-path length
    // at which its fragments splice in.
    let mut iters: Vec<Box<dyn Iterator<Item = String> + Send + '_>> = vec![generators[0].iter()];
    let mut bases: Vec<usize> = vec![template.part(0).len()];
    let mut path = template.part(0).to_string();

    'traverse: while !iters.is_empty() {
        let depth = iters.len() - 1;
        let Some(fragment) = iters[depth].next() else {
            iters.pop();
            bases.pop();
            continue;
        };

        path.truncate(bases[depth]);
        path.push_str(&fragment);
        path.push_str(template.part(depth + 1));

        if depth + 1 == slots {
            leaves += 1;
            let hashed = hash_path(&path, ctx.version);
            if targets.contains(&hashed) {
                debug!("Hit: {} -> {:016x}", path, hashed);
                results.push(path.clone());
            }
            if leaves % ctx.report_interval == 0 {
                ctx.progress.report(worker, leaves, total);
            }
            if ctx.cancel.load(Ordering::Relaxed) {
                debug!("Worker {} cancelled after {} leaves", worker, leaves);
                break 'traverse;
            }
        } else {
            bases.push(path.len());
            iters.push(generators[depth + 1].iter());
        }
    }

    ctx.progress.report(worker, leaves, total);
    results
}
