//! Multi-threaded scheduling backends for lifted algorithms.
//!
//! ## Purpose
//!
//! This module provides the parallel schedulers that are injected into the
//! `kernel8` execution engine. The combinators hand each backend a run of
//! elements and a body to call per element; the backend decides how the
//! run is split across CPU threads.
//!
//! ## Design notes
//!
//! * **Implementation**: Both backends implement the core `Scheduler` trait and
//!   can be installed in any lift.
//! * **Parallelism**: Uses `rayon` for data-parallel execution across CPU cores.
//! * **Granularity**: `ThreadPool` splits the run into one contiguous block per
//!   worker thread; `MaxParallel` makes every element its own task and leaves
//!   balancing to work stealing.
//! * **Block bodies**: Inside its per-thread block, `ThreadPool` hands block
//!   bodies runs of `LANES` elements, the same runs the vectorized backend
//!   uses, so vector kernels keep their lanes when threaded.
//!
//! ## Key concepts
//!
//! * **Disjoint writes**: Each element's bytes are handed to exactly one call,
//!   so no locking is needed. Kernel purity does the rest.
//! * **Absolute indices**: The body receives `first_index + k` for the `k`-th
//!   element of the run, whichever thread runs it.
//!
//! ## Non-goals
//!
//! * This module does not decide which combinators may run in parallel
//!   (handled by the `kernel8` validator).

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use std::sync::Arc;

// Export dependencies from kernel8 crate
use kernel8::internals::engine::scheduler::{Sequential, Vectorized};
use kernel8::internals::primitives::backend::{Policy, Scheduler};
#[cfg(feature = "cpu")]
use kernel8::internals::engine::scheduler::LANES;
#[cfg(feature = "cpu")]
use kernel8::internals::primitives::backend::{BlockFn, ElementFn, ZipBlockFn, ZipFn};

// ============================================================================
// Thread Pool Backend
// ============================================================================

/// One contiguous block of elements per rayon worker thread.
#[cfg(feature = "cpu")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPool;

#[cfg(feature = "cpu")]
impl ThreadPool {
    /// Elements per block so that every worker gets one block.
    fn block_len(count: usize) -> usize {
        count.div_ceil(rayon::current_num_threads().max(1)).max(1)
    }
}

#[cfg(feature = "cpu")]
impl Scheduler for ThreadPool {
    fn policy(&self) -> Policy {
        Policy::ThreadParallel
    }

    fn run(&self, elements: &mut [u8], stride: usize, first_index: usize, body: &ElementFn<'_>) {
        let count = elements.len() / stride;
        if count == 0 {
            return;
        }
        let block = Self::block_len(count);
        log::trace!("thread-pool run: {count} elements in blocks of {block}");

        elements
            .par_chunks_mut(block * stride)
            .enumerate()
            .for_each(|(b, chunk)| {
                let base = first_index + b * block;
                for (k, element) in chunk.chunks_exact_mut(stride).enumerate() {
                    body(base + k, element);
                }
            });
    }

    fn run_zip(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipFn<'_>,
    ) {
        let count = a.len() / stride;
        if count == 0 {
            return;
        }
        let block = Self::block_len(count);
        log::trace!("thread-pool zip: {count} elements in blocks of {block}");

        a.par_chunks_mut(block * stride)
            .zip(b.par_chunks_mut(block * stride))
            .enumerate()
            .for_each(|(n, (xs, ys))| {
                let base = first_index + n * block;
                let pairs = xs.chunks_exact_mut(stride).zip(ys.chunks_exact_mut(stride));
                for (k, (x, y)) in pairs.enumerate() {
                    body(base + k, x, y);
                }
            });
    }

    fn run_blocks(
        &self,
        elements: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &BlockFn<'_>,
    ) {
        let count = elements.len() / stride;
        if count == 0 {
            return;
        }
        let block = Self::block_len(count);
        log::trace!("thread-pool blocks: {count} elements in blocks of {block}");

        elements
            .par_chunks_mut(block * stride)
            .enumerate()
            .for_each(|(b, chunk)| {
                let base = first_index + b * block;
                for (k, run) in chunk.chunks_mut(LANES * stride).enumerate() {
                    body(base + k * LANES, run);
                }
            });
    }

    fn run_zip_blocks(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipBlockFn<'_>,
    ) {
        let count = a.len() / stride;
        if count == 0 {
            return;
        }
        let block = Self::block_len(count);
        log::trace!("thread-pool zip blocks: {count} elements in blocks of {block}");

        a.par_chunks_mut(block * stride)
            .zip(b.par_chunks_mut(block * stride))
            .enumerate()
            .for_each(|(n, (xs, ys))| {
                let base = first_index + n * block;
                let runs = xs.chunks_mut(LANES * stride).zip(ys.chunks_mut(LANES * stride));
                for (k, (x, y)) in runs.enumerate() {
                    body(base + k * LANES, x, y);
                }
            });
    }
}

// ============================================================================
// Max-Parallel Backend
// ============================================================================

/// One rayon task per element.
#[cfg(feature = "cpu")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxParallel;

#[cfg(feature = "cpu")]
impl Scheduler for MaxParallel {
    fn policy(&self) -> Policy {
        Policy::MaxParallel
    }

    fn run(&self, elements: &mut [u8], stride: usize, first_index: usize, body: &ElementFn<'_>) {
        log::trace!("max-parallel run: {} elements", elements.len() / stride);
        elements
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(k, element)| body(first_index + k, element));
    }

    fn run_zip(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipFn<'_>,
    ) {
        log::trace!("max-parallel zip: {} elements", a.len() / stride);
        a.par_chunks_mut(stride)
            .zip(b.par_chunks_mut(stride))
            .enumerate()
            .for_each(|(k, (x, y))| body(first_index + k, x, y));
    }
}

// ============================================================================
// Policy Resolution
// ============================================================================

/// Concrete backend for `policy`.
///
/// Without the `cpu` feature the thread-parallel policies resolve to the
/// sequential backend.
pub fn parallel_scheduler(policy: Policy) -> Arc<dyn Scheduler> {
    match policy {
        Policy::Sequential => Arc::new(Sequential),
        Policy::Vectorized => Arc::new(Vectorized),
        #[cfg(feature = "cpu")]
        Policy::ThreadParallel => Arc::new(ThreadPool),
        #[cfg(feature = "cpu")]
        Policy::MaxParallel => Arc::new(MaxParallel),
        #[cfg(not(feature = "cpu"))]
        Policy::ThreadParallel | Policy::MaxParallel => {
            log::warn!(
                "policy {} needs the `cpu` feature; running sequentially",
                policy.name()
            );
            Arc::new(Sequential)
        }
    }
}
