//! Concurrency policy selection.
//!
//! ## Purpose
//!
//! This module defines the `Policy` enum used to choose how a lifted
//! algorithm schedules its iterations. The policy is orthogonal to the
//! algorithm: the same combinator can be built under any admissible policy.
//!
//! ## Design notes
//!
//! * **Extension-focused**: The core crate implements `Sequential` and
//!   `Vectorized`; thread-parallel backends are provided by extension crates.
//! * **Build-time choice**: A lifted algorithm is fixed to one policy when built.
//! * **Strategy object**: Backends implement [`Scheduler`], a "run this index
//!   range" interface the combinators call for their parallelizable loops.
//! * **Blocks**: [`Scheduler::run_blocks`] hands the body runs of consecutive
//!   elements. The default passes one element per run; the vectorized backend
//!   passes fixed groups so block-aware kernels can use vector lanes.
//!
//! ## Invariants
//!
//! * The default policy is always `Sequential`.

/// Scheduling backend for the outer loop of a lifted algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// Ascending-order loop on the calling thread.
    #[default]
    Sequential,

    /// Lane-blocked loop on the calling thread, suited to short fixed bodies.
    Vectorized,

    /// Work distributed across CPU threads (requires an extension crate).
    ThreadParallel,

    /// Finest-grained parallel backend available (requires an extension crate).
    MaxParallel,
}

impl Policy {
    /// Whether iterations may run concurrently on several threads.
    pub fn is_parallel(self) -> bool {
        matches!(self, Self::ThreadParallel | Self::MaxParallel)
    }

    /// Stable lowercase name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Vectorized => "vectorized",
            Self::ThreadParallel => "thread-parallel",
            Self::MaxParallel => "max-parallel",
        }
    }
}

// ============================================================================
// Scheduler Interface
// ============================================================================

/// Loop body over one element: `(absolute index, element bytes)`.
pub type ElementFn<'a> = dyn Fn(usize, &mut [u8]) + Sync + 'a;

/// Loop body over two aligned elements: `(absolute index, first, second)`.
pub type ZipFn<'a> = dyn Fn(usize, &mut [u8], &mut [u8]) + Sync + 'a;

/// Loop body over a run of elements: `(absolute index of the first, run bytes)`.
pub type BlockFn<'a> = dyn Fn(usize, &mut [u8]) + Sync + 'a;

/// Loop body over two aligned runs: `(absolute index of the first, first, second)`.
pub type ZipBlockFn<'a> = dyn Fn(usize, &mut [u8], &mut [u8]) + Sync + 'a;

/// A backend that runs a loop body over a contiguous run of elements.
///
/// Implementations may visit elements in any order and on any thread, but
/// must call `body` exactly once per element. Bodies only write the element
/// they are handed, so no synchronization is needed between calls.
pub trait Scheduler: Send + Sync + core::fmt::Debug {
    /// Policy this backend implements.
    fn policy(&self) -> Policy;

    /// Call `body(first_index + k, element_k)` for every `stride`-byte element.
    fn run(&self, elements: &mut [u8], stride: usize, first_index: usize, body: &ElementFn<'_>);

    /// Like [`Scheduler::run`], pairing element `k` of `a` with element `k` of `b`.
    fn run_zip(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipFn<'_>,
    );

    /// Call `body` once per run of consecutive `stride`-byte elements.
    ///
    /// Runs cover every element exactly once. The default makes every element
    /// its own run.
    fn run_blocks(
        &self,
        elements: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &BlockFn<'_>,
    ) {
        self.run(elements, stride, first_index, body)
    }

    /// Like [`Scheduler::run_blocks`], pairing the runs of `a` and `b`.
    fn run_zip_blocks(
        &self,
        a: &mut [u8],
        b: &mut [u8],
        stride: usize,
        first_index: usize,
        body: &ZipBlockFn<'_>,
    ) {
        self.run_zip(a, b, stride, first_index, body)
    }
}
