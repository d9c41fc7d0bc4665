//! High-level API for multi-threaded lifts.
//!
//! ## Purpose
//!
//! This module provides a builder that wraps the core `kernel8` builder and
//! installs a rayon-backed scheduler when the lift is built.
//!
//! ## Design notes
//!
//! * **Delegating**: Every geometry and combinator setter forwards to the core
//!   builder, so validation and error values are identical.
//! * **Parallel by default**: Combinators that admit it default to
//!   [`Policy::ThreadParallel`]. Sequential-only combinators (shared reduce
//!   and write-back all-pairs) default to [`Policy::Sequential`].
//! * **Explicit policies win**: A policy set by the caller is passed through
//!   unchanged and rejected by the core validator if inadmissible.

// External dependencies
use std::ops::Range;
use std::sync::Arc;

// Export dependencies from kernel8 crate
use kernel8::internals::api::LiftBuilder as CoreLiftBuilder;
use kernel8::internals::engine::validator::Validator;

// Internal dependencies
use crate::engine::executor::parallel_scheduler;

// Publicly re-exported types
pub use kernel8::internals::api::{
    Algorithm, Kernel, KernelError, KernelRef, Lifted, PairPolicy, Policy, Scheduler,
};

// ============================================================================
// Parallel Lift Builder
// ============================================================================

/// Builder for lifts scheduled on the rayon thread pool.
#[derive(Debug, Clone, Default)]
pub struct ParallelLiftBuilder {
    /// Core builder that holds and validates every parameter.
    pub base: CoreLiftBuilder,
}

impl ParallelLiftBuilder {
    /// Create a new builder with parallel defaults.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the combinator.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.base = self.base.algorithm(algorithm);
        self
    }

    /// Set the element order.
    pub fn element_order(mut self, order: u32) -> Self {
        self.base = self.base.element_order(order);
        self
    }

    /// Set the container order.
    pub fn container_order(mut self, order: u32) -> Self {
        self.base = self.base.container_order(order);
        self
    }

    /// Restrict iteration to `[start, end)`.
    pub fn range(mut self, range: Range<usize>) -> Self {
        self.base = self.base.range(range);
        self
    }

    /// Set the concurrency policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        self.base = self.base.policy(policy);
        self
    }

    /// Set the kernel.
    pub fn kernel<K: Kernel + 'static>(mut self, kernel: K) -> Self {
        self.base = self.base.kernel(kernel);
        self
    }

    /// Set the per-position kernel table for dispatch.
    pub fn kernels(mut self, kernels: Vec<KernelRef>) -> Self {
        self.base = self.base.kernels(kernels);
        self
    }

    /// Set the shared element for reduce and broadcast.
    pub fn shared_slot(mut self, slot: usize) -> Self {
        self.base = self.base.shared_slot(slot);
        self
    }

    /// Reserve a window of the shared element for the current index.
    pub fn index_window(mut self, order: u32, slot: usize) -> Self {
        self.base = self.base.index_window(order, slot);
        self
    }

    /// Set the index state order for shuffle.
    pub fn index_order(mut self, order: u32) -> Self {
        self.base = self.base.index_order(order);
        self
    }

    /// Set the all-pairs policy.
    pub fn pair_policy(mut self, policy: PairPolicy) -> Self {
        self.base = self.base.pair_policy(policy);
        self
    }

    /// Set the extraction width in bytes.
    pub fn extract_width(mut self, width: usize) -> Self {
        self.base = self.base.extract_width(width);
        self
    }

    /// Install a custom scheduling backend instead of the rayon one.
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.base = self.base.scheduler(scheduler);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Policy used when the caller did not set one.
    fn default_policy(&self) -> Policy {
        let algorithm = self.base.algorithm.unwrap_or(Algorithm::Map);
        let pair_policy = self.base.pair_policy.unwrap_or_default();
        match Validator::validate_policy(algorithm, pair_policy, Policy::ThreadParallel) {
            Ok(()) => Policy::ThreadParallel,
            Err(_) => Policy::Sequential,
        }
    }

    /// Validate the configuration and produce a lift on the rayon backend.
    pub fn build(mut self) -> Result<Lifted, KernelError> {
        if self.base.scheduler.is_none() {
            let policy = self.base.policy.unwrap_or_else(|| self.default_policy());
            log::debug!("installing {} scheduler", policy.name());
            self.base.scheduler = Some(parallel_scheduler(policy));
        }
        self.base.build()
    }
}
