//! Execution of validated lift plans.
//!
//! ## Purpose
//!
//! This module holds the fully resolved description of a lift
//! ([`LiftConfig`]) and the executor that runs it against a container
//! buffer by dispatching to the matching combinator.
//!
//! ## Design notes
//!
//! * **Typed plans**: Each combinator's parameters live in its own [`Plan`]
//!   variant, so a plan cannot carry parameters its combinator ignores.
//! * **Injected backend**: The scheduler is chosen when the plan is built; the
//!   executor never decides how to parallelize.
//!
//! ## Invariants
//!
//! * Plans are only constructed through the validating builder (or by callers
//!   that uphold the same preconditions).
//! * `run` expects a buffer of exactly `size(container)` bytes.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::{sync::Arc, vec::Vec};

// Internal dependencies
use crate::algorithms::dispatch::dispatch;
use crate::algorithms::extract::extract;
use crate::algorithms::halves::halves_zip;
use crate::algorithms::indexed::{indexed_emplace, indexed_map};
use crate::algorithms::map::map;
use crate::algorithms::pairs::all_pairs;
use crate::algorithms::shared::{shared_broadcast, shared_reduce};
use crate::algorithms::shuffle::shuffle;
use crate::algorithms::{Algorithm, IndexWindow, Layout, PairPolicy};
use crate::kernels::KernelRef;
use crate::primitives::backend::Scheduler;
use crate::primitives::order::Order;

// ============================================================================
// Plan
// ============================================================================

/// A combinator together with its parameters.
#[derive(Debug, Clone)]
pub enum Plan {
    /// Plain map.
    Map(KernelRef),

    /// Indexed map over `(index, element)` pairs.
    IndexedMap(KernelRef),

    /// Indexed scatter over `(index, element)` pairs.
    IndexedEmplace(KernelRef),

    /// Sequential accumulate-and-update.
    SharedReduce {
        /// Pair kernel.
        kernel: KernelRef,
        /// Position of the shared element.
        slot: usize,
        /// Optional running-index field.
        window: Option<IndexWindow>,
    },

    /// Read-only broadcast of the shared element.
    SharedBroadcast {
        /// Pair kernel.
        kernel: KernelRef,
        /// Position of the shared element.
        slot: usize,
        /// Optional running-index field.
        window: Option<IndexWindow>,
    },

    /// Every pair `(i, j)` with `i < j`.
    AllPairs {
        /// Pair kernel.
        kernel: KernelRef,
        /// Treatment of element `i`.
        policy: PairPolicy,
    },

    /// Position-wise pairing of the container halves.
    HalvesZip(KernelRef),

    /// Index-driven permutation.
    Shuffle {
        /// Index kernel.
        kernel: KernelRef,
        /// Order of the index state.
        index: Order,
    },

    /// One kernel per position.
    Dispatch(Vec<KernelRef>),

    /// Fixed-width byte windows.
    Extract {
        /// Window kernel.
        kernel: KernelRef,
        /// Window width in bytes.
        width: usize,
    },
}

impl Plan {
    /// The combinator this plan runs.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Map(_) => Algorithm::Map,
            Self::IndexedMap(_) => Algorithm::IndexedMap,
            Self::IndexedEmplace(_) => Algorithm::IndexedEmplace,
            Self::SharedReduce { .. } => Algorithm::SharedReduce,
            Self::SharedBroadcast { .. } => Algorithm::SharedBroadcast,
            Self::AllPairs { .. } => Algorithm::AllPairs,
            Self::HalvesZip(_) => Algorithm::HalvesZip,
            Self::Shuffle { .. } => Algorithm::Shuffle,
            Self::Dispatch(_) => Algorithm::Dispatch,
            Self::Extract { .. } => Algorithm::Extract,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Fully resolved lift.
#[derive(Debug, Clone)]
pub struct LiftConfig {
    /// Combinator and its parameters.
    pub plan: Plan,

    /// Element geometry and iteration range.
    pub layout: Layout,

    /// Backend for the combinator's parallelizable loop.
    pub scheduler: Arc<dyn Scheduler>,
}

// ============================================================================
// Executor
// ============================================================================

/// Runs a [`LiftConfig`] against container buffers.
#[derive(Debug, Clone)]
pub struct LiftExecutor {
    config: LiftConfig,
}

impl LiftExecutor {
    /// Create an executor for a validated configuration.
    pub fn from_config(config: LiftConfig) -> Self {
        Self { config }
    }

    /// The configuration being executed.
    pub fn config(&self) -> &LiftConfig {
        &self.config
    }

    /// Run the lift over `data`, which must be exactly one container.
    pub fn run(&self, data: &mut [u8]) {
        let LiftConfig {
            plan,
            layout,
            scheduler,
        } = &self.config;
        let scheduler: &dyn Scheduler = &**scheduler;

        log::debug!(
            "lift {}: element order {}, container order {}, range [{}, {}), policy {}",
            plan.algorithm().name(),
            layout.element,
            layout.container,
            layout.start,
            layout.end,
            scheduler.policy().name()
        );

        match plan {
            Plan::Map(kernel) => map(data, layout, &**kernel, scheduler),
            Plan::IndexedMap(kernel) => indexed_map(data, layout, &**kernel, scheduler),
            Plan::IndexedEmplace(kernel) => indexed_emplace(data, layout, &**kernel, scheduler),
            Plan::SharedReduce {
                kernel,
                slot,
                window,
            } => shared_reduce(data, layout, *slot, *window, &**kernel),
            Plan::SharedBroadcast {
                kernel,
                slot,
                window,
            } => shared_broadcast(data, layout, *slot, *window, &**kernel, scheduler),
            Plan::AllPairs { kernel, policy } => {
                all_pairs(data, layout, *policy, &**kernel, scheduler)
            }
            Plan::HalvesZip(kernel) => halves_zip(data, layout, &**kernel, scheduler),
            Plan::Shuffle { kernel, index } => shuffle(data, layout, *index, &**kernel, scheduler),
            Plan::Dispatch(table) => dispatch(data, layout, table, scheduler),
            Plan::Extract { kernel, width } => extract(data, layout, *width, &**kernel, scheduler),
        }
    }
}
