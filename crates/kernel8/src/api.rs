//! High-level API for lifting kernels.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements
//! a fluent builder for describing a lift (geometry, combinator, kernel and
//! concurrency policy) and produces a validated, reusable [`Lifted`]
//! algorithm.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Every parameter except the container order and the kernel
//!   has a default.
//! * **Validated**: All preconditions are checked once in [`LiftBuilder::build`];
//!   applying a built lift only checks the buffer length.
//! * **Strict**: A parameter the chosen combinator never reads (an index order
//!   on a map, a kernel table on anything but dispatch) is an error, not a no-op.
//! * **Composable**: [`Lifted`] is itself a [`Kernel`] at the container order,
//!   so a lifted algorithm can be lifted again.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create a [`LiftBuilder`] via `Lift::new()`.
//! 2. Chain configuration methods (`.algorithm()`, `.container_order()`, `.kernel()`, ...).
//! 3. Call `.build()` and apply the result to caller-owned buffers.
//!
//! ### Defaults
//!
//! * Algorithm: [`Algorithm::Map`].
//! * Element order: derived from the kernel where the combinator allows it
//!   (the kernel order for map and extract, half of it for pair combinators,
//!   the table's first kernel for dispatch).
//! * Range: the whole array. Shared-state combinators default to `[1, count)`
//!   when the shared slot is 0 and `[0, slot)` otherwise. Halves-zip ranges
//!   over one half; extract ranges over bytes.
//! * Policy: [`Policy::Sequential`]. Parallel policies need an installed
//!   scheduler; without one the lift falls back to sequential execution.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::{sync::Arc, vec::Vec};

// External dependencies
use core::ops::Range;

// Internal dependencies
use crate::algorithms::IndexWindow;
use crate::engine::executor::{LiftConfig, LiftExecutor, Plan};
use crate::engine::scheduler::{Sequential, Vectorized};
use crate::engine::validator::Validator;
use crate::primitives::order::Order;
use crate::primitives::state::State;

// Publicly re-exported types
pub use crate::algorithms::{Algorithm, Layout, PairPolicy};
pub use crate::kernels::{CallShape, Kernel, KernelRef};
pub use crate::primitives::backend::{Policy, Scheduler};
pub use crate::primitives::errors::KernelError;

/// Index state order used by shuffle when none is given (32-bit indices).
const DEFAULT_INDEX_ORDER: u32 = 3;

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring a lift.
#[derive(Debug, Clone, Default)]
pub struct LiftBuilder {
    /// Combinator to run.
    pub algorithm: Option<Algorithm>,

    /// Order of each array element.
    pub element_order: Option<u32>,

    /// Order of the buffer holding the array.
    pub container_order: Option<u32>,

    /// Iteration range `[start, end)`.
    pub range: Option<Range<usize>>,

    /// Concurrency policy.
    pub policy: Option<Policy>,

    /// Kernel for single-kernel combinators.
    pub kernel: Option<KernelRef>,

    /// Kernel table for dispatch.
    pub kernels: Option<Vec<KernelRef>>,

    /// Position of the shared element (shared-state combinators).
    pub shared_slot: Option<usize>,

    /// `(order, slot)` of the running-index field (shared-state combinators).
    pub index_window: Option<(u32, usize)>,

    /// Order of the index state (shuffle).
    pub index_order: Option<u32>,

    /// Treatment of element `i` (all-pairs).
    pub pair_policy: Option<PairPolicy>,

    /// Window width in bytes (extract).
    pub extract_width: Option<usize>,

    // ======================================
    // DEV
    // ======================================
    /// Custom scheduling backend.
    #[doc(hidden)]
    pub scheduler: Option<Arc<dyn Scheduler>>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl LiftBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the combinator.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        if self.algorithm.is_some() {
            self.duplicate_param = Some("algorithm");
        }
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the element order.
    pub fn element_order(mut self, order: u32) -> Self {
        if self.element_order.is_some() {
            self.duplicate_param = Some("element_order");
        }
        self.element_order = Some(order);
        self
    }

    /// Set the container order.
    pub fn container_order(mut self, order: u32) -> Self {
        if self.container_order.is_some() {
            self.duplicate_param = Some("container_order");
        }
        self.container_order = Some(order);
        self
    }

    /// Restrict iteration to `[start, end)`.
    pub fn range(mut self, range: Range<usize>) -> Self {
        if self.range.is_some() {
            self.duplicate_param = Some("range");
        }
        self.range = Some(range);
        self
    }

    /// Set the concurrency policy.
    pub fn policy(mut self, policy: Policy) -> Self {
        if self.policy.is_some() {
            self.duplicate_param = Some("policy");
        }
        self.policy = Some(policy);
        self
    }

    /// Install a custom scheduling backend; its policy becomes the lift's policy.
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        if self.scheduler.is_some() {
            self.duplicate_param = Some("scheduler");
        }
        self.scheduler = Some(scheduler);
        self
    }

    /// Set the kernel.
    pub fn kernel<K: Kernel + 'static>(mut self, kernel: K) -> Self {
        if self.kernel.is_some() {
            self.duplicate_param = Some("kernel");
        }
        self.kernel = Some(Arc::new(kernel));
        self
    }

    /// Set the dispatch table; entry `i` handles element `i`.
    pub fn kernels(mut self, kernels: Vec<KernelRef>) -> Self {
        if self.kernels.is_some() {
            self.duplicate_param = Some("kernels");
        }
        self.kernels = Some(kernels);
        self
    }

    /// Set the position of the shared element.
    pub fn shared_slot(mut self, slot: usize) -> Self {
        if self.shared_slot.is_some() {
            self.duplicate_param = Some("shared_slot");
        }
        self.shared_slot = Some(slot);
        self
    }

    /// Inject the running index into field `slot` (of the given order) of the shared half.
    pub fn index_window(mut self, order: u32, slot: usize) -> Self {
        if self.index_window.is_some() {
            self.duplicate_param = Some("index_window");
        }
        self.index_window = Some((order, slot));
        self
    }

    /// Set the order of the shuffle index state (1, 2 or 3).
    pub fn index_order(mut self, order: u32) -> Self {
        if self.index_order.is_some() {
            self.duplicate_param = Some("index_order");
        }
        self.index_order = Some(order);
        self
    }

    /// Set the all-pairs policy for element `i`.
    pub fn pair_policy(mut self, policy: PairPolicy) -> Self {
        if self.pair_policy.is_some() {
            self.duplicate_param = Some("pair_policy");
        }
        self.pair_policy = Some(policy);
        self
    }

    /// Set the extraction window width in bytes.
    pub fn extract_width(mut self, width: usize) -> Self {
        if self.extract_width.is_some() {
            self.duplicate_param = Some("extract_width");
        }
        self.extract_width = Some(width);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Validate the configuration and produce a runnable lift.
    pub fn build(self) -> Result<Lifted, KernelError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let algorithm = self.algorithm.unwrap_or(Algorithm::Map);
        let set: Vec<&'static str> = [
            ("kernel", self.kernel.is_some()),
            ("kernels", self.kernels.is_some()),
            ("shared_slot", self.shared_slot.is_some()),
            ("index_window", self.index_window.is_some()),
            ("index_order", self.index_order.is_some()),
            ("pair_policy", self.pair_policy.is_some()),
            ("extract_width", self.extract_width.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect();
        Validator::validate_parameters_apply(algorithm, &set)?;
        let container = Order::new(required(self.container_order, "container_order")?)?;
        let pair_policy = self.pair_policy.unwrap_or_default();

        // Dispatch carries a table; every other combinator carries one kernel.
        let (kernel, table) = match algorithm {
            Algorithm::Dispatch => (None, Some(required(self.kernels, "kernels")?)),
            _ => (Some(required(self.kernel, "kernel")?), None),
        };

        let element = match self.element_order {
            Some(k) => Order::new(k)?,
            None => derive_element_order(algorithm, kernel.as_ref(), table.as_deref())?,
        };
        if algorithm != Algorithm::Extract {
            Validator::validate_orders(element, container)?;
        }

        let count = element.elements_in(container);
        let slot = self.shared_slot.unwrap_or(0);
        let width = match algorithm {
            Algorithm::Extract => required(self.extract_width, "extract_width")?,
            _ => 0,
        };
        if algorithm == Algorithm::Extract {
            Validator::validate_extract_width(width, element, container)?;
        }

        // Upper bound of the range and its default.
        let (limit, default_range) = match algorithm {
            Algorithm::SharedReduce | Algorithm::SharedBroadcast => {
                let default = if slot == 0 { 1..count } else { 0..slot.min(count) };
                (count, default)
            }
            Algorithm::HalvesZip => (count / 2, 0..count / 2),
            Algorithm::Extract => {
                let limit = container.size() - width + 1;
                (limit, 0..limit)
            }
            _ => (count, 0..count),
        };
        let range = self.range.unwrap_or(default_range);
        Validator::validate_range(range.start, range.end, limit)?;

        let layout = Layout {
            element,
            container,
            start: range.start,
            end: range.end,
        };

        let window = match self.index_window {
            Some((order, slot)) => {
                let window = IndexWindow {
                    order: Order::new(order)?,
                    slot,
                };
                Validator::validate_index_window(&window, element)?;
                Some(window)
            }
            None => None,
        };

        let plan = match (kernel, table) {
            (_, Some(table)) => {
                Validator::validate_dispatch_table(table.len(), layout.end)?;
                for k in &table[..layout.end] {
                    Validator::validate_kernel_order("dispatch kernel", element, k.order())?;
                }
                Plan::Dispatch(table)
            }
            (Some(kernel), None) => {
                let expected = match algorithm {
                    Algorithm::Map | Algorithm::Extract => element,
                    Algorithm::Shuffle => {
                        let index = Order::new(self.index_order.unwrap_or(DEFAULT_INDEX_ORDER))?;
                        Validator::validate_index_order(index)?;
                        index
                    }
                    _ => element.double()?,
                };
                Validator::validate_kernel_order("kernel", expected, kernel.order())?;
                if matches!(
                    algorithm,
                    Algorithm::SharedReduce | Algorithm::SharedBroadcast
                ) {
                    Validator::validate_shared_slot(slot, layout.start, layout.end, count)?;
                }
                let params = PlanParams {
                    slot,
                    window,
                    pair_policy,
                    index: expected,
                    width,
                };
                single_kernel_plan(algorithm, kernel, params)?
            }
            (None, None) => return Err(KernelError::MissingParameter { parameter: "kernel" }),
        };

        let policy = match &self.scheduler {
            Some(scheduler) => scheduler.policy(),
            None => self.policy.unwrap_or_default(),
        };
        Validator::validate_policy(algorithm, pair_policy, policy)?;

        let scheduler = self
            .scheduler
            .unwrap_or_else(|| builtin_scheduler(policy));

        Ok(Lifted {
            executor: LiftExecutor::from_config(LiftConfig {
                plan,
                layout,
                scheduler,
            }),
        })
    }
}

fn required<T>(value: Option<T>, parameter: &'static str) -> Result<T, KernelError> {
    value.ok_or(KernelError::MissingParameter { parameter })
}

/// Element order implied by the kernel(s) when none is configured.
fn derive_element_order(
    algorithm: Algorithm,
    kernel: Option<&KernelRef>,
    table: Option<&[KernelRef]>,
) -> Result<Order, KernelError> {
    let missing = KernelError::MissingParameter {
        parameter: "element_order",
    };
    match (algorithm, kernel, table) {
        (Algorithm::Shuffle, _, _) => Err(missing),
        (Algorithm::Dispatch, _, Some(table)) => table.first().map(|k| k.order()).ok_or(missing),
        (Algorithm::Map | Algorithm::Extract, Some(kernel), _) => Ok(kernel.order()),
        (_, Some(kernel), _) => kernel.order().half(),
        _ => Err(missing),
    }
}

/// Parameters of single-kernel plans.
struct PlanParams {
    slot: usize,
    window: Option<IndexWindow>,
    pair_policy: PairPolicy,
    index: Order,
    width: usize,
}

fn single_kernel_plan(
    algorithm: Algorithm,
    kernel: KernelRef,
    params: PlanParams,
) -> Result<Plan, KernelError> {
    let PlanParams {
        slot,
        window,
        pair_policy,
        index,
        width,
    } = params;
    Ok(match algorithm {
        Algorithm::Map => Plan::Map(kernel),
        Algorithm::IndexedMap => Plan::IndexedMap(kernel),
        Algorithm::IndexedEmplace => Plan::IndexedEmplace(kernel),
        Algorithm::SharedReduce => Plan::SharedReduce {
            kernel,
            slot,
            window,
        },
        Algorithm::SharedBroadcast => Plan::SharedBroadcast {
            kernel,
            slot,
            window,
        },
        Algorithm::AllPairs => Plan::AllPairs {
            kernel,
            policy: pair_policy,
        },
        Algorithm::HalvesZip => Plan::HalvesZip(kernel),
        Algorithm::Shuffle => Plan::Shuffle { kernel, index },
        Algorithm::Extract => Plan::Extract { kernel, width },
        Algorithm::Dispatch => {
            return Err(KernelError::MissingParameter {
                parameter: "kernels",
            })
        }
    })
}

/// Backend for a policy when no scheduler was installed.
fn builtin_scheduler(policy: Policy) -> Arc<dyn Scheduler> {
    match policy {
        Policy::Sequential => Arc::new(Sequential),
        Policy::Vectorized => Arc::new(Vectorized),
        Policy::ThreadParallel | Policy::MaxParallel => {
            log::warn!(
                "policy {} requested without a parallel scheduler; running sequentially",
                policy.name()
            );
            Arc::new(Sequential)
        }
    }
}

// ============================================================================
// Lifted Algorithm
// ============================================================================

/// A validated lift, reusable across buffers of the container order.
#[derive(Debug, Clone)]
pub struct Lifted {
    executor: LiftExecutor,
}

impl Lifted {
    /// Run the lift over `data`, which must be exactly one container.
    pub fn apply(&self, data: &mut [u8]) -> Result<(), KernelError> {
        Validator::validate_buffer(data.len(), self.layout().container)?;
        self.executor.run(data);
        Ok(())
    }

    /// Run the lift over an owned state of the container order.
    pub fn apply_state(&self, state: &mut State) -> Result<(), KernelError> {
        Validator::validate_kernel_order("state", self.layout().container, state.order())?;
        self.executor.run(state.as_bytes_mut());
        Ok(())
    }

    /// Combinator this lift runs.
    pub fn algorithm(&self) -> Algorithm {
        self.executor.config().plan.algorithm()
    }

    /// Policy of the backend actually in use.
    pub fn policy(&self) -> Policy {
        self.executor.config().scheduler.policy()
    }

    /// Resolved geometry and range.
    pub fn layout(&self) -> &Layout {
        &self.executor.config().layout
    }
}

impl Kernel for Lifted {
    fn order(&self) -> Order {
        self.layout().container
    }

    fn call(&self, state: &mut [u8]) {
        self.executor.run(state);
    }
}
