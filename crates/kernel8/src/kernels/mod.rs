//! Layer 2: Kernels
//!
//! ## Purpose
//!
//! This layer defines the transformation contract. A kernel is a small,
//! pure function over one buffer order; the combinators in the algorithms
//! layer lift kernels into whole-array algorithms.
//!
//! ## Design notes
//!
//! * **Trust, not enforcement**: Purity cannot be checked. A kernel must read
//!   and write only the bytes it is given and must be deterministic; every
//!   parallel lift relies on this.
//! * **One calling convention**: Internally every kernel is invoked in place on
//!   a byte slice. Value-shaped kernels are adapted by copying in and out.
//! * **Trait objects**: Kernels are shared as `Arc<dyn Kernel>` so dispatch
//!   tables and lifted algorithms can hold heterogeneous kernels.
//!
//! ## Key concepts
//!
//! * **Order**: The single buffer order a kernel accepts.
//! * **Shape**: By value (returns a new buffer) or by reference (mutates in place).
//!   Both shapes must be behaviorally identical.
//! * **Blocks**: Map-shaped combinators hand a kernel runs of consecutive
//!   states through [`Kernel::call_block`]. Kernels with a vector body
//!   override it; everyone else inherits the per-state loop.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Algorithms
//!   ↓
//! Layer 3: Math
//!   ↓
//! Layer 2: Kernels ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

// External dependencies
use core::fmt;

// Internal dependencies
use crate::primitives::order::Order;

/// Composition of two kernels.
pub mod chain;

/// Closure-backed kernels.
pub mod transform;

// ============================================================================
// Contract
// ============================================================================

/// How a kernel's body receives its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallShape {
    /// Receives and returns an owned buffer.
    ByValue,

    /// Mutates the referenced buffer in place.
    #[default]
    ByReference,
}

/// A pure transformation over buffers of a single order.
pub trait Kernel: Send + Sync {
    /// Order of the buffers this kernel accepts.
    fn order(&self) -> Order;

    /// Calling shape of the underlying body.
    fn shape(&self) -> CallShape {
        CallShape::ByReference
    }

    /// Transform `state` in place. `state.len()` equals `self.order().size()`.
    fn call(&self, state: &mut [u8]);

    /// Transform a run of consecutive states in place.
    ///
    /// `states.len()` is a multiple of `self.order().size()`, and the result
    /// must equal calling [`Kernel::call`] on each state in turn.
    fn call_block(&self, states: &mut [u8]) {
        for state in states.chunks_exact_mut(self.order().size()) {
            self.call(state);
        }
    }
}

impl fmt::Debug for dyn Kernel + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Kernel")
            .field("order", &self.order().get())
            .field("shape", &self.shape())
            .finish()
    }
}

/// Shared handle to a kernel.
pub type KernelRef = Arc<dyn Kernel>;

impl<K: Kernel + ?Sized> Kernel for Arc<K> {
    fn order(&self) -> Order {
        (**self).order()
    }

    fn shape(&self) -> CallShape {
        (**self).shape()
    }

    fn call(&self, state: &mut [u8]) {
        (**self).call(state)
    }

    fn call_block(&self, states: &mut [u8]) {
        (**self).call_block(states)
    }
}
