//! Closure-backed kernels.
//!
//! ## Purpose
//!
//! [`Transform`] registers an ordinary closure as a kernel, recording only
//! the order it operates on and its calling shape.
//!
//! ## Design notes
//!
//! * **By value**: The buffer is copied into a [`State`], passed to the
//!   closure, and the returned state is copied back. Convenient for small orders.
//! * **By reference**: The closure mutates the element bytes directly. Use this
//!   for large orders where copying is prohibitive.
//! * **Block body**: [`Transform::with_block`] attaches an optional closure over
//!   a run of consecutive states. Without one, runs are processed state by state.
//!
//! ## Invariants
//!
//! * A by-value closure must return a state of the same order it received.
//!   A result of any other order is a bug in the closure: debug builds panic,
//!   release builds discard it and leave the buffer unchanged.
//! * A block body must leave every state exactly as the element body would.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

// External dependencies
use core::fmt;

// Internal dependencies
use crate::kernels::{CallShape, Kernel};
use crate::primitives::errors::KernelError;
use crate::primitives::order::Order;
use crate::primitives::state::State;

type ValueFn = dyn Fn(State) -> State + Send + Sync;
type RefFn = dyn Fn(&mut [u8]) + Send + Sync;
type BlockFn = dyn Fn(&mut [u8]) + Send + Sync;

enum Body {
    ByValue(Box<ValueFn>),
    ByReference(Box<RefFn>),
}

/// A kernel defined by a closure.
pub struct Transform {
    order: Order,
    body: Body,
    block: Option<Box<BlockFn>>,
}

impl Transform {
    /// Register a value-in/value-out closure.
    pub fn by_value<F>(order: Order, f: F) -> Self
    where
        F: Fn(State) -> State + Send + Sync + 'static,
    {
        Self {
            order,
            body: Body::ByValue(Box::new(f)),
            block: None,
        }
    }

    /// Register an in-place closure.
    pub fn by_reference<F>(order: Order, f: F) -> Self
    where
        F: Fn(&mut [u8]) + Send + Sync + 'static,
    {
        Self {
            order,
            body: Body::ByReference(Box::new(f)),
            block: None,
        }
    }

    /// Attach a body that transforms a whole run of consecutive states.
    pub fn with_block<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut [u8]) + Send + Sync + 'static,
    {
        self.block = Some(Box::new(f));
        self
    }

    /// The kernel that leaves its buffer unchanged.
    pub fn identity(order: Order) -> Self {
        Self::by_reference(order, |_| {})
    }

    /// Apply the kernel to an owned state of the right order.
    pub fn eval(&self, state: State) -> Result<State, KernelError> {
        if state.order() != self.order {
            return Err(KernelError::OrderMismatch {
                role: "kernel input",
                expected: self.order.get(),
                got: state.order().get(),
            });
        }
        match &self.body {
            Body::ByValue(f) => {
                let out = f(state);
                if out.order() != self.order {
                    return Err(KernelError::OrderMismatch {
                        role: "kernel output",
                        expected: self.order.get(),
                        got: out.order().get(),
                    });
                }
                Ok(out)
            }
            Body::ByReference(f) => {
                let mut state = state;
                f(state.as_bytes_mut());
                Ok(state)
            }
        }
    }
}

impl Kernel for Transform {
    fn order(&self) -> Order {
        self.order
    }

    fn shape(&self) -> CallShape {
        match self.body {
            Body::ByValue(_) => CallShape::ByValue,
            Body::ByReference(_) => CallShape::ByReference,
        }
    }

    fn call(&self, state: &mut [u8]) {
        match &self.body {
            Body::ByValue(f) => {
                let input = match State::from_bytes(self.order, state) {
                    Ok(s) => s,
                    Err(e) => {
                        log::error!("by-value kernel called on a foreign buffer: {e}");
                        return;
                    }
                };
                let out = f(input);
                debug_assert!(
                    out.order() == self.order,
                    "by-value kernel of order {} returned order {}",
                    self.order,
                    out.order()
                );
                if out.order() == self.order {
                    state.copy_from_slice(out.as_bytes());
                } else {
                    log::error!(
                        "by-value kernel of order {} returned order {}; result discarded",
                        self.order,
                        out.order()
                    );
                }
            }
            Body::ByReference(f) => f(state),
        }
    }

    fn call_block(&self, states: &mut [u8]) {
        match &self.block {
            Some(f) => f(states),
            None => {
                for state in states.chunks_exact_mut(self.order.size()) {
                    self.call(state);
                }
            }
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("order", &self.order)
            .field("shape", &self.shape())
            .field("block", &self.block.is_some())
            .finish()
    }
}
