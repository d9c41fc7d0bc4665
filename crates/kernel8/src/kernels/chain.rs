//! Sequential composition of kernels.
//!
//! `Chain::new(a, b)` is the kernel that applies `a` and then `b` to the same
//! buffer. Both kernels must share one order.

// Internal dependencies
use crate::kernels::{Kernel, KernelRef};
use crate::primitives::errors::KernelError;
use crate::primitives::order::Order;

/// `second ∘ first`.
#[derive(Debug, Clone)]
pub struct Chain {
    first: KernelRef,
    second: KernelRef,
}

impl Chain {
    /// Compose two kernels of the same order.
    pub fn new(first: KernelRef, second: KernelRef) -> Result<Self, KernelError> {
        if first.order() != second.order() {
            return Err(KernelError::OrderMismatch {
                role: "chained kernel",
                expected: first.order().get(),
                got: second.order().get(),
            });
        }
        Ok(Self { first, second })
    }
}

impl Kernel for Chain {
    fn order(&self) -> Order {
        self.first.order()
    }

    fn call(&self, state: &mut [u8]) {
        self.first.call(state);
        self.second.call(state);
    }

    // States are independent, so the whole run can pass through each stage.
    fn call_block(&self, states: &mut [u8]) {
        self.first.call_block(states);
        self.second.call_block(states);
    }
}
