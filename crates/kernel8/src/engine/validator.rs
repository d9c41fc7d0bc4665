//! Construction-time validation of lift configurations.
//!
//! ## Purpose
//!
//! This module checks every precondition a lifting combinator relies on:
//! orders, iteration bounds, shared slot and index window placement,
//! dispatch table coverage and policy admissibility. The combinators
//! themselves never re-check; once a plan is validated it cannot index out
//! of bounds.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Static**: All checks depend only on configuration, not on buffer contents.
//!
//! ## Invariants
//!
//! * A range is valid iff `start <= end <= count`.
//! * Sequential-only combinators admit only the `Sequential` policy.
//! * Every parameter that was set is read by the selected combinator.
//!
//! ## Non-goals
//!
//! * This module cannot check kernel purity; that is a caller obligation.

// Internal dependencies
use crate::algorithms::{Algorithm, IndexWindow, PairPolicy};
use crate::primitives::backend::Policy;
use crate::primitives::errors::KernelError;
use crate::primitives::order::Order;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for lift configurations.
///
/// Provides static methods returning `Result<(), KernelError>`.
pub struct Validator;

impl Validator {
    // ========================================================================
    // Geometry
    // ========================================================================

    /// The container must be strictly larger than the element.
    pub fn validate_orders(element: Order, container: Order) -> Result<(), KernelError> {
        if container <= element {
            return Err(KernelError::ContainerTooSmall {
                element: element.get(),
                container: container.get(),
            });
        }
        Ok(())
    }

    /// `start <= end <= count`.
    pub fn validate_range(start: usize, end: usize, count: usize) -> Result<(), KernelError> {
        if start > end || end > count {
            return Err(KernelError::InvalidRange { start, end, count });
        }
        Ok(())
    }

    /// The kernel must accept buffers of the order the combinator hands it.
    pub fn validate_kernel_order(
        role: &'static str,
        expected: Order,
        got: Order,
    ) -> Result<(), KernelError> {
        if expected != got {
            return Err(KernelError::OrderMismatch {
                role,
                expected: expected.get(),
                got: got.get(),
            });
        }
        Ok(())
    }

    /// A buffer handed to a lift must be exactly one container.
    pub fn validate_buffer(len: usize, container: Order) -> Result<(), KernelError> {
        if len != container.size() {
            return Err(KernelError::LengthMismatch {
                expected: container.size(),
                got: len,
            });
        }
        Ok(())
    }

    // ========================================================================
    // Combinator Parameters
    // ========================================================================

    /// The shared slot must exist and lie outside `[start, end)`.
    pub fn validate_shared_slot(
        slot: usize,
        start: usize,
        end: usize,
        count: usize,
    ) -> Result<(), KernelError> {
        if slot >= count {
            return Err(KernelError::IndexOutOfBounds {
                index: slot,
                len: count,
            });
        }
        if slot >= start && slot < end {
            return Err(KernelError::SharedSlotInRange { slot, start, end });
        }
        Ok(())
    }

    /// The index field must fit inside one element.
    pub fn validate_index_window(window: &IndexWindow, element: Order) -> Result<(), KernelError> {
        let fits = window.order <= element && window.slot < window.order.elements_in(element);
        if !fits {
            return Err(KernelError::InvalidIndexWindow {
                order: window.order.get(),
                slot: window.slot,
                element: element.get(),
            });
        }
        Ok(())
    }

    /// Shuffle indices are 8, 16 or 32 bits wide.
    pub fn validate_index_order(order: Order) -> Result<(), KernelError> {
        if !(1..=3).contains(&order.get()) {
            return Err(KernelError::InvalidIndexOrder(order.get()));
        }
        Ok(())
    }

    /// The dispatch table must hold a kernel for every visited position.
    pub fn validate_dispatch_table(len: usize, end: usize) -> Result<(), KernelError> {
        if len < end {
            return Err(KernelError::DispatchTableTooShort { got: len, min: end });
        }
        Ok(())
    }

    /// The window must be non-empty and fit both the kernel state and the container.
    pub fn validate_extract_width(
        width: usize,
        state: Order,
        container: Order,
    ) -> Result<(), KernelError> {
        let max = state.size().min(container.size());
        if width == 0 || width > max {
            return Err(KernelError::InvalidExtractWidth { got: width, max });
        }
        Ok(())
    }

    // ========================================================================
    // Policy
    // ========================================================================

    /// Combinators with a carried dependency only run sequentially.
    pub fn validate_policy(
        algorithm: Algorithm,
        pair_policy: PairPolicy,
        policy: Policy,
    ) -> Result<(), KernelError> {
        let sequential_only = match algorithm {
            Algorithm::SharedReduce => true,
            Algorithm::AllPairs => pair_policy == PairPolicy::WriteBack,
            _ => false,
        };
        if sequential_only && policy != Policy::Sequential {
            return Err(KernelError::UnsupportedPolicy {
                algorithm: algorithm.name(),
                policy: policy.name(),
            });
        }
        Ok(())
    }

    /// No builder parameter was set twice.
    pub fn validate_no_duplicates(duplicate: Option<&'static str>) -> Result<(), KernelError> {
        match duplicate {
            Some(parameter) => Err(KernelError::DuplicateParameter { parameter }),
            None => Ok(()),
        }
    }

    /// Every parameter in `set` is read by `algorithm`.
    ///
    /// Parameters are named as their builder setters; geometry, policy and
    /// scheduler settings apply to every combinator.
    pub fn validate_parameters_apply(
        algorithm: Algorithm,
        set: &[&'static str],
    ) -> Result<(), KernelError> {
        let shared = matches!(
            algorithm,
            Algorithm::SharedReduce | Algorithm::SharedBroadcast
        );
        for &parameter in set {
            let applies = match parameter {
                "kernel" => algorithm != Algorithm::Dispatch,
                "kernels" => algorithm == Algorithm::Dispatch,
                "shared_slot" | "index_window" => shared,
                "index_order" => algorithm == Algorithm::Shuffle,
                "pair_policy" => algorithm == Algorithm::AllPairs,
                "extract_width" => algorithm == Algorithm::Extract,
                _ => true,
            };
            if !applies {
                return Err(KernelError::UnusedParameter {
                    parameter,
                    algorithm: algorithm.name(),
                });
            }
        }
        Ok(())
    }
}
