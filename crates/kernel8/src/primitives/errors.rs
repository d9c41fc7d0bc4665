//! Error types for kernel8 operations.
//!
//! ## Purpose
//!
//! This module defines the error conditions that can be detected while
//! constructing states, views and lifted algorithms. Every variant is a
//! caller error (a violated precondition); none of them describe a failure
//! inside a transformation.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors include the offending values (orders, lengths, bounds).
//! * **Deferred**: Builder errors are recorded during configuration and surfaced by `build()`.
//! * **No-std**: Works without the standard library; `std::error::Error` is implemented under `std`.
//!
//! ## Key concepts
//!
//! 1. **Order validation**: Orders outside `1..=35`, or element/container mismatches.
//! 2. **Range validation**: Iteration bounds outside the element array.
//! 3. **Layout validation**: Shared slots, index windows and dispatch tables that do not fit.
//! 4. **Buffer validation**: Byte lengths that do not match the declared order.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Orders are reported as the raw order number, lengths in bytes, indices in elements.
//!
//! ## Non-goals
//!
//! * Transformations never return errors; domain errors inside them clamp to zero.
//! * This module does not perform the validation logic itself.

// Feature-gated imports
#[cfg(feature = "std")]
use std::error::Error;

// External dependencies
use core::fmt::{Display, Formatter, Result};

// ============================================================================
// Error Type
// ============================================================================

/// Error type for kernel8 operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// Order is outside the supported range `1..=35`.
    InvalidOrder(u32),

    /// A byte buffer does not have the size its order requires.
    LengthMismatch {
        /// Expected number of bytes.
        expected: usize,
        /// Number of bytes provided.
        got: usize,
    },

    /// A kernel or state has a different order than the position it is used in.
    OrderMismatch {
        /// What the order was checked for (e.g. "kernel", "pair").
        role: &'static str,
        /// Required order.
        expected: u8,
        /// Order provided.
        got: u8,
    },

    /// The container order must be strictly larger than the element order.
    ContainerTooSmall {
        /// Element order.
        element: u8,
        /// Container order.
        container: u8,
    },

    /// Iteration range does not satisfy `start <= end <= count`.
    InvalidRange {
        /// First element visited.
        start: usize,
        /// One past the last element visited.
        end: usize,
        /// Number of elements in the array.
        count: usize,
    },

    /// Element index is outside the view.
    IndexOutOfBounds {
        /// Index requested.
        index: usize,
        /// Number of elements in the view.
        len: usize,
    },

    /// Byte offset does not leave room for a whole element.
    OffsetOutOfBounds {
        /// Byte offset requested.
        offset: usize,
        /// Bytes required from that offset.
        width: usize,
        /// Total bytes in the view.
        len: usize,
    },

    /// The shared accumulator slot lies inside the iteration range.
    SharedSlotInRange {
        /// Shared slot index.
        slot: usize,
        /// First element visited.
        start: usize,
        /// One past the last element visited.
        end: usize,
    },

    /// The running-index window does not fit inside the shared half.
    InvalidIndexWindow {
        /// Order of the index field.
        order: u8,
        /// Slot of the index field inside the shared element.
        slot: usize,
        /// Order of the shared element.
        element: u8,
    },

    /// Shuffle index width must be order 1, 2 or 3 (8, 16 or 32 bits).
    InvalidIndexOrder(u8),

    /// Multi-kernel dispatch table has fewer entries than the range requires.
    DispatchTableTooShort {
        /// Number of kernels provided.
        got: usize,
        /// Minimum number of kernels required.
        min: usize,
    },

    /// Extraction width must be non-zero and fit the kernel state.
    InvalidExtractWidth {
        /// Width provided, in bytes.
        got: usize,
        /// Largest admissible width, in bytes.
        max: usize,
    },

    /// A required builder parameter was not provided.
    MissingParameter {
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// The selected algorithm cannot run its outer loop under this policy.
    UnsupportedPolicy {
        /// Algorithm name.
        algorithm: &'static str,
        /// Policy name.
        policy: &'static str,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },

    /// Parameter was set but the selected algorithm never reads it.
    UnusedParameter {
        /// Name of the parameter.
        parameter: &'static str,
        /// Algorithm name.
        algorithm: &'static str,
    },
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::InvalidOrder(order) => {
                write!(f, "Invalid order: {order} (must be in [1, 35])")
            }
            Self::LengthMismatch { expected, got } => {
                write!(f, "Length mismatch: expected {expected} bytes, got {got}")
            }
            Self::OrderMismatch {
                role,
                expected,
                got,
            } => {
                write!(f, "Order mismatch for {role}: expected {expected}, got {got}")
            }
            Self::ContainerTooSmall { element, container } => {
                write!(
                    f,
                    "Container order {container} must be larger than element order {element}"
                )
            }
            Self::InvalidRange { start, end, count } => {
                write!(
                    f,
                    "Invalid range: [{start}, {end}) (must satisfy start <= end <= {count})"
                )
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds for {len} elements")
            }
            Self::OffsetOutOfBounds { offset, width, len } => {
                write!(
                    f,
                    "Offset {offset} cannot hold {width} bytes in a {len}-byte buffer"
                )
            }
            Self::SharedSlotInRange { slot, start, end } => {
                write!(
                    f,
                    "Shared slot {slot} lies inside the iteration range [{start}, {end})"
                )
            }
            Self::InvalidIndexWindow {
                order,
                slot,
                element,
            } => {
                write!(
                    f,
                    "Index window of order {order} at slot {slot} does not fit an order {element} element"
                )
            }
            Self::InvalidIndexOrder(order) => {
                write!(f, "Invalid index order: {order} (must be 1, 2 or 3)")
            }
            Self::DispatchTableTooShort { got, min } => {
                write!(f, "Dispatch table too short: got {got} kernels, need {min}")
            }
            Self::InvalidExtractWidth { got, max } => {
                write!(f, "Invalid extraction width: {got} (must be in [1, {max}])")
            }
            Self::MissingParameter { parameter } => {
                write!(f, "Missing required parameter '{parameter}'")
            }
            Self::UnsupportedPolicy { algorithm, policy } => {
                write!(
                    f,
                    "Algorithm '{algorithm}' is sequential and cannot run under policy '{policy}'"
                )
            }
            Self::DuplicateParameter { parameter } => {
                write!(
                    f,
                    "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
                )
            }
            Self::UnusedParameter {
                parameter,
                algorithm,
            } => {
                write!(
                    f,
                    "Parameter '{parameter}' does not apply to algorithm '{algorithm}'"
                )
            }
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

#[cfg(feature = "std")]
impl Error for KernelError {}
