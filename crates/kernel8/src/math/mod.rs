//! Layer 3: Math
//!
//! ## Purpose
//!
//! This layer provides ready-made numeric kernels: integer and floating
//! point opcodes over small lanes, and arbitrary-width ("very large")
//! integer arithmetic over whole buffers. They are ordinary kernels and
//! can be lifted like any other.
//!
//! ## Design notes
//!
//! * **Pair convention**: Binary opcodes run on a pair whose halves hold the
//!   two operands; the result replaces the first half and the second half
//!   is left as it was.
//! * **No error channel**: Domain errors (division by zero, non-finite
//!   operands) produce the zero value of the lane instead of failing.
//! * **Block bodies**: Every lane kernel carries a monomorphic loop over runs of
//!   states; the integer and float binary opcodes run theirs on `wide` vectors.
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
//! Layer 3: Math ← You are here
//!   ↓
//! Layer 2: Kernels
//!   ↓
//! Layer 1: Primitives
//! ```

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

// Internal dependencies
use crate::kernels::transform::Transform;
use crate::primitives::lane::Lane;
use crate::primitives::order::Order;

/// Floating point opcodes.
pub mod float;

/// Integer opcodes.
pub mod int;

/// Very large integer opcodes.
pub mod vlint;

/// Lane-blocked opcode bodies on `wide` vectors.
pub mod vector;

/// Kernel applying `f` to a single lane of type `T`.
pub fn lane_map<T, F>(f: F) -> Transform
where
    T: Lane,
    F: Fn(T) -> T + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let g = Arc::clone(&f);
    Transform::by_reference(Order::of_lane::<T>(), move |bytes: &mut [u8]| {
        f(T::read(bytes)).write(bytes);
    })
    .with_block(move |states: &mut [u8]| {
        for bytes in states.chunks_exact_mut(T::WIDTH) {
            g(T::read(bytes)).write(bytes);
        }
    })
}

/// Pair kernel applying `f` to the two lanes `(high, low)` and storing both results.
pub fn lane_zip<T, F>(f: F) -> Transform
where
    T: Lane,
    F: Fn(T, T) -> (T, T) + Send + Sync + 'static,
{
    let step = Arc::new(move |bytes: &mut [u8]| {
        let (high, low) = bytes.split_at_mut(T::WIDTH);
        let (h, l) = f(T::read(high), T::read(low));
        h.write(high);
        l.write(low);
    });
    let block = Arc::clone(&step);
    Transform::by_reference(Order::pair_of_lane::<T>(), move |bytes: &mut [u8]| step(bytes))
        .with_block(move |pairs: &mut [u8]| {
            pairs.chunks_exact_mut(2 * T::WIDTH).for_each(|bytes| block(bytes));
        })
}
