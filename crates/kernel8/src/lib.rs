//! # kernel8: lift small kernels into whole-array algorithms
//!
//! A framework for building parallel and vectorizable array algorithms over
//! fixed, power-of-two sized byte buffers ("states"). A small, pure kernel
//! defined on one buffer order is lifted into an algorithm over an array of
//! such buffers packed inside a much larger container, under a chosen
//! concurrency policy.
//!
//! ## Orders
//!
//! A buffer of order `k` holds `2^(k-1)` bytes, so order 1 is a byte, order 3
//! a 32-bit word and order 35 sixteen gigabytes. Any buffer of order `m` can
//! be read, without copying, as an array of `2^(m-n)` elements of order `n`.
//! Two buffers of order `n` combine into a pair of order `n + 1` whose first
//! half is the *high* element and whose second half is the *low* element.
//!
//! ## Quick Start
//!
//! ```rust
//! use kernel8::prelude::*;
//!
//! // A kernel over 32-bit words: multiply by five.
//! let times_five = lane_map::<u32, _>(|x| x.wrapping_mul(5));
//!
//! // Lift it over the four words of a 16-byte container.
//! let lift = Lift::new()
//!     .algorithm(Map)
//!     .container_order(5)
//!     .kernel(times_five)
//!     .build()?;
//!
//! let mut state = State::from_lanes(&[1u32, 2, 3, 4])?;
//! lift.apply_state(&mut state)?;
//! assert_eq!(state.to_lanes::<u32>(), vec![5, 10, 15, 20]);
//! # Result::<(), KernelError>::Ok(())
//! ```
//!
//! ## Combinators
//!
//! | Algorithm         | Kernel order | Visits                          | Parallel      |
//! |-------------------|--------------|---------------------------------|---------------|
//! | `Map`             | `n`          | each element                    | yes           |
//! | `IndexedMap`      | `n + 1`      | `(index, element)`              | yes           |
//! | `IndexedEmplace`  | `n + 1`      | `(index, element)`, scattered   | yes           |
//! | `SharedReduce`    | `n + 1`      | `(accumulator, element)`        | no            |
//! | `SharedBroadcast` | `n + 1`      | `(shared, element)`             | yes           |
//! | `AllPairs`        | `n + 1`      | `(element_i, element_j)`, i < j | inner loop    |
//! | `HalvesZip`       | `n + 1`      | `(first[i], second[i])`         | yes           |
//! | `Shuffle`         | index order  | index of each element           | yes           |
//! | `Dispatch`        | `n`          | element `i` with kernel `i`     | yes           |
//! | `Extract`         | any          | fixed-width byte windows        | yes           |
//!
//! Kernels are composed with [`Chain`](prelude::Chain), and every built lift is
//! itself a kernel at the container order.
//!
//! ## Kernel purity
//!
//! A kernel must read and write only the bytes it is handed and must be
//! deterministic. This cannot be checked; every parallel lift relies on it.
//!
//! ## no_std
//!
//! Disable default features to build without `std`; the crate then needs
//! `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// Layer 1: Primitives - orders, states, views and pairing.
mod primitives;

// Layer 2: Kernels - the transformation contract.
mod kernels;

// Layer 3: Math - numeric opcode kernels.
mod math;

// Layer 4: Algorithms - lifting combinators.
mod algorithms;

// Layer 5: Engine - validation, scheduling and execution.
mod engine;

// High-level fluent API for lifting kernels.
mod api;

// Standard kernel8 prelude.
pub mod prelude {
    pub use crate::api::{
        Algorithm::AllPairs,
        Algorithm::Dispatch,
        Algorithm::Extract,
        Algorithm::HalvesZip,
        Algorithm::IndexedEmplace,
        Algorithm::IndexedMap,
        Algorithm::Map,
        Algorithm::SharedBroadcast,
        Algorithm::SharedReduce,
        Algorithm::Shuffle,
        Algorithm, CallShape, Kernel, KernelError, KernelRef, LiftBuilder as Lift, Lifted,
        PairPolicy::ReadOnly,
        PairPolicy::WriteBack,
        Policy::MaxParallel,
        Policy::Sequential,
        Policy::ThreadParallel,
        Policy::Vectorized,
        Policy, Scheduler,
    };
    pub use crate::kernels::chain::Chain;
    pub use crate::kernels::transform::Transform;
    pub use crate::math::float::{FloatMode, FloatOp, FloatUnary};
    pub use crate::math::int::{IntOp, IntUnary};
    pub use crate::math::vlint::{VlintOp, VlintUnary};
    pub use crate::math::{float, int, lane_map, lane_zip, vlint};
    pub use crate::primitives::lane::Lane;
    pub use crate::primitives::order::Order;
    pub use crate::primitives::pair::{combine, duplicate, high, low};
    pub use crate::primitives::state::State;
    pub use crate::primitives::view::{StateView, StateViewMut};
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod kernels {
        pub use crate::kernels::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
