//! # fastKernel8
//!
//! Multi-threaded backends for `kernel8` lifted algorithms.
//!
//! `kernel8` lifts small pure kernels over power-of-two byte states into
//! whole-array algorithms and runs them on the calling thread. This crate
//! adds the [`ThreadParallel`](prelude::ThreadParallel) and
//! [`MaxParallel`](prelude::MaxParallel) policies on top of
//! [rayon](https://docs.rs/rayon), and a builder that selects them by
//! default.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastKernel8::prelude::*;
//!
//! // Add one to every byte of a 4 KiB buffer on the rayon pool.
//! let lift = Lift::new()
//!     .container_order(13)
//!     .kernel(lane_map::<u8, _>(|x| x.wrapping_add(1)))
//!     .build()?;
//! assert_eq!(lift.policy(), ThreadParallel);
//!
//! let mut data = vec![0u8; 4096];
//! lift.apply(&mut data)?;
//! assert!(data.iter().all(|&b| b == 1));
//! # Result::<(), KernelError>::Ok(())
//! ```
//!
//! ## Policies
//!
//! | Policy           | Backend                                   |
//! |------------------|-------------------------------------------|
//! | `Sequential`     | core sequential loop                      |
//! | `Vectorized`     | core lane-blocked loop                    |
//! | `ThreadParallel` | one contiguous block per rayon worker     |
//! | `MaxParallel`    | one rayon task per element                |
//!
//! Shared-state reduce and write-back all-pairs are inherently sequential;
//! the builder picks `Sequential` for them unless told otherwise, and an
//! explicit parallel policy is rejected with the core error.
//!
//! ## Feature Flags
//!
//! * `cpu` (default): rayon backends. Without it the parallel policies run
//!   sequentially and log a warning.

#![allow(non_snake_case)]

// Layer 5: Engine - rayon schedulers.
mod engine;

// High-level fluent API for parallel lifts.
mod api;

// Standard fastKernel8 prelude.
pub mod prelude {
    pub use kernel8::prelude::*;

    pub use crate::api::ParallelLiftBuilder as Lift;
    pub use crate::engine::executor::parallel_scheduler;
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
