//! Layer 5: Engine
//!
//! ## Purpose
//!
//! This layer provides the rayon-backed schedulers that the core execution
//! engine runs lifted algorithms on.

/// Parallel schedulers and policy resolution.
pub mod executor;
