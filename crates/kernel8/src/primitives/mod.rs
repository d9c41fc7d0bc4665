//! Layer 1: Primitives
//!
//! ## Purpose
//!
//! This layer provides the buffer hierarchy that every other layer builds
//! on: orders, owned states, typed views, pairing, index encoding, numeric
//! lanes, error types and the concurrency policy enum.
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
//! Layer 2: Kernels
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Concurrency policy enum.
pub mod backend;

/// Error types.
pub mod errors;

/// Index state encoding.
pub mod index;

/// Numeric reinterpretation of small buffers.
pub mod lane;

/// Buffer orders.
pub mod order;

/// Pairing and extraction.
pub mod pair;

/// Owned buffers and byte-level operations.
pub mod state;

/// Typed array views.
pub mod view;
