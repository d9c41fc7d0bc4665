//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer turns a configuration into a runnable lift: it validates
//! every precondition, resolves the scheduling backend and dispatches each
//! call to the matching combinator.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Algorithms
//!   ↓
//! Layer 3: Math
//!   ↓
//! Layer 2: Kernels
//!   ↓
//! Layer 1: Primitives
//! ```

/// Plan execution.
pub mod executor;

/// Single-threaded scheduling backends.
pub mod scheduler;

/// Validation utilities.
pub mod validator;
