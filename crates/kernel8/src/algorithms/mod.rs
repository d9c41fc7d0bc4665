//! Layer 4: Algorithms
//!
//! ## Purpose
//!
//! This layer contains the lifting combinators: each turns a small kernel
//! into an algorithm over an array of elements packed inside a larger
//! container buffer.
//!
//! ## Design notes
//!
//! * **Runtime layout**: Every combinator is one function over a borrowed
//!   container slice and a [`Layout`] (element order, container order and
//!   iteration range), instead of one generated function per size.
//! * **Scheduler injection**: Loops that are free of cross-iteration
//!   dependencies run through a [`Scheduler`]; loops that carry state run as
//!   plain ascending loops.
//! * **Scatter safety**: Combinators whose writes may collide (emplace,
//!   shuffle) compute into scratch space and commit in ascending source order.
//! * **Validated input**: Functions here assume the engine validator has
//!   already checked orders, ranges and slots.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Algorithms ← You are here
//!   ↓
//! Layer 3: Math
//!   ↓
//! Layer 2: Kernels
//!   ↓
//! Layer 1: Primitives
//! ```
//!
//! [`Scheduler`]: crate::primitives::backend::Scheduler

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use core::ops::Range;

// Internal dependencies
use crate::primitives::order::Order;

/// Multi-kernel dispatch.
pub mod dispatch;

/// Fixed-width data extraction.
pub mod extract;

/// Halves-zip.
pub mod halves;

/// Indexed map and indexed emplace.
pub mod indexed;

/// Plain map.
pub mod map;

/// All-pairs.
pub mod pairs;

/// Shared-state reduce and read-only broadcast.
pub mod shared;

/// Shuffle.
pub mod shuffle;

// ============================================================================
// Configuration Types
// ============================================================================

/// Lifting combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Replace each element with `kernel(element)`.
    Map,

    /// Pass `(index, element)`; keep the new element.
    IndexedMap,

    /// Pass `(index, element)`; the returned index selects where the new element lands.
    IndexedEmplace,

    /// Thread an accumulator through the elements in ascending order.
    SharedReduce,

    /// Pair every element with a read-only copy of the shared element.
    SharedBroadcast,

    /// Visit every pair `(i, j)` with `i < j`.
    AllPairs,

    /// Pair position `i` of the first half with position `i` of the second half.
    HalvesZip,

    /// Move each element to the position computed from its index.
    Shuffle,

    /// Apply the `i`-th kernel of a table to element `i`.
    Dispatch,

    /// Run the kernel over consecutive fixed-width byte windows.
    Extract,
}

impl Algorithm {
    /// Stable name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::IndexedMap => "indexed-map",
            Self::IndexedEmplace => "indexed-emplace",
            Self::SharedReduce => "shared-reduce",
            Self::SharedBroadcast => "shared-broadcast",
            Self::AllPairs => "all-pairs",
            Self::HalvesZip => "halves-zip",
            Self::Shuffle => "shuffle",
            Self::Dispatch => "dispatch",
            Self::Extract => "extract",
        }
    }
}

/// Treatment of element `i` in the all-pairs combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PairPolicy {
    /// Element `i` is threaded through its inner loop and written back (sequential).
    #[default]
    WriteBack,

    /// Element `i` is a fixed read-only input (inner loop may run in parallel).
    ReadOnly,
}

/// Sub-field of the shared element that receives the running index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexWindow {
    /// Order of the index field.
    pub order: Order,

    /// Slot of the field, counted in fields of that order.
    pub slot: usize,
}

impl IndexWindow {
    /// Byte range of the field inside the shared element.
    pub fn bytes(&self) -> Range<usize> {
        let size = self.order.size();
        self.slot * size..(self.slot + 1) * size
    }
}

/// Element geometry of a lift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Element order.
    pub element: Order,

    /// Container order.
    pub container: Order,

    /// First element visited.
    pub start: usize,

    /// One past the last element visited.
    pub end: usize,
}

impl Layout {
    /// Layout covering the whole container.
    pub fn full(element: Order, container: Order) -> Self {
        Self {
            element,
            container,
            start: 0,
            end: element.elements_in(container),
        }
    }

    /// Number of elements in the container.
    #[inline]
    pub fn count(&self) -> usize {
        self.element.elements_in(self.container)
    }

    /// Element size in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.element.size()
    }

    /// Byte range of element `i`.
    #[inline]
    pub fn element_bytes(&self, i: usize) -> Range<usize> {
        i * self.stride()..(i + 1) * self.stride()
    }

    /// Byte range covered by `[start, end)`.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start * self.stride()..self.end * self.stride()
    }
}

// ============================================================================
// Scratch Space
// ============================================================================

const INLINE_SCRATCH: usize = 256;

/// Run `f` on a zeroed scratch buffer of `len` bytes.
#[inline]
pub(crate) fn with_scratch<R>(len: usize, f: impl FnOnce(&mut [u8]) -> R) -> R {
    if len <= INLINE_SCRATCH {
        let mut buf = [0u8; INLINE_SCRATCH];
        f(&mut buf[..len])
    } else {
        let mut buf: Vec<u8> = vec![0u8; len];
        f(&mut buf)
    }
}
