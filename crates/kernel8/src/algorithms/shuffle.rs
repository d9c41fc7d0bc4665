//! Shuffle.
//!
//! ## Purpose
//!
//! For `i` in `[start, end)`, the kernel maps the index state of `i` (an
//! 8, 16 or 32 bit buffer) to a destination index, which is masked by
//! `count - 1`. Element `i` of the original array is copied to that
//! destination in a zeroed output array, which then replaces the container.
//!
//! ## Invariants
//!
//! * The mapping is not required to be a bijection. When two sources land
//!   on one slot the later source index wins; slots nobody lands on are
//!   zero afterwards.
//! * Destinations are computed in parallel; the scatter runs in ascending
//!   source order, so the result does not depend on the scheduler.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::Layout;
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;
use crate::primitives::index::{read_index, write_index};
use crate::primitives::order::Order;

/// Permute (or scatter) elements by an index-producing kernel of order `index`.
pub fn shuffle(
    data: &mut [u8],
    layout: &Layout,
    index: Order,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let width = index.size();
    let mask = layout.count() - 1;
    let visited = layout.end - layout.start;

    let mut destinations: Vec<u8> = vec![0u8; visited * width];
    scheduler.run(&mut destinations, width, layout.start, &|i, slot| {
        write_index(i, slot);
        kernel.call(slot);
    });

    let mut out: Vec<u8> = vec![0u8; data.len()];
    for (k, slot) in destinations.chunks_exact(width).enumerate() {
        let dest = read_index(slot) & mask;
        let src = layout.element_bytes(layout.start + k);
        out[layout.element_bytes(dest)].copy_from_slice(&data[src]);
    }
    data.copy_from_slice(&out);
}
