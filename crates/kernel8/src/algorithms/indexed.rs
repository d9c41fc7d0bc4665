//! Indexed map and indexed emplace.
//!
//! ## Purpose
//!
//! Both combinators pass the kernel a pair `(index(i), element_i)` of order
//! `n + 1`, where `index(i)` is `i` encoded as an order-`n` buffer.
//!
//! * **Indexed map** keeps only the low half of the result, so a kernel can
//!   depend on its position but cannot move its output.
//! * **Indexed emplace** reads both halves: the (possibly rewritten) index,
//!   masked by `count - 1`, selects the destination slot for the (possibly
//!   rewritten) element.
//!
//! ## Invariants
//!
//! * Emplace computes every result from the unmodified array before writing
//!   anything, then commits in ascending source order. A later source wins
//!   a collision; slots nobody targets keep their old contents.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::{with_scratch, Layout};
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;
use crate::primitives::index::{index_width, read_index, write_index};
use crate::primitives::pair::{halves_mut, high_ref, low_ref};

/// Fill `pair` with `(index(i), element)`.
#[inline]
fn load_indexed(pair: &mut [u8], i: usize, element: &[u8]) {
    let (index, value) = halves_mut(pair);
    write_index(i, index);
    value.copy_from_slice(element);
}

/// Apply a pair kernel to `(index(i), element_i)` and keep the low half.
pub fn indexed_map(
    data: &mut [u8],
    layout: &Layout,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let stride = layout.stride();
    let span = layout.span();
    scheduler.run(&mut data[span], stride, layout.start, &|i, element| {
        with_scratch(2 * stride, |pair| {
            load_indexed(pair, i, element);
            kernel.call(pair);
            element.copy_from_slice(low_ref(pair));
        })
    });
}

/// Apply a pair kernel to `(index(i), element_i)` and scatter the low half
/// to the slot named by the high half.
///
/// The staging buffer holds one record per visited element: the new value
/// followed by its destination in `index_width(stride)` bytes. That is
/// twice the visited span for elements of up to 4 bytes and approaches one
/// span as elements grow (1.5 spans at 8 bytes).
pub fn indexed_emplace(
    data: &mut [u8],
    layout: &Layout,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let stride = layout.stride();
    let record = stride + index_width(stride);
    let mask = layout.count() - 1;
    let visited = layout.end - layout.start;

    let mut records: Vec<u8> = vec![0u8; visited * record];
    {
        let source: &[u8] = data;
        scheduler.run(&mut records, record, layout.start, &|i, slot| {
            with_scratch(2 * stride, |pair| {
                load_indexed(pair, i, &source[layout.element_bytes(i)]);
                kernel.call(pair);
                let (value, dest) = slot.split_at_mut(stride);
                value.copy_from_slice(low_ref(pair));
                write_index(read_index(high_ref(pair)) & mask, dest);
            })
        });
    }

    for slot in records.chunks_exact(record) {
        let (value, dest) = slot.split_at(stride);
        data[layout.element_bytes(read_index(dest))].copy_from_slice(value);
    }
}
