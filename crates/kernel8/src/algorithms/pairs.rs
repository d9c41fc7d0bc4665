//! All-pairs.
//!
//! ## Purpose
//!
//! For `i` in `[start, end - 1)` and `j` in `(i, end)`, the kernel receives
//! the pair `(element_i, element_j)` and element `j` is written back from
//! the low half. O(n²) kernel calls.
//!
//! ## Key concepts
//!
//! * **WriteBack**: the high half is carried from one `j` to the next and
//!   element `i` is written back from it when its inner loop completes.
//!   Every loop is sequential.
//! * **ReadOnly**: every `j` starts from the same copy of element `i`, which
//!   is never written. The inner loop over `j` runs through the scheduler.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::{with_scratch, Layout, PairPolicy};
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;
use crate::primitives::pair::{fill_pair, halves_mut, high_ref, low_ref};

/// Run `kernel` over every pair `(i, j)` with `start <= i < j < end`.
pub fn all_pairs(
    data: &mut [u8],
    layout: &Layout,
    policy: PairPolicy,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    match policy {
        PairPolicy::WriteBack => write_back(data, layout, kernel),
        PairPolicy::ReadOnly => read_only(data, layout, kernel, scheduler),
    }
}

fn write_back(data: &mut [u8], layout: &Layout, kernel: &dyn Kernel) {
    let stride = layout.stride();
    with_scratch(2 * stride, |pair| {
        for i in layout.start..layout.end.saturating_sub(1) {
            let (high, _) = halves_mut(pair);
            high.copy_from_slice(&data[layout.element_bytes(i)]);
            for j in i + 1..layout.end {
                let element = layout.element_bytes(j);
                let (_, low) = halves_mut(pair);
                low.copy_from_slice(&data[element.clone()]);
                kernel.call(pair);
                data[element].copy_from_slice(low_ref(pair));
            }
            data[layout.element_bytes(i)].copy_from_slice(high_ref(pair));
        }
    });
}

fn read_only(data: &mut [u8], layout: &Layout, kernel: &dyn Kernel, scheduler: &dyn Scheduler) {
    let stride = layout.stride();
    for i in layout.start..layout.end.saturating_sub(1) {
        let (head, tail) = data.split_at_mut((i + 1) * stride);
        let fixed: Vec<u8> = head[i * stride..].to_vec();
        let rest = &mut tail[..(layout.end - i - 1) * stride];
        scheduler.run(rest, stride, i + 1, &|_, element| {
            with_scratch(2 * stride, |pair| {
                fill_pair(pair, &fixed, element);
                kernel.call(pair);
                element.copy_from_slice(low_ref(pair));
            })
        });
    }
}
