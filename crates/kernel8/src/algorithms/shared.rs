//! Shared-state reduce and read-only broadcast.
//!
//! ## Purpose
//!
//! One element of the container (the shared slot, 0 by default) is
//! distinguished. For each element `i` of the range, the kernel receives the
//! pair `(shared, element_i)` and element `i` is written back from the low
//! half.
//!
//! * **Reduce**: the high half is carried into the next iteration and finally
//!   stored back into the shared slot. Iterations run in ascending order.
//! * **Broadcast**: every iteration starts from the original shared value and
//!   the shared slot is never written, so iterations are independent.
//!
//! ## Key concepts
//!
//! * **Index window**: optionally, the running index `i` is written into a
//!   sub-field of the shared half before each call. Reduce saves the field
//!   before the loop and restores it afterwards, so the field leaves no trace.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// Internal dependencies
use crate::algorithms::{with_scratch, IndexWindow, Layout};
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;
use crate::primitives::index::write_window_index;
use crate::primitives::pair::{halves_mut, high_ref, low_ref};

/// Thread the shared element through `[start, end)` in ascending order.
pub fn shared_reduce(
    data: &mut [u8],
    layout: &Layout,
    shared_slot: usize,
    window: Option<IndexWindow>,
    kernel: &dyn Kernel,
) {
    let stride = layout.stride();
    let shared_bytes = layout.element_bytes(shared_slot);

    with_scratch(2 * stride, |pair| {
        let saved: Option<Vec<u8>> = {
            let (high, _) = halves_mut(pair);
            high.copy_from_slice(&data[shared_bytes.clone()]);
            window.map(|w| high[w.bytes()].to_vec())
        };

        for i in layout.start..layout.end {
            let element = layout.element_bytes(i);
            {
                let (high, low) = halves_mut(pair);
                if let Some(w) = window {
                    write_window_index(i, &mut high[w.bytes()]);
                }
                low.copy_from_slice(&data[element.clone()]);
            }
            kernel.call(pair);
            data[element].copy_from_slice(low_ref(pair));
        }

        let (high, _) = halves_mut(pair);
        if let (Some(w), Some(saved)) = (window, saved) {
            high[w.bytes()].copy_from_slice(&saved);
        }
        data[shared_bytes].copy_from_slice(high_ref(pair));
    });
}

/// Pair each element of `[start, end)` with a fresh copy of the shared element.
pub fn shared_broadcast(
    data: &mut [u8],
    layout: &Layout,
    shared_slot: usize,
    window: Option<IndexWindow>,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let stride = layout.stride();
    let shared: Vec<u8> = data[layout.element_bytes(shared_slot)].to_vec();
    let span = layout.span();

    scheduler.run(&mut data[span], stride, layout.start, &|i, element| {
        with_scratch(2 * stride, |pair| {
            {
                let (high, low) = halves_mut(pair);
                high.copy_from_slice(&shared);
                if let Some(w) = window {
                    write_window_index(i, &mut high[w.bytes()]);
                }
                low.copy_from_slice(element);
            }
            kernel.call(pair);
            element.copy_from_slice(low_ref(pair));
        })
    });
}
