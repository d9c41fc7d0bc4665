//! Halves-zip.
//!
//! ## Purpose
//!
//! Splits the container into its two halves, reads each as an array of
//! elements of the same length, and passes `(high[i], low[i])` to the
//! kernel. Both positions are written back from the result. This is the
//! building block for elementwise arithmetic between two vectors.
//!
//! Each run of positions the scheduler hands out is interleaved into a
//! scratch run of pairs, passed to the kernel's block body in one call, and
//! split back into the halves.
//!
//! ## Invariants
//!
//! * The range `[start, end)` is measured in positions within one half, so
//!   `end <= count / 2`.

// Internal dependencies
use crate::algorithms::{with_scratch, Layout};
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;
use crate::primitives::pair::{fill_pair, halves_mut, high_ref, low_ref};

/// Apply a pair kernel position-wise across the two halves of the container.
pub fn halves_zip(
    data: &mut [u8],
    layout: &Layout,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let stride = layout.stride();
    let span = layout.span();
    let (first, second) = halves_mut(data);
    scheduler.run_zip_blocks(
        &mut first[span.clone()],
        &mut second[span],
        stride,
        layout.start,
        &|_, xs, ys| {
            with_scratch(2 * xs.len(), |pairs| {
                let inputs = xs.chunks_exact(stride).zip(ys.chunks_exact(stride));
                for (pair, (a, b)) in pairs.chunks_exact_mut(2 * stride).zip(inputs) {
                    fill_pair(pair, a, b);
                }
                kernel.call_block(pairs);
                let outputs = xs.chunks_exact_mut(stride).zip(ys.chunks_exact_mut(stride));
                for (pair, (a, b)) in pairs.chunks_exact(2 * stride).zip(outputs) {
                    a.copy_from_slice(high_ref(pair));
                    b.copy_from_slice(low_ref(pair));
                }
            })
        },
    );
}
