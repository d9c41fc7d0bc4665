//! Plain map.
//!
//! ## Purpose
//!
//! Replaces every element in `[start, end)` with `kernel(element)`. There
//! is no dependency between iterations, so the scheduler may visit the
//! elements in any order and the result is the same.
//!
//! The scheduler hands out runs of elements, and each run goes to the
//! kernel's block body in one call.

// Internal dependencies
use crate::algorithms::Layout;
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;

/// Apply `kernel` to each element in the layout's range.
pub fn map(data: &mut [u8], layout: &Layout, kernel: &dyn Kernel, scheduler: &dyn Scheduler) {
    let span = layout.span();
    scheduler.run_blocks(
        &mut data[span],
        layout.stride(),
        layout.start,
        &|_, run| kernel.call_block(run),
    );
}
