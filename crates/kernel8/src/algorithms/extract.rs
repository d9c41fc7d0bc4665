//! Fixed-width data extraction.
//!
//! ## Purpose
//!
//! Processes the container in consecutive windows of `width` bytes, which
//! need not be a power of two. Each window is copied into a zeroed state
//! of the kernel's order, transformed, and its first `width` bytes are
//! copied back. Useful for records packed at an odd stride.
//!
//! ## Invariants
//!
//! * The range is measured in bytes; windows start at `start`,
//!   `start + width`, ... below `end`.
//! * `end <= size(container) - width + 1`, so the last window fits.

// Internal dependencies
use crate::algorithms::{with_scratch, Layout};
use crate::kernels::Kernel;
use crate::primitives::backend::Scheduler;

/// Number of windows starting in `[start, end)`.
#[inline]
pub fn window_count(start: usize, end: usize, width: usize) -> usize {
    (end - start).div_ceil(width)
}

/// Apply `kernel` to each `width`-byte window; `layout.start/end` are byte offsets.
pub fn extract(
    data: &mut [u8],
    layout: &Layout,
    width: usize,
    kernel: &dyn Kernel,
    scheduler: &dyn Scheduler,
) {
    let windows = window_count(layout.start, layout.end, width);
    let region = layout.start..layout.start + windows * width;
    let state_size = layout.element.size();
    scheduler.run(&mut data[region], width, 0, &|_, window| {
        with_scratch(state_size, |state| {
            state[..width].copy_from_slice(window);
            kernel.call(state);
            window.copy_from_slice(&state[..width]);
        })
    });
}
