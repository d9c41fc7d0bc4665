//! Multi-kernel dispatch.
//!
//! Applies `table[i]` to element `i` for every `i` in `[start, end)`. The
//! table is indexed by absolute element position and must cover `end`.

// Internal dependencies
use crate::algorithms::Layout;
use crate::kernels::KernelRef;
use crate::primitives::backend::Scheduler;

/// Apply one kernel per position.
pub fn dispatch(
    data: &mut [u8],
    layout: &Layout,
    table: &[KernelRef],
    scheduler: &dyn Scheduler,
) {
    let span = layout.span();
    scheduler.run(&mut data[span], layout.stride(), layout.start, &|i, element| {
        table[i].call(element)
    });
}
