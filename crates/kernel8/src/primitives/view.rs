//! Typed views over large buffers.
//!
//! ## Purpose
//!
//! A view is a checked `(bytes, element order)` reinterpretation of a larger
//! buffer as an array of equally sized elements. It is the sanctioned way
//! for code outside the lifting combinators to read and write individual
//! elements by index or by raw byte offset.
//!
//! ## Design notes
//!
//! * **Checked construction**: The byte length must be a power-of-two multiple
//!   of the element size, so the reinterpretation has no padding or slack.
//! * **Zero-copy**: Element accessors return subslices of the underlying buffer.
//! * **Two access modes**: `get`/`insert` are bounds checked and return
//!   `Result`; `get_wrapping` masks the index by `len - 1` and never fails.
//!
//! ## Key concepts
//!
//! * **Stepped traversal**: `traverse` visits `start, start + step, ...` below
//!   `end`; `traverse_back` visits the same range from the top down. A range
//!   that is not well formed visits nothing.

// External dependencies
use core::ops::Range;

// Internal dependencies
use crate::primitives::errors::KernelError;
use crate::primitives::lane::Lane;
use crate::primitives::order::Order;
use crate::primitives::state::State;

// ============================================================================
// Helpers
// ============================================================================

fn check_layout(len: usize, element: Order) -> Result<usize, KernelError> {
    let size = element.size();
    if len < size || len % size != 0 || !(len / size).is_power_of_two() {
        return Err(KernelError::LengthMismatch {
            expected: size.max(len.next_power_of_two()),
            got: len,
        });
    }
    Ok(len / size)
}

/// Clamp an ill-formed traversal to an empty one.
fn traversal_bounds(start: usize, end: usize, step: usize, len: usize) -> (usize, usize, usize) {
    if start <= end && end <= len && step > 0 {
        (start, end - start, step)
    } else {
        log::debug!("traversal [{start}, {end}) step {step} is ill-formed for {len} elements");
        (0, 0, 1)
    }
}

// ============================================================================
// Shared View
// ============================================================================

/// Read-only array view of a buffer.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    bytes: &'a [u8],
    element: Order,
    len: usize,
}

impl<'a> StateView<'a> {
    /// Reinterpret `bytes` as an array of `element`-order buffers.
    pub fn new(bytes: &'a [u8], element: Order) -> Result<Self, KernelError> {
        let len = check_layout(bytes.len(), element)?;
        Ok(Self {
            bytes,
            element,
            len,
        })
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view holds no elements (never true for a checked view).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Order of each element.
    #[inline]
    pub fn element_order(&self) -> Order {
        self.element
    }

    /// Element `i`.
    pub fn get(&self, i: usize) -> Result<&'a [u8], KernelError> {
        if i >= self.len {
            return Err(KernelError::IndexOutOfBounds {
                index: i,
                len: self.len,
            });
        }
        let size = self.element.size();
        Ok(&self.bytes[i * size..(i + 1) * size])
    }

    /// Element `i & (len - 1)`.
    pub fn get_wrapping(&self, i: usize) -> &'a [u8] {
        let size = self.element.size();
        let i = i & (self.len - 1);
        &self.bytes[i * size..(i + 1) * size]
    }

    /// Copy element `i` out as an owned state.
    pub fn get_state(&self, i: usize) -> Result<State, KernelError> {
        State::from_bytes(self.element, self.get(i)?)
    }

    /// Element-sized region starting at an arbitrary byte offset.
    pub fn get_at_offset(&self, offset: usize) -> Result<&'a [u8], KernelError> {
        let width = self.element.size();
        match offset.checked_add(width) {
            Some(end) if end <= self.bytes.len() => Ok(&self.bytes[offset..end]),
            _ => Err(KernelError::OffsetOutOfBounds {
                offset,
                width,
                len: self.bytes.len(),
            }),
        }
    }

    /// Element `i` read as a number; the element order must equal `L::ORDER`.
    pub fn lane<L: Lane>(&self, i: usize) -> Result<L, KernelError> {
        check_lane::<L>(self.element)?;
        Ok(L::read(self.get(i)?))
    }

    /// All elements in ascending order.
    pub fn iter(&self) -> core::slice::ChunksExact<'a, u8> {
        self.bytes.chunks_exact(self.element.size())
    }

    /// Visit `start, start + step, ...` below `end`.
    pub fn traverse(
        &self,
        start: usize,
        end: usize,
        step: usize,
    ) -> impl Iterator<Item = (usize, &'a [u8])> {
        let (skip, take, step) = traversal_bounds(start, end, step, self.len);
        self.iter().enumerate().skip(skip).take(take).step_by(step)
    }

    /// Visit `end - 1, end - 1 - step, ...` down to `start`.
    pub fn traverse_back(
        &self,
        start: usize,
        end: usize,
        step: usize,
    ) -> impl Iterator<Item = (usize, &'a [u8])> {
        let (skip, take, step) = traversal_bounds(start, end, step, self.len);
        self.iter().enumerate().skip(skip).take(take).rev().step_by(step)
    }
}

// ============================================================================
// Mutable View
// ============================================================================

/// Mutable array view of a buffer.
#[derive(Debug)]
pub struct StateViewMut<'a> {
    bytes: &'a mut [u8],
    element: Order,
    len: usize,
}

impl<'a> StateViewMut<'a> {
    /// Reinterpret `bytes` as a mutable array of `element`-order buffers.
    pub fn new(bytes: &'a mut [u8], element: Order) -> Result<Self, KernelError> {
        let len = check_layout(bytes.len(), element)?;
        Ok(Self {
            bytes,
            element,
            len,
        })
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> StateView<'_> {
        StateView {
            bytes: &*self.bytes,
            element: self.element,
            len: self.len,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the view holds no elements (never true for a checked view).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Order of each element.
    #[inline]
    pub fn element_order(&self) -> Order {
        self.element
    }

    /// Element `i`.
    pub fn get(&self, i: usize) -> Result<&[u8], KernelError> {
        self.range_of(i).map(|r| &self.bytes[r])
    }

    /// Mutable element `i`.
    pub fn get_mut(&mut self, i: usize) -> Result<&mut [u8], KernelError> {
        let r = self.range_of(i)?;
        Ok(&mut self.bytes[r])
    }

    /// Mutable element `i & (len - 1)`.
    pub fn get_wrapping_mut(&mut self, i: usize) -> &mut [u8] {
        let size = self.element.size();
        let i = i & (self.len - 1);
        &mut self.bytes[i * size..(i + 1) * size]
    }

    /// Copy element `i` out as an owned state.
    pub fn get_state(&self, i: usize) -> Result<State, KernelError> {
        State::from_bytes(self.element, self.get(i)?)
    }

    /// Overwrite element `i` with `state`, whose order must match.
    pub fn insert(&mut self, i: usize, state: &State) -> Result<(), KernelError> {
        if state.order() != self.element {
            return Err(KernelError::OrderMismatch {
                role: "element",
                expected: self.element.get(),
                got: state.order().get(),
            });
        }
        self.insert_bytes(i, state.as_bytes())
    }

    /// Overwrite element `i` with raw bytes of the element size.
    pub fn insert_bytes(&mut self, i: usize, bytes: &[u8]) -> Result<(), KernelError> {
        crate::primitives::state::check_len(self.element, bytes.len())?;
        self.get_mut(i)?.copy_from_slice(bytes);
        Ok(())
    }

    /// Overwrite the element-sized region starting at a byte offset.
    pub fn insert_at_offset(&mut self, offset: usize, bytes: &[u8]) -> Result<(), KernelError> {
        crate::primitives::state::check_len(self.element, bytes.len())?;
        let width = bytes.len();
        match offset.checked_add(width) {
            Some(end) if end <= self.bytes.len() => {
                self.bytes[offset..end].copy_from_slice(bytes);
                Ok(())
            }
            _ => Err(KernelError::OffsetOutOfBounds {
                offset,
                width,
                len: self.bytes.len(),
            }),
        }
    }

    /// Write element `i` as a number; the element order must equal `L::ORDER`.
    pub fn set_lane<L: Lane>(&mut self, i: usize, value: L) -> Result<(), KernelError> {
        check_lane::<L>(self.element)?;
        value.write(self.get_mut(i)?);
        Ok(())
    }

    /// All elements, mutably, in ascending order.
    pub fn iter_mut(&mut self) -> core::slice::ChunksExactMut<'_, u8> {
        self.bytes.chunks_exact_mut(self.element.size())
    }

    /// Mutably visit `start, start + step, ...` below `end`.
    pub fn traverse_mut(
        &mut self,
        start: usize,
        end: usize,
        step: usize,
    ) -> impl Iterator<Item = (usize, &mut [u8])> {
        let (skip, take, step) = traversal_bounds(start, end, step, self.len);
        self.iter_mut().enumerate().skip(skip).take(take).step_by(step)
    }

    /// Mutably visit `end - 1, end - 1 - step, ...` down to `start`.
    pub fn traverse_back_mut(
        &mut self,
        start: usize,
        end: usize,
        step: usize,
    ) -> impl Iterator<Item = (usize, &mut [u8])> {
        let (skip, take, step) = traversal_bounds(start, end, step, self.len);
        self.iter_mut().enumerate().skip(skip).take(take).rev().step_by(step)
    }

    fn range_of(&self, i: usize) -> Result<Range<usize>, KernelError> {
        if i >= self.len {
            return Err(KernelError::IndexOutOfBounds {
                index: i,
                len: self.len,
            });
        }
        let size = self.element.size();
        Ok(i * size..(i + 1) * size)
    }
}

fn check_lane<L: Lane>(element: Order) -> Result<(), KernelError> {
    if element.get() != L::ORDER {
        return Err(KernelError::OrderMismatch {
            role: "lane",
            expected: element.get(),
            got: L::ORDER,
        });
    }
    Ok(())
}
