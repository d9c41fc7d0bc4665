//! Owned fixed-size buffers and the byte-level operations on them.
//!
//! ## Purpose
//!
//! A [`State`] is an owned `Buffer(k)`: exactly `2^(k-1)` bytes tagged with
//! their order. The free functions in this module implement the half-wise
//! and byte-order operations on raw byte slices so they can also run on
//! borrowed regions of a much larger buffer without copying.
//!
//! ## Design notes
//!
//! * **Heap-backed**: Bytes live in a boxed slice, so moving a large state is cheap.
//! * **Slice-first**: Every operation exists as a slice function; `State` methods delegate.
//! * **Branch-free**: All operations are O(size); only the endianness check branches.
//!
//! ## Key concepts
//!
//! * **Halves**: For an order-`k` buffer, the first (high) half is bytes
//!   `[0, size/2)` and the second (low) half is `[size/2, size)`.
//! * **Half-wise logic**: `and/or/xor_halves` combine the two halves byte by
//!   byte and store the result in the first half; the second half is untouched.
//!
//! ## Invariants
//!
//! * `state.as_bytes().len() == state.order().size()` at all times.
//!
//! ## Non-goals
//!
//! * Sub-byte halves: on a 1-byte buffer the half-wise operations do nothing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};
#[cfg(feature = "std")]
use std::{boxed::Box, vec::Vec};

// Internal dependencies
use crate::primitives::errors::KernelError;
use crate::primitives::lane::Lane;
use crate::primitives::order::Order;
use crate::primitives::view::{StateView, StateViewMut};

// ============================================================================
// Slice Operations
// ============================================================================

/// Exchange the two halves of `bytes` in place.
pub fn swap_halves(bytes: &mut [u8]) {
    let half = bytes.len() / 2;
    let (high, low) = bytes.split_at_mut(half);
    high.swap_with_slice(&mut low[..half]);
}

/// `high[i] &= low[i]` for every byte of the first half.
pub fn and_halves(bytes: &mut [u8]) {
    combine_halves(bytes, |a, b| a & b);
}

/// `high[i] |= low[i]` for every byte of the first half.
pub fn or_halves(bytes: &mut [u8]) {
    combine_halves(bytes, |a, b| a | b);
}

/// `high[i] ^= low[i]` for every byte of the first half.
pub fn xor_halves(bytes: &mut [u8]) {
    combine_halves(bytes, |a, b| a ^ b);
}

#[inline]
fn combine_halves(bytes: &mut [u8], op: impl Fn(u8, u8) -> u8) {
    let half = bytes.len() / 2;
    let (high, low) = bytes.split_at_mut(half);
    for (h, l) in high.iter_mut().zip(low.iter()) {
        *h = op(*h, *l);
    }
}

/// Reverse the byte order of the whole buffer.
pub fn reverse_bytes(bytes: &mut [u8]) {
    bytes.reverse();
}

/// Reverse the byte order only on little-endian hosts.
///
/// Normalizes buffers that hold big-endian serialized data.
pub fn conditional_byteswap(bytes: &mut [u8]) {
    if cfg!(target_endian = "little") {
        bytes.reverse();
    }
}

// ============================================================================
// State
// ============================================================================

/// An owned buffer of a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    order: Order,
    bytes: Box<[u8]>,
}

impl State {
    /// An all-zero buffer.
    pub fn zero(order: Order) -> Self {
        Self {
            order,
            bytes: vec![0u8; order.size()].into_boxed_slice(),
        }
    }

    /// Copy `bytes` into a new state; the length must match the order.
    pub fn from_bytes(order: Order, bytes: &[u8]) -> Result<Self, KernelError> {
        check_len(order, bytes.len())?;
        Ok(Self {
            order,
            bytes: bytes.into(),
        })
    }

    /// Take ownership of `bytes`; the length must match the order.
    pub fn from_vec(order: Order, bytes: Vec<u8>) -> Result<Self, KernelError> {
        check_len(order, bytes.len())?;
        Ok(Self {
            order,
            bytes: bytes.into_boxed_slice(),
        })
    }

    /// A state of order `L::ORDER` holding a single numeric value.
    pub fn from_lane<L: Lane>(value: L) -> Self {
        let mut bytes = vec![0u8; L::WIDTH];
        value.write(&mut bytes);
        Self {
            order: Order::of_lane::<L>(),
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// A state of order `L::ORDER + k` holding `values` as consecutive lanes.
    pub fn from_lanes<L: Lane>(values: &[L]) -> Result<Self, KernelError> {
        let order = Order::from_size(values.len() * L::WIDTH)?;
        let mut state = Self::zero(order);
        for (chunk, value) in state.bytes.chunks_exact_mut(L::WIDTH).zip(values) {
            value.write(chunk);
        }
        Ok(state)
    }

    /// Order of this state.
    #[inline]
    pub fn order(&self) -> Order {
        self.order
    }

    /// Size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; the smallest state holds one byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Borrow the raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutably borrow the raw bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Release the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_vec()
    }

    /// Read lane `i` of type `L`.
    ///
    /// # Panics
    ///
    /// Panics if lane `i` lies outside the buffer.
    #[inline]
    pub fn lane<L: Lane>(&self, i: usize) -> L {
        L::read(&self.bytes[i * L::WIDTH..(i + 1) * L::WIDTH])
    }

    /// Write lane `i` of type `L`.
    ///
    /// # Panics
    ///
    /// Panics if lane `i` lies outside the buffer.
    #[inline]
    pub fn set_lane<L: Lane>(&mut self, i: usize, value: L) {
        value.write(&mut self.bytes[i * L::WIDTH..(i + 1) * L::WIDTH]);
    }

    /// Read every lane of type `L`.
    pub fn to_lanes<L: Lane>(&self) -> Vec<L> {
        self.bytes.chunks_exact(L::WIDTH).map(L::read).collect()
    }

    /// View this state as an array of `element`-order buffers.
    pub fn view(&self, element: Order) -> Result<StateView<'_>, KernelError> {
        StateView::new(&self.bytes, element)
    }

    /// Mutable view of this state as an array of `element`-order buffers.
    pub fn view_mut(&mut self, element: Order) -> Result<StateViewMut<'_>, KernelError> {
        StateViewMut::new(&mut self.bytes, element)
    }

    /// Exchange the two halves.
    pub fn swap_halves(&mut self) {
        swap_halves(&mut self.bytes);
    }

    /// Bitwise AND of the halves into the first half.
    pub fn and_halves(&mut self) {
        and_halves(&mut self.bytes);
    }

    /// Bitwise OR of the halves into the first half.
    pub fn or_halves(&mut self) {
        or_halves(&mut self.bytes);
    }

    /// Bitwise XOR of the halves into the first half.
    pub fn xor_halves(&mut self) {
        xor_halves(&mut self.bytes);
    }

    /// Reverse the byte order.
    pub fn reverse_bytes(&mut self) {
        reverse_bytes(&mut self.bytes);
    }

    /// Reverse the byte order on little-endian hosts only.
    pub fn conditional_byteswap(&mut self) {
        conditional_byteswap(&mut self.bytes);
    }

    /// Exchange contents with another state of the same order.
    pub fn swap_with(&mut self, other: &mut State) -> Result<(), KernelError> {
        if self.order != other.order {
            return Err(KernelError::OrderMismatch {
                role: "swap",
                expected: self.order.get(),
                got: other.order.get(),
            });
        }
        core::mem::swap(&mut self.bytes, &mut other.bytes);
        Ok(())
    }
}

impl AsRef<[u8]> for State {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for State {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

#[inline]
pub(crate) fn check_len(order: Order, len: usize) -> Result<(), KernelError> {
    if len != order.size() {
        return Err(KernelError::LengthMismatch {
            expected: order.size(),
            got: len,
        });
    }
    Ok(())
}
