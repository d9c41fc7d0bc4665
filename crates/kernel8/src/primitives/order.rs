//! Buffer orders.
//!
//! ## Purpose
//!
//! An order `k` names a buffer of `2^(k-1)` bytes. Orders form a strictly
//! doubling hierarchy: every order-`k` buffer is exactly two order-`k-1`
//! buffers, and more generally `2^(k-j)` order-`j` buffers.
//!
//! ## Invariants
//!
//! * `1 <= k <= 35` (1 byte up to 16 GiB).
//! * `size(k) == 2 * size(k - 1)`.

// Internal dependencies
use crate::primitives::errors::KernelError;
use crate::primitives::lane::Lane;

/// Smallest supported order (1 byte).
pub const MIN_ORDER: u8 = 1;

/// Largest supported order (16 GiB).
pub const MAX_ORDER: u8 = 35;

/// Position of a buffer size in the doubling hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Order(u8);

impl Order {
    /// Validate and wrap an order number.
    pub fn new(k: u32) -> Result<Self, KernelError> {
        if k < MIN_ORDER as u32 || k > MAX_ORDER as u32 {
            return Err(KernelError::InvalidOrder(k));
        }
        Ok(Self(k as u8))
    }

    /// Order from the byte size of a buffer, if the size is a valid power of two.
    pub fn from_size(bytes: usize) -> Result<Self, KernelError> {
        if bytes == 0 || !bytes.is_power_of_two() {
            return Err(KernelError::InvalidOrder(0));
        }
        Self::new(bytes.trailing_zeros() + 1)
    }

    /// Order of a numeric lane type (always within 1..=5).
    #[inline]
    pub fn of_lane<L: Lane>() -> Self {
        Self(L::ORDER)
    }

    /// Order of a pair of `L` lanes (always within 2..=6).
    #[inline]
    pub fn pair_of_lane<L: Lane>() -> Self {
        Self(L::ORDER + 1)
    }

    /// Raw order number.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Size in bytes: `2^(k-1)`.
    #[inline]
    pub fn size(self) -> usize {
        1usize << (self.0 - 1)
    }

    /// The order one step down (each half of this buffer).
    pub fn half(self) -> Result<Self, KernelError> {
        Self::new(self.0 as u32 - 1)
    }

    /// The order one step up (a pair of these buffers).
    pub fn double(self) -> Result<Self, KernelError> {
        Self::new(self.0 as u32 + 1)
    }

    /// Number of `self`-sized elements in a buffer of `container` order.
    ///
    /// Returns 0 when the container is smaller than the element.
    #[inline]
    pub fn elements_in(self, container: Order) -> usize {
        if container.0 < self.0 {
            0
        } else {
            1usize << (container.0 - self.0)
        }
    }
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
